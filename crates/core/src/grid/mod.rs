//! Spatial domain: the evaluation grid and per-cell downscaling factors

pub mod downscaling;
pub mod evaluation_grid;

// Re-export main types
pub use downscaling::DownscalingFactors;
pub use evaluation_grid::EvaluationGrid;
