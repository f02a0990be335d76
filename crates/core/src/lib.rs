//! Cyclone Wind Field Core Library
//!
//! Reconstructs the maximum surface wind speed footprint of tropical
//! cyclones from their tracks. Each storm's track is resampled to a fine
//! time step, a parametric vortex (Holland 1980) plus a translation-driven
//! background flow is evaluated on a fixed geographic grid at every step,
//! winds are brought down to surface level with per-cell factors, and the
//! largest magnitude seen at each cell is kept.
//!
//! ## Pipeline
//!
//! - [`track`]: validated observations, geodesic kinematics, resampling
//! - [`physics`]: Holland profile and the combined wind model
//! - [`grid`]: evaluation grid and surface downscaling factors
//! - [`simulation`]: per-track processing and the batch driver, producing an
//!   [`EventCollection`] ordered by storm id
//!
//! Failures are contained at the smallest granularity possible: a bad
//! timestep contributes a calm frame, a bad storm a calm grid, and a batch
//! always completes.

// Core types and utilities
pub mod core_types;
pub mod error;

// Storm tracks and geodesy
pub mod track;

// Spatial domain and wind physics
pub mod grid;
pub mod physics;

// Per-storm and batch processing
pub mod simulation;

// Re-export core types
pub use core_types::{Basin, EnvironmentalPressure, StormId};
pub use error::{Result, WindFieldError};

// Re-export track and grid types
pub use grid::{DownscalingFactors, EvaluationGrid};
pub use track::{StormRow, Track, TrackObservation};

// Re-export model and processing types
pub use physics::{WindModel, WindModelConfig};
pub use simulation::{
    run_batch, BatchConfig, BatchDriver, BatchReport, EventCollection, ExecutionMode,
    MaxWindResult, TrackOutcome, TrackProcessor,
};
