//! Storm processing: per-track wind evaluation and batch orchestration
//!
//! - [`TrackProcessor`] turns one storm track into a maximum surface wind grid
//! - [`BatchDriver`] filters storms by landfall and runs them over a worker pool
//! - [`EventCollection`] holds the per-storm grids in storm id order

pub mod batch;
pub mod config;
pub mod event_collection;
pub mod track_processor;
pub mod wind_series;

// Re-export main types
pub use batch::{run_batch, BatchDriver, BatchReport};
pub use config::{BatchConfig, ExecutionMode};
pub use event_collection::{EventCollection, EventCollectionBuilder};
pub use track_processor::{MaxWindResult, TrackOutcome, TrackProcessor};
pub use wind_series::WindFieldSeries;
