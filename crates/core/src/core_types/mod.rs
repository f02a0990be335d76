//! Core types and utilities

pub mod basin;
pub mod storm_id;
pub mod units;

pub use basin::{Basin, EnvironmentalPressure};
pub use storm_id::StormId;
pub use units::*;
