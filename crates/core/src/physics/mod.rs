//! Parametric cyclone wind physics

pub mod holland;
pub mod wind_model;

// Re-export main types
pub use holland::{coriolis_parameter, HollandProfile, VortexParameters};
pub use wind_model::{EyeState, Hemisphere, WindFrame, WindModel, WindModelConfig};
