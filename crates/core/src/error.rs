//! Error types for the wind field engine.
//!
//! Failures are recovered at the smallest granularity that makes sense:
//! a timestep evaluation failure zeroes that timestep, a track failure zeroes
//! that track, and nothing aborts a batch. Which variant is raised decides
//! which recovery applies, so callers should match on it rather than treat
//! every error alike.

use crate::core_types::Basin;
use std::fmt;

/// Errors raised by the wind field engine
#[derive(Debug, Clone, PartialEq)]
pub enum WindFieldError {
    /// Coordinates that are non-finite, out of range or mismatched in length
    InvalidGeometry(String),
    /// Track has too few points to define a velocity
    NotInterpolatable {
        /// Number of observations the track has
        points: usize,
    },
    /// Track geometry or timing is degenerate and cannot be resampled
    Interpolation(String),
    /// Non-physical or singular vortex parameters at one timestep
    WindFieldEvaluation(String),
    /// Basin missing from the environmental pressure table
    UnknownBasin(Basin),
    /// An array is not co-registered with the evaluation grid
    ShapeMismatch {
        /// Shape of the evaluation grid (rows, cols)
        expected: (usize, usize),
        /// Shape that was supplied (rows, cols)
        found: (usize, usize),
    },
    /// Observations that cannot form a single track
    InvalidTrack(String),
    /// Configuration values outside their valid range
    InvalidConfig(String),
}

impl fmt::Display for WindFieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindFieldError::InvalidGeometry(msg) => write!(f, "Invalid geometry: {msg}"),
            WindFieldError::NotInterpolatable { points } => {
                write!(f, "Track with {points} point(s) cannot be interpolated")
            }
            WindFieldError::Interpolation(msg) => write!(f, "Interpolation failed: {msg}"),
            WindFieldError::WindFieldEvaluation(msg) => {
                write!(f, "Wind field evaluation failed: {msg}")
            }
            WindFieldError::UnknownBasin(basin) => {
                write!(f, "No environmental pressure for basin {basin}")
            }
            WindFieldError::ShapeMismatch { expected, found } => write!(
                f,
                "Shape mismatch: expected {}x{}, found {}x{}",
                expected.0, expected.1, found.0, found.1
            ),
            WindFieldError::InvalidTrack(msg) => write!(f, "Invalid track: {msg}"),
            WindFieldError::InvalidConfig(msg) => write!(f, "Invalid configuration: {msg}"),
        }
    }
}

impl std::error::Error for WindFieldError {}

/// Shorthand for results.
pub type Result<T> = std::result::Result<T, WindFieldError>;
