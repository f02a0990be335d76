//! Gradient-to-surface wind downscaling factors.
//!
//! The vortex model gives gradient-level wind (top of the boundary layer).
//! Surface wind is lower, by an amount set by the local surface roughness,
//! so each grid cell carries a multiplicative factor.
//!
//! # Logarithmic profile
//!
//! For a neutral boundary layer the wind at height `z` over roughness length
//! `z0` follows
//!
//! ```text
//! u(z) ∝ ln(z / z0)
//! ```
//!
//! so the surface/gradient ratio is
//!
//! ```text
//! factor = ln(z_surface / z0) / ln(z_gradient / z0)
//! ```

use crate::error::{Result, WindFieldError};
use crate::grid::EvaluationGrid;
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

/// Boundary layer heights used by the logarithmic profile
pub mod constants {
    /// Standard anemometer height for surface wind (m)
    pub const SURFACE_HEIGHT: f64 = 10.0;

    /// Height taken as gradient level (m)
    pub const GRADIENT_HEIGHT: f64 = 1000.0;
}

/// One multiplicative factor per evaluation grid cell, shape (Ny, Nx).
///
/// Read-only once built; shared by reference across all storms in a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownscalingFactors {
    factors: DMatrix<f64>,
}

impl DownscalingFactors {
    /// Wrap a factor array, checking it is co-registered with `grid`
    pub fn from_matrix(grid: &EvaluationGrid, factors: DMatrix<f64>) -> Result<Self> {
        let found = factors.shape();
        if found != grid.shape() {
            return Err(WindFieldError::ShapeMismatch {
                expected: grid.shape(),
                found,
            });
        }
        Ok(Self { factors })
    }

    /// The same factor everywhere
    pub fn uniform(grid: &EvaluationGrid, factor: f64) -> Self {
        let (ny, nx) = grid.shape();
        Self {
            factors: DMatrix::from_element(ny, nx, factor),
        }
    }

    /// Derive factors from roughness lengths (m) with the logarithmic profile.
    ///
    /// Cells with a non-positive, non-finite roughness, or one at or above
    /// `surface_height`, get NaN (no defined surface wind).
    pub fn from_roughness_lengths(
        grid: &EvaluationGrid,
        roughness: &DMatrix<f64>,
        surface_height: f64,
        gradient_height: f64,
    ) -> Result<Self> {
        let heights_ordered = surface_height > 0.0 && gradient_height > surface_height;
        if !heights_ordered {
            return Err(WindFieldError::InvalidConfig(format!(
                "need 0 < surface height ({surface_height}) < gradient height ({gradient_height})"
            )));
        }
        let factors = roughness.map(|z0| log_law_factor(z0, surface_height, gradient_height));
        Self::from_matrix(grid, factors)
    }

    /// Factor array, shape (Ny, Nx)
    pub fn as_matrix(&self) -> &DMatrix<f64> {
        &self.factors
    }

    /// Shape (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        self.factors.shape()
    }

    /// A copy with every factor multiplied by `c`
    pub fn scaled(&self, c: f64) -> Self {
        Self {
            factors: &self.factors * c,
        }
    }
}

/// Surface/gradient wind ratio for roughness length `z0`
#[inline]
pub fn log_law_factor(z0: f64, surface_height: f64, gradient_height: f64) -> f64 {
    if !z0.is_finite() || z0 <= 0.0 || z0 >= surface_height {
        return f64::NAN;
    }
    (surface_height / z0).ln() / (gradient_height / z0).ln()
}
