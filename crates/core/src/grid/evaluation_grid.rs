//! Evaluation grid: the cell centres wind speed is computed at.

use crate::error::{Result, WindFieldError};
use crate::track::kinematics::validate_point;
use geo::Point;
use serde::{Deserialize, Serialize};

/// Rectangular WGS84 grid defined by 1-D cell-centre coordinate arrays.
///
/// Arrays derived from it are shaped (Ny, Nx): row `i` is `latitude[i]`,
/// column `j` is `longitude[j]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationGrid {
    longitude: Vec<f64>,
    latitude: Vec<f64>,
}

impl EvaluationGrid {
    /// Create a grid from cell-centre longitudes and latitudes (degrees)
    pub fn new(longitude: Vec<f64>, latitude: Vec<f64>) -> Result<Self> {
        if longitude.is_empty() || latitude.is_empty() {
            return Err(WindFieldError::InvalidGeometry(format!(
                "grid needs at least one longitude and latitude, got {}x{}",
                latitude.len(),
                longitude.len()
            )));
        }
        for &lon in &longitude {
            validate_point(Point::new(lon, 0.0))?;
        }
        for &lat in &latitude {
            validate_point(Point::new(0.0, lat))?;
        }
        Ok(Self {
            longitude,
            latitude,
        })
    }

    /// Evenly spaced cell centres spanning `[min, max]` inclusive on each axis
    pub fn regular(
        (min_lon, max_lon, nx): (f64, f64, usize),
        (min_lat, max_lat, ny): (f64, f64, usize),
    ) -> Result<Self> {
        Self::new(linspace(min_lon, max_lon, nx), linspace(min_lat, max_lat, ny))
    }

    /// Cell-centre longitudes (degrees)
    pub fn longitude(&self) -> &[f64] {
        &self.longitude
    }

    /// Cell-centre latitudes (degrees)
    pub fn latitude(&self) -> &[f64] {
        &self.latitude
    }

    /// Number of columns
    pub fn nx(&self) -> usize {
        self.longitude.len()
    }

    /// Number of rows
    pub fn ny(&self) -> usize {
        self.latitude.len()
    }

    /// Shape of arrays on this grid, (rows, cols) = (Ny, Nx)
    pub fn shape(&self) -> (usize, usize) {
        (self.ny(), self.nx())
    }

    /// Centre of cell (row, col)
    #[inline]
    pub fn cell_center(&self, row: usize, col: usize) -> Point<f64> {
        Point::new(self.longitude[col], self.latitude[row])
    }

    /// (row, col) of the cell centre nearest to (lon, lat), by coordinate
    /// distance along each axis.
    ///
    /// Longitudes are compared modulo 360°, so a query in [-180, 180] finds
    /// its cell on a [0, 360] grid and across the anti-meridian.
    pub fn nearest_cell(&self, lon: f64, lat: f64) -> (usize, usize) {
        (
            nearest_index(&self.latitude, |v| (v - lat).abs()),
            nearest_index(&self.longitude, |v| longitude_separation(v, lon)),
        )
    }
}

/// Absolute difference of two longitudes in degrees, in [0, 180]
#[inline]
fn longitude_separation(a: f64, b: f64) -> f64 {
    ((a - b + 540.0).rem_euclid(360.0) - 180.0).abs()
}

fn nearest_index(values: &[f64], distance: impl Fn(f64) -> f64) -> usize {
    values
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| distance(**a).total_cmp(&distance(**b)))
        .map_or(0, |(i, _)| i)
}

fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n).map(|i| start + step * i as f64).collect()
        }
    }
}
