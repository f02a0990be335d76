//! Time series of wind frames for one storm, and its reduction to a
//! maximum wind speed grid.

use crate::error::{Result, WindFieldError};
use crate::grid::DownscalingFactors;
use crate::physics::WindFrame;
use nalgebra::{Complex, DMatrix};

/// Wind frames indexed (timestep, row, col), owned by one track's
/// processing and dropped once reduced.
#[derive(Debug, Clone, PartialEq)]
pub struct WindFieldSeries {
    shape: (usize, usize),
    frames: Vec<WindFrame>,
}

impl WindFieldSeries {
    /// An empty series for frames of `shape` (rows, cols)
    pub fn new(shape: (usize, usize)) -> Self {
        Self {
            shape,
            frames: Vec::new(),
        }
    }

    /// Append a frame
    pub fn push(&mut self, frame: WindFrame) -> Result<()> {
        if frame.shape() != self.shape {
            return Err(WindFieldError::ShapeMismatch {
                expected: self.shape,
                found: frame.shape(),
            });
        }
        self.frames.push(frame);
        Ok(())
    }

    /// Append an all-zero frame (used for timesteps that failed to evaluate)
    pub fn push_calm(&mut self) {
        let (ny, nx) = self.shape;
        self.frames
            .push(DMatrix::from_element(ny, nx, Complex::new(0.0, 0.0)));
    }

    /// Number of timesteps
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// True if no frames have been added
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Frames in timestep order
    pub fn frames(&self) -> &[WindFrame] {
        &self.frames
    }

    /// Multiply every frame cell-wise by the downscaling factors,
    /// broadcasting over the timestep axis
    pub fn downscale(&mut self, factors: &DownscalingFactors) -> Result<()> {
        if factors.shape() != self.shape {
            return Err(WindFieldError::ShapeMismatch {
                expected: self.shape,
                found: factors.shape(),
            });
        }
        let factors = factors.as_matrix();
        for frame in &mut self.frames {
            for (v, &f) in frame.iter_mut().zip(factors.iter()) {
                *v *= f;
            }
        }
        Ok(())
    }

    /// Maximum wind speed magnitude over time at each cell.
    ///
    /// NaN frames are skipped cell by cell: a cell is NaN only if it is NaN
    /// in every frame. An empty series gives all zeros.
    pub fn max_magnitude(&self) -> DMatrix<f64> {
        let (ny, nx) = self.shape;
        if self.frames.is_empty() {
            return DMatrix::zeros(ny, nx);
        }

        let mut max = DMatrix::from_element(ny, nx, f64::NAN);
        for frame in &self.frames {
            for (acc, v) in max.iter_mut().zip(frame.iter()) {
                // f64::max returns the non-NaN operand
                *acc = acc.max(v.norm());
            }
        }
        max
    }
}
