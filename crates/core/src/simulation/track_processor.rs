//! Per-storm pipeline: resample the track, derive eye motion, evaluate the
//! wind model at every timestep, downscale to the surface and reduce to a
//! maximum wind speed grid.

use crate::core_types::{MetersPerSecond, StormId};
use crate::error::{Result, WindFieldError};
use crate::grid::{DownscalingFactors, EvaluationGrid};
use crate::physics::{EyeState, Hemisphere, WindModel};
use crate::simulation::wind_series::WindFieldSeries;
use crate::track::{successive_legs, Track};
use nalgebra::DMatrix;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Maximum surface wind speed over a storm's lifetime at each grid cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaxWindResult {
    /// Storm the field belongs to
    pub storm_id: StormId,
    /// Max wind speed (m/s), shape (Ny, Nx)
    pub max_wind: DMatrix<f64>,
    /// True if the field was zero-filled or partly zero-filled after an error
    pub degraded: bool,
}

impl MaxWindResult {
    /// A calm field for `storm_id`
    pub fn zeros(storm_id: StormId, shape: (usize, usize), degraded: bool) -> Self {
        Self {
            storm_id,
            max_wind: DMatrix::zeros(shape.0, shape.1),
            degraded,
        }
    }
}

/// What happened when one track was processed
#[derive(Debug, Clone, PartialEq)]
pub enum TrackOutcome {
    /// Wind was evaluated. Timesteps listed in `failed_timesteps` could not
    /// be evaluated and contributed a calm frame.
    Field {
        max_wind: DMatrix<f64>,
        failed_timesteps: Vec<usize>,
    },
    /// The track has a single observation, so there is no motion to resample
    NoMotion,
    /// The track could not be processed
    Failed(WindFieldError),
}

impl TrackOutcome {
    /// Apply the recovery policy: no motion gives a calm field, failures
    /// give a calm field flagged as degraded.
    pub fn resolve(self, storm_id: StormId, shape: (usize, usize)) -> MaxWindResult {
        match self {
            TrackOutcome::Field {
                max_wind,
                failed_timesteps,
            } => {
                let degraded = !failed_timesteps.is_empty();
                if degraded {
                    warn!(
                        "Storm {}: {} timestep(s) zero-filled after evaluation errors",
                        storm_id,
                        failed_timesteps.len()
                    );
                }
                MaxWindResult {
                    storm_id,
                    max_wind,
                    degraded,
                }
            }
            TrackOutcome::NoMotion => {
                debug!("Storm {}: no motion, writing calm field", storm_id);
                MaxWindResult::zeros(storm_id, shape, false)
            }
            TrackOutcome::Failed(err) => {
                warn!("Storm {}: {}; writing zero wind field", storm_id, err);
                MaxWindResult::zeros(storm_id, shape, true)
            }
        }
    }
}

/// Processes single tracks against a shared grid, surface factors and model.
///
/// Holds only shared references, so one processor can be used from many
/// worker threads at once.
#[derive(Debug, Clone, Copy)]
pub struct TrackProcessor<'a> {
    grid: &'a EvaluationGrid,
    factors: &'a DownscalingFactors,
    model: &'a WindModel,
    parallel_timesteps: bool,
}

impl<'a> TrackProcessor<'a> {
    /// Create a processor, checking the factors are co-registered with the grid
    pub fn new(
        grid: &'a EvaluationGrid,
        factors: &'a DownscalingFactors,
        model: &'a WindModel,
    ) -> Result<Self> {
        if factors.shape() != grid.shape() {
            return Err(WindFieldError::ShapeMismatch {
                expected: grid.shape(),
                found: factors.shape(),
            });
        }
        Ok(Self {
            grid,
            factors,
            model,
            parallel_timesteps: true,
        })
    }

    /// Evaluate timesteps on the current rayon pool (the default) or one
    /// after another on the calling thread
    pub fn with_parallel_timesteps(mut self, parallel: bool) -> Self {
        self.parallel_timesteps = parallel;
        self
    }

    /// Whether timesteps are evaluated in parallel
    pub fn parallel_timesteps(&self) -> bool {
        self.parallel_timesteps
    }

    /// Evaluation grid
    pub fn grid(&self) -> &'a EvaluationGrid {
        self.grid
    }

    /// Wind model
    pub fn model(&self) -> &'a WindModel {
        self.model
    }

    /// Resample `track` and attach heading, translation speed, environmental
    /// pressure and hemisphere to every timestep.
    ///
    /// The final timestep has no successor, so it takes the heading, distance
    /// and elapsed time of the step before it.
    pub fn eye_states(&self, track: &Track) -> Result<Vec<EyeState>> {
        let interpolated = track.interpolate(self.model.config().interpolation_step())?;
        let environmental_pressure = self.model.environmental_pressure(track.basin())?;

        let observations = interpolated.observations();
        let n = observations.len();
        if n < 2 {
            return Err(WindFieldError::Interpolation(format!(
                "{} resampled to {} point(s)",
                track.id(),
                n
            )));
        }
        let legs = successive_legs(&interpolated.positions())?;

        let eyes = observations
            .iter()
            .enumerate()
            .map(|(i, obs)| {
                let k = i.min(n - 2);
                let leg = legs[k];
                let elapsed = observations[k + 1].timestamp() - observations[k].timestamp();
                let seconds = elapsed.num_milliseconds() as f64 / 1000.0;

                EyeState {
                    position: obs.position(),
                    radius_to_max_winds: obs.radius_to_max_winds().to_meters(),
                    max_wind_speed: obs.max_wind_speed(),
                    central_pressure: obs.min_pressure().to_pascals(),
                    environmental_pressure,
                    azimuth: leg.azimuth,
                    eye_speed: MetersPerSecond::new(*leg.distance / seconds),
                    hemisphere: Hemisphere::from_latitude(obs.latitude()),
                }
            })
            .collect();
        Ok(eyes)
    }

    /// Evaluate the wind model at every timestep of `track`.
    ///
    /// Frames are kept in time order whether or not timesteps run in
    /// parallel. A timestep whose evaluation fails is replaced by a calm
    /// frame and its index is returned alongside the series.
    pub fn wind_series(&self, track: &Track) -> Result<(WindFieldSeries, Vec<usize>)> {
        let eyes = self.eye_states(track)?;

        let evaluate = |eye: &EyeState| self.model.estimate_wind_field(self.grid, eye);
        let frames: Vec<Result<_>> = if self.parallel_timesteps {
            eyes.par_iter().map(evaluate).collect()
        } else {
            eyes.iter().map(evaluate).collect()
        };

        let mut series = WindFieldSeries::new(self.grid.shape());
        let mut failed = Vec::new();
        for (timestep, frame) in frames.into_iter().enumerate() {
            match frame {
                Ok(frame) => series.push(frame)?,
                Err(err) => {
                    warn!(
                        "Storm {} timestep {}: {}; using calm frame",
                        track.id(),
                        timestep,
                        err
                    );
                    series.push_calm();
                    failed.push(timestep);
                }
            }
        }
        Ok((series, failed))
    }

    /// Run the full pipeline for one track
    pub fn process(&self, track: &Track) -> TrackOutcome {
        if track.len() == 1 {
            return TrackOutcome::NoMotion;
        }

        let (mut series, failed_timesteps) = match self.wind_series(track) {
            Ok(evaluated) => evaluated,
            Err(WindFieldError::NotInterpolatable { .. }) => return TrackOutcome::NoMotion,
            Err(err) => return TrackOutcome::Failed(err),
        };
        if let Err(err) = series.downscale(self.factors) {
            return TrackOutcome::Failed(err);
        }

        debug!(
            "Storm {}: {} timesteps evaluated",
            track.id(),
            series.len()
        );
        TrackOutcome::Field {
            max_wind: series.max_magnitude(),
            failed_timesteps,
        }
    }

    /// Process `track` and apply the recovery policy, always producing a field
    pub fn max_wind(&self, track: &Track) -> MaxWindResult {
        self.process(track)
            .resolve(track.id().clone(), self.grid.shape())
    }
}
