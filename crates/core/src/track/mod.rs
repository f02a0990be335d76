//! Storm tracks: validated observations, the per-storm aggregate,
//! geodesic kinematics and temporal resampling.

pub mod interpolation;
pub mod kinematics;
pub mod observation;

pub use interpolation::interpolate_track;
pub use kinematics::{forward_azimuth_and_distance, successive_legs, Leg};
pub use observation::{StormRow, TrackObservation};

use crate::core_types::{Basin, StormId};
use crate::error::{Result, WindFieldError};
use chrono::TimeDelta;
use geo::Point;

/// Time-ordered observations of a single storm.
///
/// Invariants: at least one observation, every observation carries the same
/// storm id, observations are sorted by timestamp. The basin of origin is
/// taken from the earliest observation.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    id: StormId,
    basin: Basin,
    observations: Vec<TrackObservation>,
}

impl Track {
    /// Build a track from one storm's observations, sorting them by time.
    ///
    /// Duplicate timestamps are kept; they are rejected later by
    /// interpolation, which is the step that needs a strictly increasing index.
    pub fn new(mut observations: Vec<TrackObservation>) -> Result<Self> {
        let Some(first) = observations.first() else {
            return Err(WindFieldError::InvalidTrack(
                "track has no observations".to_string(),
            ));
        };
        let id = first.storm_id().clone();

        if let Some(other) = observations.iter().find(|o| o.storm_id() != &id) {
            return Err(WindFieldError::InvalidTrack(format!(
                "observations of {} and {} mixed in one track",
                id,
                other.storm_id()
            )));
        }

        observations.sort_by_key(TrackObservation::timestamp);
        let basin = observations[0].basin().clone();

        Ok(Self {
            id,
            basin,
            observations,
        })
    }

    /// Assemble from parts already known to satisfy the invariants
    pub(crate) fn from_sorted(
        id: StormId,
        basin: Basin,
        observations: Vec<TrackObservation>,
    ) -> Self {
        debug_assert!(!observations.is_empty());
        debug_assert!(observations
            .windows(2)
            .all(|w| w[0].timestamp() <= w[1].timestamp()));
        Self {
            id,
            basin,
            observations,
        }
    }

    /// Storm identifier
    pub fn id(&self) -> &StormId {
        &self.id
    }

    /// Basin of origin
    pub fn basin(&self) -> &Basin {
        &self.basin
    }

    /// Observations in time order
    pub fn observations(&self) -> &[TrackObservation] {
        &self.observations
    }

    /// Number of observations
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Always false; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Eye positions in time order
    pub fn positions(&self) -> Vec<Point<f64>> {
        self.observations.iter().map(TrackObservation::position).collect()
    }

    /// True if any observation is flagged as landfall
    pub fn made_landfall(&self) -> bool {
        self.observations.iter().any(TrackObservation::landfall)
    }

    /// Resample to a fixed time step, see [`interpolate_track`]
    pub fn interpolate(&self, step: TimeDelta) -> Result<Track> {
        interpolate_track(self, step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn obs(id: &str, hour: u32, lon: f64) -> TrackObservation {
        let t = NaiveDate::from_ymd_opt(2020, 8, 1)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap();
        TrackObservation::new(StormId::from(id), Basin::NA, t, Point::new(lon, 20.0)).unwrap()
    }

    #[test]
    fn test_new_sorts_by_time() {
        let track = Track::new(vec![obs("a", 6, 2.0), obs("a", 0, 0.0), obs("a", 3, 1.0)]).unwrap();
        let lons: Vec<f64> = track.observations().iter().map(TrackObservation::longitude).collect();
        assert_eq!(lons, vec![0.0, 1.0, 2.0]);
        assert_eq!(track.id().as_str(), "a");
        assert_eq!(track.len(), 3);
    }

    #[test]
    fn test_new_rejects_empty_and_mixed() {
        assert!(matches!(Track::new(vec![]), Err(WindFieldError::InvalidTrack(_))));
        assert!(matches!(
            Track::new(vec![obs("a", 0, 0.0), obs("b", 3, 1.0)]),
            Err(WindFieldError::InvalidTrack(_))
        ));
    }

    #[test]
    fn test_made_landfall() {
        let track = Track::new(vec![obs("a", 0, 0.0), obs("a", 3, 1.0)]).unwrap();
        assert!(!track.made_landfall());

        let track =
            Track::new(vec![obs("a", 0, 0.0), obs("a", 3, 1.0).with_landfall(true)]).unwrap();
        assert!(track.made_landfall());
    }
}
