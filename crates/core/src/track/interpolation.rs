//! Temporal resampling of storm tracks.
//!
//! Observations are typically 3 or 6 hours apart, during which a storm can
//! move 100+ km. Evaluating the vortex only at those points leaves gaps
//! between successive wind rings ("doughnuts") wherever the grid is finer
//! than the track, so tracks are densified before any wind is computed.
//!
//! Positions move along the geodesic between bracketing observations;
//! pressure, wind speed and radius to max winds are linear in time.

use crate::core_types::{HectoPascals, Kilometers, MetersPerSecond};
use crate::error::{Result, WindFieldError};
use crate::track::{Track, TrackObservation};
use chrono::{NaiveDateTime, TimeDelta};
use geo::{Geodesic, InterpolatePoint, Point};

#[inline]
fn lerp(a: f64, b: f64, fraction: f64) -> f64 {
    a + (b - a) * fraction
}

/// Fraction of the way from `t0` to `t1` that `t` lies
#[inline]
fn time_fraction(t0: NaiveDateTime, t1: NaiveDateTime, t: NaiveDateTime) -> f64 {
    let span = (t1 - t0).num_milliseconds() as f64;
    let elapsed = (t - t0).num_milliseconds() as f64;
    elapsed / span
}

/// Observation at `fraction` of the way from `a` to `b`
fn interpolate_between(
    a: &TrackObservation,
    b: &TrackObservation,
    timestamp: NaiveDateTime,
    fraction: f64,
) -> Result<TrackObservation> {
    if fraction <= 0.0 {
        return Ok(a.clone());
    }
    if fraction >= 1.0 {
        return Ok(b.clone());
    }

    let position: Point<f64> =
        Geodesic::point_at_ratio_between(a.position(), b.position(), fraction);

    let observation =
        TrackObservation::new(a.storm_id().clone(), a.basin().clone(), timestamp, position)
            .map_err(|e| {
                WindFieldError::Interpolation(format!("interpolated position invalid: {e}"))
            })?
            .with_intensity(
                HectoPascals::new(lerp(*a.min_pressure(), *b.min_pressure(), fraction)),
                MetersPerSecond::new(lerp(*a.max_wind_speed(), *b.max_wind_speed(), fraction)),
                Kilometers::new(lerp(
                    *a.radius_to_max_winds(),
                    *b.radius_to_max_winds(),
                    fraction,
                )),
            )
            // A point between two observations is over land if either end is
            .with_landfall(a.landfall() || b.landfall());

    Ok(observation)
}

/// Resample `track` to a fixed time `step`.
///
/// The output starts at the first observation and advances by `step`. The
/// last observation always closes the output, so a span that is not a whole
/// number of steps ends with a shorter final interval.
///
/// # Errors
/// - [`WindFieldError::NotInterpolatable`] for a track with fewer than 2 observations
/// - [`WindFieldError::InvalidConfig`] for a non-positive step
/// - [`WindFieldError::Interpolation`] for duplicate timestamps or a
///   stationary track
pub fn interpolate_track(track: &Track, step: TimeDelta) -> Result<Track> {
    let observations = track.observations();
    if observations.len() < 2 {
        return Err(WindFieldError::NotInterpolatable {
            points: observations.len(),
        });
    }
    if step <= TimeDelta::zero() {
        return Err(WindFieldError::InvalidConfig(format!(
            "interpolation step must be positive, got {step}"
        )));
    }

    if let Some(pair) = observations
        .windows(2)
        .find(|w| w[0].timestamp() >= w[1].timestamp())
    {
        return Err(WindFieldError::Interpolation(format!(
            "duplicate timestamp {} in track {}",
            pair[1].timestamp(),
            track.id()
        )));
    }

    let first = observations[0].position();
    if observations.iter().all(|o| o.position() == first) {
        return Err(WindFieldError::Interpolation(format!(
            "track {} is stationary",
            track.id()
        )));
    }

    let start = observations[0].timestamp();
    let last = &observations[observations.len() - 1];
    let end = last.timestamp();

    let mut resampled = Vec::new();
    let mut segment = 0;
    let mut t = start;
    while t <= end {
        // Advance to the segment bracketing t
        while observations[segment + 1].timestamp() < t {
            segment += 1;
        }
        let a = &observations[segment];
        let b = &observations[segment + 1];
        let fraction = time_fraction(a.timestamp(), b.timestamp(), t);
        resampled.push(interpolate_between(a, b, t, fraction)?);

        t += step;
    }
    if resampled.last().is_some_and(|o| o.timestamp() < end) {
        resampled.push(last.clone());
    }

    Ok(Track::from_sorted(
        track.id().clone(),
        track.basin().clone(),
        resampled,
    ))
}
