//! Geodesic kinematics between track points.
//!
//! All distances and bearings are solved on the WGS84 ellipsoid (Karney's
//! algorithm via `geo::Geodesic`), never with planar trigonometry: storm
//! tracks reach high latitudes and cross the anti-meridian.

use crate::core_types::{Degrees, Meters};
use crate::error::{Result, WindFieldError};
use geo::{Bearing, Distance, Geodesic, Point};

/// Bearing and length of the geodesic from one point to the next
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Leg {
    /// Forward azimuth at the origin, compass degrees in [0, 360)
    pub azimuth: Degrees,
    /// Geodesic distance
    pub distance: Meters,
}

/// Reject non-finite or out-of-range coordinates.
///
/// Longitudes are accepted in [-360, 360] to cover both the [-180, 180] and
/// [0, 360] conventions used by track datasets.
pub fn validate_point(point: Point<f64>) -> Result<()> {
    let (lon, lat) = (point.x(), point.y());
    if !lon.is_finite() || !lat.is_finite() {
        return Err(WindFieldError::InvalidGeometry(format!(
            "non-finite coordinate ({lon}, {lat})"
        )));
    }
    if !(-90.0..=90.0).contains(&lat) {
        return Err(WindFieldError::InvalidGeometry(format!(
            "latitude {lat} outside [-90, 90]"
        )));
    }
    if !(-360.0..=360.0).contains(&lon) {
        return Err(WindFieldError::InvalidGeometry(format!(
            "longitude {lon} outside [-360, 360]"
        )));
    }
    Ok(())
}

/// Forward azimuth and distance from `origin` to `destination`.
///
/// Inputs are assumed valid; coincident points give a zero-length leg.
#[inline]
pub fn geodesic_leg(origin: Point<f64>, destination: Point<f64>) -> Leg {
    let distance = Geodesic::distance(origin, destination);
    let azimuth = if distance > 0.0 {
        Degrees::new(Geodesic::bearing(origin, destination)).normalized()
    } else {
        Degrees::new(0.0)
    };
    Leg {
        azimuth,
        distance: Meters::new(distance),
    }
}

/// Forward azimuth and distance for each pair `(origins[i], destinations[i])`.
pub fn forward_azimuth_and_distance(
    origins: &[Point<f64>],
    destinations: &[Point<f64>],
) -> Result<Vec<Leg>> {
    if origins.len() != destinations.len() {
        return Err(WindFieldError::InvalidGeometry(format!(
            "{} origins but {} destinations",
            origins.len(),
            destinations.len()
        )));
    }

    origins
        .iter()
        .zip(destinations)
        .map(|(&origin, &destination)| {
            validate_point(origin)?;
            validate_point(destination)?;
            Ok(geodesic_leg(origin, destination))
        })
        .collect()
}

/// Legs between consecutive points: `points.len() - 1` entries
/// (empty for fewer than two points).
pub fn successive_legs(points: &[Point<f64>]) -> Result<Vec<Leg>> {
    if points.len() < 2 {
        return Ok(Vec::new());
    }
    forward_azimuth_and_distance(&points[..points.len() - 1], &points[1..])
}
