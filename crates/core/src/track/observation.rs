//! Validated track observations and the STORM tabular row schema.

use crate::core_types::{Basin, HectoPascals, Kilometers, MetersPerSecond, StormId};
use crate::error::{Result, WindFieldError};
use crate::track::kinematics::validate_point;
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use geo::Point;
use serde::{Deserialize, Serialize};

/// Hours between consecutive STORM timesteps
pub const STORM_TIMESTEP_HOURS: i64 = 3;

/// One observation of a storm: where the eye was, how intense it was, and
/// whether it was over land.
///
/// Construct with [`TrackObservation::new`] and the `with_*` builders; the
/// constructor rejects invalid coordinates so downstream code can rely on
/// every position being a real WGS84 point.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackObservation {
    storm_id: StormId,
    basin: Basin,
    timestamp: NaiveDateTime,
    position: Point<f64>,
    min_pressure: HectoPascals,
    max_wind_speed: MetersPerSecond,
    radius_to_max_winds: Kilometers,
    landfall: bool,
}

impl TrackObservation {
    /// Create an observation at `position` (x = longitude, y = latitude).
    ///
    /// Intensity fields start as NaN and landfall as false; set them with
    /// [`with_intensity`](Self::with_intensity) and [`with_landfall`](Self::with_landfall).
    pub fn new(
        storm_id: StormId,
        basin: Basin,
        timestamp: NaiveDateTime,
        position: Point<f64>,
    ) -> Result<Self> {
        if storm_id.as_str().trim().is_empty() {
            return Err(WindFieldError::InvalidTrack(
                "observation has an empty storm id".to_string(),
            ));
        }
        validate_point(position)?;

        Ok(Self {
            storm_id,
            basin,
            timestamp,
            position,
            min_pressure: HectoPascals::new(f64::NAN),
            max_wind_speed: MetersPerSecond::new(f64::NAN),
            radius_to_max_winds: Kilometers::new(f64::NAN),
            landfall: false,
        })
    }

    /// Builder: set central pressure, max sustained wind and radius to max winds
    pub fn with_intensity(
        mut self,
        min_pressure: HectoPascals,
        max_wind_speed: MetersPerSecond,
        radius_to_max_winds: Kilometers,
    ) -> Self {
        self.min_pressure = min_pressure;
        self.max_wind_speed = max_wind_speed;
        self.radius_to_max_winds = radius_to_max_winds;
        self
    }

    /// Builder: set the landfall flag
    pub fn with_landfall(mut self, landfall: bool) -> Self {
        self.landfall = landfall;
        self
    }

    /// Convert a STORM row. `sample` is the index of the STORM output file
    /// the row came from; it disambiguates storms with the same year and number.
    pub fn from_storm_row(row: &StormRow, sample: u32) -> Result<Self> {
        let basin = Basin::from_storm_code(row.basin_id).ok_or_else(|| {
            WindFieldError::InvalidTrack(format!("unknown STORM basin code {}", row.basin_id))
        })?;

        let start_of_month = NaiveDate::from_ymd_opt(row.year, row.month, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .ok_or_else(|| {
                WindFieldError::InvalidTrack(format!(
                    "invalid STORM date year={} month={}",
                    row.year, row.month
                ))
            })?;
        let timestamp =
            start_of_month + TimeDelta::hours(STORM_TIMESTEP_HOURS * i64::from(row.timestep));

        let storm_id = StormId::storm_synthetic(&basin, sample, row.year, row.tc_number);

        Ok(Self::new(storm_id, basin, timestamp, Point::new(row.lon, row.lat))?
            .with_intensity(
                HectoPascals::new(row.min_pressure_hpa),
                MetersPerSecond::new(row.max_wind_speed_ms),
                Kilometers::new(row.radius_to_max_winds_km),
            )
            .with_landfall(row.landfall != 0))
    }

    /// Storm this observation belongs to
    pub fn storm_id(&self) -> &StormId {
        &self.storm_id
    }

    /// Basin the observation was recorded in
    pub fn basin(&self) -> &Basin {
        &self.basin
    }

    /// Observation time
    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    /// Eye position (x = longitude, y = latitude)
    pub fn position(&self) -> Point<f64> {
        self.position
    }

    /// Eye longitude in degrees
    pub fn longitude(&self) -> f64 {
        self.position.x()
    }

    /// Eye latitude in degrees
    pub fn latitude(&self) -> f64 {
        self.position.y()
    }

    /// Minimum central pressure
    pub fn min_pressure(&self) -> HectoPascals {
        self.min_pressure
    }

    /// Maximum sustained wind speed (ground relative)
    pub fn max_wind_speed(&self) -> MetersPerSecond {
        self.max_wind_speed
    }

    /// Radius to maximum winds
    pub fn radius_to_max_winds(&self) -> Kilometers {
        self.radius_to_max_winds
    }

    /// Whether the eye was over land
    pub fn landfall(&self) -> bool {
        self.landfall
    }
}

/// One row of a STORM synthetic tropical cyclone track file.
///
/// Field names follow the dataset's columns so collaborators can decode rows
/// straight into this type with any serde-compatible tabular reader.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StormRow {
    /// Synthetic year (not a calendar year)
    pub year: i32,
    /// Month of genesis
    pub month: u32,
    /// Storm number within the year
    pub tc_number: u32,
    /// 3-hourly timestep index since genesis
    pub timestep: u32,
    /// Basin code, see [`Basin::STORM_ORDER`]
    pub basin_id: u8,
    /// Eye latitude in degrees
    pub lat: f64,
    /// Eye longitude in degrees
    pub lon: f64,
    /// Minimum central pressure in hPa
    pub min_pressure_hpa: f64,
    /// Maximum sustained wind speed in m/s
    pub max_wind_speed_ms: f64,
    /// Radius to maximum winds in km
    pub radius_to_max_winds_km: f64,
    /// Saffir-Simpson category
    pub category: u8,
    /// 1 if the eye is over land, 0 otherwise
    pub landfall: u8,
    /// Distance from the eye to the nearest coastline in km
    pub distance_to_land_km: f64,
}
