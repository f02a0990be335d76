//! Parametric Cyclone Wind Field
//!
//! Surface-relative gradient wind at one track timestep is the sum of two
//! parts, each a complex number per grid cell (real = eastward,
//! imaginary = northward, m/s):
//!
//! - **Advective**: a uniform background flow from the storm's translation.
//!   Following Lin & Chavas (2012) it is a fraction `α` of the eye velocity,
//!   rotated by `β` towards the cyclonic side (anticlockwise in the northern
//!   hemisphere, clockwise in the southern).
//! - **Rotational**: the Holland vortex, tangential to circles around the eye,
//!   anticlockwise in the northern hemisphere and clockwise in the southern.
//!
//! Observed max wind speed is ground relative, while the vortex describes
//! the eye's moving frame, so the advective magnitude is removed from the
//! observed max wind before the vortex is built.
//!
//! # References
//! - Lin, N. and Chavas, D. (2012). "On hurricane parametric wind and applications in storm surge
//!   modeling." Journal of Geophysical Research: Atmospheres, 117, D09120.

use crate::core_types::{
    Basin, Degrees, EnvironmentalPressure, Meters, MetersPerSecond, Pascals,
};
use crate::error::{Result, WindFieldError};
use crate::grid::EvaluationGrid;
use crate::physics::holland::{constants, HollandProfile, VortexParameters};
use crate::track::kinematics::geodesic_leg;
use chrono::TimeDelta;
use geo::Point;
use nalgebra::{Complex, DMatrix};
use serde::{Deserialize, Serialize};

/// One complex wind vector per grid cell, shape (Ny, Nx)
pub type WindFrame = DMatrix<Complex<f64>>;

/// Configuration for the parametric wind model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindModelConfig {
    /// Time step tracks are resampled to before evaluation (minutes).
    /// Must be fine enough that successive vortex rings overlap on the grid.
    pub interpolation_step_minutes: u32,

    /// Boundary layer air density (kg/m³)
    pub air_density: f64,

    /// Lower clamp of the Holland B parameter
    pub holland_b_min: f64,

    /// Upper clamp of the Holland B parameter
    pub holland_b_max: f64,

    /// Fraction of eye translation carried by the background flow (α)
    pub advection_fraction: f64,

    /// Cyclonic rotation of background flow from the eye heading, degrees (β)
    pub advection_rotation_deg: f64,

    /// Distances from the eye at or below this (m) are treated as calm
    pub eye_distance_floor_m: f64,
}

impl Default for WindModelConfig {
    fn default() -> Self {
        Self {
            interpolation_step_minutes: 60,
            air_density: constants::AIR_DENSITY,
            holland_b_min: constants::B_MIN,
            holland_b_max: constants::B_MAX,
            advection_fraction: 0.56,     // Lin & Chavas (2012)
            advection_rotation_deg: 19.2, // Lin & Chavas (2012)
            eye_distance_floor_m: 1.0,
        }
    }
}

impl WindModelConfig {
    /// Check every parameter is in range
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(WindFieldError::InvalidConfig(msg));

        if self.interpolation_step_minutes == 0 {
            return invalid("interpolation step must be at least one minute".to_string());
        }
        if !(self.air_density.is_finite() && self.air_density > 0.0) {
            return invalid(format!("air density must be positive, got {}", self.air_density));
        }
        let b_range_ok = self.holland_b_min.is_finite()
            && self.holland_b_max.is_finite()
            && self.holland_b_min > 0.0
            && self.holland_b_min <= self.holland_b_max;
        if !b_range_ok {
            return invalid(format!(
                "Holland B clamp [{}, {}] is not a positive range",
                self.holland_b_min, self.holland_b_max
            ));
        }
        if !(self.advection_fraction.is_finite() && self.advection_fraction >= 0.0) {
            return invalid(format!(
                "advection fraction must be non-negative, got {}",
                self.advection_fraction
            ));
        }
        if !self.advection_rotation_deg.is_finite() {
            return invalid("advection rotation must be finite".to_string());
        }
        if !(self.eye_distance_floor_m.is_finite() && self.eye_distance_floor_m >= 0.0) {
            return invalid(format!(
                "eye distance floor must be non-negative, got {}",
                self.eye_distance_floor_m
            ));
        }
        Ok(())
    }

    /// Interpolation step as a duration
    pub fn interpolation_step(&self) -> TimeDelta {
        TimeDelta::minutes(i64::from(self.interpolation_step_minutes))
    }
}

/// Which way the vortex turns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hemisphere {
    /// Anticlockwise rotation
    North,
    /// Clockwise rotation
    South,
}

impl Hemisphere {
    /// Hemisphere of a latitude; the equator counts as north
    pub fn from_latitude(latitude: f64) -> Self {
        if latitude >= 0.0 {
            Hemisphere::North
        } else {
            Hemisphere::South
        }
    }

    /// +1 for north, -1 for south
    pub fn sign(self) -> f64 {
        match self {
            Hemisphere::North => 1.0,
            Hemisphere::South => -1.0,
        }
    }
}

/// Everything the model needs about the eye at one timestep
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EyeState {
    /// Eye position (x = longitude, y = latitude)
    pub position: Point<f64>,
    /// Radius to maximum winds
    pub radius_to_max_winds: Meters,
    /// Observed (ground relative) max sustained wind speed
    pub max_wind_speed: MetersPerSecond,
    /// Minimum central pressure
    pub central_pressure: Pascals,
    /// Environmental pressure
    pub environmental_pressure: Pascals,
    /// Heading of the eye, compass degrees
    pub azimuth: Degrees,
    /// Translation speed of the eye
    pub eye_speed: MetersPerSecond,
    /// Hemisphere of the eye
    pub hemisphere: Hemisphere,
}

/// Parametric wind model with its configuration and basin pressure table
#[derive(Debug, Clone)]
pub struct WindModel {
    config: WindModelConfig,
    pressures: EnvironmentalPressure,
}

impl WindModel {
    /// Create a model, validating the configuration
    pub fn new(config: WindModelConfig, pressures: EnvironmentalPressure) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, pressures })
    }

    /// Model configuration
    pub fn config(&self) -> &WindModelConfig {
        &self.config
    }

    /// Environmental pressure for a basin
    pub fn environmental_pressure(&self, basin: &Basin) -> Result<Pascals> {
        Ok(self.pressures.get(basin)?.to_pascals())
    }

    /// Uniform background flow from the eye's translation
    pub fn advective_vector(
        &self,
        azimuth: Degrees,
        eye_speed: MetersPerSecond,
        hemisphere: Hemisphere,
    ) -> Complex<f64> {
        let heading = azimuth.to_radians();
        // Compass bearing -> (east, north)
        let eye_velocity = Complex::new(*eye_speed * heading.sin(), *eye_speed * heading.cos());
        let rotation = Complex::from_polar(
            1.0,
            hemisphere.sign() * self.config.advection_rotation_deg.to_radians(),
        );
        eye_velocity * rotation * self.config.advection_fraction
    }

    /// Vortex winds around `eye` on every cell of `grid`
    pub fn rotational_field(
        &self,
        grid: &EvaluationGrid,
        eye: Point<f64>,
        profile: &HollandProfile,
        hemisphere: Hemisphere,
    ) -> WindFrame {
        // Rotating the outward radial by +90° gives anticlockwise flow
        let turn = Complex::new(0.0, hemisphere.sign());
        let (ny, nx) = grid.shape();

        DMatrix::from_fn(ny, nx, |row, col| {
            let leg = geodesic_leg(eye, grid.cell_center(row, col));
            let speed = profile.speed_at(*leg.distance);
            if speed == 0.0 {
                return Complex::new(0.0, 0.0);
            }
            let bearing = leg.azimuth.to_radians();
            let radial = Complex::new(bearing.sin(), bearing.cos());
            radial * turn * speed
        })
    }

    /// Combined advective + rotational wind on `grid` for one eye state.
    ///
    /// # Errors
    /// [`WindFieldError::WindFieldEvaluation`] when the vortex parameters are
    /// non-physical, including an eye moving fast enough that its advective
    /// wind exceeds the observed max wind.
    pub fn estimate_wind_field(&self, grid: &EvaluationGrid, eye: &EyeState) -> Result<WindFrame> {
        let advective = self.advective_vector(eye.azimuth, eye.eye_speed, eye.hemisphere);
        let relative_max_wind = MetersPerSecond::new(*eye.max_wind_speed - advective.norm());

        let profile = HollandProfile::new(
            &VortexParameters {
                radius_to_max_winds: eye.radius_to_max_winds,
                max_wind_speed: relative_max_wind,
                central_pressure: eye.central_pressure,
                environmental_pressure: eye.environmental_pressure,
                latitude: eye.position.y(),
            },
            &self.config,
        )?;

        let mut field = self.rotational_field(grid, eye.position, &profile, eye.hemisphere);
        field.apply(|v| *v += advective);
        Ok(field)
    }
}
