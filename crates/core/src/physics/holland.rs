//! Holland Parametric Vortex Profile (1980)
//!
//! Gradient-level tangential wind speed as a function of distance from the
//! storm eye, driven by the central pressure deficit.
//!
//! # References
//! - Holland, G.J. (1980). "An analytic model of the wind and pressure profiles in hurricanes."
//!   Monthly Weather Review, 108(8), 1212-1218.
//! - Lin, N. and Chavas, D. (2012). "On hurricane parametric wind and applications in storm surge
//!   modeling." Journal of Geophysical Research: Atmospheres, 117, D09120.
//!
//! # Formula
//! ```text
//! f    = 2 Ω sin|φ|
//! B    = ρ e (V_m² + V_m R_m f) / Δp          (clamped to [B_min, B_max])
//! V(r) = sqrt( (R_m/r)^B (V_m² + V_m R_m f) exp(1 - (R_m/r)^B) + (r f / 2)² ) - r f / 2
//! ```
//!
//! Where:
//! - **f** = Coriolis parameter (1/s) at eye latitude **φ**
//! - **B** = Holland shape parameter (dimensionless)
//! - **ρ** = air density (kg/m³)
//! - **V_m** = max tangential wind relative to the eye (m/s)
//! - **R_m** = radius to maximum winds (m)
//! - **Δp** = environmental minus central pressure (Pa)
//!
//! `V(R_m) = V_m` exactly; V rises from 0 at the eye to the peak at `R_m` and
//! decays outward.

use crate::core_types::{Meters, MetersPerSecond, Pascals};
use crate::error::{Result, WindFieldError};
use crate::physics::wind_model::WindModelConfig;

/// Physical constants for the vortex profile
pub mod constants {
    /// Earth's angular velocity (rad/s)
    pub const EARTH_ANGULAR_VELOCITY: f64 = 7.2921e-5;

    /// Air density in the boundary layer of a tropical cyclone (kg/m³)
    pub const AIR_DENSITY: f64 = 1.15;

    /// Lower bound of the Holland B parameter
    pub const B_MIN: f64 = 1.0;

    /// Upper bound of the Holland B parameter
    pub const B_MAX: f64 = 2.5;
}

/// Physical parameters of the vortex at one track timestep
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VortexParameters {
    /// Radius to maximum winds
    pub radius_to_max_winds: Meters,
    /// Max tangential wind speed in the eye's moving frame
    pub max_wind_speed: MetersPerSecond,
    /// Minimum central pressure
    pub central_pressure: Pascals,
    /// Environmental pressure far from the storm
    pub environmental_pressure: Pascals,
    /// Eye latitude (degrees), for the Coriolis parameter
    pub latitude: f64,
}

/// Coriolis parameter f = 2 Ω sin|φ| (1/s)
#[inline]
pub fn coriolis_parameter(latitude_deg: f64) -> f64 {
    2.0 * constants::EARTH_ANGULAR_VELOCITY * latitude_deg.abs().to_radians().sin()
}

/// A Holland profile with its shape parameter resolved, ready to evaluate
/// at any distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HollandProfile {
    rmw: f64,
    vmax: f64,
    b: f64,
    coriolis: f64,
    eye_floor: f64,
}

impl HollandProfile {
    /// Resolve the profile for one timestep.
    ///
    /// # Errors
    /// [`WindFieldError::WindFieldEvaluation`] when any parameter is
    /// non-finite, the radius to max winds is not positive, the max wind
    /// speed is negative, or the pressure deficit is not positive.
    pub fn new(params: &VortexParameters, config: &WindModelConfig) -> Result<Self> {
        let rmw = *params.radius_to_max_winds;
        let vmax = *params.max_wind_speed;
        let p_c = *params.central_pressure;
        let p_env = *params.environmental_pressure;

        if ![rmw, vmax, p_c, p_env, params.latitude]
            .iter()
            .all(|v| v.is_finite())
        {
            return Err(WindFieldError::WindFieldEvaluation(format!(
                "non-finite vortex parameters: rmw={rmw} vmax={vmax} p_c={p_c} p_env={p_env} lat={}",
                params.latitude
            )));
        }
        if rmw <= 0.0 {
            return Err(WindFieldError::WindFieldEvaluation(format!(
                "radius to max winds must be positive, got {rmw} m"
            )));
        }
        if vmax < 0.0 {
            return Err(WindFieldError::WindFieldEvaluation(format!(
                "max wind speed relative to eye is negative ({vmax:.2} m/s)"
            )));
        }
        let delta_p = p_env - p_c;
        if delta_p <= 0.0 {
            return Err(WindFieldError::WindFieldEvaluation(format!(
                "pressure deficit must be positive, central {p_c} Pa vs environment {p_env} Pa"
            )));
        }

        let coriolis = coriolis_parameter(params.latitude);
        let b = (config.air_density
            * std::f64::consts::E
            * (vmax * vmax + vmax * rmw * coriolis)
            / delta_p)
            .clamp(config.holland_b_min, config.holland_b_max);

        Ok(Self {
            rmw,
            vmax,
            b,
            coriolis,
            eye_floor: config.eye_distance_floor_m,
        })
    }

    /// Holland B shape parameter after clamping
    pub fn shape_parameter(&self) -> f64 {
        self.b
    }

    /// Gradient wind speed (m/s) at `distance_m` from the eye.
    ///
    /// Distances at or inside the eye floor return 0, which is the limit of
    /// the profile as r -> 0; evaluating the formula there would give
    /// `inf * 0`.
    #[inline]
    pub fn speed_at(&self, distance_m: f64) -> f64 {
        if distance_m.is_nan() || distance_m <= self.eye_floor {
            return 0.0;
        }

        let x = (self.rmw / distance_m).powf(self.b);
        let core = if x.is_finite() {
            x * (self.vmax * self.vmax + self.vmax * self.rmw * self.coriolis) * (1.0 - x).exp()
        } else {
            0.0
        };
        let half_fr = distance_m * self.coriolis / 2.0;

        ((core + half_fr * half_fr).sqrt() - half_fr).max(0.0)
    }
}
