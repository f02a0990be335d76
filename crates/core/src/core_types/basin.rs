//! Ocean basins and the environmental pressure lookup keyed by them.

use crate::core_types::units::HectoPascals;
use crate::error::{Result, WindFieldError};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ocean basin a storm originated in
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Basin {
    /// Eastern Pacific
    EP,
    /// North Atlantic
    NA,
    /// North Indian
    NI,
    /// South Indian
    SI,
    /// South Pacific
    SP,
    /// Western Pacific
    WP,
    /// Any other basin label (other agencies' codes, synthetic test basins)
    Named(String),
}

impl Basin {
    /// Basins in the order the STORM dataset encodes them as integers
    pub const STORM_ORDER: [Basin; 6] = [
        Basin::EP,
        Basin::NA,
        Basin::NI,
        Basin::SI,
        Basin::SP,
        Basin::WP,
    ];

    /// Decode a STORM integer basin code (0 -> EP, 1 -> NA, ...)
    pub fn from_storm_code(code: u8) -> Option<Basin> {
        Self::STORM_ORDER.get(usize::from(code)).cloned()
    }

    /// Short label, e.g. "WP"
    pub fn code(&self) -> &str {
        match self {
            Basin::EP => "EP",
            Basin::NA => "NA",
            Basin::NI => "NI",
            Basin::SI => "SI",
            Basin::SP => "SP",
            Basin::WP => "WP",
            Basin::Named(name) => name,
        }
    }
}

impl fmt::Display for Basin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Basin {
    type Err = WindFieldError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(WindFieldError::InvalidTrack(
                "empty basin identifier".to_string(),
            ));
        }
        Ok(match trimmed.to_ascii_uppercase().as_str() {
            "EP" => Basin::EP,
            "NA" => Basin::NA,
            "NI" => Basin::NI,
            "SI" => Basin::SI,
            "SP" => Basin::SP,
            "WP" => Basin::WP,
            _ => Basin::Named(trimmed.to_string()),
        })
    }
}

/// Environmental (ambient) surface pressure per basin.
///
/// The vortex model needs the pressure far from the storm to compute the
/// pressure deficit driving the circulation. This table is passed explicitly
/// into the wind model so tests can register synthetic basins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentalPressure {
    pressures: FxHashMap<Basin, HectoPascals>,
}

impl EnvironmentalPressure {
    /// An empty table; every lookup fails until basins are added
    pub fn empty() -> Self {
        Self {
            pressures: FxHashMap::default(),
        }
    }

    /// Environmental pressures used when generating the STORM synthetic tracks
    pub fn storm_defaults() -> Self {
        Self::empty()
            .with_basin(Basin::EP, HectoPascals::new(1010.0))
            .with_basin(Basin::NA, HectoPascals::new(1010.0))
            .with_basin(Basin::NI, HectoPascals::new(1005.0))
            .with_basin(Basin::SI, HectoPascals::new(1005.0))
            .with_basin(Basin::SP, HectoPascals::new(1005.0))
            .with_basin(Basin::WP, HectoPascals::new(1005.0))
    }

    /// Builder: set (or replace) the pressure for a basin
    pub fn with_basin(mut self, basin: Basin, pressure: HectoPascals) -> Self {
        self.pressures.insert(basin, pressure);
        self
    }

    /// Look up a basin's environmental pressure
    pub fn get(&self, basin: &Basin) -> Result<HectoPascals> {
        self.pressures
            .get(basin)
            .copied()
            .ok_or_else(|| WindFieldError::UnknownBasin(basin.clone()))
    }

    /// Number of basins in the table
    pub fn len(&self) -> usize {
        self.pressures.len()
    }

    /// True if no basins are registered
    pub fn is_empty(&self) -> bool {
        self.pressures.is_empty()
    }
}

impl Default for EnvironmentalPressure {
    fn default() -> Self {
        Self::storm_defaults()
    }
}
