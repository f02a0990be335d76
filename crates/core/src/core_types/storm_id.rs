//! Storm identifiers.

use crate::core_types::basin::Basin;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier shared by every observation of one storm.
///
/// Ordering is lexicographic on the string, which is the order events are
/// stacked in the output collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StormId(String);

impl StormId {
    /// Wrap an identifier string
    pub fn new(id: impl Into<String>) -> Self {
        StormId(id.into())
    }

    /// Identifier for a STORM synthetic track: `{basin}_{sample}_{year}_{tc_number}`
    pub fn storm_synthetic(basin: &Basin, sample: u32, year: i32, tc_number: u32) -> Self {
        StormId(format!("{basin}_{sample}_{year}_{tc_number}"))
    }

    /// Borrow the identifier string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StormId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StormId {
    fn from(s: &str) -> Self {
        StormId(s.to_string())
    }
}

impl From<String> for StormId {
    fn from(s: String) -> Self {
        StormId(s)
    }
}
