//! Event-indexed collection of maximum wind speed grids: the output of a batch.

use crate::core_types::StormId;
use crate::error::{Result, WindFieldError};
use crate::grid::EvaluationGrid;
use crate::simulation::track_processor::MaxWindResult;
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

/// Metadata attached to every collection
pub mod metadata {
    /// Name of the data variable
    pub const VARIABLE: &str = "max_wind_speed";
    /// Human readable description of the data variable
    pub const DESCRIPTION: &str = "Maximum estimated wind speed during event";
    /// Units of the data variable
    pub const UNITS: &str = "m s-1";
    /// Coordinate reference system of the grid
    pub const CRS: &str = "EPSG:4326";
}

/// Max wind speed per (event, latitude, longitude).
///
/// Events are sorted by storm id. Values are stored event-major, then by
/// row (latitude), then by column (longitude).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventCollection {
    variable: String,
    description: String,
    units: String,
    crs: String,
    event_ids: Vec<StormId>,
    longitude: Vec<f64>,
    latitude: Vec<f64>,
    values: Vec<f64>,
}

impl EventCollection {
    fn with_coordinates(longitude: Vec<f64>, latitude: Vec<f64>) -> Self {
        Self {
            variable: metadata::VARIABLE.to_string(),
            description: metadata::DESCRIPTION.to_string(),
            units: metadata::UNITS.to_string(),
            crs: metadata::CRS.to_string(),
            event_ids: Vec::new(),
            longitude,
            latitude,
            values: Vec::new(),
        }
    }

    /// A collection with no events, carrying the grid's coordinates
    pub fn placeholder(grid: &EvaluationGrid) -> Self {
        Self::with_coordinates(grid.longitude().to_vec(), grid.latitude().to_vec())
    }

    /// A collection with no events and no coordinates, for when no grid exists
    pub fn empty() -> Self {
        Self::with_coordinates(Vec::new(), Vec::new())
    }

    /// Data variable name
    pub fn variable(&self) -> &str {
        &self.variable
    }

    /// Data variable description
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Data variable units
    pub fn units(&self) -> &str {
        &self.units
    }

    /// Coordinate reference system
    pub fn crs(&self) -> &str {
        &self.crs
    }

    /// Storm ids in ascending order
    pub fn event_ids(&self) -> &[StormId] {
        &self.event_ids
    }

    /// Longitude coordinate
    pub fn longitude(&self) -> &[f64] {
        &self.longitude
    }

    /// Latitude coordinate
    pub fn latitude(&self) -> &[f64] {
        &self.latitude
    }

    /// Flat values, event-major then row then column
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of events
    pub fn len(&self) -> usize {
        self.event_ids.len()
    }

    /// True if no events were recorded
    pub fn is_empty(&self) -> bool {
        self.event_ids.is_empty()
    }

    /// (events, rows, cols)
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.len(), self.latitude.len(), self.longitude.len())
    }

    fn cells(&self) -> usize {
        self.latitude.len() * self.longitude.len()
    }

    /// Value for event `event` at (row, col)
    pub fn value(&self, event: usize, row: usize, col: usize) -> Option<f64> {
        let (n, ny, nx) = self.shape();
        if event >= n || row >= ny || col >= nx {
            return None;
        }
        Some(self.values[event * self.cells() + row * nx + col])
    }

    /// Grid of the `event`-th event, shape (Ny, Nx)
    pub fn field(&self, event: usize) -> Option<DMatrix<f64>> {
        if event >= self.len() {
            return None;
        }
        let cells = self.cells();
        let slice = &self.values[event * cells..(event + 1) * cells];
        Some(DMatrix::from_row_slice(
            self.latitude.len(),
            self.longitude.len(),
            slice,
        ))
    }

    /// Grid of the event with `storm_id`
    pub fn field_for(&self, storm_id: &StormId) -> Option<DMatrix<f64>> {
        let event = self.event_ids.binary_search(storm_id).ok()?;
        self.field(event)
    }
}

/// Append-only builder for an [`EventCollection`]
#[derive(Debug, Clone)]
pub struct EventCollectionBuilder {
    shape: (usize, usize),
    collection: EventCollection,
    events: Vec<MaxWindResult>,
}

impl EventCollectionBuilder {
    /// Start a collection over `grid`
    pub fn new(grid: &EvaluationGrid) -> Self {
        Self {
            shape: grid.shape(),
            collection: EventCollection::placeholder(grid),
            events: Vec::new(),
        }
    }

    /// Add one storm's result
    pub fn push(&mut self, result: MaxWindResult) -> Result<()> {
        let found = result.max_wind.shape();
        if found != self.shape {
            return Err(WindFieldError::ShapeMismatch {
                expected: self.shape,
                found,
            });
        }
        if self.events.iter().any(|e| e.storm_id == result.storm_id) {
            return Err(WindFieldError::InvalidTrack(format!(
                "storm {} added to the collection twice",
                result.storm_id
            )));
        }
        self.events.push(result);
        Ok(())
    }

    /// Number of events added so far
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// True if nothing has been added
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Sort by storm id and flatten into the collection
    pub fn finish(mut self) -> EventCollection {
        self.events.sort_by(|a, b| a.storm_id.cmp(&b.storm_id));

        let (ny, nx) = self.shape;
        let mut collection = self.collection;
        collection.event_ids.reserve(self.events.len());
        collection.values.reserve(self.events.len() * ny * nx);

        for event in self.events {
            for row in 0..ny {
                for col in 0..nx {
                    collection.values.push(event.max_wind[(row, col)]);
                }
            }
            collection.event_ids.push(event.storm_id);
        }
        collection
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> EvaluationGrid {
        EvaluationGrid::regular((100.0, 102.0, 3), (10.0, 11.0, 2)).unwrap()
    }

    fn result(id: &str, base: f64) -> MaxWindResult {
        MaxWindResult {
            storm_id: StormId::from(id),
            max_wind: DMatrix::from_fn(2, 3, |r, c| base + (r * 3 + c) as f64),
            degraded: false,
        }
    }

    #[test]
    fn test_placeholder_has_metadata_and_coords() {
        let c = EventCollection::placeholder(&grid());
        assert!(c.is_empty());
        assert_eq!(c.shape(), (0, 2, 3));
        assert_eq!(c.variable(), "max_wind_speed");
        assert_eq!(c.units(), "m s-1");
        assert_eq!(c.crs(), "EPSG:4326");
        assert_eq!(c.description(), "Maximum estimated wind speed during event");
        assert_eq!(c.longitude(), &[100.0, 101.0, 102.0]);

        assert_eq!(EventCollection::empty().shape(), (0, 0, 0));
    }

    #[test]
    fn test_finish_sorts_and_flattens_row_major() {
        let mut builder = EventCollectionBuilder::new(&grid());
        builder.push(result("b", 100.0)).unwrap();
        builder.push(result("a", 0.0)).unwrap();
        let c = builder.finish();

        assert_eq!(c.event_ids(), &[StormId::from("a"), StormId::from("b")]);
        assert_eq!(c.values()[..6], [0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(c.value(1, 1, 0), Some(103.0));
        assert_eq!(c.value(2, 0, 0), None);
        assert_eq!(c.field_for(&StormId::from("b")), Some(result("b", 100.0).max_wind));
        assert_eq!(c.field_for(&StormId::from("z")), None);
    }

    #[test]
    fn test_push_rejects_bad_shape_and_duplicates() {
        let mut builder = EventCollectionBuilder::new(&grid());
        let bad = MaxWindResult::zeros(StormId::from("x"), (3, 2), false);
        assert!(matches!(
            builder.push(bad),
            Err(WindFieldError::ShapeMismatch { .. })
        ));
        builder.push(result("a", 0.0)).unwrap();
        assert!(builder.push(result("a", 1.0)).is_err());
        assert_eq!(builder.len(), 1);
    }
}
