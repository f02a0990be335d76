//! Batch driver: filter storms by landfall, group observations into tracks,
//! fan the tracks out to a worker pool and collect the results in storm id
//! order.

use crate::core_types::StormId;
use crate::error::Result;
use crate::grid::{DownscalingFactors, EvaluationGrid};
use crate::physics::WindModel;
use crate::simulation::config::{BatchConfig, ExecutionMode};
use crate::simulation::event_collection::{EventCollection, EventCollectionBuilder};
use crate::simulation::track_processor::{MaxWindResult, TrackProcessor};
use crate::track::{Track, TrackObservation};
use rayon::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, info, warn};

/// Result of a batch run
#[derive(Debug, Clone, PartialEq)]
pub struct BatchReport {
    /// One max wind grid per storm that made landfall
    pub collection: EventCollection,
    /// Storms whose grid was zero-filled in whole or part after an error
    pub degraded: Vec<StormId>,
}

impl BatchReport {
    fn placeholder(grid: &EvaluationGrid) -> Self {
        Self {
            collection: EventCollection::placeholder(grid),
            degraded: Vec::new(),
        }
    }
}

/// A unit of work: one storm's id and its track, or why it has none
type Task = (StormId, Result<Track>);

/// Runs many storms against one grid, factor set and wind model
#[derive(Debug, Clone)]
pub struct BatchDriver<'a> {
    processor: TrackProcessor<'a>,
    config: BatchConfig,
}

impl<'a> BatchDriver<'a> {
    /// Create a driver, validating the configuration and the factor shape
    pub fn new(
        grid: &'a EvaluationGrid,
        factors: &'a DownscalingFactors,
        model: &'a WindModel,
        config: BatchConfig,
    ) -> Result<Self> {
        config.validate()?;
        let parallel = !matches!(config.execution, ExecutionMode::Sequential);
        let processor =
            TrackProcessor::new(grid, factors, model)?.with_parallel_timesteps(parallel);
        Ok(Self { processor, config })
    }

    /// Batch configuration
    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Compute the max wind grid of every storm for which `is_landfall`
    /// holds on at least one observation.
    ///
    /// Never fails: a storm that cannot be processed gets a calm grid and is
    /// listed in [`BatchReport::degraded`]. With no observations, or no
    /// landfalling storm, the collection is an empty placeholder.
    pub fn run<F>(&self, observations: &[TrackObservation], is_landfall: F) -> BatchReport
    where
        F: Fn(&TrackObservation) -> bool,
    {
        let grid = self.processor.grid();
        if observations.is_empty() {
            debug!("No track observations, returning placeholder collection");
            return BatchReport::placeholder(grid);
        }

        let landfalling: FxHashSet<&StormId> = observations
            .iter()
            .filter(|o| is_landfall(o))
            .map(TrackObservation::storm_id)
            .collect();
        if landfalling.is_empty() {
            info!(
                "None of {} observations make landfall, returning placeholder collection",
                observations.len()
            );
            return BatchReport::placeholder(grid);
        }

        let tasks = group_tracks(observations, &landfalling);
        info!(
            "Processing {} landfalling storms from {} observations on a {}x{} grid ({:?})",
            tasks.len(),
            observations.len(),
            grid.ny(),
            grid.nx(),
            self.config.execution
        );

        let mut results = self.dispatch(&tasks);
        // Worker completion order is arbitrary
        results.sort_by(|a, b| a.storm_id.cmp(&b.storm_id));

        let degraded: Vec<StormId> = results
            .iter()
            .filter(|r| r.degraded)
            .map(|r| r.storm_id.clone())
            .collect();

        let mut builder = EventCollectionBuilder::new(grid);
        for result in results {
            let storm_id = result.storm_id.clone();
            if let Err(err) = builder.push(result) {
                warn!("Storm {}: {}; dropped from collection", storm_id, err);
            }
        }
        let collection = builder.finish();

        info!(
            "Batch complete: {} storms, {} degraded",
            collection.len(),
            degraded.len()
        );
        BatchReport {
            collection,
            degraded,
        }
    }

    fn dispatch(&self, tasks: &[Task]) -> Vec<MaxWindResult> {
        match self.config.execution {
            ExecutionMode::Sequential => self.run_sequential(tasks),
            ExecutionMode::Parallel { workers } => {
                match rayon::ThreadPoolBuilder::new()
                    .num_threads(workers)
                    .thread_name(|i| format!("wind-worker-{i}"))
                    .build()
                {
                    Ok(pool) => {
                        debug!("Running batch on {} workers", pool.current_num_threads());
                        pool.install(|| tasks.par_iter().map(|t| self.run_task(t)).collect())
                    }
                    Err(err) => {
                        warn!("Failed to build worker pool ({}), running sequentially", err);
                        self.run_sequential(tasks)
                    }
                }
            }
        }
    }

    fn run_sequential(&self, tasks: &[Task]) -> Vec<MaxWindResult> {
        tasks.iter().map(|t| self.run_task(t)).collect()
    }

    fn run_task(&self, (storm_id, track): &Task) -> MaxWindResult {
        let shape = self.processor.grid().shape();
        match track {
            Ok(track) => isolate(storm_id, shape, || self.processor.max_wind(track)),
            Err(err) => {
                warn!("Storm {}: {}; writing zero wind field", storm_id, err);
                MaxWindResult::zeros(storm_id.clone(), shape, true)
            }
        }
    }
}

/// Run one storm's work, turning a panic into a degraded calm field so the
/// rest of the batch carries on
fn isolate<F>(storm_id: &StormId, shape: (usize, usize), work: F) -> MaxWindResult
where
    F: FnOnce() -> MaxWindResult,
{
    match panic::catch_unwind(AssertUnwindSafe(work)) {
        Ok(result) => result,
        Err(_) => {
            warn!("Storm {}: worker panicked; writing zero wind field", storm_id);
            MaxWindResult::zeros(storm_id.clone(), shape, true)
        }
    }
}

/// Build a [`BatchDriver`] and run it once over `observations`
pub fn run_batch<F>(
    observations: &[TrackObservation],
    is_landfall: F,
    grid: &EvaluationGrid,
    factors: &DownscalingFactors,
    model: &WindModel,
    config: BatchConfig,
) -> Result<BatchReport>
where
    F: Fn(&TrackObservation) -> bool,
{
    let driver = BatchDriver::new(grid, factors, model, config)?;
    Ok(driver.run(observations, is_landfall))
}

/// Group the observations of landfalling storms into tracks, ordered by id
fn group_tracks(
    observations: &[TrackObservation],
    landfalling: &FxHashSet<&StormId>,
) -> Vec<Task> {
    let mut grouped: FxHashMap<StormId, Vec<TrackObservation>> = FxHashMap::default();
    for obs in observations {
        if landfalling.contains(obs.storm_id()) {
            grouped
                .entry(obs.storm_id().clone())
                .or_default()
                .push(obs.clone());
        }
    }

    let mut tasks: Vec<Task> = grouped
        .into_iter()
        .map(|(id, obs)| (id, Track::new(obs)))
        .collect();
    tasks.sort_by(|a, b| a.0.cmp(&b.0));
    tasks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::{
        Basin, EnvironmentalPressure, HectoPascals, Kilometers, MetersPerSecond,
    };
    use crate::physics::WindModelConfig;
    use chrono::NaiveDate;
    use geo::Point;

    fn obs(id: &str, hour: u32, lon: f64, landfall: bool) -> TrackObservation {
        let t = NaiveDate::from_ymd_opt(2019, 2, 10)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap();
        TrackObservation::new(StormId::from(id), Basin::SP, t, Point::new(lon, -18.0))
            .unwrap()
            .with_intensity(
                HectoPascals::new(950.0),
                MetersPerSecond::new(40.0),
                Kilometers::new(30.0),
            )
            .with_landfall(landfall)
    }

    fn grid() -> EvaluationGrid {
        EvaluationGrid::regular((177.0, 181.0, 5), (-20.0, -16.0, 5)).unwrap()
    }

    fn model() -> WindModel {
        WindModel::new(
            WindModelConfig::default(),
            EnvironmentalPressure::storm_defaults(),
        )
        .unwrap()
    }

    fn run(observations: &[TrackObservation], config: BatchConfig) -> BatchReport {
        let grid = grid();
        let factors = DownscalingFactors::uniform(&grid, 0.8);
        let model = model();
        let driver = BatchDriver::new(&grid, &factors, &model, config).unwrap();
        driver.run(observations, TrackObservation::landfall)
    }

    fn gusty(storm_id: &str) -> MaxWindResult {
        let mut result = MaxWindResult::zeros(StormId::from(storm_id), (2, 3), false);
        result.max_wind.fill(12.5);
        result
    }

    #[test]
    fn test_group_tracks_sorted_and_filtered() {
        let observations = vec![
            obs("b", 0, 178.0, true),
            obs("c", 0, 178.0, false),
            obs("a", 0, 178.0, true),
        ];
        let landfalling: FxHashSet<&StormId> = observations
            .iter()
            .filter(|o| o.landfall())
            .map(TrackObservation::storm_id)
            .collect();
        let tasks = group_tracks(&observations, &landfalling);
        let ids: Vec<&str> = tasks.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_no_landfall_gives_placeholder() {
        let report = run(
            &[obs("a", 0, 178.0, false), obs("a", 3, 179.0, false)],
            BatchConfig::sequential(),
        );
        assert!(report.collection.is_empty());
        assert_eq!(report.collection.shape(), (0, 5, 5));
        assert!(report.degraded.is_empty());
    }

    #[test]
    fn test_crosses_antimeridian() {
        let report = run(
            &[
                obs("a", 0, 178.5, false),
                obs("a", 3, 179.5, true),
                obs("a", 6, -179.5, false),
            ],
            BatchConfig::sequential(),
        );
        assert_eq!(report.collection.len(), 1);
        assert!(report.degraded.is_empty());
        let field = report.collection.field(0).unwrap();
        assert!(field.iter().all(|v| v.is_finite() && *v >= 0.0));
        assert!(field.iter().any(|&v| v > 10.0));
    }

    #[test]
    fn test_run_batch_rejects_bad_config() {
        let grid = grid();
        let factors = DownscalingFactors::uniform(&grid, 1.0);
        let model = model();
        let config = BatchConfig {
            max_workers: 0,
            ..BatchConfig::default()
        };
        let landfall = TrackObservation::landfall;
        assert!(run_batch(&[], landfall, &grid, &factors, &model, config).is_err());

        let report =
            run_batch(&[], landfall, &grid, &factors, &model, BatchConfig::default()).unwrap();
        assert!(report.collection.is_empty());
    }

    #[test]
    fn test_sequential_and_parallel_agree() {
        let observations = vec![
            obs("b", 0, 178.0, true),
            obs("b", 3, 179.0, false),
            obs("a", 0, 180.0, true),
            obs("a", 6, 178.5, false),
            obs("c", 0, 179.0, true),
        ];
        let sequential = run(&observations, BatchConfig::sequential());
        let parallel = run(&observations, BatchConfig::parallel(3));
        assert_eq!(sequential, parallel);
        assert_eq!(
            sequential.collection.event_ids(),
            &[StormId::from("a"), StormId::from("b"), StormId::from("c")]
        );
    }

    #[test]
    fn test_sequential_mode_keeps_timesteps_on_caller() {
        let grid = grid();
        let factors = DownscalingFactors::uniform(&grid, 1.0);
        let model = model();
        let sequential = BatchDriver::new(&grid, &factors, &model, BatchConfig::sequential());
        assert!(!sequential.unwrap().processor.parallel_timesteps());
        let parallel = BatchDriver::new(&grid, &factors, &model, BatchConfig::parallel(2));
        assert!(parallel.unwrap().processor.parallel_timesteps());
    }

    #[test]
    fn test_isolate_turns_panic_into_calm_degraded_field() {
        let id = StormId::from("boom");
        let result = isolate(&id, (2, 3), || panic!("vortex blew up"));
        assert_eq!(result.storm_id, id);
        assert!(result.degraded);
        assert_eq!(result.max_wind.shape(), (2, 3));
        assert!(result.max_wind.iter().all(|&v| v == 0.0));

        let result = isolate(&StormId::from("fine"), (2, 3), || gusty("fine"));
        assert_eq!(result, gusty("fine"));
    }

    #[test]
    fn test_panicking_storm_leaves_siblings_intact() {
        let ids = ["a", "b", "c", "d", "e"];
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(3)
            .build()
            .unwrap();
        let results: Vec<MaxWindResult> = pool.install(|| {
            ids.par_iter()
                .map(|&id| {
                    isolate(&StormId::from(id), (2, 3), || {
                        assert_ne!(id, "c", "storm c fails");
                        gusty(id)
                    })
                })
                .collect()
        });

        let order: Vec<&str> = results.iter().map(|r| r.storm_id.as_str()).collect();
        assert_eq!(order, ids);
        for result in &results {
            if result.storm_id.as_str() == "c" {
                assert!(result.degraded);
                assert!(result.max_wind.iter().all(|&v| v == 0.0));
            } else {
                assert_eq!(*result, gusty(result.storm_id.as_str()));
            }
        }
    }
}
