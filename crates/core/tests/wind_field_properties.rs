//! Wind Field Property Tests
//!
//! Properties every max wind result must satisfy, checked through the
//! public track processing API:
//! 1. Single observation tracks give a calm grid
//! 2. Results are never negative
//! 3. A NaN in one timestep does not poison the time maximum
//! 4. Downscaling is linear in the factors
//! 5. A reference two-point storm over a 5x5 grid
//!
//! Run tests with: `cargo test --test wind_field_properties`

use approx::assert_relative_eq;
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use cyclone_wind_core::{
    core_types::{HectoPascals, Kilometers, MetersPerSecond},
    simulation::WindFieldSeries,
    Basin, DownscalingFactors, EnvironmentalPressure, EvaluationGrid, StormId, Track,
    TrackObservation, TrackProcessor, WindModel, WindModelConfig,
};
use geo::Point;
use nalgebra::{Complex, DMatrix};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2018, 9, 12)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

/// Observation of storm `id` in the western Pacific
fn fix(id: &str, hours: i64, lon: f64, lat: f64) -> TrackObservation {
    TrackObservation::new(
        StormId::from(id),
        Basin::WP,
        start() + TimeDelta::hours(hours),
        Point::new(lon, lat),
    )
    .unwrap()
    .with_intensity(
        HectoPascals::new(950.0),
        MetersPerSecond::new(50.0),
        Kilometers::new(50.0),
    )
}

fn reference_grid() -> EvaluationGrid {
    EvaluationGrid::regular((0.0, 2.0, 5), (9.0, 11.0, 5)).unwrap()
}

fn reference_track() -> Track {
    Track::new(vec![fix("WP_0_2018_1", 0, 0.0, 10.0), fix("WP_0_2018_1", 3, 1.0, 10.0)]).unwrap()
}

fn model(env_hpa: f64) -> WindModel {
    WindModel::new(
        WindModelConfig::default(),
        EnvironmentalPressure::empty().with_basin(Basin::WP, HectoPascals::new(env_hpa)),
    )
    .unwrap()
}

// ═══════════════════════════════════════════════════════════════════════════════
// SECTION 1: ZERO-TRACK PROPERTY
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_single_observation_gives_zero_grid() {
    init_tracing();
    let grid = reference_grid();
    let factors = DownscalingFactors::uniform(&grid, 1.0);
    let model = model(1013.0);
    let processor = TrackProcessor::new(&grid, &factors, &model).unwrap();

    for (lon, lat) in [(1.0, 10.0), (0.0, -30.0), (179.9, 60.0)] {
        let track = Track::new(vec![fix("lonely", 0, lon, lat)]).unwrap();
        let result = processor.max_wind(&track);
        assert_eq!(result.max_wind.shape(), (5, 5));
        assert!(result.max_wind.iter().all(|&v| v == 0.0));
        assert!(!result.degraded, "a single fix is not a failure");
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SECTION 2: NON-NEGATIVITY
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_max_wind_never_negative() {
    init_tracing();
    let grid = EvaluationGrid::regular((-3.0, 3.0, 13), (-23.0, -17.0, 13)).unwrap();
    let model = model(1005.0);

    // Southern hemisphere storm curving south-east, with negative factors
    let track = Track::new(vec![
        fix("s", 0, -2.0, -18.0),
        fix("s", 6, -0.5, -19.0),
        fix("s", 12, 0.5, -20.5),
        fix("s", 18, 2.0, -22.0),
    ])
    .unwrap();

    for c in [1.0, 0.6, -0.7] {
        let factors = DownscalingFactors::uniform(&grid, c);
        let processor = TrackProcessor::new(&grid, &factors, &model).unwrap();
        let result = processor.max_wind(&track);
        assert!(!result.degraded);
        for &v in result.max_wind.iter() {
            assert!(v >= 0.0 || v.is_nan(), "negative max wind {v}");
        }
    }
}

#[test]
fn test_nan_factors_stay_local() {
    init_tracing();
    let grid = reference_grid();
    let mut m = DMatrix::from_element(5, 5, 0.9);
    m[(2, 2)] = f64::NAN;
    let factors = DownscalingFactors::from_matrix(&grid, m).unwrap();
    let model = model(1013.0);
    let processor = TrackProcessor::new(&grid, &factors, &model).unwrap();

    let result = processor.max_wind(&reference_track());
    assert!(result.max_wind[(2, 2)].is_nan());
    let finite = result.max_wind.iter().filter(|v| v.is_finite()).count();
    assert_eq!(finite, 24);
}

// ═══════════════════════════════════════════════════════════════════════════════
// SECTION 3: NAN ROBUSTNESS
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_single_nan_timestep_does_not_poison_cell() {
    let mut series = WindFieldSeries::new((2, 2));
    let frames = [
        [3.0, 1.0, 2.0, 0.5],
        [f64::NAN, 4.0, 1.0, 0.5],
        [6.0, 2.0, 7.0, 0.5],
    ];
    for values in frames {
        let cells: Vec<Complex<f64>> = values.iter().map(|&v| Complex::new(0.0, v)).collect();
        series.push(DMatrix::from_row_slice(2, 2, &cells)).unwrap();
    }

    let max = series.max_magnitude();
    assert_relative_eq!(max[(0, 0)], 6.0);
    assert_relative_eq!(max[(0, 1)], 4.0);
    assert_relative_eq!(max[(1, 0)], 7.0);
    assert_relative_eq!(max[(1, 1)], 0.5);
}

// ═══════════════════════════════════════════════════════════════════════════════
// SECTION 4: DOWNSCALING LINEARITY
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_downscaling_scales_by_abs_c() {
    init_tracing();
    let grid = reference_grid();
    let model = model(1013.0);
    // One hour apart: two timesteps at the default step
    let track = Track::new(vec![fix("lin", 0, 0.5, 10.0), fix("lin", 1, 0.8, 10.0)]).unwrap();

    let base = DownscalingFactors::uniform(&grid, 0.75);
    let reference = TrackProcessor::new(&grid, &base, &model)
        .unwrap()
        .max_wind(&track)
        .max_wind;
    assert!(reference.iter().any(|&v| v > 1.0));

    for c in [2.0, 0.3, -1.5, 0.0] {
        let scaled = base.scaled(c);
        let result = TrackProcessor::new(&grid, &scaled, &model)
            .unwrap()
            .max_wind(&track)
            .max_wind;
        for (r, s) in reference.iter().zip(result.iter()) {
            assert_relative_eq!(*s, c.abs() * r, epsilon = 1e-9, max_relative = 1e-12);
        }
    }
}

#[test]
fn test_downscaling_single_frame() {
    let grid = EvaluationGrid::regular((0.0, 1.0, 2), (0.0, 1.0, 2)).unwrap();
    let frame = DMatrix::from_row_slice(
        2,
        2,
        &[
            Complex::new(3.0, 4.0),
            Complex::new(-1.0, 0.0),
            Complex::new(0.0, 2.0),
            Complex::new(6.0, -8.0),
        ],
    );

    for c in [1.0, -3.0, 0.5] {
        let mut series = WindFieldSeries::new((2, 2));
        series.push(frame.clone()).unwrap();
        series
            .downscale(&DownscalingFactors::uniform(&grid, c))
            .unwrap();
        let max = series.max_magnitude();
        assert_relative_eq!(max[(0, 0)], 5.0 * c.abs());
        assert_relative_eq!(max[(1, 1)], 10.0 * c.abs());
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SECTION 5: REFERENCE SCENARIO
// ═══════════════════════════════════════════════════════════════════════════════

/// Two fixes 3 hours apart along 10°N, 950 hPa against a 1013 hPa
/// environment, 50 m/s at 50 km, resampled hourly on a 5x5 grid.
#[test]
fn test_reference_two_point_storm() {
    init_tracing();
    let grid = reference_grid();
    let factors = DownscalingFactors::uniform(&grid, 1.0);
    let model = model(1013.0);
    let processor = TrackProcessor::new(&grid, &factors, &model).unwrap();
    let track = reference_track();

    let eyes = processor.eye_states(&track).unwrap();
    assert_eq!(eyes.len(), 4);

    let result = processor.max_wind(&track);
    assert_eq!(result.storm_id, StormId::from("WP_0_2018_1"));
    assert_eq!(result.max_wind.shape(), (5, 5));
    assert!(!result.degraded);
    assert!(result
        .max_wind
        .iter()
        .all(|v| v.is_finite() && *v >= 0.0));

    let (row, col) = result.max_wind.iamax_full();
    let peak = result.max_wind[(row, col)];
    assert!(peak > 20.0 && peak < 60.0, "peak {peak}");

    // The peak lies in the band swept by the eye, not out at the corners
    let lat = grid.latitude()[row];
    let lon = grid.longitude()[col];
    assert!((lat - 10.0).abs() <= 0.5, "peak at lat {lat}");
    assert!((0.0..=1.0).contains(&lon), "peak at lon {lon}");
    for (r, c) in [(0, 0), (0, 4), (4, 0), (4, 4)] {
        assert!(result.max_wind[(r, c)] < peak);
    }

    // Moving east in the northern hemisphere, the right (south) side is stronger
    assert!(result.max_wind[(1, 1)] > result.max_wind[(3, 1)]);
}
