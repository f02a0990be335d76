use clap::Parser;
use cyclone_wind_core::{
    BatchConfig, DownscalingFactors, EnvironmentalPressure, EvaluationGrid, StormRow,
    TrackObservation, WindFieldError, WindModel, WindModelConfig,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing_subscriber::EnvFilter;

/// Cyclone wind footprint demo over synthetic storms
#[derive(Parser, Debug)]
#[command(name = "cyclone-wind-demo")]
#[command(about = "Maximum wind speed footprints for a synthetic storm season", long_about = None)]
struct Args {
    /// Number of synthetic storms
    #[arg(short = 'n', long, default_value_t = 12)]
    storms: u32,

    /// Random seed
    #[arg(short, long, default_value_t = 42)]
    seed: u64,

    /// Western edge of the grid (degrees)
    #[arg(long, default_value_t = -98.0, allow_hyphen_values = true)]
    min_lon: f64,

    /// Eastern edge of the grid (degrees)
    #[arg(long, default_value_t = -80.0, allow_hyphen_values = true)]
    max_lon: f64,

    /// Southern edge of the grid (degrees)
    #[arg(long, default_value_t = 18.0, allow_hyphen_values = true)]
    min_lat: f64,

    /// Northern edge of the grid (degrees)
    #[arg(long, default_value_t = 32.0, allow_hyphen_values = true)]
    max_lat: f64,

    /// Grid spacing (degrees)
    #[arg(short, long, default_value_t = 0.25, value_parser = positive_degrees)]
    resolution: f64,

    /// Latitude north of which a storm is over land (degrees)
    #[arg(long, default_value_t = 29.0, allow_hyphen_values = true)]
    coast_lat: f64,

    /// Track resampling step (minutes)
    #[arg(long, default_value_t = 60)]
    step_minutes: u32,

    /// Surface/gradient wind factor applied everywhere
    #[arg(long, default_value_t = 0.8)]
    surface_factor: f64,

    /// Worker threads (0 = one per core)
    #[arg(short, long, default_value_t = 0)]
    workers: usize,

    /// Process storms one at a time
    #[arg(long)]
    sequential: bool,
}

/// Parse a strictly positive, finite angle in degrees
fn positive_degrees(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(format!("must be a positive number of degrees, got {value}"))
    }
}

/// Random north-westward track in STORM row form, 3-hourly
fn synthetic_storm(rng: &mut StdRng, args: &Args, tc_number: u32) -> Vec<StormRow> {
    let steps = rng.random_range(10..=28);
    let month = rng.random_range(6..=11);
    // Genesis in the south-east of the domain
    let mut lon = args.min_lon + rng.random_range(0.3..1.0) * (args.max_lon - args.min_lon);
    let mut lat = args.min_lat + rng.random_range(0.0..0.3) * (args.max_lat - args.min_lat);
    let mut pressure: f64 = rng.random_range(985.0..1000.0);
    let deepening = rng.random_range(1.0..4.0);
    let rmw = rng.random_range(25.0..70.0);

    let mut rows = Vec::with_capacity(steps as usize);
    for timestep in 0..steps {
        let max_wind = 3.4 * (1010.0 - pressure).max(0.0).powf(0.644);
        let landfall = u8::from(lat >= args.coast_lat);
        rows.push(StormRow {
            year: 1,
            month,
            tc_number,
            timestep,
            basin_id: 1,
            lat,
            lon,
            min_pressure_hpa: pressure,
            max_wind_speed_ms: max_wind,
            radius_to_max_winds_km: rmw,
            category: 0,
            landfall,
            distance_to_land_km: ((args.coast_lat - lat) * 111.0).max(0.0),
        });

        lon -= rng.random_range(0.1..0.6);
        lat += rng.random_range(0.2..0.6);
        pressure = if landfall == 1 {
            (pressure + 6.0).min(1005.0)
        } else {
            (pressure - deepening).max(915.0)
        };
    }
    rows
}

fn grid_points(min: f64, max: f64, resolution: f64) -> usize {
    ((max - min) / resolution).round() as usize + 1
}

fn main() -> Result<(), WindFieldError> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();

    let args = Args::parse();

    println!("=== Cyclone Wind Footprint Demo ===\n");

    let grid = EvaluationGrid::regular(
        (
            args.min_lon,
            args.max_lon,
            grid_points(args.min_lon, args.max_lon, args.resolution),
        ),
        (
            args.min_lat,
            args.max_lat,
            grid_points(args.min_lat, args.max_lat, args.resolution),
        ),
    )?;
    let factors = DownscalingFactors::uniform(&grid, args.surface_factor);
    let model = WindModel::new(
        WindModelConfig {
            interpolation_step_minutes: args.step_minutes,
            ..Default::default()
        },
        EnvironmentalPressure::storm_defaults(),
    )?;
    println!(
        "Grid: {} x {} cells at {:.2}°, surface factor {:.2}",
        grid.ny(),
        grid.nx(),
        args.resolution,
        args.surface_factor
    );

    let mut rng = StdRng::seed_from_u64(args.seed);
    let mut observations = Vec::new();
    for tc_number in 0..args.storms {
        for row in synthetic_storm(&mut rng, &args, tc_number) {
            observations.push(TrackObservation::from_storm_row(&row, 0)?);
        }
    }
    println!(
        "Generated {} storms ({} observations), seed {}\n",
        args.storms,
        observations.len(),
        args.seed
    );

    let config = if args.sequential {
        BatchConfig::sequential()
    } else {
        BatchConfig::parallel(args.workers)
    };
    let report = cyclone_wind_core::run_batch(
        &observations,
        TrackObservation::landfall,
        &grid,
        &factors,
        &model,
        config,
    )?;

    let collection = &report.collection;
    if collection.is_empty() {
        println!("No storm made landfall.");
        return Ok(());
    }

    println!("Event          | Peak (m/s) |   Lon   |  Lat");
    println!("---------------|------------|---------|-------");
    for (event, id) in collection.event_ids().iter().enumerate() {
        let Some(field) = collection.field(event) else {
            continue;
        };
        let (row, col) = field.iamax_full();
        let marker = if report.degraded.contains(id) { " *" } else { "" };
        println!(
            "{:14} | {:10.1} | {:7.2} | {:5.2}{}",
            id.as_str(),
            field[(row, col)],
            grid.longitude()[col],
            grid.latitude()[row],
            marker
        );
    }

    println!("\n=== Batch Complete ===");
    println!("Events: {}", collection.len());
    if !report.degraded.is_empty() {
        println!("Degraded (*): {}", report.degraded.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_must_be_positive() {
        for bad in ["0", "-0.5", "NaN", "inf", "fine"] {
            assert!(
                Args::try_parse_from(["demo-headless", "--resolution", bad]).is_err(),
                "accepted resolution {bad}"
            );
        }
        let args = Args::try_parse_from(["demo-headless", "--resolution", "0.5"]).unwrap();
        assert_eq!(args.resolution, 0.5);
        assert_eq!(grid_points(-98.0, -80.0, args.resolution), 37);
    }
}
