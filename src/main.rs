//! visit-planner CLI
//!
//! Reads a stops CSV, plans every representative and writes one route CSV
//! per representative.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::{error, info, warn};

use visit_planner::csv_io::{read_stops, write_route};
use visit_planner::{EstimatorKind, Grouping, PlanOutcome, Planner, PlannerConfig};

#[derive(Debug, Parser)]
#[command(name = "visit-planner", about = "Plan monthly store-visit routes")]
struct Args {
    /// Stops CSV: representative,store_name,address,city,lat,lon
    #[arg(short, long)]
    input: PathBuf,

    /// Directory receiving one Route_<representative>.csv per plan
    #[arg(short, long, default_value = "routes")]
    output_dir: PathBuf,

    /// Plan only this representative
    #[arg(short, long)]
    representative: Option<String>,

    /// OSRM base URL (overrides OSRM_URL)
    #[arg(long)]
    osrm_url: Option<String>,

    /// Fallback estimator: haversine or planar
    #[arg(long)]
    estimator: Option<EstimatorKind>,

    /// Number of weekly zones
    #[arg(long)]
    zones: Option<usize>,

    /// Group into blocks of this size instead of weekly zones
    #[arg(long, conflicts_with = "zones")]
    block_size: Option<usize>,

    /// Disable second visits
    #[arg(long)]
    no_recurrence: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = build_config(&args)?;

    let file = read_stops(&args.input)?;
    let stops = file.stops;
    info!(
        total = stops.len() + file.missing_coordinates,
        ready = stops.len(),
        missing_coordinates = file.missing_coordinates,
        "stops loaded"
    );

    let planner = Planner::new(config);
    let results = match &args.representative {
        Some(representative) => vec![(representative.clone(), planner.plan(representative, &stops))],
        None => planner.plan_all(&stops),
    };

    fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("cannot create {}", args.output_dir.display()))?;

    let mut failures = 0;
    for (representative, result) in results {
        match result {
            Ok(PlanOutcome::Planned(plan)) => match write_route(&args.output_dir, &plan) {
                Ok(path) => {
                    info!(representative = %representative, path = %path.display(), "route written");
                }
                Err(err) => {
                    failures += 1;
                    error!(representative = %representative, error = ?err, "cannot write route");
                }
            },
            Ok(PlanOutcome::Empty { rejected }) => {
                warn!(representative = %representative, rejected, "no plannable stops");
            }
            Err(err) => {
                failures += 1;
                error!(representative = %representative, error = %err, "planning failed");
            }
        }
    }

    if failures > 0 {
        bail!("{} representative(s) failed", failures);
    }
    info!("done");
    Ok(())
}

fn build_config(args: &Args) -> Result<PlannerConfig> {
    let mut config = PlannerConfig::from_env()?;

    if let Some(url) = &args.osrm_url {
        let mut osrm = config.osrm.take().unwrap_or_default();
        osrm.base_url = url.clone();
        config.osrm = Some(osrm);
    }
    if let Some(estimator) = args.estimator {
        config.estimator = estimator;
    }
    if let Some(zone_count) = args.zones {
        config.grouping = Grouping::WeeklyZones { zone_count };
    }
    if let Some(block_size) = args.block_size {
        config.grouping = Grouping::Blocks { block_size };
    }
    if args.no_recurrence {
        config.recurrence = None;
    }

    Ok(config)
}
