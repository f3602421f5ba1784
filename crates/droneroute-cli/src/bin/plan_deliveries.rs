//! Plan hub -> pickup -> dropoff -> hub routes for a whole fleet.
//!
//! Prints one JSON leg record per line. Deliveries with an unroutable leg
//! are reported on stderr and emit no records, and the run then exits with
//! an error after the successful records are written.

use anyhow::{bail, Result};
use chrono::Utc;
use clap::{Parser, ValueEnum};
use droneroute_cli::scenarios::{
    create_open_field_scenario, create_ridge_scenario, create_scatter_scenario,
    create_wall_scenario,
};
use droneroute_cli::{dispatch_fleet, init_tracing, load_job, Config, DeliveryJob, FleetReport};
use std::path::PathBuf;
use std::sync::Arc;

/// Available demo scenarios
#[derive(Debug, Clone, ValueEnum)]
enum ScenarioType {
    /// Uniform terrain
    OpenField,
    /// Costly ridge with one cheap pass
    Ridge,
    /// Impassable wall; legs crossing it fail
    Wall,
    /// Random terrain with scattered blocked cells
    Scatter,
}

/// Plan delivery routes for every drone in a job
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Job JSON file (hub, drones, orders, grid or grid_path)
    #[arg(long, conflicts_with = "demo")]
    job: Option<PathBuf>,

    /// Run a built-in scenario instead of a job file
    #[arg(long, value_enum)]
    demo: Option<ScenarioType>,

    /// Seed for the scatter scenario
    #[arg(long, default_value_t = 7)]
    seed: u64,

    /// Meters covered by one grid cell
    #[arg(long)]
    cell_resolution_m: Option<f64>,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,
}

fn resolve_job(args: &Args) -> Result<DeliveryJob> {
    if let Some(path) = &args.job {
        return load_job(path);
    }
    let Some(demo) = args.demo.clone() else {
        bail!("pass --job <FILE> or --demo <SCENARIO>");
    };
    let scenario = match demo {
        ScenarioType::OpenField => create_open_field_scenario()?,
        ScenarioType::Ridge => create_ridge_scenario()?,
        ScenarioType::Wall => create_wall_scenario()?,
        ScenarioType::Scatter => create_scatter_scenario(args.seed)?,
    };
    tracing::info!("Scenario: {} ({})", scenario.name, scenario.description);
    Ok(scenario.job)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.json_logs)?;

    let mut route_config = Config::from_env().route_config();
    if let Some(resolution) = args.cell_resolution_m {
        route_config.cell_resolution_m = resolution;
    }

    let job = resolve_job(&args)?;
    tracing::info!(
        "Planning {} orders with {} drones on a {}x{} grid",
        job.orders.len(),
        job.drones.len(),
        job.grid.rows(),
        job.grid.cols()
    );

    let grid = Arc::new(job.grid);
    let outcomes = dispatch_fleet(grid, job.hub, &job.drones, &job.orders, route_config).await;

    let report = FleetReport::from_outcomes(&outcomes, Utc::now());
    for record in &report.records {
        println!("{}", serde_json::to_string(record)?);
    }
    for failure in &report.failures {
        tracing::error!(
            "Delivery {} for {} aborted: {}",
            failure.order_id,
            failure.drone_id,
            failure.reason
        );
    }

    tracing::info!("Planned {}/{} deliveries", report.planned, report.total());
    report.ensure_complete()
}
