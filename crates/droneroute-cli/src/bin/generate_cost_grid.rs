//! Convert an elevation raster JSON into a slope-based cost grid JSON.

use anyhow::{Context, Result};
use clap::Parser;
use droneroute_cli::init_tracing;
use droneroute_core::cost_surface::{FLAT_COST, STEEPEST_COST};
use droneroute_core::{cost_grid_from_elevation, ElevationRaster};
use std::path::PathBuf;

/// Build a movement cost grid (1 = flat, 10 = steepest) from elevations
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Elevation JSON ({"rows", "cols", "elevations_m", "nodata"})
    #[arg(long)]
    elevation: PathBuf,

    /// Output cost grid path; stdout when omitted
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(false)?;

    let text = std::fs::read_to_string(&args.elevation)
        .with_context(|| format!("failed to read {}", args.elevation.display()))?;
    let raster: ElevationRaster = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse {}", args.elevation.display()))?;

    let grid = cost_grid_from_elevation(&raster)?;
    tracing::info!(
        "Cost grid {}x{} generated (costs {}..{})",
        grid.rows(),
        grid.cols(),
        FLAT_COST,
        STEEPEST_COST
    );

    let json = serde_json::to_string(&grid)?;
    match &args.out {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!("Saved cost grid to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}
