//! Run one grid search and print its statistics as JSON.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use droneroute_cli::scenarios::{
    create_open_field_scenario, create_ridge_scenario, create_scatter_scenario,
    create_wall_scenario,
};
use droneroute_cli::{init_tracing, load_grid, Config, PathStats};
use droneroute_core::{BlockPolicy, Cell, CostGrid, SearchEngine};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Debug, Clone, ValueEnum)]
enum Demo {
    OpenField,
    Ridge,
    Wall,
    Scatter,
}

/// Find the least-cost path between two cells of a cost grid
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Cost grid JSON file ({"rows", "cols", "costs"})
    #[arg(long, conflicts_with = "demo")]
    grid: Option<PathBuf>,

    /// Use a built-in demo grid instead of a file
    #[arg(long, value_enum)]
    demo: Option<Demo>,

    /// Start cell as ROW,COL
    #[arg(long, value_parser = parse_cell)]
    start: Cell,

    /// Goal cell as ROW,COL
    #[arg(long, value_parser = parse_cell)]
    goal: Cell,

    /// Block cells with cost >= this value
    #[arg(long, conflicts_with = "sentinel")]
    threshold: Option<f64>,

    /// Block cells whose cost equals this value
    #[arg(long)]
    sentinel: Option<f64>,

    /// Cost multiplier for diagonal moves
    #[arg(long)]
    diagonal_factor: Option<f64>,

    /// Give up after settling this many cells
    #[arg(long)]
    max_steps: Option<usize>,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,
}

fn parse_cell(value: &str) -> Result<Cell, String> {
    let (row, col) = value
        .split_once(',')
        .ok_or_else(|| format!("expected ROW,COL, got `{value}`"))?;
    let row = row.trim().parse().map_err(|e| format!("bad row: {e}"))?;
    let col = col.trim().parse().map_err(|e| format!("bad col: {e}"))?;
    Ok(Cell::new(row, col))
}

fn resolve_grid(args: &Args) -> Result<CostGrid> {
    if let Some(path) = &args.grid {
        return load_grid(path);
    }
    let scenario = match args.demo.clone().unwrap_or(Demo::OpenField) {
        Demo::OpenField => create_open_field_scenario()?,
        Demo::Ridge => create_ridge_scenario()?,
        Demo::Wall => create_wall_scenario()?,
        Demo::Scatter => create_scatter_scenario(7)?,
    };
    tracing::info!("Using demo grid '{}': {}", scenario.name, scenario.description);
    Ok(scenario.job.grid)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.json_logs)?;

    let mut search_config = Config::from_env().search_config();
    if let Some(threshold) = args.threshold {
        search_config.blocking = BlockPolicy::Threshold(threshold);
    }
    if let Some(sentinel) = args.sentinel {
        search_config.blocking = BlockPolicy::Sentinel(sentinel);
    }
    if let Some(factor) = args.diagonal_factor {
        search_config.diagonal_factor = factor;
    }
    if args.max_steps.is_some() {
        search_config.max_steps = args.max_steps;
    }

    let grid = resolve_grid(&args)?;
    tracing::info!(
        "Searching {}x{} grid from {} to {}",
        grid.rows(),
        grid.cols(),
        args.start,
        args.goal
    );

    let started = Instant::now();
    let result = SearchEngine::new(&grid, search_config)
        .search(args.start, args.goal)
        .context("search setup failed")?;
    let runtime = started.elapsed();

    if result.found() {
        tracing::info!("Goal reached after {} steps", result.steps_taken);
    } else {
        tracing::warn!(
            "No path found ({:?}) after {} steps",
            result.outcome,
            result.steps_taken
        );
    }

    let stats = PathStats::new(args.start, args.goal, &result, runtime);
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}
