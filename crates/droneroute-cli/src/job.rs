//! Delivery job files.
//!
//! A job names the hub, the fleet and the pending orders, all already
//! resolved to grid cells, plus the cost grid to fly over. The grid is either
//! inline or a path to a separate grid file, resolved relative to the job.

use anyhow::{bail, Context, Result};
use droneroute_core::{CostGrid, DeliveryOrder, Drone, Stop};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobFile {
    pub hub: Stop,
    pub drones: Vec<Drone>,
    pub orders: Vec<DeliveryOrder>,
    #[serde(default)]
    pub grid: Option<CostGrid>,
    #[serde(default)]
    pub grid_path: Option<PathBuf>,
}

/// A job with its grid loaded.
#[derive(Debug, Clone)]
pub struct DeliveryJob {
    pub hub: Stop,
    pub drones: Vec<Drone>,
    pub orders: Vec<DeliveryOrder>,
    pub grid: CostGrid,
}

impl JobFile {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("invalid job JSON")
    }

    /// Attach the grid, reading `grid_path` relative to `base_dir` if needed.
    pub fn resolve(self, base_dir: &Path) -> Result<DeliveryJob> {
        let grid = match (self.grid, self.grid_path) {
            (Some(grid), None) => grid,
            (None, Some(path)) => load_grid(&base_dir.join(path))?,
            (Some(_), Some(_)) => bail!("job sets both `grid` and `grid_path`"),
            (None, None) => bail!("job needs `grid` or `grid_path`"),
        };
        Ok(DeliveryJob {
            hub: self.hub,
            drones: self.drones,
            orders: self.orders,
            grid,
        })
    }
}

pub fn load_job(path: &Path) -> Result<DeliveryJob> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read job file {}", path.display()))?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    JobFile::from_json(&text)
        .with_context(|| format!("failed to parse job file {}", path.display()))?
        .resolve(base_dir)
}

pub fn load_grid(path: &Path) -> Result<CostGrid> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read grid file {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("failed to parse grid file {}", path.display()))
}
