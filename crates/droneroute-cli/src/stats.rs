//! Run statistics for a single search.

use droneroute_core::{Cell, SearchResult};
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathStats {
    pub start: Cell,
    pub goal: Cell,
    /// Wall time in seconds, rounded to 2 decimals.
    pub runtime_sec: f64,
    pub steps_taken: usize,
    /// Rounded to 2 decimals; `None` when no path exists.
    pub total_cost: Option<f64>,
    pub path_length: usize,
    pub waypoints: Vec<Cell>,
    pub timestamp_unix: f64,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl PathStats {
    pub fn new(start: Cell, goal: Cell, result: &SearchResult, runtime: Duration) -> Self {
        Self {
            start,
            goal,
            runtime_sec: round2(runtime.as_secs_f64()),
            steps_taken: result.steps_taken,
            total_cost: result.found().then(|| round2(result.total_cost)),
            path_length: result.path.as_ref().map_or(0, Vec::len),
            waypoints: result.waypoints().unwrap_or_default(),
            timestamp_unix: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs_f64())
                .unwrap_or(0.0),
        }
    }
}
