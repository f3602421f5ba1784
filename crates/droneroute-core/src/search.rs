//! Weighted 8-connected A* over a [`CostGrid`].
//!
//! Every invocation owns its own [`SearchState`]; nothing survives the call,
//! so any number of searches can share one read-only grid.

use crate::error::{EndpointRole, Result, RouteError};
use crate::grid::{BlockPolicy, CostGrid};
use crate::heuristic::Heuristic;
use crate::models::Cell;
use crate::reconstruct::reconstruct_path;
use crate::simplify::simplify;
use serde::{Deserialize, Serialize};
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use tracing::{debug, trace};

/// Orthogonal moves first, then diagonals.
const NEIGHBOR_OFFSETS: [(isize, isize); 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),
];

const NO_PREDECESSOR: usize = usize::MAX;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    pub blocking: BlockPolicy,
    pub diagonal_factor: f64,
    /// Stop after settling this many cells. `None` searches until the
    /// frontier is empty.
    #[serde(default)]
    pub max_steps: Option<usize>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            blocking: BlockPolicy::default(),
            diagonal_factor: std::f64::consts::SQRT_2,
            max_steps: None,
        }
    }
}

impl SearchConfig {
    pub fn with_threshold(threshold: f64) -> Self {
        Self {
            blocking: BlockPolicy::Threshold(threshold),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.diagonal_factor.is_finite() || self.diagonal_factor <= 0.0 {
            return Err(RouteError::InvalidConfig(format!(
                "diagonal_factor must be positive and finite, got {}",
                self.diagonal_factor
            )));
        }
        let limit = match self.blocking {
            BlockPolicy::Threshold(value) | BlockPolicy::Sentinel(value) => value,
        };
        if limit.is_nan() {
            return Err(RouteError::InvalidConfig(
                "blocking value must not be NaN".to_string(),
            ));
        }
        Ok(())
    }
}

/// Why a search stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchOutcome {
    Reached,
    /// Frontier emptied without reaching the goal.
    Exhausted,
    /// `max_steps` was hit before the goal was settled.
    StepLimit,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// Raw start-to-goal path, `None` when the goal was not reached.
    pub path: Option<Vec<Cell>>,
    /// Cost of the full raw path; `f64::INFINITY` when `path` is `None`.
    pub total_cost: f64,
    pub steps_taken: usize,
    pub outcome: SearchOutcome,
}

impl SearchResult {
    pub fn found(&self) -> bool {
        self.path.is_some()
    }

    /// Turning-point waypoints of the raw path.
    pub fn waypoints(&self) -> Option<Vec<Cell>> {
        self.path.as_deref().map(simplify)
    }

    fn unreached(steps_taken: usize, outcome: SearchOutcome) -> Self {
        Self {
            path: None,
            total_cost: f64::INFINITY,
            steps_taken,
            outcome,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Frontier entry. Entries go stale when a cheaper route to the same cell is
/// pushed; they are dropped on pop once the cell is visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OpenNode {
    f_score: FloatOrd,
    index: usize,
}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.f_score
            .cmp(&other.f_score)
            .then_with(|| self.index.cmp(&other.index))
    }
}

/// Per-search bookkeeping, allocated once per call as dense vectors indexed
/// by the grid's row-major cell index.
#[derive(Debug, Clone)]
pub struct SearchState {
    rows: usize,
    cols: usize,
    g: Vec<f64>,
    f: Vec<f64>,
    came_from: Vec<usize>,
    visited: Vec<bool>,
}

impl SearchState {
    fn new(rows: usize, cols: usize) -> Self {
        let len = rows * cols;
        Self {
            rows,
            cols,
            g: vec![f64::INFINITY; len],
            f: vec![f64::INFINITY; len],
            came_from: vec![NO_PREDECESSOR; len],
            visited: vec![false; len],
        }
    }

    fn index(&self, cell: Cell) -> Option<usize> {
        (cell.row < self.rows && cell.col < self.cols).then(|| cell.row * self.cols + cell.col)
    }

    fn cell(&self, index: usize) -> Cell {
        Cell::new(index / self.cols, index % self.cols)
    }

    /// Best known cost from start; `None` if never reached.
    pub fn g(&self, cell: Cell) -> Option<f64> {
        let g = self.g[self.index(cell)?];
        g.is_finite().then_some(g)
    }

    /// Priority key last assigned to `cell`.
    pub fn f(&self, cell: Cell) -> Option<f64> {
        let f = self.f[self.index(cell)?];
        f.is_finite().then_some(f)
    }

    pub fn predecessor(&self, cell: Cell) -> Option<Cell> {
        let prev = self.came_from[self.index(cell)?];
        (prev != NO_PREDECESSOR).then(|| self.cell(prev))
    }

    pub fn is_visited(&self, cell: Cell) -> bool {
        self.index(cell).is_some_and(|idx| self.visited[idx])
    }

    pub fn visited_count(&self) -> usize {
        self.visited.iter().filter(|v| **v).count()
    }
}

/// A finished search with its state still attached.
#[derive(Debug, Clone)]
pub struct SearchRun {
    pub state: SearchState,
    pub start: Cell,
    pub goal: Cell,
    pub steps_taken: usize,
    pub outcome: SearchOutcome,
}

impl SearchRun {
    pub fn into_result(self) -> Result<SearchResult> {
        if self.outcome != SearchOutcome::Reached {
            return Ok(SearchResult::unreached(self.steps_taken, self.outcome));
        }
        let path = reconstruct_path(&self.state, self.start, self.goal)?;
        let total_cost = self
            .state
            .g(self.goal)
            .ok_or(RouteError::Unreachable(self.goal))?;
        Ok(SearchResult {
            path: Some(path),
            total_cost,
            steps_taken: self.steps_taken,
            outcome: SearchOutcome::Reached,
        })
    }
}

/// A* pathfinder bound to one grid and configuration.
pub struct SearchEngine<'a> {
    grid: &'a CostGrid,
    config: SearchConfig,
}

impl<'a> SearchEngine<'a> {
    pub fn new(grid: &'a CostGrid, config: SearchConfig) -> Self {
        Self { grid, config }
    }

    pub fn with_defaults(grid: &'a CostGrid) -> Self {
        Self::new(grid, SearchConfig::default())
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn search(&self, start: Cell, goal: Cell) -> Result<SearchResult> {
        self.run(start, goal)?.into_result()
    }

    /// Run the search and hand back its state for inspection.
    pub fn run(&self, start: Cell, goal: Cell) -> Result<SearchRun> {
        self.config.validate()?;
        self.check_endpoint(start, EndpointRole::Start)?;
        self.check_endpoint(goal, EndpointRole::Goal)?;

        let grid = self.grid;
        let blocking = &self.config.blocking;
        let heuristic = grid
            .min_cost(blocking)
            .map(|min_cost| Heuristic::new(min_cost, self.config.diagonal_factor))
            .unwrap_or_else(Heuristic::unit);

        debug!(
            "[AStar] search start={} goal={} grid={}x{} h_weight={:.4}",
            start,
            goal,
            grid.rows(),
            grid.cols(),
            heuristic.weight()
        );

        let mut state = SearchState::new(grid.rows(), grid.cols());
        let start_idx = grid.index(start)?;
        let goal_idx = grid.index(goal)?;

        state.g[start_idx] = 0.0;
        state.f[start_idx] = heuristic.estimate(start, goal);

        let mut open_set: BinaryHeap<Reverse<OpenNode>> = BinaryHeap::new();
        open_set.push(Reverse(OpenNode {
            f_score: FloatOrd(state.f[start_idx]),
            index: start_idx,
        }));

        let mut steps_taken = 0usize;
        let mut outcome = SearchOutcome::Exhausted;

        while let Some(Reverse(entry)) = open_set.pop() {
            let current_idx = entry.index;
            if state.visited[current_idx] {
                continue;
            }
            if self
                .config
                .max_steps
                .is_some_and(|limit| steps_taken >= limit)
            {
                outcome = SearchOutcome::StepLimit;
                break;
            }

            state.visited[current_idx] = true;
            steps_taken += 1;

            if current_idx == goal_idx {
                outcome = SearchOutcome::Reached;
                break;
            }

            let current = state.cell(current_idx);
            let current_g = state.g[current_idx];

            for (d_row, d_col) in NEIGHBOR_OFFSETS {
                let Some(neighbor) = current.offset(d_row, d_col) else {
                    continue;
                };
                let Ok(neighbor_idx) = grid.index(neighbor) else {
                    continue;
                };
                // Costs are consistent with the heuristic, so a settled cell
                // can never be improved.
                if state.visited[neighbor_idx] {
                    continue;
                }
                let cell_cost = grid.cost(neighbor)?;
                if blocking.blocks(cell_cost) {
                    continue;
                }

                let move_cost = if d_row != 0 && d_col != 0 {
                    cell_cost * self.config.diagonal_factor
                } else {
                    cell_cost
                };
                let tentative_g = current_g + move_cost;
                if tentative_g < state.g[neighbor_idx] {
                    let f_score = tentative_g + heuristic.estimate(neighbor, goal);
                    state.g[neighbor_idx] = tentative_g;
                    state.f[neighbor_idx] = f_score;
                    state.came_from[neighbor_idx] = current_idx;
                    open_set.push(Reverse(OpenNode {
                        f_score: FloatOrd(f_score),
                        index: neighbor_idx,
                    }));
                }
            }

            if steps_taken % 10_000 == 0 {
                trace!("[AStar] step {} open_set={}", steps_taken, open_set.len());
            }
        }

        match outcome {
            SearchOutcome::Reached => debug!(
                "[AStar] reached goal {} cost={:.3} steps={}",
                goal, state.g[goal_idx], steps_taken
            ),
            SearchOutcome::Exhausted => debug!(
                "[AStar] FAILED: NoPath from {} to {} after {} steps",
                start, goal, steps_taken
            ),
            SearchOutcome::StepLimit => debug!(
                "[AStar] FAILED: StepLimit ({} steps) from {} to {}",
                steps_taken, start, goal
            ),
        }

        Ok(SearchRun {
            state,
            start,
            goal,
            steps_taken,
            outcome,
        })
    }

    fn check_endpoint(&self, cell: Cell, role: EndpointRole) -> Result<()> {
        if self.grid.is_blocked(cell, &self.config.blocking)? {
            debug!("[AStar] FAILED: {} {} is blocked", role, cell);
            return Err(RouteError::InvalidEndpoint { cell, role });
        }
        Ok(())
    }
}

/// Find the least-cost path from `start` to `goal`.
pub fn search(
    grid: &CostGrid,
    start: Cell,
    goal: Cell,
    config: &SearchConfig,
) -> Result<SearchResult> {
    SearchEngine::new(grid, config.clone()).search(start, goal)
}
