//! Immutable per-cell traversal cost grid.

use crate::error::{Result, RouteError};
use crate::models::Cell;
use serde::{Deserialize, Serialize};

/// Cost at or above which the delivery planner treats a cell as impassable.
pub const DEFAULT_BLOCK_THRESHOLD: f64 = 100.0;

/// How a cell cost is turned into a blocked/open decision.
///
/// Cost sources disagree on what "impassable" looks like, so the policy is
/// always supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum BlockPolicy {
    /// Blocked iff `cost >= threshold`.
    Threshold(f64),
    /// Blocked iff `cost == sentinel`.
    Sentinel(f64),
}

impl BlockPolicy {
    pub fn blocks(&self, cost: f64) -> bool {
        match *self {
            BlockPolicy::Threshold(threshold) => cost >= threshold,
            BlockPolicy::Sentinel(sentinel) => cost == sentinel,
        }
    }
}

impl Default for BlockPolicy {
    fn default() -> Self {
        BlockPolicy::Threshold(DEFAULT_BLOCK_THRESHOLD)
    }
}

/// Dense row-major cost grid. Dimensions and costs are fixed at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GridData", into = "GridData")]
pub struct CostGrid {
    rows: usize,
    cols: usize,
    costs: Vec<f64>,
}

#[derive(Serialize, Deserialize)]
struct GridData {
    rows: usize,
    cols: usize,
    costs: Vec<f64>,
}

impl TryFrom<GridData> for CostGrid {
    type Error = RouteError;

    fn try_from(data: GridData) -> Result<Self> {
        CostGrid::new(data.rows, data.cols, data.costs)
    }
}

impl From<CostGrid> for GridData {
    fn from(grid: CostGrid) -> Self {
        GridData {
            rows: grid.rows,
            cols: grid.cols,
            costs: grid.costs,
        }
    }
}

impl CostGrid {
    pub fn new(rows: usize, cols: usize, costs: Vec<f64>) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(RouteError::InvalidGrid(format!(
                "dimensions must be non-zero, got {rows}x{cols}"
            )));
        }
        let expected = rows.checked_mul(cols).ok_or_else(|| {
            RouteError::InvalidGrid(format!("dimensions {rows}x{cols} overflow"))
        })?;
        if costs.len() != expected {
            return Err(RouteError::InvalidGrid(format!(
                "{rows}x{cols} grid needs {expected} costs, got {}",
                costs.len()
            )));
        }
        if let Some(idx) = costs.iter().position(|c| c.is_nan() || *c < 0.0) {
            return Err(RouteError::InvalidGrid(format!(
                "cost at {} is {}, costs must be non-negative",
                Cell::new(idx / cols, idx % cols),
                costs[idx]
            )));
        }
        Ok(Self { rows, cols, costs })
    }

    /// Grid where every cell has the same cost.
    pub fn uniform(rows: usize, cols: usize, cost: f64) -> Result<Self> {
        let len = rows.checked_mul(cols).ok_or_else(|| {
            RouteError::InvalidGrid(format!("dimensions {rows}x{cols} overflow"))
        })?;
        Self::new(rows, cols, vec![cost; len])
    }

    /// Build from nested rows; every row must have the same length.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let cols = rows.first().map(|row| row.len()).unwrap_or(0);
        if let Some(bad) = rows.iter().position(|row| row.len() != cols) {
            return Err(RouteError::InvalidGrid(format!(
                "row {bad} has {} columns, expected {cols}",
                rows[bad].len()
            )));
        }
        Self::new(rows.len(), cols, rows.concat())
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn len(&self) -> usize {
        self.costs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.costs.is_empty()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.row < self.rows && cell.col < self.cols
    }

    /// Row-major index of `cell`, or OutOfBounds.
    pub fn index(&self, cell: Cell) -> Result<usize> {
        if !self.contains(cell) {
            return Err(RouteError::OutOfBounds {
                cell,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(cell.row * self.cols + cell.col)
    }

    pub fn cell_at(&self, index: usize) -> Cell {
        Cell::new(index / self.cols, index % self.cols)
    }

    pub fn cost(&self, cell: Cell) -> Result<f64> {
        Ok(self.costs[self.index(cell)?])
    }

    pub fn is_blocked(&self, cell: Cell, policy: &BlockPolicy) -> Result<bool> {
        Ok(policy.blocks(self.cost(cell)?))
    }

    /// Smallest cost among cells the policy leaves open.
    pub fn min_cost(&self, policy: &BlockPolicy) -> Option<f64> {
        self.costs
            .iter()
            .copied()
            .filter(|cost| !policy.blocks(*cost))
            .min_by(f64::total_cmp)
    }

    /// Sum of move costs along `path`: each step pays the entered cell's cost,
    /// scaled by `diagonal_factor` for diagonal steps.
    pub fn path_cost(&self, path: &[Cell], diagonal_factor: f64) -> Result<f64> {
        let mut total = 0.0;
        for pair in path.windows(2) {
            let (from, to) = (pair[0], pair[1]);
            if !from.is_neighbor(to) {
                return Err(RouteError::InvalidGrid(format!(
                    "{from} and {to} are not 8-neighbors"
                )));
            }
            let scale = if from.row != to.row && from.col != to.col {
                diagonal_factor
            } else {
                1.0
            };
            total += self.cost(to)? * scale;
        }
        Ok(total)
    }
}
