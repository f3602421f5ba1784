//! Remaining-cost estimates for the grid search.

use crate::models::Cell;
use std::f64::consts::SQRT_2;

/// Straight-line distance between two cells in index space.
pub fn euclidean(a: Cell, b: Cell) -> f64 {
    let dr = a.row.abs_diff(b.row) as f64;
    let dc = a.col.abs_diff(b.col) as f64;
    dr.hypot(dc)
}

/// Euclidean estimate scaled so it never exceeds the true remaining cost.
///
/// A step of Euclidean length `d` costs at least `d * min_cost` on a straight
/// move and `d * min_cost * diagonal_factor / sqrt(2)` on a diagonal one. The
/// weight is the smaller of those ratios, capped at 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Heuristic {
    weight: f64,
}

impl Heuristic {
    pub fn new(min_cost: f64, diagonal_factor: f64) -> Self {
        let cost_floor = min_cost.clamp(0.0, 1.0);
        let diagonal_floor = (diagonal_factor / SQRT_2).clamp(0.0, 1.0);
        Self {
            weight: cost_floor * diagonal_floor,
        }
    }

    /// Plain Euclidean distance, admissible when every open cell costs >= 1.
    pub fn unit() -> Self {
        Self { weight: 1.0 }
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn estimate(&self, from: Cell, goal: Cell) -> f64 {
        self.weight * euclidean(from, goal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn euclidean_is_symmetric() {
        let a = Cell::new(0, 0);
        let b = Cell::new(3, 4);
        assert_eq!(euclidean(a, b), 5.0);
        assert_eq!(euclidean(b, a), 5.0);
    }

    #[test]
    fn weight_is_one_for_unit_floor() {
        let h = Heuristic::new(1.0, SQRT_2);
        assert_eq!(h.weight(), 1.0);
        assert_eq!(h.estimate(Cell::new(0, 0), Cell::new(0, 3)), 3.0);
    }

    #[test]
    fn weight_shrinks_for_cheap_cells_and_short_diagonals() {
        assert_eq!(Heuristic::new(0.25, SQRT_2).weight(), 0.25);
        assert_eq!(Heuristic::new(7.0, SQRT_2).weight(), 1.0);
        let h = Heuristic::new(1.0, 1.414);
        assert!(h.weight() < 1.0 && h.weight() > 0.9998);
    }
}
