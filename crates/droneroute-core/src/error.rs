//! Error types for grid search and route planning.

use crate::models::Cell;
use thiserror::Error;

/// Which end of a search an endpoint error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointRole {
    Start,
    Goal,
}

impl std::fmt::Display for EndpointRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EndpointRole::Start => f.write_str("start"),
            EndpointRole::Goal => f.write_str("goal"),
        }
    }
}

/// Errors raised by the routing core.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RouteError {
    /// A supplied cell lies outside the grid.
    #[error("cell {cell} is outside the {rows}x{cols} grid")]
    OutOfBounds { cell: Cell, rows: usize, cols: usize },

    /// Start or goal sits on a blocked cell.
    #[error("{role} cell {cell} is blocked")]
    InvalidEndpoint { cell: Cell, role: EndpointRole },

    /// A leg of a multi-stop route has no traversable path.
    #[error("no path found for leg {leg} from {from} to {to}")]
    NoPathFound { leg: usize, from: Cell, to: Cell },

    /// Path reconstruction was asked for a cell the search never settled.
    #[error("cell {0} was never settled by the search")]
    Unreachable(Cell),

    /// Grid dimensions or costs are malformed.
    #[error("invalid grid: {0}")]
    InvalidGrid(String),

    /// Search or route configuration is out of range.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// A route needs at least two stops.
    #[error("route needs at least 2 stops, got {0}")]
    TooFewStops(usize),
}

/// Result type for routing operations.
pub type Result<T> = std::result::Result<T, RouteError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RouteError::OutOfBounds {
            cell: Cell::new(9, 1),
            rows: 5,
            cols: 5,
        };
        assert_eq!(format!("{err}"), "cell (9, 1) is outside the 5x5 grid");

        let err = RouteError::InvalidEndpoint {
            cell: Cell::new(0, 0),
            role: EndpointRole::Goal,
        };
        assert_eq!(format!("{err}"), "goal cell (0, 0) is blocked");
    }
}
