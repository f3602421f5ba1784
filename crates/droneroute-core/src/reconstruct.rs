//! Turns a finished search's predecessor links into an ordered path.

use crate::error::{Result, RouteError};
use crate::models::Cell;
use crate::search::SearchState;

/// Walk predecessors from `goal` back to `start` and return the path in
/// start-to-goal order, both ends included.
///
/// Fails with [`RouteError::Unreachable`] if `goal` was never settled or the
/// predecessor chain breaks before reaching `start`.
pub fn reconstruct_path(state: &SearchState, start: Cell, goal: Cell) -> Result<Vec<Cell>> {
    if !state.is_visited(goal) {
        return Err(RouteError::Unreachable(goal));
    }

    let limit = state.visited_count();
    let mut path = Vec::new();
    let mut current = goal;
    while current != start {
        if path.len() > limit {
            return Err(RouteError::Unreachable(goal));
        }
        path.push(current);
        current = state
            .predecessor(current)
            .ok_or(RouteError::Unreachable(current))?;
    }
    path.push(start);
    path.reverse();
    Ok(path)
}
