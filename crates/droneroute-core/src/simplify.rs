//! Collapse straight runs of a grid path into turning-point waypoints.

use crate::models::Cell;

/// Keep the endpoints and every interior cell where the travel direction
/// changes. Paths of two cells or fewer come back unchanged.
///
/// This only thins waypoints; the cost of a route is always measured on the
/// unsimplified path.
pub fn simplify(path: &[Cell]) -> Vec<Cell> {
    if path.len() <= 2 {
        return path.to_vec();
    }

    let mut simplified = vec![path[0]];
    for window in path.windows(3) {
        let (prev, curr, next) = (window[0], window[1], window[2]);
        if direction(prev, curr) != direction(curr, next) {
            simplified.push(curr);
        }
    }
    simplified.push(path[path.len() - 1]);
    simplified
}

/// Step from `from` to `to` reduced to lowest terms, so a waypoint list
/// (where consecutive cells are no longer adjacent) simplifies to itself.
fn direction(from: Cell, to: Cell) -> (isize, isize) {
    let (dr, dc) = from.delta(to);
    let divisor = gcd(dr.unsigned_abs(), dc.unsigned_abs()).max(1) as isize;
    (dr / divisor, dc / divisor)
}

fn gcd(mut a: usize, mut b: usize) -> usize {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}
