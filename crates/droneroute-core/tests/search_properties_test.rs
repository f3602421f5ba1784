//! Property checks for the grid search on seeded random terrain.

use droneroute_core::{
    search, simplify, BlockPolicy, Cell, CostGrid, SearchConfig, SearchEngine, SearchOutcome,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::f64::consts::SQRT_2;
use std::sync::Arc;

const OFFSETS: [(isize, isize); 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),
];

fn random_grid(rng: &mut StdRng, rows: usize, cols: usize, min_cost: f64) -> CostGrid {
    let costs = (0..rows * cols)
        .map(|_| {
            if rng.random_bool(0.2) {
                100.0
            } else {
                rng.random_range(min_cost..9.0)
            }
        })
        .collect();
    CostGrid::new(rows, cols, costs).unwrap()
}

fn random_open_cell(rng: &mut StdRng, grid: &CostGrid) -> Cell {
    loop {
        let cell = Cell::new(
            rng.random_range(0..grid.rows()),
            rng.random_range(0..grid.cols()),
        );
        if grid.cost(cell).unwrap() < 100.0 {
            return cell;
        }
    }
}

/// Plain Dijkstra over the same move model. Costs are non-negative, so their
/// bit patterns order the same way as their values.
fn dijkstra(grid: &CostGrid, start: Cell, goal: Cell) -> Option<f64> {
    let mut dist = vec![f64::INFINITY; grid.len()];
    let mut heap = BinaryHeap::new();
    let start_idx = grid.index(start).unwrap();
    dist[start_idx] = 0.0;
    heap.push(Reverse((0f64.to_bits(), start_idx)));

    while let Some(Reverse((bits, idx))) = heap.pop() {
        let d = f64::from_bits(bits);
        if d > dist[idx] {
            continue;
        }
        let cell = grid.cell_at(idx);
        if cell == goal {
            return Some(d);
        }
        for (dr, dc) in OFFSETS {
            let Some(next) = cell.offset(dr, dc) else {
                continue;
            };
            let Ok(next_idx) = grid.index(next) else {
                continue;
            };
            let cost = grid.cost(next).unwrap();
            if cost >= 100.0 {
                continue;
            }
            let step = if dr != 0 && dc != 0 { cost * SQRT_2 } else { cost };
            if d + step < dist[next_idx] {
                dist[next_idx] = d + step;
                heap.push(Reverse(((d + step).to_bits(), next_idx)));
            }
        }
    }
    None
}

#[test]
fn matches_dijkstra_and_path_cost_on_random_grids() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let config = SearchConfig::default();

    for _ in 0..60 {
        let grid = random_grid(&mut rng, 18, 23, 1.0);
        let start = random_open_cell(&mut rng, &grid);
        let goal = random_open_cell(&mut rng, &grid);

        let result = search(&grid, start, goal, &config).unwrap();
        match (result.path.as_ref(), dijkstra(&grid, start, goal)) {
            (Some(path), Some(best)) => {
                assert_eq!(path.first(), Some(&start));
                assert_eq!(path.last(), Some(&goal));
                assert!((result.total_cost - best).abs() < 1e-6);
                let summed = grid.path_cost(path, SQRT_2).unwrap();
                assert!((result.total_cost - summed).abs() < 1e-6);
            }
            (None, None) => {
                assert!(result.total_cost.is_infinite());
                assert_eq!(result.outcome, SearchOutcome::Exhausted);
            }
            (found, reference) => panic!(
                "search and reference disagree: {:?} vs {:?}",
                found.map(|p| p.len()),
                reference
            ),
        }
    }
}

#[test]
fn stays_optimal_when_costs_drop_below_one() {
    let mut rng = StdRng::seed_from_u64(42);
    let config = SearchConfig::default();

    for _ in 0..40 {
        let grid = random_grid(&mut rng, 15, 15, 0.05);
        let start = random_open_cell(&mut rng, &grid);
        let goal = random_open_cell(&mut rng, &grid);

        let result = search(&grid, start, goal, &config).unwrap();
        if let Some(best) = dijkstra(&grid, start, goal) {
            assert!((result.total_cost - best).abs() < 1e-6);
        } else {
            assert!(result.path.is_none());
        }
    }
}

#[test]
fn exhausted_search_counts_every_reachable_cell() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut rows: Vec<Vec<f64>> = (0..9)
        .map(|_| (0..9).map(|_| rng.random_range(1.0..4.0)).collect())
        .collect();
    rows[4] = vec![250.0; 9];
    let grid = CostGrid::from_rows(&rows).unwrap();

    let run = SearchEngine::new(&grid, SearchConfig::default())
        .run(Cell::new(0, 0), Cell::new(8, 8))
        .unwrap();
    assert_eq!(run.outcome, SearchOutcome::Exhausted);
    assert_eq!(run.steps_taken, 36);
    assert_eq!(run.state.visited_count(), 36);
}

#[test]
fn simplified_paths_are_stable_subsequences() {
    let mut rng = StdRng::seed_from_u64(99);
    for _ in 0..30 {
        let grid = random_grid(&mut rng, 20, 20, 1.0);
        let start = random_open_cell(&mut rng, &grid);
        let goal = random_open_cell(&mut rng, &grid);
        let Some(path) = search(&grid, start, goal, &SearchConfig::default())
            .unwrap()
            .path
        else {
            continue;
        };

        let once = simplify(&path);
        assert_eq!(simplify(&once), once);
        assert!(once.len() <= path.len());
        assert_eq!(once.first(), path.first());
        assert_eq!(once.last(), path.last());

        let mut remaining = path.iter();
        for waypoint in &once {
            assert!(remaining.any(|cell| cell == waypoint));
        }
    }
}

#[test]
fn concrete_scenarios() {
    let grid = CostGrid::uniform(3, 3, 1.0).unwrap();
    let result = search(
        &grid,
        Cell::new(0, 0),
        Cell::new(2, 2),
        &SearchConfig::default(),
    )
    .unwrap();
    let path = result.path.unwrap();
    assert_eq!(path.len(), 3);
    assert_eq!(simplify(&path).len(), 2);
    assert!((result.total_cost - 2.0 * SQRT_2).abs() < 1e-12);

    let mut rows = vec![vec![1.0; 5]; 5];
    rows[2] = vec![100.0; 5];
    let walled = CostGrid::from_rows(&rows).unwrap();
    let result = search(
        &walled,
        Cell::new(0, 2),
        Cell::new(4, 2),
        &SearchConfig::with_threshold(100.0),
    )
    .unwrap();
    assert!(result.path.is_none());
    assert!(result.total_cost.is_infinite());

    // Raising the threshold opens the wall.
    let result = search(
        &walled,
        Cell::new(0, 2),
        Cell::new(4, 2),
        &SearchConfig {
            blocking: BlockPolicy::Threshold(f64::INFINITY),
            ..SearchConfig::default()
        },
    )
    .unwrap();
    assert!(result.found());
}

#[test]
fn searches_share_one_grid_across_threads() {
    let grid = Arc::new(CostGrid::uniform(40, 40, 1.0).unwrap());
    let goals = [Cell::new(39, 39), Cell::new(0, 39), Cell::new(39, 0), Cell::new(20, 5)];

    let costs: Vec<f64> = std::thread::scope(|scope| {
        let handles: Vec<_> = goals
            .iter()
            .map(|goal| {
                let grid = Arc::clone(&grid);
                scope.spawn(move || {
                    search(&grid, Cell::new(0, 0), *goal, &SearchConfig::default())
                        .unwrap()
                        .total_cost
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert!((costs[0] - 39.0 * SQRT_2).abs() < 1e-9);
    assert!((costs[1] - 39.0).abs() < 1e-9);
    assert!((costs[2] - 39.0).abs() < 1e-9);
    assert!((costs[3] - (5.0 * SQRT_2 + 15.0)).abs() < 1e-9);
}
