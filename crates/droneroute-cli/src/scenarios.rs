//! Built-in delivery scenarios for trying the planner without a job file.

use crate::job::DeliveryJob;
use anyhow::Result;
use droneroute_core::{Cell, CostGrid, DeliveryOrder, Drone, Stop};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const SIZE: usize = 64;
const WALL_COST: f64 = 100.0;

/// A named job with a short description of what it exercises.
pub struct Scenario {
    pub name: String,
    pub description: String,
    pub job: DeliveryJob,
}

fn fleet() -> Vec<Drone> {
    vec![
        Drone {
            id: "DRONE001".to_string(),
            speed_mps: 12.0,
        },
        Drone {
            id: "DRONE002".to_string(),
            speed_mps: 15.0,
        },
    ]
}

fn orders() -> Vec<DeliveryOrder> {
    vec![
        DeliveryOrder {
            order_id: "order-001".to_string(),
            pickup: Stop::new("north-store", Cell::new(6, 50)),
            dropoff: Stop::new("south-customer", Cell::new(58, 40)),
        },
        DeliveryOrder {
            order_id: "order-002".to_string(),
            pickup: Stop::new("west-store", Cell::new(10, 4)),
            dropoff: Stop::new("east-customer", Cell::new(37, 60)),
        },
    ]
}

fn hub() -> Stop {
    Stop::new("central-hub", Cell::new(20, 2))
}

fn scenario(name: &str, description: &str, costs: Vec<f64>) -> Result<Scenario> {
    Ok(Scenario {
        name: name.to_string(),
        description: description.to_string(),
        job: DeliveryJob {
            hub: hub(),
            drones: fleet(),
            orders: orders(),
            grid: CostGrid::new(SIZE, SIZE, costs)?,
        },
    })
}

/// Flat terrain, every cell costs 1.
pub fn create_open_field_scenario() -> Result<Scenario> {
    scenario(
        "open_field",
        "Uniform cost terrain; every leg costs its octile distance",
        vec![1.0; SIZE * SIZE],
    )
}

/// A steep east-west ridge with one low pass near the west edge.
pub fn create_ridge_scenario() -> Result<Scenario> {
    let mut costs = vec![1.0; SIZE * SIZE];
    for row in 28..36 {
        for col in 0..SIZE {
            let idx = row * SIZE + col;
            costs[idx] = if (3..7).contains(&col) { 2.0 } else { 9.0 };
        }
    }
    scenario(
        "ridge",
        "Costly ridge across the map with a cheap pass in the west",
        costs,
    )
}

/// An impassable wall cutting the map in two; deliveries crossing it fail.
pub fn create_wall_scenario() -> Result<Scenario> {
    let mut costs = vec![1.0; SIZE * SIZE];
    for col in 0..SIZE {
        costs[40 * SIZE + col] = WALL_COST;
    }
    scenario(
        "wall",
        "Unbroken wall at row 40; any leg crossing it has no path",
        costs,
    )
}

/// Random rolling terrain with scattered no-fly cells, reproducible by seed.
pub fn create_scatter_scenario(seed: u64) -> Result<Scenario> {
    let mut rng = StdRng::seed_from_u64(seed);
    let reserved: Vec<Cell> = std::iter::once(hub().cell)
        .chain(orders().iter().flat_map(|o| [o.pickup.cell, o.dropoff.cell]))
        .collect();

    let costs = (0..SIZE * SIZE)
        .map(|idx| {
            let cell = Cell::new(idx / SIZE, idx % SIZE);
            if !reserved.contains(&cell) && rng.random_bool(0.15) {
                WALL_COST
            } else {
                rng.random_range(1.0..10.0)
            }
        })
        .collect();
    scenario(
        "scatter",
        "Random 1-10 costs with 15% blocked cells",
        costs,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scatter_is_reproducible_and_keeps_stops_open() {
        let a = create_scatter_scenario(11).unwrap();
        let b = create_scatter_scenario(11).unwrap();
        assert_eq!(a.job.grid, b.job.grid);
        let grid = &a.job.grid;
        assert!(grid.cost(a.job.hub.cell).unwrap() < WALL_COST);
        for order in &a.job.orders {
            assert!(grid.cost(order.pickup.cell).unwrap() < WALL_COST);
            assert!(grid.cost(order.dropoff.cell).unwrap() < WALL_COST);
        }
    }

    #[test]
    fn ridge_pass_is_cheap() {
        let s = create_ridge_scenario().unwrap();
        assert_eq!(s.job.grid.cost(Cell::new(30, 4)).unwrap(), 2.0);
        assert_eq!(s.job.grid.cost(Cell::new(30, 40)).unwrap(), 9.0);
    }
}
