//! Multi-leg route planning over a shared cost grid.
//!
//! A delivery is flown as hub -> pickup -> dropoff -> hub in that fixed
//! order. Each leg is searched independently; a leg with no path fails the
//! whole route.

use crate::error::{Result, RouteError};
use crate::grid::CostGrid;
use crate::heuristic::euclidean;
use crate::models::{Cell, DeliveryOrder, Drone, LegKind, Stop};
use crate::search::{SearchConfig, SearchEngine};
use crate::simplify::simplify;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteConfig {
    pub search: SearchConfig,
    /// Ground distance covered by one grid cell, in meters.
    pub cell_resolution_m: f64,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            search: SearchConfig::default(),
            cell_resolution_m: 30.0,
        }
    }
}

impl RouteConfig {
    pub fn validate(&self) -> Result<()> {
        self.search.validate()?;
        if !self.cell_resolution_m.is_finite() || self.cell_resolution_m <= 0.0 {
            return Err(RouteError::InvalidConfig(format!(
                "cell_resolution_m must be positive, got {}",
                self.cell_resolution_m
            )));
        }
        Ok(())
    }
}

/// One searched leg, ready for handoff to reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegPlan {
    /// 1-based position in the route.
    pub leg_number: usize,
    pub kind: LegKind,
    pub origin: Stop,
    pub destination: Stop,
    /// Turning-point waypoints.
    pub path: Vec<Cell>,
    /// Cell count of the unsimplified path.
    pub path_length: usize,
    pub total_cost: f64,
    /// Straight-line origin-destination distance in meters.
    pub distance_m: f64,
    pub estimated_time_s: f64,
    pub steps_taken: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutePlan {
    pub legs: Vec<LegPlan>,
}

impl RoutePlan {
    pub fn total_cost(&self) -> f64 {
        self.legs.iter().map(|leg| leg.total_cost).sum()
    }

    pub fn total_distance_m(&self) -> f64 {
        self.legs.iter().map(|leg| leg.distance_m).sum()
    }

    pub fn total_time_s(&self) -> f64 {
        self.legs.iter().map(|leg| leg.estimated_time_s).sum()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryPlan {
    pub drone_id: String,
    pub order_id: String,
    pub route: RoutePlan,
}

/// Search every consecutive pair of `stops`.
///
/// `kinds` labels each leg; missing labels fall back to [`LegKind::Transit`].
pub fn plan_route(
    grid: &CostGrid,
    stops: &[Stop],
    kinds: &[LegKind],
    speed_mps: f64,
    config: &RouteConfig,
) -> Result<RoutePlan> {
    if stops.len() < 2 {
        return Err(RouteError::TooFewStops(stops.len()));
    }
    config.validate()?;
    if !speed_mps.is_finite() || speed_mps <= 0.0 {
        return Err(RouteError::InvalidConfig(format!(
            "speed_mps must be positive, got {speed_mps}"
        )));
    }

    let engine = SearchEngine::new(grid, config.search.clone());
    let mut legs = Vec::with_capacity(stops.len() - 1);

    for (idx, pair) in stops.windows(2).enumerate() {
        let leg_number = idx + 1;
        let (origin, destination) = (&pair[0], &pair[1]);
        let result = engine.search(origin.cell, destination.cell)?;

        let Some(raw_path) = result.path else {
            warn!(
                "leg {} {} -> {} has no path after {} steps",
                leg_number, origin.name, destination.name, result.steps_taken
            );
            return Err(RouteError::NoPathFound {
                leg: leg_number,
                from: origin.cell,
                to: destination.cell,
            });
        };

        let distance_m = euclidean(origin.cell, destination.cell) * config.cell_resolution_m;
        let leg = LegPlan {
            leg_number,
            kind: kinds.get(idx).copied().unwrap_or(LegKind::Transit),
            origin: origin.clone(),
            destination: destination.clone(),
            path: simplify(&raw_path),
            path_length: raw_path.len(),
            total_cost: result.total_cost,
            distance_m,
            estimated_time_s: distance_m / speed_mps,
            steps_taken: result.steps_taken,
        };
        debug!(
            "leg {} {} -> {} cost={:.2} cells={} waypoints={}",
            leg_number,
            origin.name,
            destination.name,
            leg.total_cost,
            leg.path_length,
            leg.path.len()
        );
        legs.push(leg);
    }

    Ok(RoutePlan { legs })
}

/// Plan the hub -> pickup -> dropoff -> hub round trip for one drone.
pub fn plan_delivery(
    grid: &CostGrid,
    hub: &Stop,
    order: &DeliveryOrder,
    drone: &Drone,
    config: &RouteConfig,
) -> Result<DeliveryPlan> {
    let stops = [
        hub.clone(),
        order.pickup.clone(),
        order.dropoff.clone(),
        hub.clone(),
    ];
    let kinds = [LegKind::Outbound, LegKind::Delivery, LegKind::Return];
    let route = plan_route(grid, &stops, &kinds, drone.speed_mps, config)?;

    info!(
        "drone {} order {} planned: cost={:.2} distance={:.0}m eta={:.0}s",
        drone.id,
        order.order_id,
        route.total_cost(),
        route.total_distance_m(),
        route.total_time_s()
    );

    Ok(DeliveryPlan {
        drone_id: drone.id.clone(),
        order_id: order.order_id.clone(),
        route,
    })
}

/// Assign orders to drones one-to-one in list order. Extra drones or extra
/// orders are left unassigned.
pub fn pair_fleet<'a>(
    drones: &'a [Drone],
    orders: &'a [DeliveryOrder],
) -> Vec<(&'a Drone, &'a DeliveryOrder)> {
    if drones.len() != orders.len() {
        debug!(
            "pairing {} drones with {} orders, {} left unassigned",
            drones.len(),
            orders.len(),
            drones.len().abs_diff(orders.len())
        );
    }
    drones.iter().zip(orders.iter()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::SQRT_2;

    fn order(pickup: Cell, dropoff: Cell) -> DeliveryOrder {
        DeliveryOrder {
            order_id: "order-1".to_string(),
            pickup: Stop::new("store", pickup),
            dropoff: Stop::new("customer", dropoff),
        }
    }

    fn drone(speed_mps: f64) -> Drone {
        Drone {
            id: "drone-1".to_string(),
            speed_mps,
        }
    }

    #[test]
    fn delivery_has_three_legs_back_to_hub() {
        let grid = CostGrid::uniform(6, 6, 1.0).unwrap();
        let hub = Stop::new("hub", Cell::new(0, 0));
        let config = RouteConfig {
            cell_resolution_m: 10.0,
            ..RouteConfig::default()
        };
        let plan = plan_delivery(
            &grid,
            &hub,
            &order(Cell::new(0, 4), Cell::new(3, 4)),
            &drone(5.0),
            &config,
        )
        .unwrap();

        let legs = &plan.route.legs;
        assert_eq!(legs.len(), 3);
        assert_eq!(
            legs.iter().map(|l| l.kind).collect::<Vec<_>>(),
            vec![LegKind::Outbound, LegKind::Delivery, LegKind::Return]
        );
        assert_eq!(legs[2].destination.cell, hub.cell);

        assert_eq!(legs[0].total_cost, 4.0);
        assert_eq!(legs[0].path, vec![Cell::new(0, 0), Cell::new(0, 4)]);
        assert_eq!(legs[0].path_length, 5);
        assert_eq!(legs[0].distance_m, 40.0);
        assert_eq!(legs[0].estimated_time_s, 8.0);

        assert_eq!(legs[1].distance_m, 30.0);
        assert_eq!(legs[2].distance_m, 50.0);
        assert!((legs[2].total_cost - (3.0 * SQRT_2 + 1.0)).abs() < 1e-9);
    }

    #[test]
    fn blocked_leg_fails_whole_delivery() {
        let mut rows = vec![vec![1.0; 5]; 5];
        rows[2] = vec![100.0; 5];
        let grid = CostGrid::from_rows(&rows).unwrap();
        let hub = Stop::new("hub", Cell::new(0, 0));

        let err = plan_delivery(
            &grid,
            &hub,
            &order(Cell::new(1, 4), Cell::new(4, 4)),
            &drone(10.0),
            &RouteConfig::default(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            RouteError::NoPathFound {
                leg: 2,
                from: Cell::new(1, 4),
                to: Cell::new(4, 4)
            }
        );
    }

    #[test]
    fn rejects_single_stop_and_bad_speed() {
        let grid = CostGrid::uniform(2, 2, 1.0).unwrap();
        let stops = [Stop::new("a", Cell::new(0, 0))];
        assert_eq!(
            plan_route(&grid, &stops, &[], 1.0, &RouteConfig::default()).unwrap_err(),
            RouteError::TooFewStops(1)
        );

        let stops = [
            Stop::new("a", Cell::new(0, 0)),
            Stop::new("b", Cell::new(1, 1)),
        ];
        let err = plan_route(&grid, &stops, &[], 0.0, &RouteConfig::default()).unwrap_err();
        assert!(matches!(err, RouteError::InvalidConfig(_)));
    }

    #[test]
    fn unlabelled_legs_are_transit() {
        let grid = CostGrid::uniform(3, 3, 1.0).unwrap();
        let stops = [
            Stop::new("a", Cell::new(0, 0)),
            Stop::new("b", Cell::new(0, 2)),
            Stop::new("c", Cell::new(2, 2)),
        ];
        let plan = plan_route(&grid, &stops, &[], 2.0, &RouteConfig::default()).unwrap();
        assert!(plan.legs.iter().all(|l| l.kind == LegKind::Transit));
        assert_eq!(plan.total_cost(), 4.0);
    }

    #[test]
    fn pairing_truncates_to_shorter_list() {
        let drones = vec![drone(5.0), drone(6.0), drone(7.0)];
        let orders = vec![order(Cell::new(0, 1), Cell::new(1, 1))];
        let pairs = pair_fleet(&drones, &orders);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].0.speed_mps, 5.0);
    }
}
