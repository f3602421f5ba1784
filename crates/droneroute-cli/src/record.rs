//! Flat per-leg records handed to whatever stores or reports deliveries.

use chrono::{DateTime, NaiveDate, Utc};
use droneroute_core::{Cell, DeliveryPlan, LegKind};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegRecord {
    pub flight_id: Uuid,
    pub drone_id: String,
    pub order_id: String,
    /// "leg1", "leg2", ...
    pub leg_type: String,
    pub kind: LegKind,
    pub origin: String,
    pub destination: String,
    pub start_cell: Cell,
    pub end_cell: Cell,
    pub cost: f64,
    pub path_length: usize,
    pub waypoints: Vec<Cell>,
    pub distance_m: f64,
    pub duration_seconds: f64,
    pub steps_taken: usize,
    pub timestamp: DateTime<Utc>,
    pub log_date: NaiveDate,
}

/// One record per leg, all stamped with the same planning time.
pub fn leg_records(plan: &DeliveryPlan, planned_at: DateTime<Utc>) -> Vec<LegRecord> {
    plan.route
        .legs
        .iter()
        .map(|leg| LegRecord {
            flight_id: Uuid::new_v4(),
            drone_id: plan.drone_id.clone(),
            order_id: plan.order_id.clone(),
            leg_type: format!("leg{}", leg.leg_number),
            kind: leg.kind,
            origin: leg.origin.name.clone(),
            destination: leg.destination.name.clone(),
            start_cell: leg.origin.cell,
            end_cell: leg.destination.cell,
            cost: leg.total_cost,
            path_length: leg.path_length,
            waypoints: leg.path.clone(),
            distance_m: leg.distance_m,
            duration_seconds: leg.estimated_time_s,
            steps_taken: leg.steps_taken,
            timestamp: planned_at,
            log_date: planned_at.date_naive(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use droneroute_core::{plan_delivery, CostGrid, DeliveryOrder, Drone, RouteConfig, Stop};

    #[test]
    fn one_record_per_leg_with_unique_flight_ids() {
        let grid = CostGrid::uniform(4, 4, 1.0).unwrap();
        let plan = plan_delivery(
            &grid,
            &Stop::new("hub", Cell::new(0, 0)),
            &DeliveryOrder {
                order_id: "o-9".to_string(),
                pickup: Stop::new("store", Cell::new(3, 0)),
                dropoff: Stop::new("home", Cell::new(3, 3)),
            },
            &Drone {
                id: "D7".to_string(),
                speed_mps: 10.0,
            },
            &RouteConfig::default(),
        )
        .unwrap();

        let now = Utc::now();
        let records = leg_records(&plan, now);
        assert_eq!(records.len(), 3);
        assert_eq!(
            records.iter().map(|r| r.leg_type.as_str()).collect::<Vec<_>>(),
            vec!["leg1", "leg2", "leg3"]
        );
        assert_ne!(records[0].flight_id, records[1].flight_id);
        assert!(records.iter().all(|r| r.drone_id == "D7" && r.timestamp == now));
        assert_eq!(records[1].origin, "store");
        assert_eq!(records[2].end_cell, Cell::new(0, 0));
    }
}
