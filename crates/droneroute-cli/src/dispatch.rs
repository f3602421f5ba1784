//! Concurrent delivery planning for a whole fleet.
//!
//! Each drone's round trip runs on the blocking pool against one shared,
//! read-only grid.

use crate::record::{leg_records, LegRecord};
use chrono::{DateTime, Utc};
use droneroute_core::{
    pair_fleet, plan_delivery, CostGrid, DeliveryOrder, DeliveryPlan, Drone, RouteConfig,
    RouteError, Stop,
};
use std::sync::Arc;

#[derive(Debug)]
pub struct DeliveryOutcome {
    pub drone_id: String,
    pub order_id: String,
    pub result: Result<DeliveryPlan, DispatchError>,
}

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error(transparent)]
    Route(#[from] RouteError),
    #[error("planning task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Plan every drone/order pair concurrently. Outcomes come back in fleet
/// order; a failed delivery does not affect the others.
pub async fn dispatch_fleet(
    grid: Arc<CostGrid>,
    hub: Stop,
    drones: &[Drone],
    orders: &[DeliveryOrder],
    config: RouteConfig,
) -> Vec<DeliveryOutcome> {
    let pairs = pair_fleet(drones, orders);
    tracing::info!("Dispatching {} deliveries", pairs.len());

    let mut handles = Vec::with_capacity(pairs.len());
    for (drone, order) in pairs {
        let grid = Arc::clone(&grid);
        let hub = hub.clone();
        let config = config.clone();
        let drone = drone.clone();
        let order = order.clone();
        let ids = (drone.id.clone(), order.order_id.clone());
        let handle = tokio::task::spawn_blocking(move || {
            plan_delivery(&grid, &hub, &order, &drone, &config)
        });
        handles.push((ids, handle));
    }

    let mut outcomes = Vec::with_capacity(handles.len());
    for ((drone_id, order_id), handle) in handles {
        let result = match handle.await {
            Ok(Ok(plan)) => Ok(plan),
            Ok(Err(err)) => Err(DispatchError::Route(err)),
            Err(err) => Err(DispatchError::Join(err)),
        };
        if let Err(err) = &result {
            tracing::warn!("Delivery {} for drone {} failed: {}", order_id, drone_id, err);
        }
        outcomes.push(DeliveryOutcome {
            drone_id,
            order_id,
            result,
        });
    }
    outcomes
}

/// A delivery that produced no legs.
#[derive(Debug, Clone, PartialEq)]
pub struct FailedDelivery {
    pub drone_id: String,
    pub order_id: String,
    pub reason: String,
}

/// Leg records of every planned delivery plus the deliveries that failed.
#[derive(Debug, Clone)]
pub struct FleetReport {
    pub records: Vec<LegRecord>,
    pub planned: usize,
    pub failures: Vec<FailedDelivery>,
}

impl FleetReport {
    /// Flatten outcomes into records, all stamped with `planned_at`. Failed
    /// deliveries contribute no partial legs.
    pub fn from_outcomes(outcomes: &[DeliveryOutcome], planned_at: DateTime<Utc>) -> Self {
        let mut report = Self {
            records: Vec::new(),
            planned: 0,
            failures: Vec::new(),
        };
        for outcome in outcomes {
            match &outcome.result {
                Ok(plan) => {
                    report.planned += 1;
                    report.records.extend(leg_records(plan, planned_at));
                }
                Err(err) => report.failures.push(FailedDelivery {
                    drone_id: outcome.drone_id.clone(),
                    order_id: outcome.order_id.clone(),
                    reason: err.to_string(),
                }),
            }
        }
        report
    }

    pub fn total(&self) -> usize {
        self.planned + self.failures.len()
    }

    /// Fails when any delivery produced no legs.
    pub fn ensure_complete(&self) -> anyhow::Result<()> {
        if !self.failures.is_empty() {
            anyhow::bail!("{} of {} deliveries failed", self.failures.len(), self.total());
        }
        Ok(())
    }
}
