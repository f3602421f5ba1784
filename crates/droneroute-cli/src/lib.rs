//! Droneroute CLI - command line collaborators for the routing core.
//!
//! This crate provides the binaries:
//! - find_path: single search with run statistics
//! - plan_deliveries: concurrent hub/pickup/dropoff planning for a fleet
//! - generate_cost_grid: slope-based cost grid from an elevation raster

pub mod config;
pub mod dispatch;
pub mod job;
pub mod logging;
pub mod record;
pub mod scenarios;
pub mod stats;

pub use config::Config;
pub use dispatch::{dispatch_fleet, DeliveryOutcome, DispatchError, FailedDelivery, FleetReport};
pub use job::{load_grid, load_job, DeliveryJob, JobFile};
pub use logging::init_tracing;
pub use record::{leg_records, LegRecord};
pub use stats::PathStats;
