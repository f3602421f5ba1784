//! Least-cost drone routing over a terrain cost grid.
//!
//! The core takes an already-materialized [`CostGrid`] and grid-index
//! [`Cell`]s, runs a weighted 8-connected A* search, and returns the path,
//! its cost and the number of settled cells. Raster ingestion, projections,
//! persistence and plotting all live outside this crate.

pub mod cost_surface;
pub mod error;
pub mod grid;
pub mod heuristic;
pub mod models;
pub mod reconstruct;
pub mod route;
pub mod search;
pub mod simplify;

pub use cost_surface::{cost_grid_from_elevation, ElevationRaster};
pub use error::{EndpointRole, Result, RouteError};
pub use grid::{BlockPolicy, CostGrid, DEFAULT_BLOCK_THRESHOLD};
pub use heuristic::{euclidean, Heuristic};
pub use models::{Cell, DeliveryOrder, Drone, LegKind, Stop};
pub use reconstruct::reconstruct_path;
pub use route::{
    pair_fleet, plan_delivery, plan_route, DeliveryPlan, LegPlan, RouteConfig, RoutePlan,
};
pub use search::{
    search, SearchConfig, SearchEngine, SearchOutcome, SearchResult, SearchRun, SearchState,
};
pub use simplify::simplify;
