//! Top-level driver: validates configuration, runs independent GA
//! restarts in parallel and keeps the best tour, or sweeps a range of
//! fixed fleet sizes.

mod config;
mod driver;

pub use config::{default_fleet_range, OptimizerConfig};
pub use driver::{Optimizer, OptimizerResult, RunSummary};
