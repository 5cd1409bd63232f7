//! Domain model types for delivery routing.
//!
//! Routes are depot-anchored stop sequences with their distance and
//! duration; a solution is the ordered set of routes handed to reporting.

mod route;
mod solution;

pub use route::Route;
pub use solution::{FleetSweep, Solution};
