//! Route and giant-tour evaluation.
//!
//! - [`RouteEvaluator`]: distance, duration and feasibility of one route
//! - [`FitnessEvaluator`]: decodes a giant tour into routes and scores it

mod evaluator;
mod fitness;

pub use evaluator::{RouteEvaluator, RouteLimits};
pub use fitness::{FitnessEvaluator, FitnessStrategy, Penalty};
