//! # delivery-ga
//!
//! Delivery route optimization under a per-route duration limit, using a
//! genetic algorithm over giant tours with greedy segmentation and 2-opt.
//!
//! A single depot (point 0) serves customers `1..N`. Each truck leaves the
//! depot, visits its stops, spends a fixed service time at each and drives
//! back; a route's duration must not exceed the limit. The optimizer
//! minimizes total distance.
//!
//! ## Modules
//!
//! - [`distance`]: Distance and travel time matrix
//! - [`models`]: Route and solution report types
//! - [`evaluation`]: Route duration/distance and giant-tour fitness
//! - [`local_search`]: Depot-anchored 2-opt
//! - [`ga`]: Genetic algorithm engine, operators and segmenter
//! - [`optimizer`]: Restarts and fixed-fleet sweeps
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use delivery_ga::distance::TravelMatrix;
//! use delivery_ga::evaluation::RouteLimits;
//! use delivery_ga::ga::GaConfig;
//! use delivery_ga::optimizer::{Optimizer, OptimizerConfig};
//!
//! let points = [(0.0, 0.0), (2.0, 0.0), (0.0, 2.0), (-2.0, 0.0)];
//! let matrix = TravelMatrix::euclidean(&points, 1.0)?;
//! let config = OptimizerConfig::default()
//!     .with_limits(RouteLimits::new(10.0, 1.0))
//!     .with_restarts(1)
//!     .with_ga(GaConfig::default().with_population_size(20).with_max_generations(50).with_seed(9));
//!
//! let result = Optimizer::new(Arc::new(matrix), config)?.run();
//! for route in result.solution.routes() {
//!     assert!(route.total_duration() <= 10.0);
//! }
//! # Ok::<(), delivery_ga::RoutingError>(())
//! ```

pub mod distance;
pub mod error;
pub mod evaluation;
pub mod ga;
pub mod local_search;
pub mod models;
pub mod optimizer;

pub use error::{Result, RoutingError};
