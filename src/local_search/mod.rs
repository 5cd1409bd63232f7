//! Local search for improving routes.
//!
//! - [`two_opt()`]: Depot-anchored intra-route 2-opt edge reversal

mod two_opt;

pub use two_opt::{route_distance, two_opt, TwoOptStats, DEFAULT_MAX_PASSES};
