//! Distance and travel time matrix.
//!
//! Provides the dense, immutable matrix every other component reads from.

mod matrix;

pub use matrix::{TravelEdge, TravelMatrix, DEPOT};
