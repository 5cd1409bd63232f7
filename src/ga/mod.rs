//! Genetic algorithm over giant tours.
//!
//! - [`GaProblem`], [`Individual`]: contract between the engine and an encoding
//! - [`GaRunner`]: generational loop with elitism and stagnation stop
//! - [`GiantTour`]: permutation chromosome encoding all customers
//! - [`split`]: greedy duration-bounded segmenter with recursive resplit
//! - [`RoutingGaProblem`]: [`GaProblem`] implementation for delivery routing

mod chromosome;
mod config;
mod operators;
mod problem;
mod runner;
pub mod split;
mod types;

pub use chromosome::GiantTour;
pub use config::GaConfig;
pub use operators::{
    order_crossover, order_crossover_with_cuts, relocate, relocate_mutation, reverse_mutation,
    swap_mutation, Mutation, MutationWeights,
};
pub use problem::RoutingGaProblem;
pub use runner::{GaResult, GaRunner, StopReason};
pub use split::{split_blocks, Segmenter};
pub use types::{GaProblem, Individual};
