//! Error type for configuration and matrix construction.
//!
//! Every variant is a configuration error: it is raised before any
//! generation runs and no partial result is produced.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RoutingError {
    #[error("Population size must be at least 2, got {0}")]
    PopulationSize(usize),

    #[error("Elite fraction must be in [0, 1), got {0}")]
    EliteFraction(f64),

    #[error("Mutation probability must be in [0, 1], got {0}")]
    MutationRate(f64),

    #[error("Mutation weights must be finite, non-negative and not all zero")]
    MutationWeights,

    #[error("Generation cap must be positive")]
    GenerationCap,

    #[error("Time budget must be a positive number of seconds, got {0}")]
    TimeBudget(f64),

    #[error("Duration limit must be positive and finite, got {0}")]
    DurationLimit(f64),

    #[error("Service time must be non-negative and finite, got {0}")]
    ServiceTime(f64),

    #[error("Number of restarts must be at least 1")]
    Restarts,

    #[error("Invalid fleet size range {min}..={max} for {customers} customers")]
    FleetRange {
        min: usize,
        max: usize,
        customers: usize,
    },

    #[error("Point set has no customers")]
    EmptyPointSet,

    #[error("Matrix data has {actual} entries, expected {expected}")]
    MatrixShape { expected: usize, actual: usize },

    #[error("Invalid {kind} value {value} for pair ({from}, {to})")]
    MatrixValue {
        kind: &'static str,
        from: usize,
        to: usize,
        value: f64,
    },

    #[error("No travel data for pair ({from}, {to})")]
    UndefinedPair { from: usize, to: usize },
}

pub type Result<T> = std::result::Result<T, RoutingError>;
