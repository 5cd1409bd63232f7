//! Optimizer configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Result, RoutingError};
use crate::evaluation::{FitnessStrategy, Penalty, RouteLimits};
use crate::ga::{GaConfig, MutationWeights};
use crate::local_search::DEFAULT_MAX_PASSES;

/// Everything an [`Optimizer`](super::Optimizer) needs besides the matrix.
///
/// Deserializes from a partial document; missing fields take their
/// defaults.
///
/// # Examples
///
/// ```
/// use delivery_ga::evaluation::RouteLimits;
/// use delivery_ga::optimizer::OptimizerConfig;
///
/// let config = OptimizerConfig::default()
///     .with_limits(RouteLimits::new(120.0, 2.0))
///     .with_restarts(5);
/// assert!(config.validate(10).is_ok());
/// assert!(config.with_restarts(0).validate(10).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    pub ga: GaConfig,
    pub limits: RouteLimits,
    /// Independent GA runs; the best one wins.
    pub restarts: usize,
    pub strategy: FitnessStrategy,
    /// Over-limit penalty for fixed-fleet blocks.
    pub penalty: Penalty,
    pub mutation_weights: MutationWeights,
    /// 2-opt every child's whole permutation before evaluation.
    pub polish_offspring: bool,
    /// Cap on 2-opt passes per route.
    pub two_opt_max_passes: usize,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            ga: GaConfig::default(),
            limits: RouteLimits::default(),
            restarts: 3,
            strategy: FitnessStrategy::Resplit,
            penalty: Penalty::default(),
            mutation_weights: MutationWeights::default(),
            polish_offspring: false,
            two_opt_max_passes: DEFAULT_MAX_PASSES,
        }
    }
}

impl OptimizerConfig {
    pub fn with_ga(mut self, ga: GaConfig) -> Self {
        self.ga = ga;
        self
    }

    pub fn with_limits(mut self, limits: RouteLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_restarts(mut self, restarts: usize) -> Self {
        self.restarts = restarts;
        self
    }

    pub fn with_strategy(mut self, strategy: FitnessStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_penalty(mut self, penalty: Penalty) -> Self {
        self.penalty = penalty;
        self
    }

    pub fn with_mutation_weights(mut self, weights: MutationWeights) -> Self {
        self.mutation_weights = weights;
        self
    }

    pub fn with_polish(mut self, polish: bool) -> Self {
        self.polish_offspring = polish;
        self
    }

    pub fn with_two_opt_max_passes(mut self, passes: usize) -> Self {
        self.two_opt_max_passes = passes;
        self
    }

    /// Checks every parameter against an instance with `customers` customers.
    pub fn validate(&self, customers: usize) -> Result<()> {
        if customers == 0 {
            return Err(RoutingError::EmptyPointSet);
        }
        self.ga.validate()?;
        self.limits.validate()?;
        self.mutation_weights.validate()?;
        if self.restarts == 0 {
            return Err(RoutingError::Restarts);
        }
        self.strategy.validate(customers)
    }
}

/// A fleet range is valid when `1 <= min <= max <= customers`.
pub(crate) fn validate_fleet(min: usize, max: usize, customers: usize) -> Result<()> {
    if min == 0 || min > max || max > customers {
        return Err(RoutingError::FleetRange {
            min,
            max,
            customers,
        });
    }
    Ok(())
}

/// Fleet sizes swept when the caller gives no range, from the point
/// count `n` (depot included): `max(1, n/10) ..= max(min, n/5)`.
///
/// The upper end never exceeds the customer count `n - 1`.
pub fn default_fleet_range(point_count: usize) -> std::ops::RangeInclusive<usize> {
    let min = (point_count / 10).max(1);
    min..=(point_count / 5).max(min)
}
