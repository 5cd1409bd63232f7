//! GA engine configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RoutingError};

/// Parameters of one GA run.
///
/// # Examples
///
/// ```
/// use delivery_ga::ga::GaConfig;
///
/// let config = GaConfig::default()
///     .with_population_size(50)
///     .with_max_generations(200)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// assert!(GaConfig::default().with_population_size(1).validate().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GaConfig {
    /// Number of individuals per generation (at least 2).
    pub population_size: usize,
    /// Generation cap.
    pub max_generations: usize,
    /// Probability that a child is mutated, in `[0, 1]`.
    pub mutation_rate: f64,
    /// Share of the ranked population copied unchanged, in `[0, 1)`.
    pub elite_fraction: f64,
    /// Stop once this many consecutive generations are exceeded without
    /// strict improvement.
    pub stagnation_limit: usize,
    /// Optional wall-clock budget in seconds, checked between generations.
    pub time_limit_secs: Option<f64>,
    /// Evaluate individuals on the rayon thread pool.
    pub parallel: bool,
    /// RNG seed; `None` draws one from the OS.
    pub seed: Option<u64>,
    /// Emit a progress event every this many generations (0 disables).
    pub log_interval: usize,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 400,
            max_generations: 10_000,
            mutation_rate: 0.1,
            elite_fraction: 0.35,
            stagnation_limit: 1_500,
            time_limit_secs: None,
            parallel: true,
            seed: None,
            log_interval: 500,
        }
    }
}

impl GaConfig {
    pub fn with_population_size(mut self, size: usize) -> Self {
        self.population_size = size;
        self
    }

    pub fn with_max_generations(mut self, generations: usize) -> Self {
        self.max_generations = generations;
        self
    }

    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate;
        self
    }

    pub fn with_elite_fraction(mut self, fraction: f64) -> Self {
        self.elite_fraction = fraction;
        self
    }

    pub fn with_stagnation_limit(mut self, generations: usize) -> Self {
        self.stagnation_limit = generations;
        self
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit_secs = Some(limit.as_secs_f64());
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_log_interval(mut self, generations: usize) -> Self {
        self.log_interval = generations;
        self
    }

    /// The wall-clock budget, `None` if unset or not representable.
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit_secs.and_then(|secs| Duration::try_from_secs_f64(secs).ok())
    }

    /// Number of individuals carried over unchanged each generation.
    pub fn elite_count(&self) -> usize {
        (self.population_size as f64 * self.elite_fraction) as usize
    }

    /// Parents are drawn from the top half of the ranked population.
    pub fn parent_pool(&self) -> usize {
        (self.population_size / 2).max(1)
    }

    pub fn validate(&self) -> Result<()> {
        if self.population_size < 2 {
            return Err(RoutingError::PopulationSize(self.population_size));
        }
        if !(0.0..1.0).contains(&self.elite_fraction) {
            return Err(RoutingError::EliteFraction(self.elite_fraction));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(RoutingError::MutationRate(self.mutation_rate));
        }
        if self.max_generations == 0 {
            return Err(RoutingError::GenerationCap);
        }
        if let Some(secs) = self.time_limit_secs {
            if secs <= 0.0 || Duration::try_from_secs_f64(secs).is_err() {
                return Err(RoutingError::TimeBudget(secs));
            }
        }
        Ok(())
    }
}
