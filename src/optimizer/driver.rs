//! Optimizer driver: independent restarts and fixed-fleet sweeps.

use std::ops::RangeInclusive;
use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::distance::TravelMatrix;
use crate::error::Result;
use crate::evaluation::{FitnessStrategy, RouteEvaluator};
use crate::ga::{GaRunner, GiantTour, RoutingGaProblem, StopReason};
use crate::models::{FleetSweep, Solution};

use super::config::{validate_fleet, OptimizerConfig};

/// Summary of one GA run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub restart: usize,
    /// Seed the run's RNG was built from, if seeded.
    pub seed: Option<u64>,
    pub fitness: f64,
    pub generations: usize,
    pub stop_reason: StopReason,
    pub elapsed: Duration,
    /// Best-so-far fitness per generation.
    pub history: Vec<f64>,
}

/// Best tour over all restarts and how each restart went.
#[derive(Debug, Clone)]
pub struct OptimizerResult {
    pub tour: GiantTour,
    pub fitness: f64,
    pub solution: Solution,
    /// One entry per restart, in restart order.
    pub runs: Vec<RunSummary>,
}

/// Runs the GA over a shared travel matrix.
///
/// Configuration is validated once in [`Optimizer::new`]; afterwards
/// [`run`](Optimizer::run) cannot fail.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use delivery_ga::distance::TravelMatrix;
/// use delivery_ga::evaluation::RouteLimits;
/// use delivery_ga::ga::GaConfig;
/// use delivery_ga::optimizer::{Optimizer, OptimizerConfig};
///
/// let dm = TravelMatrix::euclidean(
///     &[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (-1.0, 0.0), (0.0, -1.0)],
///     1.0,
/// ).unwrap();
/// let config = OptimizerConfig::default()
///     .with_limits(RouteLimits::new(100.0, 0.0))
///     .with_restarts(2)
///     .with_ga(GaConfig::default().with_population_size(30).with_max_generations(100).with_seed(3));
///
/// let result = Optimizer::new(Arc::new(dm), config).unwrap().run();
/// assert_eq!(result.solution.num_served(), 4);
/// assert_eq!(result.runs.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Optimizer {
    distances: Arc<TravelMatrix>,
    config: OptimizerConfig,
}

impl Optimizer {
    /// Validates `config` against the matrix.
    ///
    /// Customers that cannot be served within the limit even alone are
    /// logged as warnings; they still get a route of their own.
    pub fn new(distances: Arc<TravelMatrix>, config: OptimizerConfig) -> Result<Self> {
        let customers = distances.customer_count();
        config.validate(customers)?;

        let evaluator = RouteEvaluator::new(&distances, config.limits);
        for customer in distances.customers() {
            let round_trip = evaluator.round_trip(customer);
            if round_trip > config.limits.max_duration {
                warn!(
                    customer,
                    round_trip,
                    limit = config.limits.max_duration,
                    "customer cannot be served within the duration limit"
                );
            }
        }

        Ok(Self { distances, config })
    }

    /// The validated configuration.
    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Shared travel matrix every restart runs against.
    pub fn matrix(&self) -> &TravelMatrix {
        &self.distances
    }

    fn problem(&self, strategy: FitnessStrategy) -> RoutingGaProblem {
        RoutingGaProblem::new(Arc::clone(&self.distances), self.config.limits)
            .with_strategy(strategy)
            .with_penalty(self.config.penalty)
            .with_max_passes(self.config.two_opt_max_passes)
            .with_mutation_weights(self.config.mutation_weights)
            .with_polish(self.config.polish_offspring)
    }

    /// Runs all restarts with the configured strategy and keeps the best.
    pub fn run(&self) -> OptimizerResult {
        self.run_strategy(self.config.strategy)
    }

    fn run_strategy(&self, strategy: FitnessStrategy) -> OptimizerResult {
        let problem = self.problem(strategy);
        let ga = &self.config.ga;
        info!(
            customers = self.distances.customer_count(),
            restarts = self.config.restarts,
            ?strategy,
            "starting optimization"
        );

        let runs: Vec<(GiantTour, RunSummary)> = (0..self.config.restarts)
            .into_par_iter()
            .map(|restart| {
                let seed = ga.seed.map(|s| s.wrapping_add(restart as u64));
                let mut rng = match seed {
                    Some(seed) => StdRng::seed_from_u64(seed),
                    None => StdRng::from_os_rng(),
                };
                let result = GaRunner::run_with_rng(&problem, ga, &mut rng);
                info!(
                    restart,
                    fitness = result.best_fitness,
                    generations = result.generations,
                    stop_reason = ?result.stop_reason,
                    "restart finished"
                );
                let summary = RunSummary {
                    restart,
                    seed,
                    fitness: result.best_fitness,
                    generations: result.generations,
                    stop_reason: result.stop_reason,
                    elapsed: result.elapsed,
                    history: result.history,
                };
                (result.best, summary)
            })
            .collect();

        // Ties go to the lower restart index.
        let (tour, fitness) = runs
            .iter()
            .min_by(|a, b| a.1.fitness.total_cmp(&b.1.fitness))
            .map(|(tour, summary)| (tour.clone(), summary.fitness))
            .unwrap_or_else(|| (GiantTour::new(Vec::new()), f64::INFINITY));

        let solution = problem.solution(&tour);
        info!(
            fitness,
            routes = solution.num_routes(),
            distance = solution.total_distance(),
            "optimization finished"
        );

        OptimizerResult {
            tour,
            fitness,
            solution,
            runs: runs.into_iter().map(|(_, summary)| summary).collect(),
        }
    }

    /// Runs the fixed-fleet strategy for every fleet size in `range` and
    /// reports the best size.
    ///
    /// The range must satisfy `1 <= min <= max <= customers`. The usual
    /// range is [`default_fleet_range`](super::default_fleet_range) of the
    /// matrix's point count.
    pub fn sweep_fleet(&self, range: RangeInclusive<usize>) -> Result<FleetSweep> {
        let (min, max) = (*range.start(), *range.end());
        validate_fleet(min, max, self.distances.customer_count())?;

        let results: Vec<(usize, OptimizerResult)> = range
            .into_par_iter()
            .map(|trucks| {
                let result = self.run_strategy(FitnessStrategy::FixedFleet { trucks });
                info!(trucks, fitness = result.fitness, "fleet size evaluated");
                (trucks, result)
            })
            .collect();

        let per_size = results
            .iter()
            .map(|(trucks, result)| (*trucks, result.fitness))
            .collect();

        // Non-empty after validation; ties go to the smaller fleet.
        let best = results
            .into_iter()
            .min_by(|a, b| a.1.fitness.total_cmp(&b.1.fitness))
            .map(|(_, result)| result.solution)
            .unwrap_or_else(|| Solution::new(Vec::new(), f64::INFINITY));

        info!(trucks = ?best.fleet_size(), fitness = best.fitness(), "fleet sweep finished");
        Ok(FleetSweep { per_size, best })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::RouteLimits;
    use crate::ga::GaConfig;
    use crate::optimizer::default_fleet_range;

    fn line(n: usize) -> Arc<TravelMatrix> {
        let points: Vec<(f64, f64)> = (0..=n).map(|i| (i as f64, 0.0)).collect();
        Arc::new(TravelMatrix::euclidean(&points, 1.0).expect("valid points"))
    }

    fn small_ga(seed: u64) -> GaConfig {
        GaConfig::default()
            .with_population_size(24)
            .with_max_generations(60)
            .with_stagnation_limit(20)
            .with_seed(seed)
    }

    #[test]
    fn test_new_rejects_bad_config() {
        let config = OptimizerConfig::default().with_restarts(0);
        assert!(Optimizer::new(line(3), config).is_err());
    }

    #[test]
    fn test_run_reports_every_restart() {
        let config = OptimizerConfig::default()
            .with_limits(RouteLimits::new(100.0, 0.0))
            .with_restarts(3)
            .with_ga(small_ga(10));
        let result = Optimizer::new(line(4), config).expect("valid").run();

        assert_eq!(result.runs.len(), 3);
        let seeds: Vec<Option<u64>> = result.runs.iter().map(|r| r.seed).collect();
        assert_eq!(seeds, vec![Some(10), Some(11), Some(12)]);
        let best = result
            .runs
            .iter()
            .map(|r| r.fitness)
            .fold(f64::INFINITY, f64::min);
        assert_eq!(result.fitness, best);
        // Out and back along the line
        assert!((result.fitness - 8.0).abs() < 1e-10);
        assert_eq!(result.solution.fitness(), result.fitness);
    }

    #[test]
    fn test_run_is_reproducible() {
        let config = OptimizerConfig::default()
            .with_limits(RouteLimits::new(6.0, 0.5))
            .with_restarts(2)
            .with_ga(small_ga(77));
        let a = Optimizer::new(line(6), config.clone()).expect("valid").run();
        let b = Optimizer::new(line(6), config).expect("valid").run();
        assert_eq!(a.tour, b.tour);
        assert_eq!(a.fitness, b.fitness);
        for (ra, rb) in a.runs.iter().zip(&b.runs) {
            assert_eq!(ra.history, rb.history);
            assert_eq!(ra.stop_reason, rb.stop_reason);
        }
    }

    #[test]
    fn test_sweep_fleet() {
        let config = OptimizerConfig::default()
            .with_limits(RouteLimits::new(100.0, 0.0))
            .with_restarts(1)
            .with_ga(small_ga(4));
        let optimizer = Optimizer::new(line(6), config).expect("valid");

        let sweep = optimizer.sweep_fleet(1..=3).expect("valid range");
        let sizes: Vec<usize> = sweep.per_size.iter().map(|(t, _)| *t).collect();
        assert_eq!(sizes, vec![1, 2, 3]);
        // No limit pressure: one truck drives the line once, out and back.
        assert_eq!(sweep.best_fleet_size(), Some(1));
        assert!((sweep.best.fitness() - 12.0).abs() < 1e-10);
        assert_eq!(sweep.best.num_served(), 6);
    }

    #[test]
    fn test_sweep_fleet_rejects_bad_range() {
        let optimizer = Optimizer::new(line(6), OptimizerConfig::default()).expect("valid");
        assert!(optimizer.sweep_fleet(0..=2).is_err());
        #[allow(clippy::reversed_empty_ranges)]
        let reversed = 3..=2;
        assert!(optimizer.sweep_fleet(reversed).is_err());
        // More trucks than customers
        assert!(optimizer.sweep_fleet(1..=7).is_err());
        assert_eq!(default_fleet_range(6), 1..=1);
    }
}
