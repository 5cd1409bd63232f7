//! Generational GA runner.
//!
//! Each generation:
//!
//! 1. evaluate every individual without a valid fitness (in parallel if
//!    enabled; ranking starts only after all evaluations finish)
//! 2. stable-sort ascending by fitness
//! 3. update best-so-far on strict improvement, else count stagnation
//! 4. stop on stagnation, generation cap or time budget
//! 5. build the next population: elites first, then children of two
//!    parents drawn uniformly from the top half, mutated with the
//!    configured probability and refined by the problem
//! 6. replace the population wholesale

use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{GaConfig, GaProblem, Individual};
use crate::error::Result;

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    /// No strict improvement for more than `stagnation_limit` generations.
    Stagnation,
    /// `max_generations` generations were evaluated.
    GenerationLimit,
    /// The wall-clock budget ran out.
    TimeLimit,
}

/// Outcome of a GA run.
#[derive(Debug, Clone)]
pub struct GaResult<I> {
    /// Best individual ever ranked first.
    pub best: I,
    pub best_fitness: f64,
    /// Generations evaluated.
    pub generations: usize,
    pub stop_reason: StopReason,
    /// Best-so-far fitness after each generation. Never increases.
    pub history: Vec<f64>,
    pub elapsed: Duration,
}

/// Runs a [`GaProblem`] to termination.
pub struct GaRunner;

impl GaRunner {
    /// Validates `config` and `problem`, seeds an RNG from the config and
    /// runs the GA.
    pub fn run<P: GaProblem>(problem: &P, config: &GaConfig) -> Result<GaResult<P::Individual>> {
        config.validate()?;
        problem.validate()?;
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Ok(Self::run_with_rng(problem, config, &mut rng))
    }

    /// Runs the GA with a caller-supplied RNG. `config` and `problem` must
    /// be valid.
    pub fn run_with_rng<P: GaProblem, R: Rng>(
        problem: &P,
        config: &GaConfig,
        rng: &mut R,
    ) -> GaResult<P::Individual> {
        let start = Instant::now();
        let time_limit = config.time_limit();

        let mut population: Vec<P::Individual> = (0..config.population_size)
            .map(|_| problem.create_individual(rng))
            .collect();

        let mut best: Option<P::Individual> = None;
        let mut best_fitness = f64::INFINITY;
        let mut stagnation = 0usize;
        let mut history = Vec::new();
        let mut generations = 0;
        let mut stop_reason = StopReason::GenerationLimit;

        for generation in 0..config.max_generations {
            Self::evaluate(problem, &mut population, config.parallel);
            population.sort_by(|a, b| a.fitness().total_cmp(&b.fitness()));
            generations = generation + 1;

            let leader = &population[0];
            if best.is_none() || leader.fitness() < best_fitness {
                best_fitness = leader.fitness();
                best = Some(leader.clone());
                stagnation = 0;
            } else {
                stagnation += 1;
            }
            history.push(best_fitness);
            problem.on_generation(generation, best_fitness);

            if config.log_interval > 0 && generation % config.log_interval == 0 {
                debug!(generation, best = best_fitness, stagnation, "generation");
            }

            if stagnation > config.stagnation_limit {
                stop_reason = StopReason::Stagnation;
                break;
            }
            if time_limit.is_some_and(|limit| start.elapsed() >= limit) {
                stop_reason = StopReason::TimeLimit;
                break;
            }
            if generations == config.max_generations {
                break;
            }

            population = Self::reproduce(problem, config, &population, rng);
        }

        let best = best.unwrap_or_else(|| population[0].clone());
        GaResult {
            best,
            best_fitness,
            generations,
            stop_reason,
            history,
            elapsed: start.elapsed(),
        }
    }

    fn evaluate<P: GaProblem>(problem: &P, population: &mut [P::Individual], parallel: bool) {
        let eval = |ind: &mut P::Individual| {
            if !ind.is_evaluated() {
                let fitness = problem.evaluate(ind);
                ind.set_fitness(fitness);
            }
        };
        if parallel {
            population.par_iter_mut().for_each(eval);
        } else {
            population.iter_mut().for_each(eval);
        }
    }

    /// Builds the next population from a ranked one.
    fn reproduce<P: GaProblem, R: Rng>(
        problem: &P,
        config: &GaConfig,
        ranked: &[P::Individual],
        rng: &mut R,
    ) -> Vec<P::Individual> {
        let size = config.population_size;
        let pool = config.parent_pool().min(ranked.len());

        let mut next = Vec::with_capacity(size);
        next.extend(ranked.iter().take(config.elite_count()).cloned());

        while next.len() < size {
            let p1 = &ranked[rng.random_range(0..pool)];
            let p2 = &ranked[rng.random_range(0..pool)];
            let mut child = problem.crossover(p1, p2, rng);
            if rng.random_bool(config.mutation_rate) {
                problem.mutate(&mut child, rng);
            }
            problem.refine(&mut child);
            next.push(child);
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RoutingError;
    use crate::ga::{order_crossover, swap_mutation, GiantTour};

    /// Sorting toy problem: fitness counts out-of-place genes.
    struct Sorting {
        n: usize,
    }

    impl GaProblem for Sorting {
        type Individual = GiantTour;

        fn create_individual<R: Rng>(&self, rng: &mut R) -> GiantTour {
            let mut perm: Vec<usize> = (1..=self.n).collect();
            for i in (1..perm.len()).rev() {
                let j = rng.random_range(0..=i);
                perm.swap(i, j);
            }
            GiantTour::new(perm)
        }

        fn evaluate(&self, individual: &GiantTour) -> f64 {
            individual
                .customers()
                .iter()
                .enumerate()
                .filter(|(i, &g)| g != i + 1)
                .count() as f64
        }

        fn crossover<R: Rng>(&self, p1: &GiantTour, p2: &GiantTour, rng: &mut R) -> GiantTour {
            GiantTour::new(order_crossover(p1.customers(), p2.customers(), rng))
        }

        fn mutate<R: Rng>(&self, individual: &mut GiantTour, rng: &mut R) {
            swap_mutation(individual.customers_mut(), rng);
        }

        fn validate(&self) -> Result<()> {
            if self.n == 0 {
                return Err(RoutingError::EmptyPointSet);
            }
            Ok(())
        }
    }

    fn config() -> GaConfig {
        GaConfig::default()
            .with_population_size(30)
            .with_max_generations(200)
            .with_stagnation_limit(50)
            .with_mutation_rate(0.3)
            .with_seed(42)
    }

    #[test]
    fn test_history_never_increases() {
        let result = GaRunner::run(&Sorting { n: 8 }, &config()).expect("valid config");
        assert_eq!(result.history.len(), result.generations);
        for w in result.history.windows(2) {
            assert!(w[1] <= w[0]);
        }
        assert_eq!(result.history.last().copied(), Some(result.best_fitness));
        assert_eq!(result.best.fitness(), result.best_fitness);
    }

    #[test]
    fn test_finds_sorted_permutation() {
        let cfg = config()
            .with_max_generations(2_000)
            .with_stagnation_limit(500)
            .with_mutation_rate(0.6);
        let result = GaRunner::run(&Sorting { n: 6 }, &cfg).expect("valid config");
        assert_eq!(result.best_fitness, 0.0);
        assert_eq!(result.best.customers(), &[1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_stagnation_stops_run() {
        // A single gene can never improve after the first generation.
        let cfg = config().with_stagnation_limit(3);
        let result = GaRunner::run(&Sorting { n: 1 }, &cfg).expect("valid config");
        assert_eq!(result.stop_reason, StopReason::Stagnation);
        assert_eq!(result.generations, 5);
    }

    #[test]
    fn test_generation_cap() {
        let cfg = config().with_max_generations(3).with_stagnation_limit(1_000);
        let result = GaRunner::run(&Sorting { n: 10 }, &cfg).expect("valid config");
        assert_eq!(result.generations, 3);
        assert_eq!(result.stop_reason, StopReason::GenerationLimit);
    }

    #[test]
    fn test_time_limit() {
        let cfg = config()
            .with_max_generations(usize::MAX)
            .with_stagnation_limit(usize::MAX)
            .with_time_limit(Duration::from_millis(20));
        let result = GaRunner::run(&Sorting { n: 12 }, &cfg).expect("valid config");
        assert_eq!(result.stop_reason, StopReason::TimeLimit);
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let a = GaRunner::run(&Sorting { n: 9 }, &config()).expect("valid config");
        let b = GaRunner::run(&Sorting { n: 9 }, &config().with_parallel(false)).expect("valid");
        assert_eq!(a.best.customers(), b.best.customers());
        assert_eq!(a.history, b.history);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let cfg = config().with_population_size(0);
        assert!(GaRunner::run(&Sorting { n: 3 }, &cfg).is_err());
    }

    #[test]
    fn test_invalid_problem_rejected_before_first_generation() {
        let err = GaRunner::run(&Sorting { n: 0 }, &config()).err();
        assert_eq!(err, Some(RoutingError::EmptyPointSet));
    }
}
