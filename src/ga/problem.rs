//! GA problem definition for duration-bounded delivery routing.
//!
//! Implements [`GaProblem`] over giant tours:
//!
//! - **Crossover**: order crossover (OX), preserving relative customer order
//! - **Mutation**: swap, reverse or relocate, picked by [`MutationWeights`]
//! - **Evaluation**: [`FitnessEvaluator`], either resplit into feasible
//!   routes or cut into a fixed number of penalized blocks
//! - **Refinement**: optional 2-opt over the whole permutation

use std::sync::Arc;

use rand::Rng;

use crate::distance::{TravelMatrix, DEPOT};
use crate::error::Result;
use crate::evaluation::{FitnessEvaluator, FitnessStrategy, Penalty, RouteLimits};
use crate::local_search::{two_opt, DEFAULT_MAX_PASSES};
use crate::models::Solution;

use super::chromosome::GiantTour;
use super::operators::{order_crossover, MutationWeights};
use super::GaProblem;

/// GA problem for delivery routing under a per-route duration limit.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use delivery_ga::distance::TravelMatrix;
/// use delivery_ga::evaluation::RouteLimits;
/// use delivery_ga::ga::{GaConfig, GaRunner, RoutingGaProblem};
///
/// let dm = TravelMatrix::euclidean(
///     &[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0)],
///     1.0,
/// ).unwrap();
/// let problem = RoutingGaProblem::new(Arc::new(dm), RouteLimits::new(100.0, 0.0));
/// let config = GaConfig::default()
///     .with_population_size(20)
///     .with_max_generations(50)
///     .with_seed(1);
///
/// let result = GaRunner::run(&problem, &config).unwrap();
/// assert!((result.best_fitness - 6.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone)]
pub struct RoutingGaProblem {
    distances: Arc<TravelMatrix>,
    limits: RouteLimits,
    strategy: FitnessStrategy,
    penalty: Penalty,
    max_passes: usize,
    mutation_weights: MutationWeights,
    polish_offspring: bool,
}

impl RoutingGaProblem {
    /// Creates a problem with the resplit strategy and default operators.
    pub fn new(distances: Arc<TravelMatrix>, limits: RouteLimits) -> Self {
        Self {
            distances,
            limits,
            strategy: FitnessStrategy::Resplit,
            penalty: Penalty::default(),
            max_passes: DEFAULT_MAX_PASSES,
            mutation_weights: MutationWeights::default(),
            polish_offspring: false,
        }
    }

    pub fn with_strategy(mut self, strategy: FitnessStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_penalty(mut self, penalty: Penalty) -> Self {
        self.penalty = penalty;
        self
    }

    /// Caps 2-opt passes in evaluation and refinement.
    pub fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = max_passes;
        self
    }

    pub fn with_mutation_weights(mut self, weights: MutationWeights) -> Self {
        self.mutation_weights = weights;
        self
    }

    /// Runs 2-opt over every child's whole permutation before evaluation.
    pub fn with_polish(mut self, polish: bool) -> Self {
        self.polish_offspring = polish;
        self
    }

    pub fn matrix(&self) -> &TravelMatrix {
        &self.distances
    }

    pub fn limits(&self) -> RouteLimits {
        self.limits
    }

    pub fn strategy(&self) -> FitnessStrategy {
        self.strategy
    }

    /// The evaluator that scores tours for this problem.
    pub fn fitness_evaluator(&self) -> FitnessEvaluator<'_> {
        FitnessEvaluator::new(&self.distances, self.limits)
            .with_strategy(self.strategy)
            .with_penalty(self.penalty)
            .with_max_passes(self.max_passes)
    }

    /// Checks limits, mutation weights and fleet size against the matrix.
    pub fn validate(&self) -> Result<()> {
        self.limits.validate()?;
        self.mutation_weights.validate()?;
        self.strategy.validate(self.distances.customer_count())
    }

    /// Decodes a tour into its route report.
    pub fn solution(&self, tour: &GiantTour) -> Solution {
        self.fitness_evaluator().solution(tour.customers())
    }
}

impl GaProblem for RoutingGaProblem {
    type Individual = GiantTour;

    fn create_individual<R: Rng>(&self, rng: &mut R) -> GiantTour {
        let mut perm: Vec<usize> = self.distances.customers().collect();

        // Fisher-Yates shuffle
        for i in (1..perm.len()).rev() {
            let j = rng.random_range(0..=i);
            perm.swap(i, j);
        }

        GiantTour::new(perm)
    }

    fn evaluate(&self, individual: &GiantTour) -> f64 {
        self.fitness_evaluator().cost(individual.customers())
    }

    fn crossover<R: Rng>(&self, parent1: &GiantTour, parent2: &GiantTour, rng: &mut R) -> GiantTour {
        GiantTour::new(order_crossover(
            parent1.customers(),
            parent2.customers(),
            rng,
        ))
    }

    fn mutate<R: Rng>(&self, individual: &mut GiantTour, rng: &mut R) {
        if individual.len() < 2 {
            return;
        }
        let op = self.mutation_weights.choose(rng);
        op.apply(individual.customers_mut(), rng);
    }

    fn validate(&self) -> Result<()> {
        RoutingGaProblem::validate(self)
    }

    fn refine(&self, individual: &mut GiantTour) {
        if self.polish_offspring && individual.len() > 2 {
            two_opt(
                individual.customers_mut(),
                DEPOT,
                &self.distances,
                self.max_passes,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RoutingError;
    use crate::ga::{GaConfig, GaRunner, Individual};
    use crate::local_search::route_distance;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn setup() -> Arc<TravelMatrix> {
        let dm = TravelMatrix::euclidean(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0)], 1.0)
            .expect("valid points");
        Arc::new(dm)
    }

    fn sorted(tour: &GiantTour) -> Vec<usize> {
        let mut v = tour.customers().to_vec();
        v.sort();
        v
    }

    #[test]
    fn test_create_individual() {
        let problem = RoutingGaProblem::new(setup(), RouteLimits::new(100.0, 0.0));
        let mut rng = StdRng::seed_from_u64(42);
        let ind = problem.create_individual(&mut rng);
        assert_eq!(ind.len(), 3);
        assert!(!ind.is_evaluated());
        assert_eq!(sorted(&ind), vec![1, 2, 3]);
    }

    #[test]
    fn test_evaluate_optimal_tour() {
        let problem = RoutingGaProblem::new(setup(), RouteLimits::new(100.0, 0.0));
        let tour = GiantTour::new(vec![1, 2, 3]);
        // 0→1→2→3→0 = 6.0
        assert!((problem.evaluate(&tour) - 6.0).abs() < 1e-10);
    }

    #[test]
    fn test_evaluate_splits_on_duration() {
        // Each stop costs 1 of service: 0→1→0 takes 3, 0→1→2→0 takes 6.
        let problem = RoutingGaProblem::new(setup(), RouteLimits::new(5.0, 1.0));
        let solution = problem.solution(&GiantTour::new(vec![1, 2, 3]));
        assert!(solution.num_routes() >= 2);
        assert_eq!(solution.num_served(), 3);
        for route in solution.routes() {
            assert!(route.stops().len() == 1 || !route.exceeds(5.0));
        }
    }

    #[test]
    fn test_fixed_fleet_solution_reports_trucks() {
        let problem = RoutingGaProblem::new(setup(), RouteLimits::new(100.0, 0.0))
            .with_strategy(FitnessStrategy::FixedFleet { trucks: 2 });
        let solution = problem.solution(&GiantTour::new(vec![1, 2, 3]));
        assert_eq!(solution.fleet_size(), Some(2));
        // Blocks [1, 2] and [3]: 4 + 6
        assert_eq!(solution.num_routes(), 2);
        assert!((solution.fitness() - 10.0).abs() < 1e-10);
    }

    #[test]
    fn test_crossover_preserves_genes() {
        let problem = RoutingGaProblem::new(setup(), RouteLimits::default());
        let p1 = GiantTour::new(vec![1, 2, 3]);
        let p2 = GiantTour::new(vec![3, 1, 2]);
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..20 {
            let child = problem.crossover(&p1, &p2, &mut rng);
            assert_eq!(sorted(&child), vec![1, 2, 3]);
        }
    }

    #[test]
    fn test_mutate_preserves_genes() {
        let problem = RoutingGaProblem::new(setup(), RouteLimits::default())
            .with_mutation_weights(MutationWeights::new(0.0, 0.0, 1.0));
        let mut tour = GiantTour::new(vec![1, 2, 3]);
        tour.set_fitness(1.0);
        let mut rng = StdRng::seed_from_u64(42);
        problem.mutate(&mut tour, &mut rng);
        assert_eq!(sorted(&tour), vec![1, 2, 3]);
        assert!(!tour.is_evaluated());
    }

    #[test]
    fn test_refine_polishes_whole_permutation() {
        let problem = RoutingGaProblem::new(setup(), RouteLimits::default()).with_polish(true);
        let mut tour = GiantTour::new(vec![3, 1, 2]);
        tour.set_fitness(8.0);
        problem.refine(&mut tour);
        assert_eq!(sorted(&tour), vec![1, 2, 3]);
        assert!((route_distance(tour.customers(), DEPOT, problem.matrix()) - 6.0).abs() < 1e-10);
        assert!(!tour.is_evaluated());

        let untouched = RoutingGaProblem::new(setup(), RouteLimits::default());
        let mut tour = GiantTour::new(vec![3, 1, 2]);
        untouched.refine(&mut tour);
        assert_eq!(tour.customers(), &[3, 1, 2]);
    }

    #[test]
    fn test_ga_runner_finds_solution() {
        let problem = RoutingGaProblem::new(setup(), RouteLimits::new(100.0, 0.0));
        let config = GaConfig::default()
            .with_population_size(20)
            .with_max_generations(30)
            .with_seed(5);

        let result = GaRunner::run(&problem, &config).expect("valid config");
        assert_eq!(result.best.len(), 3);
        assert!((result.best_fitness - 6.0).abs() < 1e-10);
    }

    #[test]
    fn test_zero_trucks_rejected_by_runner() {
        let problem = RoutingGaProblem::new(setup(), RouteLimits::new(100.0, 0.0))
            .with_strategy(FitnessStrategy::FixedFleet { trucks: 0 });
        let config = GaConfig::default().with_population_size(10).with_seed(1);
        assert_eq!(
            GaRunner::run(&problem, &config).err(),
            Some(RoutingError::FleetRange {
                min: 0,
                max: 0,
                customers: 3
            })
        );
    }

    #[test]
    fn test_invalid_weights_and_limits_rejected_by_runner() {
        let config = GaConfig::default().with_population_size(10).with_seed(1);

        let zero = RoutingGaProblem::new(setup(), RouteLimits::default())
            .with_mutation_weights(MutationWeights::new(0.0, 0.0, 0.0));
        assert_eq!(
            GaRunner::run(&zero, &config).err(),
            Some(RoutingError::MutationWeights)
        );

        let overflow = RoutingGaProblem::new(setup(), RouteLimits::default())
            .with_mutation_weights(MutationWeights::new(f64::MAX, f64::MAX, 0.0));
        assert_eq!(
            GaRunner::run(&overflow, &config).err(),
            Some(RoutingError::MutationWeights)
        );

        let no_time = RoutingGaProblem::new(setup(), RouteLimits::new(0.0, 1.0));
        assert_eq!(
            GaRunner::run(&no_time, &config).err(),
            Some(RoutingError::DurationLimit(0.0))
        );
    }
}
