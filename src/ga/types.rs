//! Core trait definitions for the GA engine.
//!
//! [`Individual`] and [`GaProblem`] are the contract between the generic
//! [`GaRunner`](super::GaRunner) and a problem-specific encoding.

use rand::Rng;

use crate::error::Result;

/// A candidate solution carrying a cached fitness.
///
/// Lower fitness is better. A fresh or modified individual is unevaluated
/// until the runner stores a fitness through
/// [`set_fitness`](Individual::set_fitness).
pub trait Individual: Clone + Send + Sync {
    /// Cached fitness, `f64::INFINITY` while unevaluated.
    fn fitness(&self) -> f64;

    fn set_fitness(&mut self, fitness: f64);

    /// Returns `true` if the cached fitness is valid.
    fn is_evaluated(&self) -> bool;
}

/// Defines a GA optimization problem.
///
/// # Thread Safety
///
/// `GaProblem` must be `Send + Sync` because the runner may evaluate
/// individuals in parallel using rayon.
pub trait GaProblem: Send + Sync {
    type Individual: Individual;

    /// Creates a random individual for the initial population.
    fn create_individual<R: Rng>(&self, rng: &mut R) -> Self::Individual;

    /// Computes the fitness of an individual. Lower is better.
    ///
    /// Must not depend on any other individual; the runner may call it
    /// from several threads at once.
    fn evaluate(&self, individual: &Self::Individual) -> f64;

    /// Produces one child from two parents.
    fn crossover<R: Rng>(
        &self,
        parent1: &Self::Individual,
        parent2: &Self::Individual,
        rng: &mut R,
    ) -> Self::Individual;

    /// Applies exactly one mutation operator in place.
    fn mutate<R: Rng>(&self, individual: &mut Self::Individual, rng: &mut R);

    /// Optional deterministic improvement of a child before it joins the
    /// next population. The default is a no-op.
    fn refine(&self, _individual: &mut Self::Individual) {}

    /// Checks the problem's own parameters before the first generation.
    /// The default accepts everything.
    fn validate(&self) -> Result<()> {
        Ok(())
    }

    /// Called once per generation after ranking, with the best-so-far fitness.
    fn on_generation(&self, _generation: usize, _best_fitness: f64) {}
}
