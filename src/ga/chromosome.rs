//! Giant tour chromosome.
//!
//! A giant tour encodes a route set as a single permutation of all
//! customer ids (depot excluded). The [`Segmenter`](super::split::Segmenter)
//! turns it into duration-feasible routes.

use super::Individual;

/// A permutation of customer ids with a cached fitness.
///
/// Fitness becomes invalid whenever the permutation is borrowed mutably,
/// so a modified tour is always re-evaluated.
///
/// # Examples
///
/// ```
/// use delivery_ga::ga::{GiantTour, Individual};
///
/// let mut tour = GiantTour::new(vec![3, 1, 2]);
/// assert!(!tour.is_evaluated());
/// tour.set_fitness(12.0);
/// assert_eq!(tour.fitness(), 12.0);
///
/// tour.customers_mut().swap(0, 2);
/// assert_eq!(tour.customers(), &[2, 1, 3]);
/// assert!(!tour.is_evaluated());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GiantTour {
    customers: Vec<usize>,
    fitness: Option<f64>,
}

impl GiantTour {
    pub fn new(customers: Vec<usize>) -> Self {
        Self {
            customers,
            fitness: None,
        }
    }

    pub fn customers(&self) -> &[usize] {
        &self.customers
    }

    /// Mutable access to the permutation. Invalidates the cached fitness.
    pub fn customers_mut(&mut self) -> &mut [usize] {
        self.fitness = None;
        &mut self.customers
    }

    pub fn into_customers(self) -> Vec<usize> {
        self.customers
    }

    pub fn len(&self) -> usize {
        self.customers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }
}

impl Individual for GiantTour {
    fn fitness(&self) -> f64 {
        self.fitness.unwrap_or(f64::INFINITY)
    }

    fn set_fitness(&mut self, fitness: f64) {
        self.fitness = Some(fitness);
    }

    fn is_evaluated(&self) -> bool {
        self.fitness.is_some()
    }
}
