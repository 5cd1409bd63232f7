//! Solution and fleet sweep report types.

use serde::{Deserialize, Serialize};

use super::Route;

/// The best route set found by the optimizer.
///
/// Holds the ordered routes of the best permutation together with the
/// grand totals, so a report or CLI formatter can render it without
/// recomputation.
///
/// # Examples
///
/// ```
/// use delivery_ga::models::{Route, Solution};
///
/// let sol = Solution::new(
///     vec![Route::new(vec![1, 2], 10.0, 25.0), Route::new(vec![3], 6.0, 9.0)],
///     16.0,
/// );
/// assert_eq!(sol.num_routes(), 2);
/// assert_eq!(sol.num_served(), 3);
/// assert!((sol.total_distance() - 16.0).abs() < 1e-10);
/// assert!((sol.total_duration() - 34.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    routes: Vec<Route>,
    fitness: f64,
    fleet_size: Option<usize>,
}

impl Solution {
    /// Creates a solution from its routes and the fitness that ranked it.
    pub fn new(routes: Vec<Route>, fitness: f64) -> Self {
        Self {
            routes,
            fitness,
            fleet_size: None,
        }
    }

    /// Records the fixed fleet size this solution was optimized for.
    pub fn with_fleet_size(mut self, trucks: usize) -> Self {
        self.fleet_size = Some(trucks);
        self
    }

    /// Routes in dispatch order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Number of routes (vehicles used).
    pub fn num_routes(&self) -> usize {
        self.routes.len()
    }

    /// Total number of customers served across all routes.
    pub fn num_served(&self) -> usize {
        self.routes.iter().map(|r| r.len()).sum()
    }

    /// Fitness of the permutation behind this solution.
    ///
    /// Equals [`total_distance`](Self::total_distance) unless fixed-fleet
    /// penalties were applied.
    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    /// Fixed fleet size, if the solution comes from fixed-fleet mode.
    pub fn fleet_size(&self) -> Option<usize> {
        self.fleet_size
    }

    /// Total distance across all routes.
    pub fn total_distance(&self) -> f64 {
        self.routes.iter().map(|r| r.total_distance()).sum()
    }

    /// Total duration across all routes.
    pub fn total_duration(&self) -> f64 {
        self.routes.iter().map(|r| r.total_duration()).sum()
    }

    /// Routes whose duration exceeds `limit`.
    pub fn over_limit(&self, limit: f64) -> impl Iterator<Item = &Route> {
        self.routes.iter().filter(move |r| r.exceeds(limit))
    }
}

/// Result of sweeping over a range of fixed fleet sizes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetSweep {
    /// `(fleet size, best fitness)` for every size tried, ascending by size.
    pub per_size: Vec<(usize, f64)>,
    /// Best solution over all sizes; its `fleet_size` is the winning size.
    pub best: Solution,
}

impl FleetSweep {
    /// The winning fleet size.
    pub fn best_fleet_size(&self) -> Option<usize> {
        self.best.fleet_size()
    }
}
