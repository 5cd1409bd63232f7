//! Fitness of a giant tour: total distance of the routes it decodes into.

use serde::{Deserialize, Serialize};

use crate::distance::{TravelMatrix, DEPOT};
use crate::error::{Result, RoutingError};
use crate::ga::split::{split_blocks, Segmenter};
use crate::local_search::two_opt;
use crate::models::{Route, Solution};

use super::{RouteEvaluator, RouteLimits};

/// How a giant tour is cut into routes when computing fitness.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum FitnessStrategy {
    /// Greedy duration-bounded segmentation with recursive repair.
    /// Every route fits the limit except infeasible single stops.
    #[default]
    Resplit,
    /// Exactly `trucks` contiguous blocks of equal size. Blocks over the
    /// limit are penalized instead of being split.
    FixedFleet { trucks: usize },
}

impl FitnessStrategy {
    /// A fixed fleet needs between 1 and `customers` trucks.
    pub fn validate(&self, customers: usize) -> Result<()> {
        match *self {
            FitnessStrategy::FixedFleet { trucks } if trucks == 0 || trucks > customers => {
                Err(RoutingError::FleetRange {
                    min: trucks,
                    max: trucks,
                    customers,
                })
            }
            _ => Ok(()),
        }
    }
}

/// Fitness penalty for a fixed-fleet block over the duration limit:
/// `base + (duration - limit) * rate`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Penalty {
    pub base: f64,
    pub rate: f64,
}

impl Default for Penalty {
    fn default() -> Self {
        Self {
            base: 1e6,
            rate: 10.0,
        }
    }
}

impl Penalty {
    pub fn apply(&self, duration: f64, limit: f64) -> f64 {
        if duration > limit {
            self.base + (duration - limit) * self.rate
        } else {
            0.0
        }
    }
}

/// Decodes giant tours into routes and scores them.
///
/// # Examples
///
/// ```
/// use delivery_ga::distance::TravelMatrix;
/// use delivery_ga::evaluation::{FitnessEvaluator, RouteLimits};
///
/// let dm = TravelMatrix::euclidean(
///     &[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0)],
///     1.0,
/// ).unwrap();
/// let fitness = FitnessEvaluator::new(&dm, RouteLimits::new(100.0, 0.0));
///
/// // One route; 2-opt straightens 0→3→1→2→0 into 0→1→2→3→0.
/// assert!((fitness.cost(&[3, 1, 2]) - 6.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FitnessEvaluator<'a> {
    segmenter: Segmenter<'a>,
    strategy: FitnessStrategy,
    penalty: Penalty,
    max_passes: usize,
}

impl<'a> FitnessEvaluator<'a> {
    /// Creates an evaluator using [`FitnessStrategy::Resplit`].
    pub fn new(distances: &'a TravelMatrix, limits: RouteLimits) -> Self {
        let max_passes = crate::local_search::DEFAULT_MAX_PASSES;
        Self {
            segmenter: Segmenter::new(RouteEvaluator::new(distances, limits), max_passes),
            strategy: FitnessStrategy::Resplit,
            penalty: Penalty::default(),
            max_passes,
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

    /// Caps 2-opt passes on every route.
    pub fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = max_passes;
        self.segmenter = Segmenter::new(*self.segmenter.evaluator(), max_passes);
        self
    }

    pub fn strategy(&self) -> FitnessStrategy {
        self.strategy
    }

    fn evaluator(&self) -> &RouteEvaluator<'a> {
        self.segmenter.evaluator()
    }

    /// Decodes `tour` into its routes, depot excluded, in dispatch order.
    ///
    /// In fixed-fleet mode empty blocks are dropped.
    pub fn routes(&self, tour: &[usize]) -> Vec<Vec<usize>> {
        match self.strategy {
            FitnessStrategy::Resplit => self.segmenter.segment(tour),
            FitnessStrategy::FixedFleet { trucks } => split_blocks(tour, trucks)
                .into_iter()
                .filter(|block| !block.is_empty())
                .map(|block| {
                    let mut route = block.to_vec();
                    two_opt(&mut route, DEPOT, self.evaluator().matrix(), self.max_passes);
                    route
                })
                .collect(),
        }
    }

    /// Total distance of the decoded routes, plus fixed-fleet penalties.
    ///
    /// Lower is better.
    pub fn cost(&self, tour: &[usize]) -> f64 {
        self.score(&self.routes(tour))
    }

    fn score(&self, routes: &[Vec<usize>]) -> f64 {
        let evaluator = self.evaluator();
        let distance: f64 = routes.iter().map(|r| evaluator.distance(r)).sum();
        match self.strategy {
            FitnessStrategy::Resplit => distance,
            FitnessStrategy::FixedFleet { .. } => {
                let limit = evaluator.limits().max_duration;
                distance
                    + routes
                        .iter()
                        .map(|r| self.penalty.apply(evaluator.duration(r), limit))
                        .sum::<f64>()
            }
        }
    }

    /// Decodes `tour` into a full report: routes with their distance and
    /// duration, and the fitness that ranked the tour.
    pub fn solution(&self, tour: &[usize]) -> Solution {
        let routes = self.routes(tour);
        let fitness = self.score(&routes);
        let evaluator = self.evaluator();
        let routes: Vec<Route> = routes.into_iter().map(|r| evaluator.build_route(r)).collect();
        let solution = Solution::new(routes, fitness);
        match self.strategy {
            FitnessStrategy::FixedFleet { trucks } => solution.with_fleet_size(trucks),
            FitnessStrategy::Resplit => solution,
        }
    }
}
