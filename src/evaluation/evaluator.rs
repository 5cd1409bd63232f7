//! Route evaluator that computes distance, duration and feasibility.

use serde::{Deserialize, Serialize};

use crate::distance::{TravelMatrix, DEPOT};
use crate::error::{Result, RoutingError};
use crate::local_search::route_distance;
use crate::models::Route;

/// Per-route duration limit and per-stop service time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteLimits {
    /// Maximum route duration: driving time, service time, return leg.
    pub max_duration: f64,
    /// Fixed time spent at every stop.
    pub service_time: f64,
}

impl Default for RouteLimits {
    fn default() -> Self {
        Self {
            max_duration: 180.0,
            service_time: 3.0,
        }
    }
}

impl RouteLimits {
    pub fn new(max_duration: f64, service_time: f64) -> Self {
        Self {
            max_duration,
            service_time,
        }
    }

    /// Checks that the limit is positive and the service time non-negative.
    pub fn validate(&self) -> Result<()> {
        if !self.max_duration.is_finite() || self.max_duration <= 0.0 {
            return Err(RoutingError::DurationLimit(self.max_duration));
        }
        if !self.service_time.is_finite() || self.service_time < 0.0 {
            return Err(RoutingError::ServiceTime(self.service_time));
        }
        Ok(())
    }
}

/// Evaluates stop sequences against the travel matrix and route limits.
///
/// # Examples
///
/// ```
/// use delivery_ga::distance::TravelMatrix;
/// use delivery_ga::evaluation::{RouteEvaluator, RouteLimits};
///
/// let dm = TravelMatrix::euclidean(&[(0.0, 0.0), (3.0, 4.0), (6.0, 8.0)], 1.0).unwrap();
/// let evaluator = RouteEvaluator::new(&dm, RouteLimits::new(30.0, 2.0));
///
/// let route = evaluator.build_route(vec![1, 2]);
/// // 5 + 2 (service) + 5 + 2 (service) + 10 (return)
/// assert!((route.total_duration() - 24.0).abs() < 1e-10);
/// assert!((route.total_distance() - 20.0).abs() < 1e-10);
/// assert!(evaluator.fits(&[1, 2]));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RouteEvaluator<'a> {
    distances: &'a TravelMatrix,
    limits: RouteLimits,
}

impl<'a> RouteEvaluator<'a> {
    pub fn new(distances: &'a TravelMatrix, limits: RouteLimits) -> Self {
        Self { distances, limits }
    }

    pub fn matrix(&self) -> &'a TravelMatrix {
        self.distances
    }

    pub fn limits(&self) -> RouteLimits {
        self.limits
    }

    /// Time for leaving `from`, driving to `to` and serving it.
    pub fn leg_time(&self, from: usize, to: usize) -> f64 {
        self.distances.travel_time(from, to) + self.limits.service_time
    }

    /// Depot → stops → depot distance.
    pub fn distance(&self, stops: &[usize]) -> f64 {
        route_distance(stops, DEPOT, self.distances)
    }

    /// Driving time plus service at every stop, return leg included.
    ///
    /// An empty sequence has zero duration.
    pub fn duration(&self, stops: &[usize]) -> f64 {
        let Some(&last) = stops.last() else {
            return 0.0;
        };
        let mut elapsed = 0.0;
        let mut prev = DEPOT;
        for &stop in stops {
            elapsed += self.leg_time(prev, stop);
            prev = stop;
        }
        elapsed + self.distances.travel_time(last, DEPOT)
    }

    /// Returns `true` if the sequence's duration is within the limit.
    pub fn fits(&self, stops: &[usize]) -> bool {
        self.duration(stops) <= self.limits.max_duration
    }

    /// Duration of serving `customer` alone.
    pub fn round_trip(&self, customer: usize) -> f64 {
        self.duration(&[customer])
    }

    /// Builds a route, computing its distance and duration.
    pub fn build_route(&self, stops: Vec<usize>) -> Route {
        let distance = self.distance(&stops);
        let duration = self.duration(&stops);
        Route::new(stops, distance, duration)
    }
}
