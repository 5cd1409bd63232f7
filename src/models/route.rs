//! Route type.

use serde::{Deserialize, Serialize};

/// An ordered sequence of customer stops served by one vehicle.
///
/// A route starts and ends at the depot; the depot is not stored in
/// `stops`. Distance and duration are computed once by the
/// [`RouteEvaluator`](crate::evaluation::RouteEvaluator) so that reporting
/// code never has to touch the matrix again.
///
/// # Examples
///
/// ```
/// use delivery_ga::models::Route;
///
/// let route = Route::new(vec![4, 2], 12.5, 40.0);
/// assert_eq!(route.stops(), &[4, 2]);
/// assert_eq!(route.len(), 2);
/// assert!(route.exceeds(30.0));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    stops: Vec<usize>,
    total_distance: f64,
    total_duration: f64,
}

impl Route {
    /// Creates a route with precomputed totals.
    pub fn new(stops: Vec<usize>, total_distance: f64, total_duration: f64) -> Self {
        Self {
            stops,
            total_distance,
            total_duration,
        }
    }

    /// Customer ids in visit order.
    pub fn stops(&self) -> &[usize] {
        &self.stops
    }

    /// Number of customer stops (depot excluded).
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    /// Returns `true` if the route has no stops.
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Depot → stops → depot distance.
    pub fn total_distance(&self) -> f64 {
        self.total_distance
    }

    /// Driving time plus service time at every stop, return leg included.
    pub fn total_duration(&self) -> f64 {
        self.total_duration
    }

    /// Returns `true` if the route's duration is over `limit`.
    ///
    /// Only single-stop routes can exceed the limit in resplit mode.
    pub fn exceeds(&self, limit: f64) -> bool {
        self.total_duration > limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_accessors() {
        let r = Route::new(vec![5, 3], 20.0, 31.0);
        assert_eq!(r.stops(), &[5, 3]);
        assert_eq!(r.len(), 2);
        assert!(!r.is_empty());
        assert_eq!(r.total_distance(), 20.0);
        assert_eq!(r.total_duration(), 31.0);
    }

    #[test]
    fn test_route_exceeds_is_strict() {
        let r = Route::new(vec![1], 2.0, 180.0);
        assert!(!r.exceeds(180.0));
        assert!(r.exceeds(179.9));
    }

    #[test]
    fn test_route_empty() {
        let r = Route::new(vec![], 0.0, 0.0);
        assert!(r.is_empty());
        assert_eq!(r.len(), 0);
    }
}
