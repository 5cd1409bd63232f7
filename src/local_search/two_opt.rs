//! Intra-route 2-opt improvement.
//!
//! # Algorithm
//!
//! The route is anchored at the depot on both ends. For every pair of
//! positions `i < j`, compare the edges `(prev(i), r[i])` and
//! `(r[j], next(j))` with `(prev(i), r[j])` and `(r[i], next(j))`, where
//! `prev(0)` and `next(n-1)` are the depot:
//!
//! ```text
//! delta = d(prev_i, r[j]) + d(r[i], next_j) - d(prev_i, r[i]) - d(r[j], next_j)
//! ```
//!
//! If delta < 0, reverse `r[i..=j]` in place. Passes repeat until one finds
//! no improving move or the pass cap is reached. On an asymmetric matrix the
//! reversed segment is traversed backwards, so its inner distance change is
//! added to the delta.
//!
//! # Complexity
//!
//! O(n²) per pass on a symmetric matrix, O(n³) on an asymmetric one.
//!
//! # Reference
//!
//! Croes, G.A. (1958). "A method for solving traveling salesman problems",
//! *Operations Research* 6(6), 791-812.

use tracing::debug;

use crate::distance::TravelMatrix;

const IMPROVEMENT_EPS: f64 = 1e-10;

/// Default cap on full 2-opt passes.
pub const DEFAULT_MAX_PASSES: usize = 500;

/// Outcome of a 2-opt run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TwoOptStats {
    /// Full passes executed, the final non-improving pass included.
    pub passes: usize,
    /// Number of segment reversals applied.
    pub moves: usize,
    /// `false` if the pass cap stopped the search before a local optimum.
    pub converged: bool,
}

/// Applies 2-opt to a single route in place.
///
/// The route holds customer ids only; `depot` is the implicit anchor before
/// the first and after the last stop. The route's distance never increases
/// and its stops never change, only their order.
///
/// # Examples
///
/// ```
/// use delivery_ga::distance::TravelMatrix;
/// use delivery_ga::local_search::{route_distance, two_opt};
///
/// let dm = TravelMatrix::euclidean(
///     &[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0)],
///     1.0,
/// ).unwrap();
///
/// let mut route = vec![1, 3, 2];
/// let stats = two_opt(&mut route, 0, &dm, 500);
/// assert!(stats.converged);
/// assert!((route_distance(&route, 0, &dm) - 6.0).abs() < 1e-10);
/// ```
pub fn two_opt(
    route: &mut [usize],
    depot: usize,
    distances: &TravelMatrix,
    max_passes: usize,
) -> TwoOptStats {
    let n = route.len();
    let mut stats = TwoOptStats {
        passes: 0,
        moves: 0,
        converged: true,
    };
    if n < 2 {
        return stats;
    }

    let symmetric = distances.is_symmetric();
    let mut improved = true;

    while improved {
        if stats.passes == max_passes {
            stats.converged = false;
            debug!(passes = max_passes, len = n, "2-opt pass cap reached");
            break;
        }
        improved = false;
        stats.passes += 1;

        for i in 0..n - 1 {
            for j in i + 1..n {
                let delta = two_opt_delta(route, depot, distances, i, j, symmetric);
                if delta < -IMPROVEMENT_EPS {
                    route[i..=j].reverse();
                    stats.moves += 1;
                    improved = true;
                }
            }
        }
    }

    stats
}

/// Computes the distance change from reversing `route[i..=j]`.
///
/// Before: ...-prev_i - route[i] - route[i+1] - ... - route[j] - next_j-...
/// After:  ...-prev_i - route[j] - route[j-1] - ... - route[i] - next_j-...
fn two_opt_delta(
    route: &[usize],
    depot: usize,
    distances: &TravelMatrix,
    i: usize,
    j: usize,
    symmetric: bool,
) -> f64 {
    let n = route.len();
    let prev_i = if i == 0 { depot } else { route[i - 1] };
    let next_j = if j == n - 1 { depot } else { route[j + 1] };

    let old_cost = distances.distance(prev_i, route[i]) + distances.distance(route[j], next_j);
    let new_cost = distances.distance(prev_i, route[j]) + distances.distance(route[i], next_j);

    let mut delta = new_cost - old_cost;
    if !symmetric {
        for k in i..j {
            delta += distances.distance(route[k + 1], route[k]) - distances.distance(route[k], route[k + 1]);
        }
    }
    delta
}

/// Computes the total distance of a route: `depot → route[0] → ... → route[n-1] → depot`.
pub fn route_distance(route: &[usize], depot: usize, distances: &TravelMatrix) -> f64 {
    if route.is_empty() {
        return 0.0;
    }
    let mut dist = distances.distance(depot, route[0]);
    for w in route.windows(2) {
        dist += distances.distance(w[0], w[1]);
    }
    dist += distances.distance(route[route.len() - 1], depot);
    dist
}
