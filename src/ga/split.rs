//! Duration-bounded segmentation of a giant tour into routes.
//!
//! # Algorithm
//!
//! Scan the tour left to right. A stop is appended to the open route while
//! the projected duration, i.e. the time accumulated so far plus the leg to
//! the stop, its service time and the drive back to the depot, stays within
//! the limit (`<=`). The first stop that would break the limit closes the
//! route. A stop that cannot fit even on an empty route becomes a route of
//! its own.
//!
//! Each closed route is improved with 2-opt. 2-opt minimizes distance, not
//! time, so the improved route can run over the limit; such a route is
//! segmented again on its own (2-opt order, not the whole tour) and the
//! resulting sub-routes are spliced in its place. Sub-routes are always
//! shorter than the route they replace, so the recursion ends at single
//! stops at the latest.
//!
//! Stops never cross a greedy cut. The routes fall into consecutive groups,
//! and each group holds exactly the stops of one contiguous stretch of the
//! tour, so every customer is served exactly once.
//!
//! Past a configurable depth the resplit stops recursing and cuts the
//! route greedily in its 2-opt order.

use tracing::trace;

use crate::distance::DEPOT;
use crate::evaluation::RouteEvaluator;
use crate::local_search::two_opt;

/// Default recursion depth after which a route is split greedily without
/// 2-opt.
pub const MAX_RESPLIT_DEPTH: usize = 64;

/// Splits giant tours into routes that respect the duration limit.
///
/// # Examples
///
/// ```
/// use delivery_ga::distance::TravelMatrix;
/// use delivery_ga::evaluation::{RouteEvaluator, RouteLimits};
/// use delivery_ga::ga::split::Segmenter;
///
/// // Customers on a line, 1 time unit apart, no service time.
/// let dm = TravelMatrix::euclidean(
///     &[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0)],
///     1.0,
/// ).unwrap();
/// let evaluator = RouteEvaluator::new(&dm, RouteLimits::new(4.0, 0.0));
/// let segmenter = Segmenter::new(evaluator, 500);
///
/// // 0→1→2→0 takes 4; adding 3 would take 6.
/// let routes = segmenter.segment(&[1, 2, 3]);
/// assert_eq!(routes, vec![vec![1, 2], vec![3]]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Segmenter<'a> {
    evaluator: RouteEvaluator<'a>,
    max_passes: usize,
    max_depth: usize,
}

impl<'a> Segmenter<'a> {
    /// Creates a segmenter; `max_passes` caps 2-opt on every route.
    pub fn new(evaluator: RouteEvaluator<'a>, max_passes: usize) -> Self {
        Self {
            evaluator,
            max_passes,
            max_depth: MAX_RESPLIT_DEPTH,
        }
    }

    /// Caps resplit recursion. Routes still over the limit at this depth
    /// are cut greedily in their 2-opt order.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Evaluator used for the limit checks.
    pub fn evaluator(&self) -> &RouteEvaluator<'a> {
        &self.evaluator
    }

    /// Segments `tour` into locally optimized, duration-feasible routes.
    ///
    /// Every returned route fits the limit, except single-stop routes
    /// whose round trip alone exceeds it.
    pub fn segment(&self, tour: &[usize]) -> Vec<Vec<usize>> {
        let mut routes = Vec::new();
        self.segment_into(tour, 0, &mut routes);
        routes
    }

    fn segment_into(&self, tour: &[usize], depth: usize, routes: &mut Vec<Vec<usize>>) {
        let mut start = 0;
        while start < tour.len() {
            let end = start + self.feasible_prefix(&tour[start..]);
            let mut route = tour[start..end].to_vec();
            start = end;

            two_opt(&mut route, DEPOT, self.evaluator.matrix(), self.max_passes);

            if route.len() < 2 || self.evaluator.fits(&route) {
                routes.push(route);
            } else if depth >= self.max_depth {
                routes.extend(self.segment_greedy(&route));
            } else {
                trace!(len = route.len(), depth, "resplitting route over limit after 2-opt");
                self.segment_into(&route, depth + 1, routes);
            }
        }
    }

    /// Segments `tour` by the greedy scan alone, without 2-opt.
    pub fn segment_greedy(&self, tour: &[usize]) -> Vec<Vec<usize>> {
        let mut routes = Vec::new();
        let mut start = 0;
        while start < tour.len() {
            let end = start + self.feasible_prefix(&tour[start..]);
            routes.push(tour[start..end].to_vec());
            start = end;
        }
        routes
    }

    /// Number of leading stops of `tour` that fit on one route.
    ///
    /// Returns at least 1 for a non-empty tour: a stop that cannot fit on
    /// its own is still served alone.
    pub fn feasible_prefix(&self, tour: &[usize]) -> usize {
        let matrix = self.evaluator.matrix();
        let limit = self.evaluator.limits().max_duration;

        let mut elapsed = 0.0;
        let mut prev = DEPOT;
        let mut count = 0;
        for &next in tour {
            let candidate = elapsed + self.evaluator.leg_time(prev, next);
            if candidate + matrix.travel_time(next, DEPOT) > limit {
                break;
            }
            elapsed = candidate;
            prev = next;
            count += 1;
        }

        if tour.is_empty() {
            0
        } else {
            count.max(1)
        }
    }
}

/// Splits a tour into `trucks` contiguous blocks of `ceil(len / trucks)`
/// stops. Trailing blocks may be shorter or empty.
///
/// # Examples
///
/// ```
/// use delivery_ga::ga::split::split_blocks;
///
/// let blocks = split_blocks(&[1, 2, 3, 4, 5], 2);
/// assert_eq!(blocks, vec![&[1, 2, 3][..], &[4, 5][..]]);
/// ```
pub fn split_blocks(tour: &[usize], trucks: usize) -> Vec<&[usize]> {
    if trucks == 0 {
        return Vec::new();
    }
    let size = tour.len().div_ceil(trucks);
    (0..trucks)
        .map(|t| {
            let start = (t * size).min(tour.len());
            let end = (start + size).min(tour.len());
            &tour[start..end]
        })
        .collect()
}
