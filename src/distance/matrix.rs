//! Dense distance and travel-time matrix.

use crate::error::{Result, RoutingError};

/// Location id of the depot. Every route starts and ends here.
pub const DEPOT: usize = 0;

/// One directed origin/destination record, as produced by a matrix loader.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TravelEdge {
    pub from: usize,
    pub to: usize,
    pub distance: f64,
    pub time: f64,
}

/// A dense n×n matrix of travel distances and travel times, stored in
/// row-major order.
///
/// Location [`DEPOT`] (index 0) is the depot, `1..n` are customers. The
/// matrix is immutable once built; share it across workers through an
/// [`Arc`](std::sync::Arc).
///
/// # Examples
///
/// ```
/// use delivery_ga::distance::TravelMatrix;
///
/// let dm = TravelMatrix::euclidean(&[(0.0, 0.0), (3.0, 4.0), (6.0, 8.0)], 1.0).unwrap();
/// assert!((dm.distance(0, 1) - 5.0).abs() < 1e-10);
/// assert!((dm.travel_time(1, 2) - 5.0).abs() < 1e-10);
/// assert_eq!(dm.point_count(), 3);
/// assert_eq!(dm.customer_count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct TravelMatrix {
    distances: Vec<f64>,
    times: Vec<f64>,
    size: usize,
    symmetric: bool,
}

impl TravelMatrix {
    /// Creates a matrix from explicit row-major distance and time grids.
    ///
    /// Fails if either buffer is not `size * size` long, if any entry is
    /// negative or not finite, or if there is no customer besides the depot.
    pub fn from_data(size: usize, distances: Vec<f64>, times: Vec<f64>) -> Result<Self> {
        let expected = size * size;
        for buf in [&distances, &times] {
            if buf.len() != expected {
                return Err(RoutingError::MatrixShape {
                    expected,
                    actual: buf.len(),
                });
            }
        }
        if size < 2 {
            return Err(RoutingError::EmptyPointSet);
        }

        for (kind, buf) in [("distance", &distances), ("time", &times)] {
            if let Some(idx) = buf.iter().position(|v| !v.is_finite() || *v < 0.0) {
                return Err(RoutingError::MatrixValue {
                    kind,
                    from: idx / size,
                    to: idx % size,
                    value: buf[idx],
                });
            }
        }

        let symmetric = (0..size).all(|i| {
            ((i + 1)..size).all(|j| distances[i * size + j] == distances[j * size + i])
        });

        Ok(Self {
            distances,
            times,
            size,
            symmetric,
        })
    }

    /// Creates a matrix from origin/destination records.
    ///
    /// The point count is the highest id seen plus one. Every ordered pair
    /// of distinct points must be present; the diagonal defaults to zero.
    /// A later record for the same pair overrides an earlier one.
    pub fn from_arcs<I>(edges: I) -> Result<Self>
    where
        I: IntoIterator<Item = TravelEdge>,
    {
        let edges: Vec<TravelEdge> = edges.into_iter().collect();
        let size = edges
            .iter()
            .map(|e| e.from.max(e.to) + 1)
            .max()
            .unwrap_or(0);

        let mut distances = vec![f64::NAN; size * size];
        let mut times = vec![f64::NAN; size * size];
        for i in 0..size {
            distances[i * size + i] = 0.0;
            times[i * size + i] = 0.0;
        }
        for e in &edges {
            distances[e.from * size + e.to] = e.distance;
            times[e.from * size + e.to] = e.time;
        }

        // NaN marks a pair the loader never provided.
        if let Some(idx) = distances
            .iter()
            .zip(&times)
            .position(|(d, t)| d.is_nan() || t.is_nan())
        {
            return Err(RoutingError::UndefinedPair {
                from: idx / size,
                to: idx % size,
            });
        }

        Self::from_data(size, distances, times)
    }

    /// Computes a symmetric Euclidean matrix from coordinates.
    ///
    /// Travel time is distance divided by `speed`. `points[0]` is the depot.
    pub fn euclidean(points: &[(f64, f64)], speed: f64) -> Result<Self> {
        let n = points.len();
        let mut distances = vec![0.0; n * n];
        let mut times = vec![0.0; n * n];
        for i in 0..n {
            for j in (i + 1)..n {
                let (dx, dy) = (points[i].0 - points[j].0, points[i].1 - points[j].1);
                let d = (dx * dx + dy * dy).sqrt();
                let t = d / speed;
                distances[i * n + j] = d;
                distances[j * n + i] = d;
                times[i * n + j] = t;
                times[j * n + i] = t;
            }
        }
        Self::from_data(n, distances, times)
    }

    /// Returns the travel distance from location `from` to location `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn distance(&self, from: usize, to: usize) -> f64 {
        self.distances[from * self.size + to]
    }

    /// Returns the travel time from location `from` to location `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn travel_time(&self, from: usize, to: usize) -> f64 {
        self.times[from * self.size + to]
    }

    /// Number of locations, depot included.
    pub fn point_count(&self) -> usize {
        self.size
    }

    /// Number of customers (every location except the depot).
    pub fn customer_count(&self) -> usize {
        self.size - 1
    }

    /// Customer ids in ascending order.
    pub fn customers(&self) -> impl Iterator<Item = usize> {
        1..self.size
    }

    /// Returns `true` if `distance(i, j) == distance(j, i)` for every pair.
    ///
    /// Reversing a route segment keeps its inner distance only when this
    /// holds, which lets 2-opt price a move from its two boundary edges.
    pub fn is_symmetric(&self) -> bool {
        self.symmetric
    }
}
