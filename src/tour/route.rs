//! Candidate tours.

use std::sync::OnceLock;

use rand::seq::SliceRandom;
use rand::Rng;

use super::points::PointTable;
use crate::error::{Error, Result};

/// One candidate tour: a permutation of point ids.
///
/// A route owns no coordinates, only the visiting order. Its closed-tour
/// distance is computed on first request and cached; any change to the
/// order through [`swap`](Route::swap) drops the cached value.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Route {
    order: Vec<usize>,
    #[cfg_attr(feature = "serde", serde(skip))]
    distance: OnceLock<f64>,
}

impl Route {
    /// Wraps an order without checking it.
    ///
    /// The order must be a permutation of the ids of the table it is later
    /// scored against; use [`Route::checked`] for untrusted input.
    pub fn new(order: Vec<usize>) -> Self {
        Self {
            order,
            distance: OnceLock::new(),
        }
    }

    /// Wraps an order after verifying it is a permutation of `table`.
    pub fn checked(order: Vec<usize>, table: &PointTable) -> Result<Self> {
        if table.is_permutation(&order) {
            Ok(Self::new(order))
        } else {
            Err(Error::InvalidRoute {
                expected: table.len(),
            })
        }
    }

    /// A uniformly random permutation of `0..n`.
    pub fn random<R: Rng>(n: usize, rng: &mut R) -> Self {
        let mut order: Vec<usize> = (0..n).collect();
        order.shuffle(rng);
        Self::new(order)
    }

    /// The visiting order.
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Consumes the route, returning its order.
    pub fn into_order(self) -> Vec<usize> {
        self.order
    }

    /// Number of points visited.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the route visits no points.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Exchanges the points at positions `i` and `j`.
    pub fn swap(&mut self, i: usize, j: usize) {
        if i != j {
            self.order.swap(i, j);
            self.distance = OnceLock::new();
        }
    }

    /// Closed-tour length, cached after the first call.
    pub fn distance(&self, table: &PointTable) -> f64 {
        *self.distance.get_or_init(|| {
            debug_assert!(
                table.is_permutation(&self.order),
                "route is not a permutation of the point table"
            );
            table.tour_length(&self.order)
        })
    }

    /// Fitness: the inverse of [`distance`](Route::distance).
    ///
    /// Fails with [`Error::DegenerateRoute`] when the tour has zero length,
    /// and with [`Error::NonFiniteFitness`] when coordinates are so far apart
    /// (or so close) that the distance or its inverse leaves the finite range.
    pub fn fitness(&self, table: &PointTable) -> Result<f64> {
        let distance = self.distance(table);
        if distance == 0.0 {
            return Err(Error::DegenerateRoute);
        }
        let fitness = 1.0 / distance;
        if distance.is_finite() && fitness.is_finite() && fitness > 0.0 {
            Ok(fitness)
        } else {
            Err(Error::NonFiniteFitness { distance })
        }
    }

    /// The cached distance, if already computed.
    pub fn cached_distance(&self) -> Option<f64> {
        self.distance.get().copied()
    }
}

impl PartialEq for Route {
    fn eq(&self, other: &Self) -> bool {
        self.order == other.order
    }
}

impl Eq for Route {}

impl From<Vec<usize>> for Route {
    fn from(order: Vec<usize>) -> Self {
        Self::new(order)
    }
}
