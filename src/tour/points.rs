//! Immutable coordinate table.

use crate::error::{Error, Result};

/// A point in the plane.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Creates a point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance_to(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// The fixed set of points a tour must visit.
///
/// A point's id is its position in the table. The table is never modified
/// after construction and is shared by reference across every route,
/// population, and worker thread.
///
/// # Examples
///
/// ```
/// use u_salesman::tour::PointTable;
///
/// let table = PointTable::new(vec![(0.0, 0.0), (3.0, 4.0)]).unwrap();
/// assert_eq!(table.len(), 2);
/// assert!((table.distance(0, 1) - 5.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PointTable {
    points: Vec<Point>,
}

impl PointTable {
    /// Builds a table from coordinates.
    ///
    /// Fails with [`Error::TooFewPoints`] when fewer than two points are
    /// supplied and with [`Error::NonFiniteCoordinate`] on NaN or infinite
    /// coordinates.
    pub fn new<P: Into<Point>>(points: impl IntoIterator<Item = P>) -> Result<Self> {
        let points: Vec<Point> = points.into_iter().map(Into::into).collect();
        if points.len() < 2 {
            return Err(Error::TooFewPoints(points.len()));
        }
        if let Some(index) = points
            .iter()
            .position(|p| !p.x.is_finite() || !p.y.is_finite())
        {
            return Err(Error::NonFiniteCoordinate { index });
        }
        Ok(Self { points })
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always `false`: a table holds at least two points.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The point with id `id`.
    ///
    /// # Panics
    /// Panics if `id` is out of range.
    pub fn point(&self, id: usize) -> &Point {
        &self.points[id]
    }

    /// All points in id order.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Distance between the points with ids `a` and `b`.
    pub fn distance(&self, a: usize, b: usize) -> f64 {
        self.points[a].distance_to(&self.points[b])
    }

    /// Length of the closed tour visiting `order`, including the edge from
    /// the last point back to the first.
    pub fn tour_length(&self, order: &[usize]) -> f64 {
        match order {
            [] | [_] => 0.0,
            [first, .., last] => {
                let open: f64 = order.windows(2).map(|w| self.distance(w[0], w[1])).sum();
                open + self.distance(*last, *first)
            }
        }
    }

    /// Whether `order` visits every id of this table exactly once.
    pub fn is_permutation(&self, order: &[usize]) -> bool {
        if order.len() != self.len() {
            return false;
        }
        let mut seen = vec![false; self.len()];
        for &id in order {
            if id >= seen.len() || seen[id] {
                return false;
            }
            seen[id] = true;
        }
        true
    }
}
