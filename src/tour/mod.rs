//! Tour representation.
//!
//! Points live once in an immutable [`PointTable`]; candidate tours are
//! [`Route`]s of point ids, scored against the table.
//!
//! - **Distance**: sum of Euclidean edge lengths along the route, closing
//!   the loop from the last point back to the first.
//! - **Fitness**: `1 / distance`. Zero-length routes are rejected as
//!   [`DegenerateRoute`](crate::Error::DegenerateRoute).

mod points;
mod route;

pub use points::{Point, PointTable};
pub use route::Route;
