//! Crate-wide error type.
//!
//! Configuration errors are raised before any evolutionary work starts.
//! [`Error::DegenerateRoute`] is the only condition that can surface
//! mid-run, and it aborts the whole run.

/// Errors produced while configuring or running an evolution.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// `population_size` was zero.
    #[error("population_size must be at least 1")]
    EmptyPopulation,

    /// `elite_size` was larger than `population_size`.
    #[error("elite_size {elite_size} is outside [0, {population_size}]")]
    EliteOutOfRange {
        elite_size: usize,
        population_size: usize,
    },

    /// `mutation_rate` was NaN or outside `[0, 1]`.
    #[error("mutation_rate must lie in [0, 1], got {0}")]
    MutationRateOutOfRange(f64),

    /// Fewer than two points were supplied.
    #[error("at least 2 points are required, got {0}")]
    TooFewPoints(usize),

    /// A point had a NaN or infinite coordinate.
    #[error("point {index} has a non-finite coordinate")]
    NonFiniteCoordinate { index: usize },

    /// A caller-supplied route was not a permutation of the point table.
    #[error("route is not a permutation of 0..{expected}")]
    InvalidRoute { expected: usize },

    /// A caller-supplied population did not match `population_size`.
    #[error("population has {actual} routes, expected {expected}")]
    PopulationSizeMismatch { expected: usize, actual: usize },

    /// A route had zero total length, so its fitness is undefined.
    #[error("degenerate route: total distance is zero")]
    DegenerateRoute,

    /// A route's distance or fitness overflowed the range of `f64`.
    #[error("route distance {distance} has no finite, positive fitness")]
    NonFiniteFitness { distance: f64 },
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
