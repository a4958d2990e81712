//! Evolutionary solver for the Traveling Salesman Problem.
//!
//! Searches for a short closed tour through a fixed set of points with a
//! generational genetic algorithm:
//!
//! - **Ranking**: fitness is the inverse of the closed tour length; the
//!   population is sorted by fitness with a stable tie-break.
//! - **Selection**: the top `elite_size` routes are kept, the rest of the
//!   mating pool is drawn by fitness-proportionate (roulette-wheel) sampling.
//! - **Crossover**: Ordered Crossover (OX) over one shuffle of the pool.
//! - **Mutation**: per-position swap mutation.
//!
//! # Example
//!
//! ```
//! use u_salesman::ga::{EvolutionConfig, EvolutionRunner};
//! use u_salesman::tour::PointTable;
//!
//! let table = PointTable::new(vec![(0.0, 0.0), (4.0, 0.0), (4.0, 3.0), (0.0, 3.0), (2.0, 5.0)])?;
//! let config = EvolutionConfig::default()
//!     .with_population_size(60)
//!     .with_elite_size(10)
//!     .with_generation_count(50)
//!     .with_seed(42);
//!
//! let result = EvolutionRunner::run(&table, &config)?;
//! assert!(table.is_permutation(result.best.order()));
//! assert_eq!(result.distance_history.len(), 51);
//! # Ok::<(), u_salesman::Error>(())
//! ```
//!
//! # Architecture
//!
//! Points are stored once in an immutable [`tour::PointTable`]; routes hold
//! only point ids. A run owns one seedable generator; parallel work inside a
//! phase is driven by sub-seeds drawn from it, so seeded runs are
//! reproducible with or without the rayon pool.

pub mod error;
pub mod ga;
pub mod random;
pub mod tour;

pub use error::{Error, Result};
