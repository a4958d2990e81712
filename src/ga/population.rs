//! Populations and fitness ranking.

use rand::Rng;
use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::tour::{PointTable, Route};

/// One entry of a ranked population.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ranked {
    /// Position of the route in its population.
    pub index: usize,
    /// Fitness of that route (`1 / distance`).
    pub fitness: f64,
}

/// The routes of a single generation.
///
/// The size is fixed when the population is created; generation steps
/// replace the membership but never the size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Population {
    routes: Vec<Route>,
}

impl Population {
    /// `size` independent uniformly random permutations of the table.
    pub fn random<R: Rng>(table: &PointTable, size: usize, rng: &mut R) -> Self {
        let routes = (0..size).map(|_| Route::random(table.len(), rng)).collect();
        Self { routes }
    }

    /// Wraps caller-supplied routes, checking each against `table`.
    pub fn from_routes(routes: Vec<Route>, table: &PointTable) -> Result<Self> {
        if routes.iter().any(|r| !table.is_permutation(r.order())) {
            return Err(Error::InvalidRoute {
                expected: table.len(),
            });
        }
        Ok(Self { routes })
    }

    pub(crate) fn from_offspring(routes: Vec<Route>) -> Self {
        Self { routes }
    }

    /// Number of routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Whether the population holds no routes.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// The routes in population order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Consumes the population, returning its routes.
    pub fn into_routes(self) -> Vec<Route> {
        self.routes
    }

    /// Ranks every route by fitness, best first.
    ///
    /// The sort is stable: routes of equal fitness keep their population
    /// order, which keeps elitism deterministic. Fitness evaluation runs on
    /// the rayon pool when `parallel` is set.
    pub fn rank(&self, table: &PointTable, parallel: bool) -> Result<Vec<Ranked>> {
        let fitness: Vec<f64> = if parallel {
            self.routes
                .par_iter()
                .map(|r| r.fitness(table))
                .collect::<Result<_>>()?
        } else {
            self.routes
                .iter()
                .map(|r| r.fitness(table))
                .collect::<Result<_>>()?
        };

        let mut ranked: Vec<Ranked> = fitness
            .into_iter()
            .enumerate()
            .map(|(index, fitness)| Ranked { index, fitness })
            .collect();
        ranked.sort_by(|a, b| {
            b.fitness
                .partial_cmp(&a.fitness)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        Ok(ranked)
    }

    /// Mean distance over all routes.
    pub fn mean_distance(&self, table: &PointTable) -> f64 {
        if self.routes.is_empty() {
            return 0.0;
        }
        let total: f64 = self.routes.iter().map(|r| r.distance(table)).sum();
        total / self.routes.len() as f64
    }
}
