//! Parent selection: elitism plus fitness-proportionate sampling.
//!
//! # References
//!
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and
//!   Machine Learning*, ch. 1 (roulette wheel)
//! - De Jong (1975), elitist strategy

use rand::Rng;

use super::population::{Population, Ranked};
use crate::tour::Route;

/// Chooses `ranked.len()` population indices to breed from.
///
/// The first `elite_size` entries are the top-ranked indices, in rank order.
/// Every remaining entry is an independent roulette-wheel draw over the
/// whole ranked list (elites included), with probability proportional to
/// fitness. Draws are with replacement.
///
/// `elite_size` is expected to have passed
/// [`EvolutionConfig::validate`](super::EvolutionConfig::validate), which
/// reports an out-of-range value as
/// [`Error::EliteOutOfRange`](crate::Error::EliteOutOfRange); the driver
/// never calls this with an unvalidated size.
///
/// # Panics
/// Panics if `elite_size > ranked.len()`.
pub fn select<R: Rng>(ranked: &[Ranked], elite_size: usize, rng: &mut R) -> Vec<usize> {
    assert!(
        elite_size <= ranked.len(),
        "elite_size must not exceed the population"
    );

    let mut selection: Vec<usize> = ranked[..elite_size].iter().map(|r| r.index).collect();
    if elite_size == ranked.len() {
        return selection;
    }

    let wheel = RouletteWheel::new(ranked);
    selection.extend((elite_size..ranked.len()).map(|_| ranked[wheel.spin(rng)].index));
    selection
}

/// Materializes the routes named by `selection`, preserving its order.
pub fn mating_pool(population: &Population, selection: &[usize]) -> Vec<Route> {
    selection
        .iter()
        .map(|&i| population.routes()[i].clone())
        .collect()
}

/// Prefix sums of fitness over a ranked list.
struct RouletteWheel {
    cumulative: Vec<f64>,
}

impl RouletteWheel {
    fn new(ranked: &[Ranked]) -> Self {
        let wheel = Self::with_scale(ranked, 1.0);
        if wheel.total().is_finite() {
            return wheel;
        }
        // Large finite fitness values can sum past f64::MAX; dividing by the
        // largest keeps the proportions and a finite total.
        let max = ranked.iter().map(|r| r.fitness).fold(0.0, f64::max);
        Self::with_scale(ranked, max)
    }

    fn with_scale(ranked: &[Ranked], scale: f64) -> Self {
        let cumulative = ranked
            .iter()
            .scan(0.0, |acc, r| {
                *acc += r.fitness / scale;
                Some(*acc)
            })
            .collect();
        Self { cumulative }
    }

    fn total(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    /// Position in the ranked list of the first entry whose cumulative
    /// fitness reaches a uniform draw from `[0, total)`.
    fn spin<R: Rng>(&self, rng: &mut R) -> usize {
        let draw = rng.random_range(0.0..self.total());
        self.position_of(draw)
    }

    fn position_of(&self, draw: f64) -> usize {
        let pos = self.cumulative.partition_point(|&c| c < draw);
        pos.min(self.cumulative.len() - 1) // floating-point fallback
    }
}
