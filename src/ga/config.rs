//! Evolution configuration.
//!
//! [`EvolutionConfig`] holds all parameters that control the generational
//! loop.

use crate::error::{Error, Result};

/// Configuration for the evolutionary TSP search.
///
/// # Defaults
///
/// ```
/// use u_salesman::ga::EvolutionConfig;
///
/// let config = EvolutionConfig::default();
/// assert_eq!(config.population_size, 100);
/// assert_eq!(config.elite_size, 20);
/// assert_eq!(config.generation_count, 500);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_salesman::ga::EvolutionConfig;
///
/// let config = EvolutionConfig::default()
///     .with_population_size(50)
///     .with_elite_size(5)
///     .with_mutation_rate(0.02)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EvolutionConfig {
    /// Number of routes in every generation. Must be at least 1.
    pub population_size: usize,

    /// Number of top-ranked routes carried into the next generation's
    /// offspring unchanged. Must lie in `[0, population_size]`.
    pub elite_size: usize,

    /// Per-position probability of a swap during mutation (0.0–1.0).
    pub mutation_rate: f64,

    /// Number of generation transitions to run.
    pub generation_count: usize,

    /// Whether per-route work (fitness, crossover pairs, mutation) runs on
    /// the rayon pool. Results are identical either way.
    pub parallel: bool,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            elite_size: 20,
            mutation_rate: 0.01,
            generation_count: 500,
            parallel: true,
            seed: None,
        }
    }
}

impl EvolutionConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the elite size.
    pub fn with_elite_size(mut self, n: usize) -> Self {
        self.elite_size = n;
        self
    }

    /// Sets the mutation rate.
    ///
    /// Out-of-range values are kept as given and rejected by
    /// [`validate`](Self::validate).
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate;
        self
    }

    /// Sets the number of generations.
    pub fn with_generation_count(mut self, n: usize) -> Self {
        self.generation_count = n;
        self
    }

    /// Enables or disables parallel per-route work.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.population_size == 0 {
            return Err(Error::EmptyPopulation);
        }
        if self.elite_size > self.population_size {
            return Err(Error::EliteOutOfRange {
                elite_size: self.elite_size,
                population_size: self.population_size,
            });
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(Error::MutationRateOutOfRange(self.mutation_rate));
        }
        Ok(())
    }
}
