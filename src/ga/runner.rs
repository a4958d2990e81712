//! Generational loop execution.
//!
//! [`Evolution`] drives one run generation by generation and yields
//! per-generation telemetry lazily. [`EvolutionRunner`] runs it to
//! completion.
//!
//! Each transition is `mutate(breed(mating_pool(select(rank(current)))))`.
//! Every phase consumes the complete output of the previous one; per-route
//! work inside a phase may run on the rayon pool.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::rngs::StdRng;
use tracing::{debug, info, instrument, warn};

use super::config::EvolutionConfig;
use super::operators::{breed_population, mutate_population};
use super::population::{Population, Ranked};
use super::selection::{mating_pool, select};
use crate::error::{Error, Result};
use crate::random::rng_from_seed;
use crate::tour::{PointTable, Route};

/// Lifecycle of an [`Evolution`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvolutionState {
    /// Population seeded, nothing observed yet.
    Initialized,
    /// Generation loop in progress.
    Evolving,
    /// Generation budget exhausted, or the run failed.
    Terminated,
}

/// Telemetry for one generation.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenerationStats {
    /// Generation number; 0 is the initial population.
    pub generation: usize,
    /// Distance of the best route in this generation.
    pub best_distance: f64,
    /// Mean route distance in this generation.
    pub mean_distance: f64,
}

/// Result of an evolutionary run.
#[derive(Debug, Clone)]
pub struct EvolutionResult {
    /// Best route of the final population.
    ///
    /// This is not a best-ever record: if the last generation is worse than
    /// an earlier one, the earlier route is lost. See
    /// [`distance_history`](Self::distance_history) for the trajectory.
    pub best: Route,

    /// Distance of `best`.
    pub best_distance: f64,

    /// Number of generation transitions executed.
    pub generations: usize,

    /// Whether the run was cancelled externally.
    pub cancelled: bool,

    /// Best distance of each generation, starting with generation 0.
    pub distance_history: Vec<f64>,
}

/// A single evolutionary run, advanced one generation per iteration.
///
/// Iterating yields [`GenerationStats`] for generation 0 (the initial
/// population) and then for every completed transition, so a full run
/// yields `generation_count + 1` items. The first error ends the
/// iteration.
///
/// # Examples
///
/// ```
/// use u_salesman::ga::{Evolution, EvolutionConfig};
/// use u_salesman::tour::PointTable;
///
/// let table = PointTable::new(vec![(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)]).unwrap();
/// let config = EvolutionConfig::default()
///     .with_population_size(20)
///     .with_elite_size(2)
///     .with_generation_count(10)
///     .with_seed(1);
///
/// let evolution = Evolution::new(&table, &config).unwrap();
/// let history: Vec<f64> = evolution
///     .map(|stats| stats.unwrap().best_distance)
///     .collect();
/// assert_eq!(history.len(), 11);
/// ```
pub struct Evolution<'a> {
    table: &'a PointTable,
    config: EvolutionConfig,
    rng: StdRng,
    population: Population,
    ranked: Option<Vec<Ranked>>,
    generation: usize,
    state: EvolutionState,
    history: Vec<f64>,
    failure: Option<Error>,
}

impl<'a> Evolution<'a> {
    /// Validates `config` and seeds a random initial population.
    #[instrument(skip_all, fields(points = table.len(), population = config.population_size))]
    pub fn new(table: &'a PointTable, config: &EvolutionConfig) -> Result<Self> {
        config.validate()?;
        let mut rng = rng_from_seed(config.seed);
        let population = Population::random(table, config.population_size, &mut rng);
        debug!("initial population seeded");
        Ok(Self::from_parts(table, config, rng, population))
    }

    /// Validates `config` and starts from caller-supplied routes.
    ///
    /// `routes` must hold exactly `population_size` permutations of the
    /// table.
    #[instrument(skip_all, fields(points = table.len(), population = config.population_size))]
    pub fn with_population(
        table: &'a PointTable,
        config: &EvolutionConfig,
        routes: Vec<Route>,
    ) -> Result<Self> {
        config.validate()?;
        if routes.len() != config.population_size {
            return Err(Error::PopulationSizeMismatch {
                expected: config.population_size,
                actual: routes.len(),
            });
        }
        let population = Population::from_routes(routes, table)?;
        let rng = rng_from_seed(config.seed);
        Ok(Self::from_parts(table, config, rng, population))
    }

    fn from_parts(
        table: &'a PointTable,
        config: &EvolutionConfig,
        rng: StdRng,
        population: Population,
    ) -> Self {
        Self {
            table,
            config: config.clone(),
            rng,
            population,
            ranked: None,
            generation: 0,
            state: EvolutionState::Initialized,
            history: Vec::new(),
            failure: None,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> EvolutionState {
        self.state
    }

    /// Number of completed generation transitions.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// The current population.
    pub fn population(&self) -> &Population {
        &self.population
    }

    /// Best distances observed so far, one per generation.
    pub fn history(&self) -> &[f64] {
        &self.history
    }

    /// Runs the remaining generations and returns the final result.
    pub fn finish(mut self) -> Result<EvolutionResult> {
        for stats in self.by_ref() {
            stats?;
        }
        self.conclude(false)
    }

    /// Best route of the current population.
    fn conclude(mut self, cancelled: bool) -> Result<EvolutionResult> {
        if let Some(err) = self.failure.take() {
            return Err(err);
        }
        let ranked = self.ranked_population()?;
        let best = self.population.routes()[ranked[0].index].clone();
        let best_distance = best.distance(self.table);
        Ok(EvolutionResult {
            best,
            best_distance,
            generations: self.generation,
            cancelled,
            distance_history: self.history,
        })
    }

    fn ranked_population(&mut self) -> Result<Vec<Ranked>> {
        match self.ranked.take() {
            Some(ranked) => Ok(ranked),
            None => self.population.rank(self.table, self.config.parallel),
        }
    }

    /// Replaces the population with the next generation.
    fn advance(&mut self) -> Result<()> {
        let ranked = self.ranked_population()?;

        // A lone route is its own elite and has no partner to breed with.
        if self.population.len() > 1 {
            let elite_size = self.config.elite_size;
            let parallel = self.config.parallel;

            let selection = select(&ranked, elite_size, &mut self.rng);
            let pool = mating_pool(&self.population, &selection);
            let mut children = breed_population(&pool, elite_size, &mut self.rng, parallel);
            mutate_population(
                &mut children,
                self.config.mutation_rate,
                &mut self.rng,
                parallel,
            );
            self.population = Population::from_offspring(children);
        }

        self.generation += 1;
        Ok(())
    }

    /// Ranks the current population and records its telemetry.
    fn observe(&mut self) -> Result<GenerationStats> {
        let ranked = self.population.rank(self.table, self.config.parallel)?;
        let best = &self.population.routes()[ranked[0].index];
        let stats = GenerationStats {
            generation: self.generation,
            best_distance: best.distance(self.table),
            mean_distance: self.population.mean_distance(self.table),
        };
        self.ranked = Some(ranked);
        self.history.push(stats.best_distance);
        debug!(
            generation = stats.generation,
            best_distance = stats.best_distance,
            mean_distance = stats.mean_distance,
            "generation ranked"
        );
        Ok(stats)
    }
}

impl Iterator for Evolution<'_> {
    type Item = Result<GenerationStats>;

    fn next(&mut self) -> Option<Self::Item> {
        let step = match self.state {
            EvolutionState::Terminated => return None,
            EvolutionState::Initialized => self.observe(),
            EvolutionState::Evolving => self.advance().and_then(|()| self.observe()),
        };

        match step {
            Ok(stats) => {
                if self.generation >= self.config.generation_count {
                    self.state = EvolutionState::Terminated;
                    info!(
                        generations = self.generation,
                        best_distance = stats.best_distance,
                        "evolution terminated"
                    );
                } else {
                    self.state = EvolutionState::Evolving;
                }
                Some(Ok(stats))
            }
            Err(err) => {
                warn!(generation = self.generation, error = %err, "evolution aborted");
                self.state = EvolutionState::Terminated;
                self.failure = Some(err.clone());
                Some(Err(err))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = match self.state {
            EvolutionState::Terminated => 0,
            EvolutionState::Initialized => self.config.generation_count.saturating_add(1),
            EvolutionState::Evolving => self.config.generation_count - self.generation,
        };
        (0, Some(remaining))
    }
}

/// Executes a complete evolutionary run.
///
/// # Usage
///
/// ```
/// use u_salesman::ga::{EvolutionConfig, EvolutionRunner};
/// use u_salesman::tour::PointTable;
///
/// let table = PointTable::new(vec![(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)]).unwrap();
/// let config = EvolutionConfig::default()
///     .with_population_size(50)
///     .with_elite_size(5)
///     .with_mutation_rate(0.02)
///     .with_generation_count(100)
///     .with_seed(42);
///
/// let result = EvolutionRunner::run(&table, &config).unwrap();
/// assert!((result.best_distance - 4.0).abs() < 1e-9);
/// ```
pub struct EvolutionRunner;

impl EvolutionRunner {
    /// Runs the full generation budget.
    pub fn run(table: &PointTable, config: &EvolutionConfig) -> Result<EvolutionResult> {
        Self::run_with_cancel(table, config, None)
    }

    /// Runs with an optional cancellation token.
    ///
    /// If `cancel` is `Some` and the flag is set to `true`, the run stops at
    /// the next generation boundary and returns the best route of the
    /// population reached so far, flagged as cancelled.
    #[instrument(skip_all, fields(points = table.len(), generations = config.generation_count))]
    pub fn run_with_cancel(
        table: &PointTable,
        config: &EvolutionConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<EvolutionResult> {
        let mut evolution = Evolution::new(table, config)?;

        while let Some(stats) = evolution.next() {
            stats?;
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) && evolution.state() != EvolutionState::Terminated
                {
                    warn!(generation = evolution.generation(), "evolution cancelled");
                    return evolution.conclude(true);
                }
            }
        }

        evolution.conclude(false)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;

    fn unit_square() -> PointTable {
        PointTable::new(vec![(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)]).unwrap()
    }

    fn circle(n: usize) -> PointTable {
        PointTable::new((0..n).map(|i| {
            let angle = i as f64 / n as f64 * std::f64::consts::TAU;
            (angle.cos() * 10.0, angle.sin() * 10.0)
        }))
        .unwrap()
    }

    fn square_config() -> EvolutionConfig {
        EvolutionConfig::default()
            .with_population_size(50)
            .with_elite_size(5)
            .with_mutation_rate(0.02)
            .with_generation_count(100)
            .with_seed(42)
    }

    #[test]
    fn test_unit_square_converges() {
        let table = unit_square();
        for seed in [1, 42, 2024] {
            let result = EvolutionRunner::run(&table, &square_config().with_seed(seed)).unwrap();
            assert!(
                (result.best_distance - 4.0).abs() < 1e-9,
                "seed {seed}: expected 4.0, got {}",
                result.best_distance
            );
            assert!(table.is_permutation(result.best.order()));
            assert_eq!(result.generations, 100);
            assert!(!result.cancelled);
        }
    }

    #[test]
    fn test_circle_improves() {
        let table = circle(12);
        let config = EvolutionConfig::default()
            .with_population_size(100)
            .with_elite_size(20)
            .with_mutation_rate(0.01)
            .with_generation_count(200)
            .with_seed(42);

        let result = EvolutionRunner::run(&table, &config).unwrap();
        let first = result.distance_history[0];
        assert!(
            result.best_distance < first,
            "expected improvement over {first}, got {}",
            result.best_distance
        );
    }

    #[test]
    fn test_history_length() {
        let table = circle(8);
        let config = square_config().with_generation_count(30);
        let result = EvolutionRunner::run(&table, &config).unwrap();
        assert_eq!(result.distance_history.len(), 31);
        assert_eq!(
            result.distance_history.last().copied(),
            Some(result.best_distance)
        );
    }

    #[test]
    fn test_zero_generations_returns_initial_best() {
        let table = circle(6);
        let config = square_config().with_generation_count(0);

        let evolution = Evolution::new(&table, &config).unwrap();
        let initial = evolution.population().clone();
        let result = evolution.finish().unwrap();

        assert_eq!(result.generations, 0);
        assert_eq!(result.distance_history.len(), 1);
        let ranked = initial.rank(&table, false).unwrap();
        assert_eq!(result.best, initial.routes()[ranked[0].index]);
    }

    #[test]
    fn test_state_machine() {
        let table = unit_square();
        let config = square_config().with_generation_count(2);
        let mut evolution = Evolution::new(&table, &config).unwrap();
        assert_eq!(evolution.state(), EvolutionState::Initialized);

        let stats = evolution.next().unwrap().unwrap();
        assert_eq!(stats.generation, 0);
        assert_eq!(evolution.state(), EvolutionState::Evolving);

        assert_eq!(evolution.next().unwrap().unwrap().generation, 1);
        assert_eq!(evolution.state(), EvolutionState::Evolving);
        assert_eq!(evolution.next().unwrap().unwrap().generation, 2);
        assert_eq!(evolution.state(), EvolutionState::Terminated);
        assert!(evolution.next().is_none());
        assert_eq!(evolution.generation(), 2);
        assert_eq!(evolution.history().len(), 3);
    }

    #[test]
    fn test_reproducible_with_seed() {
        let table = circle(10);
        let config = square_config().with_generation_count(40).with_seed(7);

        let mut a = Evolution::new(&table, &config).unwrap();
        let mut b = Evolution::new(&table, &config).unwrap();
        assert_eq!(a.population(), b.population());
        loop {
            match (a.next(), b.next()) {
                (Some(x), Some(y)) => {
                    assert_eq!(x.unwrap(), y.unwrap());
                    assert_eq!(a.population(), b.population());
                }
                (None, None) => break,
                _ => panic!("runs ended at different generations"),
            }
        }
        let (ra, rb) = (a.finish().unwrap(), b.finish().unwrap());
        assert_eq!(ra.best, rb.best);
        assert_eq!(ra.distance_history, rb.distance_history);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let table = circle(15);
        let config = square_config().with_generation_count(25).with_seed(3);

        let seq = EvolutionRunner::run(&table, &config.clone().with_parallel(false)).unwrap();
        let par = EvolutionRunner::run(&table, &config.with_parallel(true)).unwrap();
        assert_eq!(seq.best, par.best);
        assert_eq!(seq.distance_history, par.distance_history);
    }

    #[test]
    fn test_single_route_population_is_unchanged() {
        let table = circle(7);
        for elite_size in [0, 1] {
            let config = EvolutionConfig::default()
                .with_population_size(1)
                .with_elite_size(elite_size)
                .with_mutation_rate(0.5)
                .with_generation_count(20)
                .with_seed(9);

            let evolution = Evolution::new(&table, &config).unwrap();
            let initial = evolution.population().routes()[0].clone();
            let result = evolution.finish().unwrap();

            assert_eq!(result.best, initial);
            assert_eq!(result.generations, 20);
            assert!(result
                .distance_history
                .iter()
                .all(|&d| d == result.best_distance));
        }
    }

    #[test]
    fn test_all_elite_population_is_unchanged_before_mutation() {
        let table = circle(6);
        let config = square_config()
            .with_population_size(8)
            .with_elite_size(8)
            .with_mutation_rate(0.0)
            .with_generation_count(5);

        let evolution = Evolution::new(&table, &config).unwrap();
        let initial = evolution.population().clone();
        let ranked = initial.rank(&table, false).unwrap();
        let result = evolution.finish().unwrap();
        assert_eq!(result.best, initial.routes()[ranked[0].index]);
    }

    #[test]
    fn test_elites_feed_next_generation_unchanged() {
        let table = circle(9);
        let mut rng = create_rng(42);
        let population = Population::random(&table, 30, &mut rng);
        let k = 4;

        let ranked = population.rank(&table, false).unwrap();
        let selection = select(&ranked, k, &mut rng);
        let pool = mating_pool(&population, &selection);
        let offspring = breed_population(&pool, k, &mut rng, true);

        let top: Vec<&Route> = ranked[..k]
            .iter()
            .map(|r| &population.routes()[r.index])
            .collect();
        let carried: Vec<&Route> = offspring[..k].iter().collect();
        assert_eq!(carried, top);
    }

    #[test]
    fn test_invalid_config_starts_nothing() {
        let table = unit_square();
        let config = square_config().with_elite_size(51);
        assert!(matches!(
            EvolutionRunner::run(&table, &config),
            Err(Error::EliteOutOfRange { .. })
        ));
        assert!(matches!(
            Evolution::new(&table, &config.with_elite_size(5).with_mutation_rate(2.0)),
            Err(Error::MutationRateOutOfRange(_))
        ));
    }

    #[test]
    fn test_degenerate_points_abort_run() {
        let table = PointTable::new(vec![(1.0, 1.0); 5]).unwrap();
        let result = EvolutionRunner::run(&table, &square_config());
        assert!(matches!(result, Err(Error::DegenerateRoute)));

        let mut evolution = Evolution::new(&table, &square_config()).unwrap();
        assert!(matches!(evolution.next(), Some(Err(Error::DegenerateRoute))));
        assert_eq!(evolution.state(), EvolutionState::Terminated);
        assert!(evolution.next().is_none());
        assert!(matches!(evolution.finish(), Err(Error::DegenerateRoute)));
    }

    #[test]
    fn test_with_population_validates_routes() {
        let table = unit_square();
        let config = square_config().with_population_size(2).with_elite_size(1);

        let wrong_size =
            Evolution::with_population(&table, &config, vec![Route::new(vec![0, 1, 2, 3])]);
        assert!(matches!(
            wrong_size,
            Err(Error::PopulationSizeMismatch {
                expected: 2,
                actual: 1
            })
        ));

        let invalid = Evolution::with_population(
            &table,
            &config,
            vec![Route::new(vec![0, 1, 2, 3]), Route::new(vec![0, 0, 2, 3])],
        );
        assert!(matches!(invalid, Err(Error::InvalidRoute { expected: 4 })));

        let seeded = Evolution::with_population(
            &table,
            &config,
            vec![Route::new(vec![0, 2, 1, 3]), Route::new(vec![3, 2, 1, 0])],
        )
        .unwrap();
        assert_eq!(seeded.population().routes()[1], Route::new(vec![3, 2, 1, 0]));
    }

    #[test]
    fn test_cancellation() {
        let table = circle(10);
        let config = square_config().with_generation_count(10_000);
        let cancel = Arc::new(AtomicBool::new(true));

        let result = EvolutionRunner::run_with_cancel(&table, &config, Some(cancel)).unwrap();
        assert!(result.cancelled);
        assert_eq!(result.generations, 0);
        assert_eq!(result.distance_history.len(), 1);
    }

    #[test]
    fn test_huge_budget_cancels_without_preallocating() {
        let table = circle(6);
        let config = square_config()
            .with_population_size(4)
            .with_elite_size(1)
            .with_generation_count(usize::MAX);

        let evolution = Evolution::new(&table, &config).unwrap();
        assert_eq!(evolution.size_hint(), (0, Some(usize::MAX)));

        let cancel = Arc::new(AtomicBool::new(true));
        let result = EvolutionRunner::run_with_cancel(&table, &config, Some(cancel)).unwrap();
        assert!(result.cancelled);
        assert_eq!(result.distance_history.len(), 1);
    }

    #[test]
    fn test_overflowing_coordinates_abort_run() {
        let table = PointTable::new(vec![(-1e308, 0.0), (1e308, 0.0), (0.0, 1.0)]).unwrap();
        let config = square_config()
            .with_population_size(4)
            .with_elite_size(0);
        assert!(matches!(
            EvolutionRunner::run(&table, &config),
            Err(Error::NonFiniteFitness { .. })
        ));
    }

    #[test]
    fn test_unseeded_runs_complete() {
        let table = circle(6);
        let config = EvolutionConfig::default()
            .with_population_size(10)
            .with_elite_size(2)
            .with_generation_count(5);
        let result = EvolutionRunner::run(&table, &config).unwrap();
        assert_eq!(result.distance_history.len(), 6);
    }
}
