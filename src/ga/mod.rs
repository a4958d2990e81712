//! Evolutionary search over tours.
//!
//! One generation transition ranks the population by fitness, selects a
//! mating pool (elites first, then roulette-wheel draws), breeds it with
//! ordered crossover, and applies swap mutation to the offspring.
//!
//! # Key Types
//!
//! - [`EvolutionConfig`]: Population size, elite size, mutation rate, budget
//! - [`Population`]: The routes of one generation, and their [`Ranked`] order
//! - [`Evolution`]: Generation-by-generation driver yielding [`GenerationStats`]
//! - [`EvolutionRunner`]: Runs an [`Evolution`] to an [`EvolutionResult`]
//!
//! # Submodules
//!
//! - [`operators`]: Ordered crossover and swap mutation
//! - [`selection`]: Elitist fitness-proportionate selection and mating pools
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*
//! - Davis (1985), "Applying Adaptive Algorithms to Epistatic Domains"

mod config;
pub mod operators;
mod population;
mod runner;
pub mod selection;

pub use config::EvolutionConfig;
pub use population::{Population, Ranked};
pub use runner::{Evolution, EvolutionResult, EvolutionRunner, EvolutionState, GenerationStats};
