//! Gene expression programming for single-variable symbolic regression.
//!
//! Fixed-length linear chromosomes are decoded breadth-first (Karva
//! notation) into expression trees, scored against a training set, and
//! evolved with truncation selection, elitism, mutation, transposition and
//! recombination over a double-buffered population.
//!
//! ```
//! use genexpr::engines::evaluation::{SquaredErrorFitness, TrainingSet};
//! use genexpr::engines::generation::{EvolutionEngine, GenomeSpec, ConsoleProgressCallback};
//! use genexpr::config::EvolutionConfig;
//! use std::sync::Arc;
//!
//! let genome = Arc::new(GenomeSpec::from_chars("a", "+-*/", 5, 2)?);
//! let training = TrainingSet::new(&[-1.0, 0.0, 1.0], &[-1.0, 0.0, 1.0])?;
//! let config = EvolutionConfig {
//!     population_size: 50,
//!     max_generations: 500,
//!     mutation_rate: 0.1,
//!     crossover_one_point_rate: 0.3,
//!     seed: Some(1),
//!     ..EvolutionConfig::default()
//! };
//! let fitness = SquaredErrorFitness::new(training, 0.0, 1.0);
//! let mut engine = EvolutionEngine::new(genome, config, fitness)?;
//! let summary = engine.run(ConsoleProgressCallback::default())?;
//! assert!(summary.converged);
//! # Ok::<(), genexpr::GepError>(())
//! ```

pub mod config;
pub mod engines;
pub mod error;

pub use error::{DecodeError, GepError, Result};
