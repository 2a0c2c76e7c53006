//! Population-level evolution of agents.
//!
//! A [`Simulation`] owns a fixed-size population. Every generation it runs
//! each agent to completion, scores it, records the generation and breeds
//! the next population from the fittest codes.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │         Simulation Loop             │
//! ├─────────────────────────────────────┤
//! │  Advance (rayon) │ Fitness │ Record │
//! ├─────────────────────────────────────┤
//! │  Elitism │ Selection │ Mutation     │
//! ├─────────────────────────────────────┤
//! │          Agent tape machine         │
//! └─────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use genalpha::config::GeneticConfig;
//! use genalpha::evolution::{EvolutionConfig, Simulation};
//! use std::sync::Arc;
//!
//! let settings = EvolutionConfig {
//!     population_size: 8,
//!     generations: 5,
//!     ..EvolutionConfig::default()
//! };
//! let seeds = vec!["AAAAAGUUUAUA".to_string()];
//! let mut sim = Simulation::new(Arc::new(GeneticConfig::default()), settings, &seeds);
//! let summary = sim.run()?;
//! assert_eq!(summary.generations_run, 5);
//! # Ok::<(), genalpha::evolution::EvolutionError>(())
//! ```

mod engine;
mod selection;
mod stats;

pub use engine::Simulation;
pub use selection::{SelectionConfig, SelectionMethod, SelectionResult, select_parents};
pub use stats::{
    FitnessStats, GenerationObserver, GenerationRecord, NoopObserver, RunSummary,
    cumulative_entropy,
};

use crate::peptide::DEFAULT_TARGET_WEIGHT;
use crate::sequence::MutationConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration for one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    /// Population size, capped at `limits.max_progeny`.
    pub population_size: usize,
    /// Generations per run, capped at `limits.max_iterations`.
    pub generations: usize,
    /// Step budget per agent per generation, capped at
    /// `limits.max_iterations`.
    pub max_steps: usize,
    /// Failed random codes tolerated while filling the initial population.
    pub max_attempts: usize,
    /// RNG seed for reproducibility.
    pub seed: u64,
    /// Stop after this many generations without improvement.
    pub stall_generations: Option<usize>,
    /// Smallest best-fitness gain that counts as improvement.
    pub min_improvement: f64,
    /// Peptide whose presence in the translated progeny earns a bonus.
    pub target_peptide: Option<String>,
    /// Bonus per target residue.
    pub target_weight: f64,
    /// Selection configuration.
    pub selection: SelectionConfig,
    /// Mutation configuration.
    pub mutation: MutationConfig,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            generations: 100,
            max_steps: 1000,
            max_attempts: 100,
            seed: 42,
            stall_generations: None,
            min_improvement: 0.0,
            target_peptide: None,
            target_weight: DEFAULT_TARGET_WEIGHT,
            selection: SelectionConfig::default(),
            mutation: MutationConfig::default(),
        }
    }
}

/// Error during evolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EvolutionError {
    /// No agent could be initialized.
    #[error("cannot run simulation: empty population")]
    EmptyPopulation,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evolution_config_default() {
        let config = EvolutionConfig::default();
        assert_eq!(config.population_size, 50);
        assert_eq!(config.selection.tournament_size, 3);
        assert_eq!(config.selection.elite_count, 1);
        assert!(config.target_peptide.is_none());
    }

    #[test]
    fn test_evolution_config_json_defaults() {
        let config: EvolutionConfig =
            serde_json::from_str(r#"{"generations": 7, "selection": {"method": "roulette"}}"#)
                .unwrap();
        assert_eq!(config.generations, 7);
        assert_eq!(config.selection.method, SelectionMethod::Roulette);
        assert_eq!(config.selection.tournament_size, 3);
        assert_eq!(config.population_size, 50);
    }
}
