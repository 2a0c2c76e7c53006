//! Per-generation records and run summaries.

// Statistics divide by population counts
#![allow(clippy::cast_precision_loss)]

use crate::agent::{Agent, AgentSnapshot};
use crate::sequence::entropy;
use serde::{Deserialize, Serialize};

/// Fitness statistics over one population.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitnessStats {
    /// Mean fitness.
    pub mean: f64,
    /// Best fitness.
    pub best: f64,
    /// Worst fitness.
    pub worst: f64,
    /// Population standard deviation.
    pub std_dev: f64,
}

impl FitnessStats {
    /// Calculate statistics from fitness values.
    #[must_use]
    pub fn from_fitness(fitness: &[f64]) -> Self {
        if fitness.is_empty() {
            return Self {
                mean: 0.0,
                best: 0.0,
                worst: 0.0,
                std_dev: 0.0,
            };
        }

        let n = fitness.len() as f64;
        let mean = fitness.iter().sum::<f64>() / n;
        let best = fitness.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let worst = fitness.iter().copied().fold(f64::INFINITY, f64::min);
        let variance = fitness.iter().map(|f| (f - mean).powi(2)).sum::<f64>() / n;

        Self {
            mean,
            best,
            worst,
            std_dev: variance.sqrt(),
        }
    }
}

/// Summary of one generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRecord {
    /// Zero-based generation index.
    pub generation: usize,
    /// Fittest agent of the generation.
    pub best: AgentSnapshot,
    /// Fitness statistics.
    pub fitness: FitnessStats,
    /// Sum of per-agent entropies.
    pub cumulative_entropy: f64,
    /// Agents whose code validated.
    pub valid_agents: usize,
    /// Population size.
    pub population_size: usize,
}

/// Outcome of a whole run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Fittest agent seen in any generation.
    pub best: AgentSnapshot,
    /// Its fitness.
    pub best_fitness: f64,
    /// Generation it appeared in.
    pub best_generation: usize,
    /// One record per generation run.
    pub records: Vec<GenerationRecord>,
    /// Cumulative entropy of the final population.
    pub final_cumulative_entropy: f64,
    /// Number of generations evaluated.
    pub generations_run: usize,
    /// Whether the run stopped early for lack of improvement.
    pub converged: bool,
}

/// Sum over agents of the entropy of their progeny, or of their code when
/// the progeny is empty.
#[must_use]
pub fn cumulative_entropy(population: &[Agent]) -> f64 {
    population
        .iter()
        .map(|agent| {
            let sequence = if agent.progeny_code().is_empty() {
                agent.code()
            } else {
                agent.progeny_code()
            };
            entropy(sequence, agent.config().codon_size)
        })
        .sum()
}

/// Receives each generation as it completes.
pub trait GenerationObserver {
    /// Called after generation `record.generation` of `total` was evaluated.
    fn on_generation(&mut self, record: &GenerationRecord, total: usize);
}

/// Observer that ignores every generation.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl GenerationObserver for NoopObserver {
    fn on_generation(&mut self, _record: &GenerationRecord, _total: usize) {}
}
