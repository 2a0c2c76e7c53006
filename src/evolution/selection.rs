//! Parent selection.
//!
//! The next generation keeps `elite_count` of the fittest codes unchanged
//! and fills the remaining slots with children of parents picked by
//! tournament or fitness-proportional (roulette) selection.

use rand::Rng;
use rand::seq::index;
use serde::{Deserialize, Serialize};

/// How parents are drawn from the population.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMethod {
    /// Best of `tournament_size` distinct random agents.
    #[default]
    Tournament,
    /// Probability proportional to fitness.
    Roulette,
}

/// Configuration for selection operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Selection operator.
    pub method: SelectionMethod,
    /// Number of agents competing in each tournament.
    pub tournament_size: usize,
    /// Number of elite codes carried over unchanged.
    pub elite_count: usize,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            method: SelectionMethod::Tournament,
            tournament_size: 3,
            elite_count: 1,
        }
    }
}

/// Indices chosen for the next generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionResult {
    /// Fittest individuals, best first.
    pub elite_indices: Vec<usize>,
    /// One parent per remaining slot.
    pub parents: Vec<usize>,
}

/// Choose elites and parents for a generation of `target_size`.
///
/// `elite_indices.len() + parents.len() == target_size` whenever `fitness`
/// is non-empty.
#[must_use]
pub fn select_parents<R: Rng>(
    fitness: &[f64],
    config: &SelectionConfig,
    target_size: usize,
    rng: &mut R,
) -> SelectionResult {
    if fitness.is_empty() {
        return SelectionResult {
            elite_indices: Vec::new(),
            parents: Vec::new(),
        };
    }

    let elite_count = config.elite_count.min(fitness.len()).min(target_size);
    let elite_indices = select_elite(fitness, elite_count);

    let parents = (elite_count..target_size)
        .map(|_| match config.method {
            SelectionMethod::Tournament => tournament_select(fitness, config.tournament_size, rng),
            SelectionMethod::Roulette => roulette_select(fitness, rng),
        })
        .collect();

    SelectionResult {
        elite_indices,
        parents,
    }
}

/// Indices of the `count` fittest individuals. Ties keep population order.
fn select_elite(fitness: &[f64], count: usize) -> Vec<usize> {
    let mut indexed: Vec<(usize, f64)> = fitness.iter().copied().enumerate().collect();
    indexed.sort_by(|a, b| b.1.total_cmp(&a.1));
    indexed.into_iter().take(count).map(|(i, _)| i).collect()
}

/// Best of `k` distinct individuals drawn at random.
fn tournament_select<R: Rng>(fitness: &[f64], k: usize, rng: &mut R) -> usize {
    let k = k.clamp(1, fitness.len());
    let mut best: Option<usize> = None;
    for idx in index::sample(rng, fitness.len(), k) {
        if best.is_none_or(|b| fitness[idx] > fitness[b]) {
            best = Some(idx);
        }
    }
    best.unwrap_or(0)
}

/// Fitness-proportional selection; uniform when no fitness is positive.
fn roulette_select<R: Rng>(fitness: &[f64], rng: &mut R) -> usize {
    let total: f64 = fitness.iter().map(|f| f.max(0.0)).sum();
    if total <= 0.0 {
        return rng.gen_range(0..fitness.len());
    }

    let mut spin = rng.gen_range(0.0..total);
    for (idx, f) in fitness.iter().enumerate() {
        let f = f.max(0.0);
        if spin < f {
            return idx;
        }
        spin -= f;
    }
    fitness.len() - 1
}
