//! Random sequence generation, mutation, and entropy.
//!
//! Every function that needs randomness takes the RNG explicitly so that a
//! seeded `SmallRng` reproduces the exact same sequences and mutations.

// Entropy works on counts converted to probabilities
#![allow(clippy::cast_precision_loss)]

use crate::alphabet::{Codon, split_codons};
use crate::config::GeneticConfig;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The kinds of mutation [`mutate`] can apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MutationKind {
    /// Add a random codon at the end.
    Append,
    /// Add a random codon at the start.
    Prepend,
    /// Insert a random codon before a random position.
    Insert,
    /// Replace a random codon with a random codon.
    Rewrite,
    /// Delete a random codon.
    Remove,
    /// Exchange two distinct codons.
    Swap,
    /// Reverse the codon order.
    Reverse,
    /// Leave the code unchanged.
    None,
}

/// Relative weights of each mutation kind.
///
/// The defaults (1 each, 3 for `none`) give every structural kind a one in
/// ten chance and leave the code untouched three times in ten. Append,
/// prepend, insert and remove change the length by one codon; set their
/// weights to zero (see [`MutationConfig::length_preserving`]) to keep the
/// length fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MutationConfig {
    /// Weight of [`MutationKind::Append`].
    pub append: u32,
    /// Weight of [`MutationKind::Prepend`].
    pub prepend: u32,
    /// Weight of [`MutationKind::Insert`].
    pub insert: u32,
    /// Weight of [`MutationKind::Rewrite`].
    pub rewrite: u32,
    /// Weight of [`MutationKind::Remove`].
    pub remove: u32,
    /// Weight of [`MutationKind::Swap`].
    pub swap: u32,
    /// Weight of [`MutationKind::Reverse`].
    pub reverse: u32,
    /// Weight of [`MutationKind::None`].
    pub none: u32,
}

impl Default for MutationConfig {
    fn default() -> Self {
        Self {
            append: 1,
            prepend: 1,
            insert: 1,
            rewrite: 1,
            remove: 1,
            swap: 1,
            reverse: 1,
            none: 3,
        }
    }
}

impl MutationConfig {
    /// Only mutations that keep the code length: rewrite, swap, reverse.
    #[must_use]
    pub fn length_preserving() -> Self {
        Self {
            append: 0,
            prepend: 0,
            insert: 0,
            remove: 0,
            ..Self::default()
        }
    }

    /// Configuration that always applies `kind`.
    #[must_use]
    pub fn only(kind: MutationKind) -> Self {
        let mut config = Self {
            append: 0,
            prepend: 0,
            insert: 0,
            rewrite: 0,
            remove: 0,
            swap: 0,
            reverse: 0,
            none: 0,
        };
        match kind {
            MutationKind::Append => config.append = 1,
            MutationKind::Prepend => config.prepend = 1,
            MutationKind::Insert => config.insert = 1,
            MutationKind::Rewrite => config.rewrite = 1,
            MutationKind::Remove => config.remove = 1,
            MutationKind::Swap => config.swap = 1,
            MutationKind::Reverse => config.reverse = 1,
            MutationKind::None => config.none = 1,
        }
        config
    }

    fn weights(&self) -> [(MutationKind, u32); 8] {
        [
            (MutationKind::Append, self.append),
            (MutationKind::Prepend, self.prepend),
            (MutationKind::Insert, self.insert),
            (MutationKind::Rewrite, self.rewrite),
            (MutationKind::Remove, self.remove),
            (MutationKind::Swap, self.swap),
            (MutationKind::Reverse, self.reverse),
            (MutationKind::None, self.none),
        ]
    }

    /// Draw a mutation kind according to the weights.
    pub fn choose<R: Rng>(&self, rng: &mut R) -> MutationKind {
        let weights = self.weights();
        let total: u64 = weights.iter().map(|(_, w)| u64::from(*w)).sum();
        if total == 0 {
            return MutationKind::None;
        }

        let mut roll = rng.gen_range(0..total);
        for (kind, weight) in weights {
            let weight = u64::from(weight);
            if roll < weight {
                return kind;
            }
            roll -= weight;
        }
        MutationKind::None
    }
}

/// Random string of `length` characters drawn uniformly from the alphabet.
///
/// The result is not guaranteed to be a valid tape.
pub fn generate<R: Rng>(config: &GeneticConfig, length: usize, rng: &mut R) -> String {
    let symbols: Vec<char> = config.alphabet.chars().collect();
    (0..length).filter_map(|_| symbols.choose(rng)).collect()
}

/// One random alphabet codon.
pub fn create_codon<R: Rng>(config: &GeneticConfig, rng: &mut R) -> Codon {
    Codon::from(generate(config, config.codon_size, rng))
}

/// Random code of between `min_gene_size` and `mid_gene_size` (exclusive)
/// codons.
pub fn create_string<R: Rng>(config: &GeneticConfig, rng: &mut R) -> String {
    let min = config.limits.min_gene_size;
    let mid = config.limits.mid_gene_size;
    let codons = if mid > min { rng.gen_range(min..mid) } else { min };
    generate(config, codons * config.codon_size, rng)
}

/// Apply one random mutation to `code`.
///
/// The code is handled codon by codon; growing mutations stop at
/// `max_gene_size` codons and removal stops at `min_gene_size`. The result
/// is not re-validated.
pub fn mutate<R: Rng>(
    config: &GeneticConfig,
    code: &str,
    mutation: &MutationConfig,
    rng: &mut R,
) -> String {
    if code.is_empty() {
        return String::new();
    }
    let kind = mutation.choose(rng);
    let mut tape = split_codons(code, config.codon_size);
    apply(config, &mut tape, kind, rng);
    tape.concat()
}

fn apply<R: Rng>(config: &GeneticConfig, tape: &mut Vec<String>, kind: MutationKind, rng: &mut R) {
    let limits = &config.limits;
    let can_grow = tape.len() < limits.max_gene_size;

    match kind {
        MutationKind::Append if can_grow => {
            tape.push(create_codon(config, rng).to_string());
        }
        MutationKind::Prepend if can_grow => {
            tape.insert(0, create_codon(config, rng).to_string());
        }
        MutationKind::Insert if can_grow && !tape.is_empty() => {
            let pos = rng.gen_range(0..tape.len());
            tape.insert(pos, create_codon(config, rng).to_string());
        }
        MutationKind::Rewrite if !tape.is_empty() => {
            let pos = rng.gen_range(0..tape.len());
            tape[pos] = create_codon(config, rng).to_string();
        }
        MutationKind::Remove if tape.len() > limits.min_gene_size => {
            let pos = rng.gen_range(0..tape.len());
            tape.remove(pos);
        }
        MutationKind::Swap if tape.len() >= 2 => {
            let i = rng.gen_range(0..tape.len());
            let mut j = rng.gen_range(0..tape.len() - 1);
            if j >= i {
                j += 1;
            }
            tape.swap(i, j);
        }
        MutationKind::Reverse => tape.reverse(),
        _ => {}
    }
}

/// Shannon entropy (base 2) of the codon frequencies in `sequence`.
///
/// Returns 0.0 for an empty sequence.
#[must_use]
pub fn entropy(sequence: &str, codon_size: usize) -> f64 {
    let codons = split_codons(sequence, codon_size);
    if codons.is_empty() {
        return 0.0;
    }

    let mut histogram: HashMap<&str, usize> = HashMap::new();
    for codon in &codons {
        *histogram.entry(codon.as_str()).or_default() += 1;
    }

    let total = codons.len() as f64;
    histogram
        .values()
        .map(|&count| {
            let p = count as f64 / total;
            p * (1.0 / p).log2()
        })
        .sum()
}
