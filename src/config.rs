//! Genetic configuration: alphabet, codon size, operation table and limits.
//!
//! A [`GeneticConfig`] is built once, validated, and then shared read-only
//! (usually behind an `Arc`) by agents, the interpreter and the simulation.

use crate::alphabet::{DEFAULT_ALPHABET, DEFAULT_CODON_SIZE, OperationTable};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Size and iteration limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Upper bound for generations per run and steps per agent.
    pub max_iterations: usize,
    /// Maximum genome size in codons; growing mutations stop here.
    pub max_gene_size: usize,
    /// Exclusive upper bound (in codons) for random initial genomes.
    pub mid_gene_size: usize,
    /// Minimum genome size in codons; shrinking mutations stop here.
    pub min_gene_size: usize,
    /// Maximum population size.
    pub max_progeny: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            max_gene_size: 1024,
            mid_gene_size: 10,
            min_gene_size: 2,
            max_progeny: 128,
        }
    }
}

/// Complete configuration of the genetic alphabet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneticConfig {
    /// Codon size in characters.
    pub codon_size: usize,
    /// Characters a data codon may be made of.
    pub alphabet: String,
    /// Trace every agent step and every bred agent at debug level.
    pub verbose: bool,
    /// Operation name to codon mapping.
    pub operations: OperationTable,
    /// Size and iteration limits.
    pub limits: Limits,
}

impl Default for GeneticConfig {
    fn default() -> Self {
        Self {
            codon_size: DEFAULT_CODON_SIZE,
            alphabet: DEFAULT_ALPHABET.to_string(),
            verbose: false,
            operations: OperationTable::default(),
            limits: Limits::default(),
        }
    }
}

impl GeneticConfig {
    /// Default configuration with a custom operation table.
    #[must_use]
    pub fn with_operations(operations: OperationTable) -> Self {
        Self {
            operations,
            ..Self::default()
        }
    }

    /// Parse and validate a configuration from TOML text.
    ///
    /// Missing keys fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or the result fails
    /// [`GeneticConfig::validate`].
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is invalid.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Check the configuration invariants.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] describing the first violated invariant.
    pub fn validate(&self) -> Result<()> {
        if self.codon_size == 0 {
            return Err(Error::Config("codon_size must be positive".to_string()));
        }
        if self.alphabet.is_empty() {
            return Err(Error::Config("alphabet must not be empty".to_string()));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = self.alphabet.chars().find(|c| !seen.insert(*c)) {
            return Err(Error::Config(format!("alphabet repeats {dup:?}")));
        }
        if let Some(codon) = self
            .operations
            .all_codons()
            .find(|codon| codon.char_len() != self.codon_size)
        {
            return Err(Error::Config(format!(
                "operation codon {codon} is not {} characters long",
                self.codon_size
            )));
        }

        let limits = &self.limits;
        if limits.min_gene_size == 0 {
            return Err(Error::Config("min_gene_size must be positive".to_string()));
        }
        if limits.min_gene_size >= limits.mid_gene_size {
            return Err(Error::Config(
                "min_gene_size must be smaller than mid_gene_size".to_string(),
            ));
        }
        if limits.mid_gene_size > limits.max_gene_size {
            return Err(Error::Config(
                "mid_gene_size must not exceed max_gene_size".to_string(),
            ));
        }
        if limits.max_iterations == 0 || limits.max_progeny == 0 {
            return Err(Error::Config(
                "max_iterations and max_progeny must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether `c` belongs to the alphabet.
    #[must_use]
    pub fn in_alphabet(&self, c: char) -> bool {
        self.alphabet.contains(c)
    }

    /// Whether `chunk` is non-empty and made only of alphabet characters.
    #[must_use]
    pub fn is_alphabet_string(&self, chunk: &str) -> bool {
        !chunk.is_empty() && chunk.chars().all(|c| self.in_alphabet(c))
    }

    /// Whether a single chunk is a usable codon: either a registered
    /// operation codon or an alphabet-only string of codon size.
    #[must_use]
    pub fn is_codon(&self, chunk: &str) -> bool {
        self.operations.is_operation_codon(chunk)
            || (chunk.chars().count() == self.codon_size && self.is_alphabet_string(chunk))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet::op;

    #[test]
    fn test_default_config_is_valid() {
        let config = GeneticConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.codon_size, 3);
        assert_eq!(config.limits.max_iterations, 1000);
        assert_eq!(config.limits.max_gene_size, 1024);
        assert_eq!(config.limits.mid_gene_size, 10);
        assert_eq!(config.limits.min_gene_size, 2);
        assert_eq!(config.limits.max_progeny, 128);
        assert!(!config.verbose);
    }

    #[test]
    fn test_is_codon() {
        let config = GeneticConfig::default();
        assert!(config.is_codon("UUU"));
        assert!(config.is_codon("ATG"));
        assert!(!config.is_codon("XYZ"));
        assert!(!config.is_codon("UU"));
        assert!(!config.is_codon(""));
    }

    #[test]
    fn test_from_toml_partial() {
        let text = r#"
            codon_size = 3
            verbose = true

            [operations]
            START = ["AGG"]
            STOP = ["UGA"]
            COPY = ["AGA"]

            [limits]
            max_progeny = 16
        "#;
        let config = GeneticConfig::from_toml_str(text).unwrap();
        assert!(config.verbose);
        assert_eq!(config.limits.max_progeny, 16);
        assert_eq!(config.limits.max_iterations, 1000);
        assert_eq!(config.operations.canonical(op::COPY).unwrap().as_str(), "AGA");
        assert!(!config.operations.contains(op::COND));
        assert_eq!(config.alphabet, DEFAULT_ALPHABET);
    }

    #[test]
    fn test_toml_rejects_shared_codon() {
        let text = r#"
            [operations]
            START = ["AAA"]
            STOP = ["AAA"]
        "#;
        assert!(GeneticConfig::from_toml_str(text).is_err());
    }

    #[test]
    fn test_validate_codon_length() {
        let text = r#"
            [operations]
            STOP = ["AUAU"]
        "#;
        assert!(matches!(
            GeneticConfig::from_toml_str(text),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_validate_alphabet_and_limits() {
        let mut config = GeneticConfig {
            alphabet: "AAU".to_string(),
            ..GeneticConfig::default()
        };
        assert!(config.validate().is_err());

        config.alphabet = DEFAULT_ALPHABET.to_string();
        config.limits.min_gene_size = 10;
        assert!(config.validate().is_err());

        config.limits.min_gene_size = 2;
        config.codon_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = GeneticConfig::default();
        let text = toml::to_string(&config).unwrap();
        let parsed = GeneticConfig::from_toml_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
