//! Codons and the operation table.
//!
//! A codon is a fixed-length chunk of a code string. The operation table maps
//! symbolic operation names to the codons that encode them; the first codon
//! listed for an operation is its canonical encoding, the one the compiler
//! emits.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Default codon size in characters.
pub const DEFAULT_CODON_SIZE: usize = 3;

/// Default alphabet: the four RNA bases plus `T`, which the literal STOP
/// codons `ATC` and `ATG` need.
pub const DEFAULT_ALPHABET: &str = "ATGCU";

/// Operation names the agent and validator give meaning to.
pub mod op {
    /// Records the entry point; produces no progeny.
    pub const START: &str = "START";
    /// Halts execution.
    pub const STOP: &str = "STOP";
    /// Copies itself into the progeny.
    pub const COPY: &str = "COPY";
    /// Conditional marker (executed as data).
    pub const COND: &str = "COND";
    /// Branch marker (executed as data).
    pub const IF: &str = "IF";
    /// Jump marker (executed as data).
    pub const JUMP: &str = "JUMP";
}

const DEFAULT_OPERATIONS: &[(&str, &[&str])] = &[
    (op::COND, &["UUC", "UUA", "GAA"]),
    (op::COPY, &["AAG"]),
    (op::IF, &["AAU"]),
    (op::JUMP, &["CUU"]),
    (op::START, &["AAA"]),
    (op::STOP, &["AUA", "ATC", "ATG"]),
];

/// A single codon: an immutable chunk of a code string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Codon(Box<str>);

impl Codon {
    /// Create a codon from any string.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into().into_boxed_str())
    }

    /// The codon text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in characters.
    #[must_use]
    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }
}

impl fmt::Display for Codon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Codon {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Codon {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Codon {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Codon {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Split a code string into chunks of `size` characters.
///
/// No validation is performed: a trailing partial chunk is returned as-is.
#[must_use]
pub fn split_codons(code: &str, size: usize) -> Vec<String> {
    let chars: Vec<char> = code.chars().collect();
    chars
        .chunks(size.max(1))
        .map(|chunk| chunk.iter().collect())
        .collect()
}

/// Normalize an operation name for lookup.
fn normalize_name(name: &str) -> String {
    name.trim().to_uppercase()
}

/// Mapping from operation names to the codons that encode them.
///
/// Invariants: every operation has at least one codon and no codon belongs to
/// two operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, Vec<String>>",
    into = "BTreeMap<String, Vec<String>>"
)]
pub struct OperationTable {
    operations: BTreeMap<String, Vec<Codon>>,
    owners: HashMap<Codon, String>,
}

impl OperationTable {
    /// Build a table from `(name, codons)` entries.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a name is blank or repeated, an operation
    /// has no codons, or a codon is assigned to more than one operation.
    pub fn new<I, N, C>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (N, Vec<C>)>,
        N: AsRef<str>,
        C: Into<Codon>,
    {
        let mut operations = BTreeMap::new();
        let mut owners = HashMap::new();

        for (name, codons) in entries {
            let name = normalize_name(name.as_ref());
            if name.is_empty() {
                return Err(Error::Config("operation name must not be blank".to_string()));
            }
            if operations.contains_key(&name) {
                return Err(Error::Config(format!("operation {name} defined twice")));
            }
            let codons: Vec<Codon> = codons.into_iter().map(Into::into).collect();
            if codons.is_empty() {
                return Err(Error::Config(format!("operation {name} has no codons")));
            }
            for codon in &codons {
                if let Some(owner) = owners.insert(codon.clone(), name.clone()) {
                    return Err(Error::Config(format!(
                        "codon {codon} assigned to both {owner} and {name}"
                    )));
                }
            }
            operations.insert(name, codons);
        }

        Ok(Self { operations, owners })
    }

    /// Canonical (first) codon of an operation.
    #[must_use]
    pub fn canonical(&self, name: &str) -> Option<&Codon> {
        self.operations.get(&normalize_name(name))?.first()
    }

    /// All codons of an operation, empty if the operation is not registered.
    #[must_use]
    pub fn codons(&self, name: &str) -> &[Codon] {
        self.operations
            .get(&normalize_name(name))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Name of the operation a codon belongs to.
    #[must_use]
    pub fn operation_of(&self, codon: &str) -> Option<&str> {
        self.owners.get(codon).map(String::as_str)
    }

    /// Whether `codon` is registered under some operation.
    #[must_use]
    pub fn is_operation_codon(&self, codon: &str) -> bool {
        self.owners.contains_key(codon)
    }

    /// Whether `codon` belongs to the named operation.
    #[must_use]
    pub fn is(&self, name: &str, codon: &str) -> bool {
        self.operation_of(codon) == Some(name)
    }

    /// Whether an operation with this name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.operations.contains_key(&normalize_name(name))
    }

    /// Iterate over `(name, codons)` in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Codon])> {
        self.operations
            .iter()
            .map(|(name, codons)| (name.as_str(), codons.as_slice()))
    }

    /// Iterate over every registered codon.
    pub fn all_codons(&self) -> impl Iterator<Item = &Codon> {
        self.operations.values().flatten()
    }

    /// Number of operations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Whether the table has no operations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

impl Default for OperationTable {
    fn default() -> Self {
        let mut operations = BTreeMap::new();
        let mut owners = HashMap::new();
        for (name, codons) in DEFAULT_OPERATIONS {
            let codons: Vec<Codon> = codons.iter().map(|c| Codon::from(*c)).collect();
            for codon in &codons {
                owners.insert(codon.clone(), (*name).to_string());
            }
            operations.insert((*name).to_string(), codons);
        }
        Self { operations, owners }
    }
}

impl TryFrom<BTreeMap<String, Vec<String>>> for OperationTable {
    type Error = Error;

    fn try_from(value: BTreeMap<String, Vec<String>>) -> Result<Self> {
        Self::new(value)
    }
}

impl From<OperationTable> for BTreeMap<String, Vec<String>> {
    fn from(table: OperationTable) -> Self {
        table
            .operations
            .into_iter()
            .map(|(name, codons)| {
                let codons = codons.into_iter().map(|c| c.to_string()).collect();
                (name, codons)
            })
            .collect()
    }
}
