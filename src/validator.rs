//! Structural checks on code strings and instruction lists.
//!
//! Both checks are pure and never fail loudly: malformed code is an
//! expected product of mutation, so callers get a `bool` (or a typed
//! [`TapeError`] from [`check_tape`]) and decide what to log.

use crate::alphabet::{Codon, op, split_codons};
use crate::config::GeneticConfig;
use crate::error::TapeError;

/// Tokenize `code` into a tape, checking every codon.
///
/// # Errors
///
/// Returns a [`TapeError`] if the code is empty, its length is not a
/// multiple of the codon size, or a chunk is neither an operation codon nor
/// made of alphabet characters. A zero codon size aligns nothing.
pub fn check_tape(config: &GeneticConfig, code: &str) -> Result<Vec<Codon>, TapeError> {
    if code.is_empty() {
        return Err(TapeError::Empty);
    }

    let len = code.chars().count();
    if len.checked_rem(config.codon_size) != Some(0) {
        return Err(TapeError::Misaligned {
            len,
            codon_size: config.codon_size,
        });
    }

    split_codons(code, config.codon_size)
        .into_iter()
        .enumerate()
        .map(|(index, chunk)| {
            if config.is_codon(&chunk) {
                Ok(Codon::from(chunk))
            } else {
                Err(TapeError::InvalidCodon {
                    index,
                    codon: chunk,
                })
            }
        })
        .collect()
}

/// Whether `code` is a well-formed codon string.
#[must_use]
pub fn check_list(config: &GeneticConfig, code: &str) -> bool {
    check_tape(config, code).is_ok()
}

/// Whether an instruction list contains at least one START codon and at
/// least one STOP codon.
///
/// Only presence is checked; a STOP before the first START still counts.
#[must_use]
pub fn is_executable<S: AsRef<str>>(config: &GeneticConfig, instructions: &[S]) -> bool {
    let table = &config.operations;
    let has = |name: &str| instructions.iter().any(|i| table.is(name, i.as_ref()));
    has(op::START) && has(op::STOP)
}
