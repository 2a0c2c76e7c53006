//! Translation of progeny codons to amino acids.
//!
//! Uses the standard genetic code. `T` is read as `U` so DNA-style codons
//! translate the same way as their RNA counterparts. Stop codons, codons of
//! the wrong size, and codons containing other characters produce no residue.

use crate::alphabet::split_codons;

/// Standard code in `UCAG` order: index is `16 * first + 4 * second + third`.
const STANDARD_CODE: &[u8; 64] =
    b"FFLLSSSSYY**CC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG";

/// Amino-acid code marking a stop codon in [`STANDARD_CODE`].
const STOP: u8 = b'*';

/// Weight applied per target residue when the target peptide is present.
pub const DEFAULT_TARGET_WEIGHT: f64 = 100.0;

fn base_index(base: char) -> Option<usize> {
    match base {
        'U' | 'T' => Some(0),
        'C' => Some(1),
        'A' => Some(2),
        'G' => Some(3),
        _ => None,
    }
}

/// One-letter amino acid for a three-base codon.
///
/// Returns `None` for stop codons and for anything that is not three bases.
#[must_use]
pub fn amino_acid(codon: &str) -> Option<char> {
    let mut chars = codon.chars();
    let (Some(a), Some(b), Some(c), None) = (chars.next(), chars.next(), chars.next(), chars.next())
    else {
        return None;
    };
    let index = 16 * base_index(a)? + 4 * base_index(b)? + base_index(c)?;
    let residue = STANDARD_CODE[index];
    (residue != STOP).then_some(char::from(residue))
}

/// Translate a code string into a peptide.
///
/// Codons without an amino acid are skipped rather than ending translation.
#[must_use]
pub fn translate(code: &str, codon_size: usize) -> String {
    split_codons(code, codon_size)
        .iter()
        .filter_map(|codon| amino_acid(codon))
        .collect()
}
