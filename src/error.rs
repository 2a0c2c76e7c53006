//! Error types for configuration, tape validation, and file I/O.

use std::path::PathBuf;
use thiserror::Error;

/// Reasons a code string cannot be turned into a tape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TapeError {
    /// The code string is empty.
    #[error("code is empty")]
    Empty,
    /// The code length is not a multiple of the codon size.
    #[error("code length {len} is not a multiple of codon size {codon_size}")]
    Misaligned {
        /// Length of the code in characters.
        len: usize,
        /// Configured codon size.
        codon_size: usize,
    },
    /// A chunk is neither an operation codon nor made of alphabet characters.
    #[error("invalid codon {codon:?} at position {index}")]
    InvalidCodon {
        /// Zero-based codon index on the tape.
        index: usize,
        /// The offending chunk.
        codon: String,
    },
}

/// Crate-level error for fallible configuration and I/O operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration failed validation.
    #[error("configuration error: {0}")]
    Config(String),

    /// A line of an input file is not a valid codon string.
    #[error("invalid genetic code in {path}:{line}: {code}")]
    InvalidCode {
        /// File being read.
        path: PathBuf,
        /// One-based line number.
        line: usize,
        /// The rejected (possibly compiled) code.
        code: String,
    },

    /// A report file holds a value that does not parse.
    #[error("malformed report entry in {path}:{line}: {text}")]
    InvalidReport {
        /// Report being read.
        path: PathBuf,
        /// One-based line number.
        line: usize,
        /// The offending line.
        text: String,
    },

    /// An input file contained no usable codes.
    #[error("no valid genetic codes found in {0}")]
    NoCodes(PathBuf),

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parse error.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Result alias using the crate [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
