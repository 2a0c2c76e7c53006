//! Flat-text input and run reports.
//!
//! Input files hold one code per line; blank lines and lines starting with
//! `#` are ignored. Reports are appended one block per run:
//!
//! ```text
//! Run 1:
//! Cumulative Entropy: 12.345
//! Best Code: AAAAAGUUUAUA
//!
//! ```

use crate::config::GeneticConfig;
use crate::error::{Error, Result};
use crate::interpreter::{COMMENT_MARKER, Interpreter};
use crate::validator::check_list;
use log::{error, info};
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

const EMPTY_POPULATION: &str = "None (empty population)";

/// Load initial codes from `path`.
///
/// With `compile` set, each line is mnemonic text compiled before
/// validation.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be read, [`Error::InvalidCode`]
/// for the first line that does not validate and [`Error::NoCodes`] if the
/// file holds no code at all.
pub fn load_codes(path: &Path, config: &GeneticConfig, compile: bool) -> Result<Vec<String>> {
    let text = fs::read_to_string(path)?;
    let interpreter = Interpreter::new(config);
    let mut codes = Vec::new();

    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with(COMMENT_MARKER) {
            continue;
        }

        let code = if compile {
            interpreter.compile(line)
        } else {
            line.to_string()
        };
        if !check_list(config, &code) {
            error!("Invalid genetic code in {}: {code}", path.display());
            return Err(Error::InvalidCode {
                path: path.to_path_buf(),
                line: index + 1,
                code,
            });
        }
        codes.push(code);
    }

    if codes.is_empty() {
        error!("No valid genetic codes found in {}", path.display());
        return Err(Error::NoCodes(path.to_path_buf()));
    }

    info!("Loaded {} codes from {}", codes.len(), path.display());
    Ok(codes)
}

/// One run's entry in a report file.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportEntry {
    /// One-based run number.
    pub run: usize,
    /// Cumulative entropy of the final population.
    pub cumulative_entropy: f64,
    /// Best code of the run, `None` when the population was empty.
    pub best_code: Option<String>,
}

impl fmt::Display for ReportEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Run {}:", self.run)?;
        writeln!(f, "Cumulative Entropy: {:.3}", self.cumulative_entropy)?;
        writeln!(
            f,
            "Best Code: {}",
            self.best_code.as_deref().unwrap_or(EMPTY_POPULATION)
        )?;
        writeln!(f)
    }
}

/// Append `entry` to the report at `path`, creating the file if needed.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be opened or written.
pub fn append_report(path: &Path, entry: &ReportEntry) -> Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    write!(file, "{entry}")?;
    info!("Wrote simulation results to {}", path.display());
    Ok(())
}

/// Read every entry of a report file.
///
/// Lines that do not belong to an entry are ignored.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be read and
/// [`Error::InvalidReport`] for an entropy value that is not a number.
pub fn read_report(path: &Path) -> Result<Vec<ReportEntry>> {
    let text = fs::read_to_string(path)?;
    let mut entries = Vec::new();
    let mut current: Option<ReportEntry> = None;

    for (index, line) in text.lines().enumerate() {
        if let Some(run) = line
            .strip_prefix("Run ")
            .and_then(|rest| rest.strip_suffix(':'))
            .and_then(|n| n.trim().parse().ok())
        {
            entries.extend(current.take());
            current = Some(ReportEntry {
                run,
                cumulative_entropy: 0.0,
                best_code: None,
            });
        } else if let Some(entry) = current.as_mut() {
            if let Some(value) = line.strip_prefix("Cumulative Entropy: ") {
                entry.cumulative_entropy = value.trim().parse().map_err(|_| {
                    error!("Malformed entropy in {}: {line}", path.display());
                    Error::InvalidReport {
                        path: path.to_path_buf(),
                        line: index + 1,
                        text: line.to_string(),
                    }
                })?;
            } else if let Some(value) = line.strip_prefix("Best Code: ") {
                let value = value.trim();
                entry.best_code = (value != EMPTY_POPULATION).then(|| value.to_string());
            }
        }
    }
    entries.extend(current);

    Ok(entries)
}
