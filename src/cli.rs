//! CLI command implementations for genalpha.

pub(crate) mod codec;
pub(crate) mod interpret;
pub(crate) mod simulate;

use clap::ValueEnum;
use genalpha::GeneticConfig;
use log::LevelFilter;
use std::error::Error;
use std::fmt;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

/// Output format for the `simulate` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<genalpha::Error> for CliError {
    fn from(e: genalpha::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(format!("JSON serialization failed: {e}"))
    }
}

/// Load the genetic configuration, falling back to defaults.
///
/// `verbose` turns on per-step tracing regardless of the file.
pub(crate) fn load_config(path: Option<&Path>, verbose: bool) -> Result<GeneticConfig, CliError> {
    let mut config = match path {
        Some(path) => GeneticConfig::load(path)
            .map_err(|e| CliError::new(format!("Failed to load {}: {e}", path.display())))?,
        None => GeneticConfig::default(),
    };
    config.verbose |= verbose;
    Ok(config)
}

/// Copies log output to stderr and a file.
#[derive(Debug)]
struct TeeWriter {
    file: File,
}

impl Write for TeeWriter {
    /// Both sinks are always written; the first failure is reported.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let to_stderr = io::stderr().write_all(buf);
        let to_file = self.file.write_all(buf);
        to_stderr.and(to_file)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        let to_stderr = io::stderr().flush();
        let to_file = self.file.flush();
        to_stderr.and(to_file)
    }
}

/// Install the global logger.
///
/// Level is `debug` when verbose and `info` otherwise; `RUST_LOG` overrides
/// both.
pub(crate) fn init_logging(verbose: bool, log_file: Option<&Path>) -> Result<(), CliError> {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let mut builder = env_logger::Builder::new();
    builder.filter_level(level).parse_default_env();

    if let Some(path) = log_file {
        let file = File::create(path).map_err(|e| {
            CliError::new(format!("Failed to open log file {}: {e}", path.display()))
        })?;
        builder.target(env_logger::Target::Pipe(Box::new(TeeWriter { file })));
    }

    builder
        .try_init()
        .map_err(|e| CliError::new(format!("Failed to initialize logging: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_tee_writer_copies_to_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("genalpha.log");
        let mut tee = TeeWriter {
            file: File::create(&path).unwrap(),
        };
        tee.write_all(b"[INFO] first\n").unwrap();
        tee.write_all(b"[INFO] second\n").unwrap();
        tee.flush().unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "[INFO] first\n[INFO] second\n"
        );
    }

    #[test]
    fn test_tee_writer_reports_file_failure() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("genalpha.log");
        File::create(&path).unwrap();
        // Read-only handle: every file write fails
        let mut tee = TeeWriter {
            file: File::open(&path).unwrap(),
        };
        assert!(tee.write(b"[INFO] lost\n").is_err());
    }

    #[test]
    fn test_load_config_verbose_override() {
        let config = load_config(None, true).unwrap();
        assert!(config.verbose);
        assert!(!load_config(None, false).unwrap().verbose);
    }
}
