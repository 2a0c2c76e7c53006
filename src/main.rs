//! Genalpha CLI - simulate, compile and inspect genetic programs.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod cli;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

/// Genalpha - codon tape machines and their evolution
#[derive(Parser, Debug)]
#[command(name = "genalpha")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable debug logging and per-step agent tracing
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Also write log output to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Genetic configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Evolve a population of agents
    Simulate(cli::simulate::SimulateArgs),

    /// Interactive compile/decompile/compress shell
    Interpret,

    /// Compile a mnemonic program file to a codon string
    Compile {
        /// Program file
        #[arg(required = true)]
        source: PathBuf,

        /// Fail if any token cannot be compiled
        #[arg(long)]
        strict: bool,
    },

    /// Render a codon string as operation names
    Decompile {
        /// Codon string
        #[arg(required = true)]
        code: String,
    },

    /// Keep only the operation codons of a codon string
    Compress {
        /// Codon string
        #[arg(required = true)]
        code: String,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();

    let result = cli::init_logging(args.verbose, args.log_file.as_deref())
        .and_then(|()| cli::load_config(args.config.as_deref(), args.verbose))
        .and_then(|config| match &args.command {
            Commands::Simulate(simulate) => cli::simulate::execute(config, simulate),
            Commands::Interpret => cli::interpret::execute(&config),
            Commands::Compile { source, strict } => cli::codec::compile(&config, source, *strict),
            Commands::Decompile { code } => {
                cli::codec::decompile(&config, code);
                Ok(())
            }
            Commands::Compress { code } => {
                cli::codec::compress(&config, code);
                Ok(())
            }
        });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
