//! Simulate command implementation.

use super::{CliError, OutputFormat};
use clap::Args;
use genalpha::evolution::{
    EvolutionConfig, GenerationObserver, GenerationRecord, RunSummary, SelectionConfig,
    SelectionMethod, Simulation,
};
use genalpha::persistence::{ReportEntry, append_report, load_codes};
use genalpha::{EvolutionError, GeneticConfig};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

/// Arguments of the `simulate` command.
#[derive(Args, Debug)]
pub(crate) struct SimulateArgs {
    /// Population size (capped at the configured maximum)
    #[arg(short, long, default_value = "50")]
    population: usize,

    /// Generations per run (capped at the configured maximum)
    #[arg(short, long, default_value = "100")]
    generations: usize,

    /// Maximum execution steps per agent
    #[arg(long, default_value = "1000")]
    max_steps: usize,

    /// Number of independent runs
    #[arg(short, long, default_value = "1")]
    runs: usize,

    /// File with initial genetic codes, one per line
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Append run results to this file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Compile input lines from mnemonic text before use
    #[arg(long)]
    compile: bool,

    /// Random seed (default: random); run N uses seed + N - 1
    #[arg(short, long)]
    seed: Option<u64>,

    /// Peptide whose presence in the translated progeny earns a bonus
    #[arg(long)]
    target_peptide: Option<String>,

    /// Selection operator
    #[arg(long, default_value = "tournament")]
    selection: SelectionArg,

    /// Tournament size
    #[arg(long, default_value = "3")]
    tournament_size: usize,

    /// Codes carried unchanged into the next generation
    #[arg(long, default_value = "1")]
    elite: usize,

    /// Stop a run after this many generations without improvement
    #[arg(long)]
    stall: Option<usize>,

    /// Output format: text or json
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    /// Show progress bar
    #[arg(long)]
    progress: bool,
}

/// Selection operator as accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum SelectionArg {
    /// Tournament selection.
    Tournament,
    /// Fitness-proportional selection.
    Roulette,
}

impl From<SelectionArg> for SelectionMethod {
    fn from(arg: SelectionArg) -> Self {
        match arg {
            SelectionArg::Tournament => Self::Tournament,
            SelectionArg::Roulette => Self::Roulette,
        }
    }
}

/// One run as printed in JSON output.
#[derive(Debug, Serialize)]
struct RunOutput {
    run: usize,
    seed: u64,
    summary: Option<RunSummary>,
}

/// Progress bar over generations.
#[derive(Debug)]
struct ProgressObserver {
    bar: ProgressBar,
}

impl ProgressObserver {
    fn new(generations: usize) -> Result<Self, CliError> {
        let bar = ProgressBar::new(u64::try_from(generations).unwrap_or(u64::MAX));
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} generations {msg}")
            .map_err(|e| CliError::new(format!("Invalid progress template: {e}")))?
            .progress_chars("=>-");
        bar.set_style(style);
        Ok(Self { bar })
    }
}

impl GenerationObserver for ProgressObserver {
    fn on_generation(&mut self, record: &GenerationRecord, _total: usize) {
        self.bar.inc(1);
        self.bar.set_message(format!("best={:.3}", record.best.fitness));
    }
}

fn random_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() ^ u64::from(d.subsec_nanos()))
        .unwrap_or(42)
}

/// Execute the simulate command.
///
/// # Errors
///
/// Returns an error if the input file is invalid or a report cannot be
/// written.
pub(crate) fn execute(config: GeneticConfig, args: &SimulateArgs) -> Result<(), CliError> {
    let config = Arc::new(config);

    let initial_codes = match &args.input {
        Some(path) => {
            info!(
                "Loading initial codes from {}{}",
                path.display(),
                if args.compile { " with compilation" } else { "" }
            );
            load_codes(path, &config, args.compile)?
        }
        None => Vec::new(),
    };

    let runs = args.runs.max(1);
    let base_seed = args.seed.unwrap_or_else(random_seed);
    let mut outputs = Vec::with_capacity(runs);

    for run in 1..=runs {
        let seed = base_seed.wrapping_add(u64::try_from(run - 1).unwrap_or_default());
        info!("Running simulation {run}/{runs} (seed {seed})...");

        let settings = EvolutionConfig {
            population_size: args.population,
            generations: args.generations,
            max_steps: args.max_steps,
            seed,
            stall_generations: args.stall,
            target_peptide: args.target_peptide.clone(),
            selection: SelectionConfig {
                method: args.selection.into(),
                tournament_size: args.tournament_size,
                elite_count: args.elite,
            },
            ..EvolutionConfig::default()
        };

        let start = Instant::now();
        let mut sim = Simulation::new(Arc::clone(&config), settings, &initial_codes);
        let outcome = if args.progress {
            let mut observer = ProgressObserver::new(sim.settings().generations)?;
            let outcome = sim.run_with_observer(&mut observer);
            observer.bar.finish_with_message("done");
            outcome
        } else {
            sim.run()
        };

        let summary = match outcome {
            Ok(summary) => {
                info!(
                    "Run {run} completed after {} generations in {:.2}s",
                    summary.generations_run,
                    start.elapsed().as_secs_f64()
                );
                Some(summary)
            }
            Err(EvolutionError::EmptyPopulation) => {
                warn!("Run {run} failed: no agents in population");
                None
            }
        };

        if let Some(path) = &args.output {
            let entry = ReportEntry {
                run,
                cumulative_entropy: summary
                    .as_ref()
                    .map_or_else(|| sim.cumulative_entropy(), |s| s.final_cumulative_entropy),
                best_code: summary.as_ref().map(|s| s.best.code.clone()),
            };
            append_report(path, &entry)?;
        }

        outputs.push(RunOutput { run, seed, summary });
    }

    match args.format {
        OutputFormat::Text => {
            for output in &outputs {
                print!("{}", format_run_text(output, runs));
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&outputs)?);
        }
    }

    Ok(())
}

fn format_run_text(output: &RunOutput, runs: usize) -> String {
    let Some(summary) = &output.summary else {
        return format!("Run {}/{runs}: no agents in population\n\n", output.run);
    };
    let best = &summary.best;
    let mut text = format!(
        "Run {}/{runs} (seed {}): {} generations{}\n",
        output.run,
        output.seed,
        summary.generations_run,
        if summary.converged { ", converged" } else { "" }
    );
    text.push_str(&format!(
        "  Best agent (family_id={}) from generation {}\n",
        best.family_id, summary.best_generation
    ));
    text.push_str(&format!("  Code:               {}\n", best.code));
    text.push_str(&format!("  Progeny code:       {}\n", best.progeny_code));
    text.push_str(&format!("  Peptide:            {}\n", best.peptide));
    text.push_str(&format!("  Fitness:            {:.3}\n", summary.best_fitness));
    text.push_str(&format!(
        "  Cumulative entropy: {:.3}\n\n",
        summary.final_cumulative_entropy
    ));
    text
}
