//! End-to-end tests: input files, simulation runs and reports.

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use genalpha::evolution::{
    EvolutionConfig, GenerationObserver, GenerationRecord, SelectionConfig, SelectionMethod,
    Simulation,
};
use genalpha::persistence::{ReportEntry, append_report, load_codes, read_report};
use genalpha::validator::check_list;
use genalpha::{GeneticConfig, Interpreter, MutationConfig};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

fn settings(seed: u64) -> EvolutionConfig {
    EvolutionConfig {
        population_size: 20,
        generations: 15,
        max_steps: 200,
        seed,
        ..EvolutionConfig::default()
    }
}

#[derive(Default)]
struct SizeObserver {
    sizes: Vec<usize>,
    valid: Vec<usize>,
}

impl GenerationObserver for SizeObserver {
    fn on_generation(&mut self, record: &GenerationRecord, _total: usize) {
        self.sizes.push(record.population_size);
        self.valid.push(record.valid_agents);
    }
}

#[test]
fn test_compiled_input_drives_simulation() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("programs.txt");
    fs::write(
        &input,
        "# seed programs\nstart copy uuu ccc stop\n\nSTART GGG COPY UUU CCC AUG STOP\n",
    )
    .unwrap();

    let config = Arc::new(GeneticConfig::default());
    let codes = load_codes(&input, &config, true).unwrap();
    assert_eq!(codes.len(), 2);
    assert!(codes.iter().all(|c| check_list(&config, c)));
    assert_eq!(
        Interpreter::new(&config).decompile(&codes[0]),
        "START COPY UUU CCC STOP"
    );

    let mut sim = Simulation::new(Arc::clone(&config), settings(3), &codes);
    assert_eq!(sim.population()[0].code(), codes[0]);
    assert_eq!(sim.population()[1].code(), codes[1]);

    let summary = sim.run().unwrap();
    assert_eq!(summary.generations_run, 15);
    assert!(summary.best_fitness > 0.0);
}

#[test]
fn test_population_size_is_preserved() {
    for method in [SelectionMethod::Tournament, SelectionMethod::Roulette] {
        let tuned = EvolutionConfig {
            selection: SelectionConfig {
                method,
                tournament_size: 3,
                elite_count: 2,
            },
            ..settings(11)
        };
        let mut sim = Simulation::new(Arc::new(GeneticConfig::default()), tuned, &[]);
        let mut observer = SizeObserver::default();
        sim.run_with_observer(&mut observer).unwrap();

        assert_eq!(observer.sizes.len(), 15);
        assert!(observer.sizes.iter().all(|&n| n == 20));
        assert!(observer.valid.iter().all(|&n| n <= 20));
        assert_eq!(sim.population().len(), 20);
    }
}

#[test]
fn test_same_seed_same_run() {
    let config = Arc::new(GeneticConfig::default());
    let codes = vec!["AAAAAGUUUCCCAUA".to_string()];

    let a = Simulation::new(Arc::clone(&config), settings(99), &codes)
        .run()
        .unwrap();
    let b = Simulation::new(Arc::clone(&config), settings(99), &codes)
        .run()
        .unwrap();
    assert_eq!(a, b);
    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        serde_json::to_string(&b).unwrap()
    );
}

#[test]
fn test_length_preserving_run_keeps_code_lengths() {
    let code = "AAAUUUCCCGGGAAGUUU".to_string();
    let tuned = EvolutionConfig {
        mutation: MutationConfig::length_preserving(),
        ..settings(5)
    };
    let mut sim = Simulation::new(
        Arc::new(GeneticConfig::default()),
        tuned,
        &vec![code.clone(); 20],
    );
    sim.run().unwrap();
    assert!(sim.population().iter().all(|a| a.code().len() == code.len()));
}

#[test]
fn test_target_peptide_bonus_is_found() {
    // UUU UUC translates to FF; the bonus dwarfs the entropy term.
    let codes = vec!["UUUUUCGGG".to_string()];
    let tuned = EvolutionConfig {
        population_size: 4,
        generations: 3,
        target_peptide: Some("FF".to_string()),
        ..settings(1)
    };
    let summary = Simulation::new(Arc::new(GeneticConfig::default()), tuned, &codes)
        .run()
        .unwrap();
    assert!(summary.best_fitness >= 200.0);
    assert!(summary.best.peptide.contains("FF"));
}

#[test]
fn test_report_round_trips_best_codes() {
    let dir = TempDir::new().unwrap();
    let report = dir.path().join("results.txt");
    let config = Arc::new(GeneticConfig::default());

    let mut best_codes = Vec::new();
    for run in 1..=3 {
        let summary = Simulation::new(Arc::clone(&config), settings(run), &[])
            .run()
            .unwrap();
        append_report(
            &report,
            &ReportEntry {
                run: usize::try_from(run).unwrap(),
                cumulative_entropy: summary.final_cumulative_entropy,
                best_code: Some(summary.best.code.clone()),
            },
        )
        .unwrap();
        best_codes.push(summary.best.code);
    }

    let entries = read_report(&report).unwrap();
    assert_eq!(entries.len(), 3);
    for (entry, code) in entries.iter().zip(&best_codes) {
        assert_eq!(entry.best_code.as_deref(), Some(code.as_str()));
    }
    let text = fs::read_to_string(&report).unwrap();
    assert!(text.starts_with("Run 1:\nCumulative Entropy: "));
}

#[test]
fn test_custom_configuration_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("genetics.toml");
    fs::write(
        &path,
        r#"
verbose = false

[operations]
START = ["AGG"]
STOP = ["UGA"]
COPY = ["AGA"]

[limits]
max_progeny = 6
max_iterations = 10
"#,
    )
    .unwrap();

    let config = Arc::new(GeneticConfig::load(&path).unwrap());
    let interpreter = Interpreter::new(&config);
    assert_eq!(interpreter.compile("START COPY STOP"), "AGGAGAUGA");

    let tuned = EvolutionConfig {
        population_size: 50,
        generations: 500,
        ..settings(8)
    };
    let summary = Simulation::new(Arc::clone(&config), tuned, &[]).run().unwrap();
    assert_eq!(summary.generations_run, 10);
    assert_eq!(summary.records[0].population_size, 6);
}
