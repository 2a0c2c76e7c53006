//! The simulation loop.

use super::selection::select_parents;
use super::stats::{
    FitnessStats, GenerationObserver, GenerationRecord, NoopObserver, RunSummary,
    cumulative_entropy,
};
use super::{EvolutionConfig, EvolutionError};
use crate::agent::{Agent, AgentSnapshot};
use crate::config::GeneticConfig;
use crate::sequence::create_string;
use log::{debug, error, info, warn};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rayon::prelude::*;
use std::sync::Arc;

/// A population of agents evolving over generations.
///
/// All randomness comes from one `SmallRng` seeded with
/// [`EvolutionConfig::seed`], so equal inputs give equal runs.
#[derive(Debug)]
pub struct Simulation {
    config: Arc<GeneticConfig>,
    settings: EvolutionConfig,
    population: Vec<Agent>,
    rng: SmallRng,
    generation: usize,
}

impl Simulation {
    /// Build the initial population.
    ///
    /// Sizes are capped by the configured limits and at least one
    /// generation is always run. `initial_codes` seed the first members;
    /// codes that fail to validate are skipped. Remaining slots are filled
    /// with random codes.
    #[must_use]
    pub fn new(
        config: Arc<GeneticConfig>,
        mut settings: EvolutionConfig,
        initial_codes: &[String],
    ) -> Self {
        let limits = config.limits;
        settings.population_size = settings.population_size.min(limits.max_progeny);
        settings.generations = settings.generations.clamp(1, limits.max_iterations);
        settings.max_steps = settings.max_steps.min(limits.max_iterations);

        let mut rng = SmallRng::seed_from_u64(settings.seed);
        let size = settings.population_size;
        let mut population = Vec::with_capacity(size);

        for code in initial_codes.iter().take(size) {
            let mut agent = Agent::new(population.len(), Arc::clone(&config));
            if agent.init(code, None) {
                population.push(agent);
            } else {
                warn!("Failed to initialize agent with code: {code}");
            }
        }

        let mut failures = 0;
        while population.len() < size && failures < settings.max_attempts {
            let code = create_string(&config, &mut rng);
            let mut agent = Agent::new(population.len(), Arc::clone(&config));
            if agent.init(&code, None) {
                population.push(agent);
            } else {
                warn!("Failed to initialize agent with random code: {code}");
                failures += 1;
            }
        }

        if population.is_empty() && size > 0 {
            error!(
                "Failed to initialize any agents after {} attempts",
                settings.max_attempts
            );
        }

        Self {
            config,
            settings,
            population,
            rng,
            generation: 0,
        }
    }

    /// Run all generations without observation.
    ///
    /// # Errors
    ///
    /// Returns [`EvolutionError::EmptyPopulation`] if there is no agent.
    pub fn run(&mut self) -> Result<RunSummary, EvolutionError> {
        self.run_with_observer(&mut NoopObserver)
    }

    /// Run all generations, reporting each one to `observer`.
    ///
    /// # Errors
    ///
    /// Returns [`EvolutionError::EmptyPopulation`] if there is no agent.
    pub fn run_with_observer<O>(&mut self, observer: &mut O) -> Result<RunSummary, EvolutionError>
    where
        O: GenerationObserver + ?Sized,
    {
        if self.population.is_empty() {
            error!("Cannot run simulation: empty population");
            return Err(EvolutionError::EmptyPopulation);
        }

        let total = self.settings.generations;
        let mut records: Vec<GenerationRecord> = Vec::with_capacity(total);
        let mut best: Option<AgentSnapshot> = None;
        let mut best_generation = 0;
        let mut stalled = 0;
        let mut converged = false;

        for generation in 0..total {
            self.generation = generation;
            if self.config.verbose {
                debug!("Generation {}/{total}", generation + 1);
            }

            self.advance();
            let fitness = self.evaluate();
            let record = self.record(generation, &fitness);

            let previous = best.as_ref().map(|b| b.fitness);
            if previous.is_none_or(|f| record.best.fitness > f) {
                best = Some(record.best.clone());
                best_generation = generation;
            }
            let improved = previous
                .is_none_or(|f| record.best.fitness - f > self.settings.min_improvement);
            stalled = if improved { 0 } else { stalled + 1 };

            debug!(
                "Gen {generation:>5}: best={:.4} mean={:.4} std={:.4} entropy={:.3}",
                record.fitness.best,
                record.fitness.mean,
                record.fitness.std_dev,
                record.cumulative_entropy
            );
            observer.on_generation(&record, total);
            records.push(record);

            if self
                .settings
                .stall_generations
                .is_some_and(|limit| stalled >= limit)
            {
                info!("Converged after {stalled} generations without improvement");
                converged = true;
                break;
            }

            if generation + 1 < total {
                self.breed(&fitness);
            }
        }

        let final_cumulative_entropy = cumulative_entropy(&self.population);
        let generations_run = records.len();
        let Some(best) = best else {
            return Err(EvolutionError::EmptyPopulation);
        };

        info!(
            "Simulation completed. Best agent (family_id={}) fitness: {:.3}, progeny_code: {}, peptide: {}",
            best.family_id, best.fitness, best.progeny_code, best.peptide
        );

        Ok(RunSummary {
            best_fitness: best.fitness,
            best,
            best_generation,
            records,
            final_cumulative_entropy,
            generations_run,
            converged,
        })
    }

    /// Run every agent until it halts or spends its step budget.
    fn advance(&mut self) {
        let max_steps = self.settings.max_steps;
        self.population.par_iter_mut().for_each(|agent| {
            agent.run(max_steps);
        });
    }

    fn evaluate(&self) -> Vec<f64> {
        let target = self.settings.target_peptide.as_deref();
        let weight = self.settings.target_weight;
        self.population
            .par_iter()
            .map(|agent| agent.evaluate_fitness_with_target(target, weight))
            .collect()
    }

    fn record(&self, generation: usize, fitness: &[f64]) -> GenerationRecord {
        // First agent wins ties
        let mut best_idx = 0;
        for (idx, &f) in fitness.iter().enumerate() {
            if f > fitness[best_idx] {
                best_idx = idx;
            }
        }

        GenerationRecord {
            generation,
            best: self.population[best_idx].snapshot(fitness[best_idx]),
            fitness: FitnessStats::from_fitness(fitness),
            cumulative_entropy: cumulative_entropy(&self.population),
            valid_agents: self.population.iter().filter(|a| a.is_valid()).count(),
            population_size: self.population.len(),
        }
    }

    /// Replace the population with elites and mutated children.
    fn breed(&mut self, fitness: &[f64]) {
        let size = self.population.len();
        let selection = select_parents(fitness, &self.settings.selection, size, &mut self.rng);

        let mut next = Vec::with_capacity(size);
        for idx in selection.elite_indices {
            let mut agent = Agent::new(next.len(), Arc::clone(&self.config));
            agent.init(self.population[idx].code(), None);
            next.push(agent);
        }

        for idx in selection.parents {
            let mut child = Agent::new(next.len(), Arc::clone(&self.config));
            child.init(self.population[idx].code(), None);
            child.mutate(&self.settings.mutation, &mut self.rng);
            if self.config.verbose {
                debug!(
                    "New agent (family_id={}) from parent {idx}: {}",
                    child.family_id(),
                    child.code()
                );
            }
            next.push(child);
        }

        self.population = next;
    }

    /// Current population.
    #[must_use]
    pub fn population(&self) -> &[Agent] {
        &self.population
    }

    /// Effective settings after clamping.
    #[must_use]
    pub fn settings(&self) -> &EvolutionConfig {
        &self.settings
    }

    /// Index of the generation last evaluated.
    #[must_use]
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Cumulative entropy of the current population.
    #[must_use]
    pub fn cumulative_entropy(&self) -> f64 {
        cumulative_entropy(&self.population)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Limits;
    use crate::evolution::SelectionConfig;
    use crate::sequence::MutationConfig;

    fn config() -> Arc<GeneticConfig> {
        Arc::new(GeneticConfig::default())
    }

    fn settings(population_size: usize, generations: usize) -> EvolutionConfig {
        EvolutionConfig {
            population_size,
            generations,
            max_steps: 100,
            ..EvolutionConfig::default()
        }
    }

    #[test]
    fn test_initial_codes_seed_population() {
        let codes = vec!["AAAUUUAUA".to_string(), "BAD".to_string(), "UUUCCC".to_string()];
        let sim = Simulation::new(config(), settings(4, 1), &codes);
        let population = sim.population();
        assert_eq!(population.len(), 4);
        assert_eq!(population[0].code(), "AAAUUUAUA");
        assert_eq!(population[1].code(), "UUUCCC");
        assert!(population.iter().all(Agent::is_valid));
    }

    #[test]
    fn test_settings_are_clamped() {
        let config = Arc::new(GeneticConfig {
            limits: Limits {
                max_progeny: 5,
                max_iterations: 10,
                ..Limits::default()
            },
            ..GeneticConfig::default()
        });
        let sim = Simulation::new(
            config,
            EvolutionConfig {
                population_size: 500,
                generations: 0,
                max_steps: 5000,
                ..EvolutionConfig::default()
            },
            &[],
        );
        assert_eq!(sim.population().len(), 5);
        assert_eq!(sim.settings().generations, 1);
        assert_eq!(sim.settings().max_steps, 10);
    }

    #[test]
    fn test_empty_population_is_an_error() {
        let mut sim = Simulation::new(config(), settings(0, 3), &[]);
        assert_eq!(sim.run(), Err(EvolutionError::EmptyPopulation));
    }

    #[test]
    fn test_run_records_every_generation() {
        let mut sim = Simulation::new(config(), settings(10, 6), &[]);
        let summary = sim.run().unwrap();
        assert_eq!(summary.generations_run, 6);
        assert_eq!(summary.records.len(), 6);
        assert!(!summary.converged);
        for (i, record) in summary.records.iter().enumerate() {
            assert_eq!(record.generation, i);
            assert_eq!(record.population_size, 10);
        }
        assert_eq!(sim.population().len(), 10);
    }

    #[test]
    fn test_best_is_run_wide_maximum() {
        let mut sim = Simulation::new(config(), settings(12, 8), &[]);
        let summary = sim.run().unwrap();
        let max = summary
            .records
            .iter()
            .map(|r| r.best.fitness)
            .fold(f64::NEG_INFINITY, f64::max);
        assert!((summary.best_fitness - max).abs() < 1e-12);
        assert!(
            (summary.records[summary.best_generation].best.fitness - summary.best_fitness).abs()
                < 1e-12
        );
    }

    #[test]
    fn test_elite_survives_unchanged() {
        let codes = vec!["AAGUUUCCCGGG".to_string(), "UUUUUU".to_string()];
        let tuned = EvolutionConfig {
            population_size: 2,
            generations: 2,
            selection: SelectionConfig {
                elite_count: 1,
                ..SelectionConfig::default()
            },
            mutation: MutationConfig::only(crate::sequence::MutationKind::Reverse),
            ..settings(2, 2)
        };
        let mut sim = Simulation::new(config(), tuned, &codes);
        let summary = sim.run().unwrap();
        assert_eq!(summary.records[0].best.code, "AAGUUUCCCGGG");
        assert_eq!(sim.population()[0].code(), "AAGUUUCCCGGG");
        assert_eq!(sim.population().len(), 2);
    }

    #[test]
    fn test_stall_stops_early() {
        let codes = vec!["UUUUUU".to_string()];
        let tuned = EvolutionConfig {
            population_size: 1,
            generations: 50,
            stall_generations: Some(3),
            mutation: MutationConfig::only(crate::sequence::MutationKind::None),
            ..settings(1, 50)
        };
        let mut sim = Simulation::new(config(), tuned, &codes);
        let summary = sim.run().unwrap();
        assert!(summary.converged);
        assert_eq!(summary.generations_run, 4);
    }

    #[test]
    fn test_same_seed_same_summary() {
        let a = Simulation::new(config(), settings(16, 10), &[]).run().unwrap();
        let b = Simulation::new(config(), settings(16, 10), &[]).run().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_observer_sees_each_generation() {
        struct Counter(Vec<usize>);
        impl GenerationObserver for Counter {
            fn on_generation(&mut self, record: &GenerationRecord, total: usize) {
                assert_eq!(total, 4);
                self.0.push(record.generation);
            }
        }

        let mut counter = Counter(Vec::new());
        let mut sim = Simulation::new(config(), settings(5, 4), &[]);
        sim.run_with_observer(&mut counter).unwrap();
        assert_eq!(counter.0, vec![0, 1, 2, 3]);
    }
}
