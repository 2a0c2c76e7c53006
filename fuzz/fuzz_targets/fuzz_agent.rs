#![no_main]

use arbitrary::Arbitrary;
use genalpha::{Agent, AgentState, GeneticConfig, HaltReason, MutationConfig};
use libfuzzer_sys::fuzz_target;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::sync::Arc;

/// Structured input for agent fuzzing.
#[derive(Arbitrary, Debug)]
struct AgentInput {
    /// Raw code, validated or rejected by init.
    code: String,
    /// Step budget (capped).
    max_steps: u16,
    /// Number of mutate-and-rerun rounds.
    rounds: u8,
    /// RNG seed for mutation.
    seed: u64,
}

fn assert_invalid(agent: &mut Agent) {
    assert_eq!(agent.state(), AgentState::Halted(HaltReason::Invalid));
    assert!(agent.tape().is_empty());
    assert!(agent.iteration());
    assert_eq!(agent.evaluate_fitness(), 0.0);
}

fuzz_target!(|input: AgentInput| {
    let config = Arc::new(GeneticConfig::default());
    let mut agent = Agent::new(0, config);
    let mut rng = SmallRng::seed_from_u64(input.seed);

    agent.init(&input.code, None);
    for _ in 0..=input.rounds.min(16) {
        if agent.is_valid() {
            let steps = agent.run(usize::from(input.max_steps));
            assert!(steps <= agent.tape().len());
            assert!(agent.program_counter() <= agent.tape().len());

            let fitness = agent.evaluate_fitness_with_target(Some("FF"), 100.0);
            assert!(fitness.is_finite() && fitness >= 0.0);
            let _ = agent.translate_to_peptide();
        } else {
            // Stays invalid until a mutation repairs the code
            assert_invalid(&mut agent);
        }

        let progeny = agent.progeny_code().to_string();
        agent.mutate(&MutationConfig::default(), &mut rng);
        if agent.is_valid() {
            assert_eq!(agent.progeny_code(), progeny);
        }
    }
});
