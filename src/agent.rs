//! Tape machine agent.
//!
//! An agent owns a tape of codons and a program counter. Each call to
//! [`Agent::iteration`] consumes one codon:
//!
//! - COPY codons and data codons are appended to the progeny;
//! - a START codon records its position in `eip_ptr`;
//! - a STOP codon halts the agent.
//!
//! Validity is part of the state machine: an agent whose code failed to
//! validate sits in [`AgentState::Halted`] with [`HaltReason::Invalid`],
//! which is an ordinary outcome of mutation rather than an error.

// Fitness multiplies a character count by an entropy
#![allow(clippy::cast_precision_loss)]

use crate::alphabet::{Codon, op};
use crate::config::GeneticConfig;
use crate::error::TapeError;
use crate::peptide;
use crate::sequence::{self, MutationConfig};
use crate::validator::check_tape;
use log::{debug, error, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Why an agent stopped executing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HaltReason {
    /// The program counter ran past the last codon.
    EndOfTape,
    /// A STOP codon was consumed.
    Stop,
    /// The code failed validation on init.
    Invalid,
}

/// Lifecycle state of an [`Agent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgentState {
    /// No code has been loaded.
    Uninitialized,
    /// Code loaded, no step taken yet.
    Ready,
    /// At least one step taken, not halted.
    Running,
    /// Execution finished.
    Halted(HaltReason),
}

/// Serializable summary of an agent at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSnapshot {
    /// Family id of the agent.
    pub family_id: usize,
    /// Source code.
    pub code: String,
    /// Accumulated progeny.
    pub progeny_code: String,
    /// Progeny translated to amino acids.
    pub peptide: String,
    /// Fitness the agent was ranked with.
    pub fitness: f64,
}

/// A tape machine executing one genetic code.
#[derive(Debug, Clone)]
pub struct Agent {
    family_id: usize,
    config: Arc<GeneticConfig>,
    code: String,
    tape: Vec<Codon>,
    program_counter: usize,
    eip_ptr: Option<usize>,
    progeny_code: String,
    state: AgentState,
}

impl Agent {
    /// Create an uninitialized agent.
    #[must_use]
    pub fn new(family_id: usize, config: Arc<GeneticConfig>) -> Self {
        Self {
            family_id,
            config,
            code: String::new(),
            tape: Vec::new(),
            program_counter: 0,
            eip_ptr: None,
            progeny_code: String::new(),
            state: AgentState::Uninitialized,
        }
    }

    /// Load `code`, logging a diagnostic on failure.
    ///
    /// Returns `true` if the code validated. See [`Agent::try_init`].
    pub fn init(&mut self, code: &str, progeny_code: Option<&str>) -> bool {
        match self.try_init(code, progeny_code) {
            Ok(()) => true,
            Err(e) => {
                error!(
                    "Invalid code for agent (family_id={}): {code} ({e})",
                    self.family_id
                );
                false
            }
        }
    }

    /// Load `code` and reset the counters.
    ///
    /// On success the agent is [`AgentState::Ready`] with its progeny set to
    /// `progeny_code` (or empty). On failure the attempted code is kept, the
    /// tape and progeny are cleared and the agent is halted as invalid.
    ///
    /// # Errors
    ///
    /// Returns the [`TapeError`] describing why the code did not validate.
    pub fn try_init(&mut self, code: &str, progeny_code: Option<&str>) -> Result<(), TapeError> {
        self.code = code.to_string();
        self.program_counter = 0;
        self.eip_ptr = None;

        match check_tape(&self.config, code) {
            Ok(tape) => {
                self.tape = tape;
                self.progeny_code = progeny_code.unwrap_or_default().to_string();
                self.state = AgentState::Ready;
                if self.config.verbose {
                    debug!(
                        "Agent (family_id={}) initialized with code: {code}",
                        self.family_id
                    );
                }
                Ok(())
            }
            Err(e) => {
                self.tape.clear();
                self.progeny_code.clear();
                self.state = AgentState::Halted(HaltReason::Invalid);
                Err(e)
            }
        }
    }

    /// Execute one codon. Returns `true` once the agent is halted.
    ///
    /// Calling this on an uninitialized or halted agent does nothing and
    /// returns `true`.
    pub fn iteration(&mut self) -> bool {
        if matches!(
            self.state,
            AgentState::Uninitialized | AgentState::Halted(_)
        ) {
            return true;
        }

        let Some(codon) = self.tape.get(self.program_counter) else {
            self.state = AgentState::Halted(HaltReason::EndOfTape);
            return true;
        };

        let pc = self.program_counter;
        self.program_counter += 1;

        let halted = match self.config.operations.operation_of(codon.as_str()) {
            Some(op::START) => {
                self.eip_ptr = Some(pc);
                self.state = AgentState::Running;
                false
            }
            Some(op::STOP) => {
                self.state = AgentState::Halted(HaltReason::Stop);
                true
            }
            // COPY and data codons both land in the progeny
            _ => {
                self.progeny_code.push_str(codon.as_str());
                self.state = AgentState::Running;
                false
            }
        };

        if self.config.verbose {
            debug!(
                "Agent (family_id={}) pc={pc} codon={codon} progeny_code={}",
                self.family_id, self.progeny_code
            );
        }
        halted
    }

    /// Step until halted or `max_steps` codons have executed.
    ///
    /// Returns the number of steps that consumed a codon. A halted agent or
    /// a zero budget executes nothing.
    pub fn run(&mut self, max_steps: usize) -> usize {
        let mut steps = 0;
        while steps < max_steps {
            let before = self.program_counter;
            let halted = self.iteration();
            if self.program_counter != before {
                steps += 1;
            }
            if halted {
                break;
            }
        }
        steps
    }

    /// Replace the code with a mutated copy and re-initialize.
    ///
    /// The current progeny is passed through to the new init. The mutated
    /// code may fail to validate, leaving the agent halted as invalid.
    pub fn mutate<R: Rng>(&mut self, mutation: &MutationConfig, rng: &mut R) {
        if self.code.is_empty() {
            warn!(
                "Attempted to mutate empty code for agent (family_id={})",
                self.family_id
            );
            return;
        }

        let code = sequence::mutate(&self.config, &self.code, mutation, rng);
        let progeny = std::mem::take(&mut self.progeny_code);
        self.init(&code, Some(&progeny));
    }

    /// Progeny length times the entropy of the progeny; 0.0 when empty.
    #[must_use]
    pub fn evaluate_fitness(&self) -> f64 {
        if self.progeny_code.is_empty() {
            return 0.0;
        }
        let length = self.progeny_code.chars().count() as f64;
        length * sequence::entropy(&self.progeny_code, self.config.codon_size)
    }

    /// [`Agent::evaluate_fitness`] plus `len(target) * weight` when the
    /// translated progeny contains `target`.
    #[must_use]
    pub fn evaluate_fitness_with_target(&self, target: Option<&str>, weight: f64) -> f64 {
        let base = self.evaluate_fitness();
        let Some(target) = target.filter(|t| !t.is_empty()) else {
            return base;
        };
        if self.progeny_code.is_empty() {
            return base;
        }

        let peptide = self.translate_to_peptide();
        let matched = peptide.contains(target);
        if self.config.verbose {
            debug!(
                "Peptide match for agent (family_id={}): {target} in {peptide}: {matched}",
                self.family_id
            );
        }
        if matched {
            base + target.chars().count() as f64 * weight
        } else {
            base
        }
    }

    /// Progeny translated to a one-letter amino acid sequence.
    #[must_use]
    pub fn translate_to_peptide(&self) -> String {
        peptide::translate(&self.progeny_code, self.config.codon_size)
    }

    /// Return to the uninitialized state.
    pub fn reset(&mut self) {
        self.code.clear();
        self.tape.clear();
        self.program_counter = 0;
        self.eip_ptr = None;
        self.progeny_code.clear();
        self.state = AgentState::Uninitialized;
    }

    /// Capture the agent for reporting.
    #[must_use]
    pub fn snapshot(&self, fitness: f64) -> AgentSnapshot {
        AgentSnapshot {
            family_id: self.family_id,
            code: self.code.clone(),
            progeny_code: self.progeny_code.clone(),
            peptide: self.translate_to_peptide(),
            fitness,
        }
    }

    /// Family id.
    #[must_use]
    pub fn family_id(&self) -> usize {
        self.family_id
    }

    /// Source code (the attempted code if init failed).
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Tape of codons; empty unless the code validated.
    #[must_use]
    pub fn tape(&self) -> &[Codon] {
        &self.tape
    }

    /// Index of the next codon to execute.
    #[must_use]
    pub fn program_counter(&self) -> usize {
        self.program_counter
    }

    /// Position of the most recent START codon.
    #[must_use]
    pub fn eip_ptr(&self) -> Option<usize> {
        self.eip_ptr
    }

    /// Output accumulated so far.
    #[must_use]
    pub fn progeny_code(&self) -> &str {
        &self.progeny_code
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> AgentState {
        self.state
    }

    /// Whether the loaded code validated.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !matches!(
            self.state,
            AgentState::Uninitialized | AgentState::Halted(HaltReason::Invalid)
        )
    }

    /// Whether the agent will execute no further codons.
    #[must_use]
    pub fn is_halted(&self) -> bool {
        match self.state {
            AgentState::Uninitialized | AgentState::Halted(_) => true,
            AgentState::Ready | AgentState::Running => self.program_counter >= self.tape.len(),
        }
    }

    /// Shared configuration.
    #[must_use]
    pub fn config(&self) -> &Arc<GeneticConfig> {
        &self.config
    }
}
