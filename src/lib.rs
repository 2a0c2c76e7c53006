// Allow unwrap in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
//! Genalpha: codon tape machines evolved by a fitness-driven search.
//!
//! Genetic programs are strings of fixed-size codons. This crate provides:
//! - A tape machine ([`Agent`]) that executes one codon per step and
//!   accumulates an output sequence (its progeny)
//! - A mnemonic compiler, decompiler and compressor ([`Interpreter`])
//! - An evolutionary loop ([`Simulation`]) that mutates and selects agents
//!   by the length and Shannon entropy of their progeny
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │     Simulation (evolution)          │
//! ├──────────────────┬──────────────────┤
//! │  Agent           │  Interpreter     │
//! ├──────────────────┴──────────────────┤
//! │  Validator │ Sequence │ Peptide     │
//! ├─────────────────────────────────────┤
//! │  GeneticConfig / OperationTable     │
//! └─────────────────────────────────────┘
//! ```
//!
//! Configuration is an explicit [`GeneticConfig`] value shared as an
//! `Arc`; nothing in the crate reads global state.

pub mod agent;
pub mod alphabet;
pub mod config;
pub mod error;
pub mod evolution;
pub mod interpreter;
pub mod peptide;
pub mod persistence;
pub mod sequence;
pub mod validator;

pub use agent::{Agent, AgentSnapshot, AgentState, HaltReason};
pub use alphabet::{Codon, OperationTable};
pub use config::{GeneticConfig, Limits};
pub use error::{Error, Result, TapeError};
pub use evolution::{EvolutionConfig, EvolutionError, RunSummary, Simulation};
pub use interpreter::{Compilation, Interpreter};
pub use sequence::{MutationConfig, MutationKind};
