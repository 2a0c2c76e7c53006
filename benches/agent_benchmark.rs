//! Benchmarks for agent execution and the mnemonic compiler.

#![allow(missing_docs)] // Benchmark macros generate undocumented functions

use std::hint::black_box;
use std::sync::Arc;

use criterion::{Criterion, criterion_group, criterion_main};
use genalpha::sequence::{entropy, mutate};
use genalpha::{Agent, GeneticConfig, Interpreter, MutationConfig};
use rand::SeedableRng;
use rand::rngs::SmallRng;

/// START, 500 copied data codons, STOP.
fn long_code() -> String {
    let mut code = String::from("AAA");
    for i in 0..500 {
        code.push_str(["UUU", "CCC", "GGG", "AAG"][i % 4]);
    }
    code.push_str("AUA");
    code
}

fn bench_init(c: &mut Criterion) {
    let config = Arc::new(GeneticConfig::default());
    let code = long_code();
    let mut agent = Agent::new(0, config);

    c.bench_function("agent_init_502", |b| {
        b.iter(|| black_box(agent.init(black_box(&code), None)));
    });
}

fn bench_run(c: &mut Criterion) {
    let config = Arc::new(GeneticConfig::default());
    let code = long_code();
    let mut agent = Agent::new(0, config);

    c.bench_function("agent_run_502", |b| {
        b.iter(|| {
            agent.init(&code, None);
            black_box(agent.run(1000))
        });
    });
}

fn bench_fitness(c: &mut Criterion) {
    let config = Arc::new(GeneticConfig::default());
    let mut agent = Agent::new(0, config);
    agent.init(&long_code(), None);
    agent.run(1000);

    c.bench_function("fitness_500", |b| {
        b.iter(|| black_box(agent.evaluate_fitness_with_target(Some("FFPG"), 100.0)));
    });
    c.bench_function("entropy_500", |b| {
        b.iter(|| black_box(entropy(black_box(agent.progeny_code()), 3)));
    });
}

fn bench_mutate(c: &mut Criterion) {
    let config = GeneticConfig::default();
    let code = long_code();
    let mutation = MutationConfig::default();
    let mut rng = SmallRng::seed_from_u64(42);

    c.bench_function("mutate_502", |b| {
        b.iter(|| black_box(mutate(&config, &code, &mutation, &mut rng)));
    });
}

fn bench_compile(c: &mut Criterion) {
    let config = GeneticConfig::default();
    let interpreter = Interpreter::new(&config);
    let source = "START COPY UUU CCC COND IF JUMP GGG STOP\n".repeat(50);
    let code = interpreter.compile(&source);

    c.bench_function("compile_50_lines", |b| {
        b.iter(|| black_box(interpreter.compile(black_box(&source))));
    });
    c.bench_function("decompile_450", |b| {
        b.iter(|| black_box(interpreter.decompile(black_box(&code))));
    });
}

criterion_group!(
    benches,
    bench_init,
    bench_run,
    bench_fitness,
    bench_mutate,
    bench_compile
);
criterion_main!(benches);
