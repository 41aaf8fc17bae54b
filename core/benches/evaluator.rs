//! Benchmarks for the Gavel evaluator.
//!
//! Run with: `cargo bench` in the core/ directory.
//!
//! Benchmark groups:
//! 1. eval_only: pure evaluation of a pre-compiled program
//! 2. full_pipeline: parse + check + compile + eval together (for comparison)
//! 3. policy: the map membership predicate against documents of growing size
//! 4. batch: parallel evaluation of many compiled copies

use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use gavel_core::api::{
    CompilationOptions, EngineOptions, Environment, ExecutionOptions, compile_n, evaluate_all,
};
use gavel_core::evaluator::{Activation, CancelToken};
use gavel_core::stdlib::register_stdlib;
use gavel_core::types::Type;
use gavel_core::values::{MapKey, MapValue, Value};

/// Generate an arithmetic expression like "1 + 1 + 1 + ... + 1" with `n` additions.
fn generate_arithmetic_chain(n: usize) -> String {
    let mut expr = String::from("1");
    for _ in 0..n {
        expr.push_str(" + 1");
    }
    expr
}

fn policy_env() -> Arc<Environment> {
    Environment::new(EngineOptions::default(), |env| {
        env.declare_variable("properties", Type::map(Type::String, Type::Dyn))?;
        register_stdlib(env)
    })
    .expect("environment")
}

fn properties(entries: usize) -> Value {
    let map: MapValue = (0..entries)
        .map(|i| (MapKey::Str(format!("key{}", i).into()), Value::from(i as f64)))
        .chain(std::iter::once((MapKey::Str("mode".into()), Value::from("standard"))))
        .collect();
    Value::Map(Arc::new(map))
}

fn bench_eval_only(c: &mut Criterion) {
    let mut group = c.benchmark_group("eval_only");
    let env = Environment::builder().build(EngineOptions::default());

    // Sizes stay within the default depth limit
    for size in [10, 25, 50, 100] {
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let program = env
                .compile(&generate_arithmetic_chain(size))
                .expect("Compilation failed");
            let activation = Activation::new();

            b.iter(|| {
                let value = program.evaluate(black_box(&activation)).expect("Eval failed");
                black_box(value)
            });
        });
    }

    group.finish();
}

fn bench_full_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_pipeline");
    let env = Environment::builder().build(EngineOptions::default());

    for size in [10, 25, 50, 100] {
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let source = generate_arithmetic_chain(size);
            let activation = Activation::new();

            b.iter(|| {
                let program = env.compile(black_box(&source)).expect("Compilation failed");
                let value = program.evaluate(&activation).expect("Eval failed");
                black_box(value)
            });
        });
    }

    group.finish();
}

fn bench_policy(c: &mut Criterion) {
    let mut group = c.benchmark_group("policy");
    let env = policy_env();
    let program = env
        .compile_with(
            "properties.contains('mode', 'standard') && properties.mode == 'standard'",
            &CompilationOptions::predicate(),
        )
        .expect("Compilation failed");

    for entries in [1, 100, 10_000] {
        let activation = Activation::new().with("properties", properties(entries));
        group.bench_with_input(BenchmarkId::from_parameter(entries), &entries, |b, _| {
            b.iter(|| black_box(program.evaluate(black_box(&activation))))
        });
    }

    group.finish();
}

fn bench_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch");
    let env = policy_env();
    let activation = Activation::new().with("properties", properties(100));
    let cancel = CancelToken::new();
    let options = ExecutionOptions::default();

    for count in [1, 16, 256] {
        group.throughput(Throughput::Elements(count as u64));
        let programs = compile_n(
            &env,
            "properties.contains('mode', 'standard')",
            count,
            &CompilationOptions::predicate(),
        )
        .expect("Compilation failed");

        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            b.iter(|| black_box(evaluate_all(&programs, &activation, &cancel, &options)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_eval_only,
    bench_full_pipeline,
    bench_policy,
    bench_batch
);
criterion_main!(benches);
