//! Benchmarks for proof search over linear rule chains.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use congo_core::proof::{Fact, ProofSearcher, ProofStrategy};
use congo_core::rules::Rule;

fn chain_rules(len: usize) -> Vec<Rule> {
    (0..len)
        .map(|i| Rule::new(vec![format!("x{i}")], format!("x{}", i + 1)).named(format!("r{i}")))
        .collect()
}

fn bench_backward(c: &mut Criterion) {
    let rules = chain_rules(8);
    let facts = vec![Fact::given("x0")];
    let searcher = ProofSearcher::new();

    c.bench_function("backward_chain_8", |bench| {
        bench.iter(|| {
            black_box(searcher.search("x8", &facts, &rules, ProofStrategy::Backward))
        })
    });
}

fn bench_forward(c: &mut Criterion) {
    let rules = chain_rules(8);
    let facts = vec![Fact::given("x0")];
    let searcher = ProofSearcher::new();

    c.bench_function("forward_chain_8", |bench| {
        bench.iter(|| black_box(searcher.search("x8", &facts, &rules, ProofStrategy::Forward)))
    });
}

fn bench_forward_fixpoint(c: &mut Criterion) {
    // Unreachable goal: forward chaining runs to fixpoint.
    let rules = chain_rules(8);
    let facts = vec![Fact::given("x0")];
    let searcher = ProofSearcher::new();

    c.bench_function("forward_fixpoint_8", |bench| {
        bench.iter(|| black_box(searcher.search("unreachable", &facts, &rules, ProofStrategy::Forward)))
    });
}

criterion_group!(benches, bench_backward, bench_forward, bench_forward_fixpoint);
criterion_main!(benches);
