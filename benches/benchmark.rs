// Benchmarks for the hot paths of a refinement round
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use linkspec_core::{Mapping, MetricExpression, Record, RecordCache, RuleTree};
use linkspec_learning::rank::{rank_candidates, score_candidates, Candidate, PreviouslyPresented};
use linkspec_learning::{materialize, relax, FeatureSchema, PropertyMapping};
use linkspec_similarity::{BuiltinSimilarity, ExecutionEngine, NestedLoopEngine};
use rand::prelude::*;

const WORDS: [&str; 12] = [
    "alpha", "berlin", "castle", "dresden", "elbe", "forest", "garden", "harbor", "island",
    "leipzig", "market", "north",
];

fn random_name(rng: &mut impl Rng) -> String {
    (0..rng.random_range(1..4))
        .map(|_| WORDS[rng.random_range(0..WORDS.len())])
        .collect::<Vec<_>>()
        .join(" ")
}

fn generate_cache(prefix: &str, property: &str, size: usize) -> RecordCache {
    let mut rng = rand::rng();
    RecordCache::from_records(
        (0..size).map(|i| Record::new(format!("{}{}", prefix, i)).with_property(property, random_name(&mut rng))),
    )
}

fn generate_oracle(size: usize) -> Mapping {
    let mut rng = rand::rng();
    let mut oracle = Mapping::new();
    for i in 0..size {
        let value = if rng.random_bool(0.5) { 1.0 } else { 0.0 };
        oracle.add(format!("s{}", i), format!("t{}", i), value);
    }
    oracle
}

fn nested_rule() -> RuleTree {
    RuleTree::and(vec![
        RuleTree::atomic(MetricExpression::new("trigrams", "name", "label"), 0.55),
        RuleTree::minus(vec![
            RuleTree::atomic(MetricExpression::new("jaro", "name", "label"), 0.8),
            RuleTree::or(vec![
                RuleTree::atomic(MetricExpression::new("cosine", "name", "label"), 0.3),
                RuleTree::atomic(MetricExpression::new("qgrams", "name", "label"), 0.95),
            ]),
        ]),
    ])
}

fn benchmark_relax(c: &mut Criterion) {
    let rule = nested_rule();
    c.bench_function("relax_nested_rule", |b| {
        b.iter(|| black_box(relax(black_box(&rule))));
    });
}

fn benchmark_materialize(c: &mut Criterion) {
    let mut group = c.benchmark_group("materialize");
    let schema = FeatureSchema::build(&PropertyMapping::new().with_string("name", "label")).unwrap();

    for size in [10, 100, 1000].iter() {
        let source = generate_cache("s", "name", *size);
        let target = generate_cache("t", "label", *size);
        let oracle = generate_oracle(*size);

        group.bench_with_input(BenchmarkId::new("string_pairs", size), size, |b, _| {
            b.iter(|| {
                let set = materialize(&schema, black_box(&oracle), &source, &target, &BuiltinSimilarity).unwrap();
                black_box(set);
            });
        });
    }

    group.finish();
}

fn benchmark_select(c: &mut Criterion) {
    let mut group = c.benchmark_group("select_next");
    let rule = relax(&RuleTree::atomic(MetricExpression::new("trigrams", "name", "label"), 0.6));
    let measures = linkspec_learning::rank::measures_from_rule(&rule);
    let engine = NestedLoopEngine::new(BuiltinSimilarity);

    for size in [50, 200].iter() {
        let source = generate_cache("s", "name", *size);
        let target = generate_cache("t", "label", *size);
        let presented = PreviouslyPresented::from(&generate_oracle(*size));

        group.bench_with_input(BenchmarkId::new("execute_and_rank", size), size, |b, _| {
            b.iter(|| {
                let accepted = engine.execute(&rule, &source, &target);
                let scored = score_candidates(&accepted, &source, &target, &measures, &BuiltinSimilarity);
                black_box(rank_candidates(scored, &presented, 10));
            });
        });
    }

    group.finish();
}

fn benchmark_rank(c: &mut Criterion) {
    let mut rng = rand::rng();
    let candidates: Vec<Candidate> = (0..10_000)
        .map(|i| {
            Candidate::new(format!("s{}", i), format!("t{}", i), 1.0)
                .with_distance(rng.random_range(0.0..1.0))
        })
        .collect();
    let presented = PreviouslyPresented::new();

    c.bench_function("rank_10k_candidates", |b| {
        b.iter(|| black_box(rank_candidates(candidates.clone(), &presented, 10)));
    });
}

criterion_group!(benches, benchmark_relax, benchmark_materialize, benchmark_select, benchmark_rank);
criterion_main!(benches);
