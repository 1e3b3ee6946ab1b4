//! Aggregation translation benchmarks.
//!
//! These benchmarks measure query generation for single conditions and for
//! rules with growing numbers of aggregation conditions, sequentially and on
//! the rayon thread pool.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use sigma_query::{
    AggregationExpr, AggregationFunc, ComparisonOp, CompilerConfig, FieldMapping, QueryCompiler,
};

fn bench_field_mapping() -> FieldMapping {
    let mut mapping = FieldMapping::new();
    for i in 0..500 {
        mapping.add_mapping(format!("Field{i}"), format!("target.field_{i}"));
    }
    mapping
}

fn generate_conditions(count: usize) -> Vec<AggregationExpr> {
    (0..count)
        .map(|i| {
            let field = format!("Field{}", i % 1000);
            let func = match i % 5 {
                0 => AggregationFunc::count(field),
                1 => AggregationFunc::average(field),
                2 => AggregationFunc::sum(field),
                3 => AggregationFunc::min(field),
                _ => AggregationFunc::max(field),
            };
            let func = if i % 2 == 0 {
                func.grouped_by(format!("Field{}", (i + 7) % 1000))
            } else {
                func
            };
            AggregationExpr::comparison(func, ComparisonOp::Gte, (i % 100) as f64)
        })
        .collect()
}

fn bench_single_condition(c: &mut Criterion) {
    let compiler = QueryCompiler::with_field_mapping(bench_field_mapping());
    let expr = AggregationExpr::comparison(
        AggregationFunc::average("Field1").grouped_by("Field2"),
        ComparisonOp::Lt,
        100.0,
    );

    c.bench_function("translate_single_condition", |b| {
        b.iter(|| compiler.translate_aggregation(black_box(0), black_box(&expr)))
    });
}

fn bench_rule_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("translate_conditions");
    let sequential = QueryCompiler::with_field_mapping(bench_field_mapping());
    let parallel = sequential.clone().with_config(
        CompilerConfig::new()
            .with_parallel(true)
            .with_min_conditions_for_parallelism(1),
    );

    for size in [10, 100, 1_000, 10_000] {
        let conditions = generate_conditions(size);

        group.bench_with_input(
            BenchmarkId::new("sequential", size),
            &conditions,
            |b, conditions| b.iter(|| sequential.translate_conditions(black_box(conditions))),
        );
        group.bench_with_input(
            BenchmarkId::new("parallel", size),
            &conditions,
            |b, conditions| b.iter(|| parallel.translate_conditions(black_box(conditions))),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_single_condition, bench_rule_scaling);
criterion_main!(benches);
