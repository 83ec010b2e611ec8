use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use pggo::{Condition, SelectBuilder, NoopDb, equal, in_list, or, select};

/// SELECT col0, col1, ... FROM t WHERE ((col0 = $1) AND (col1 = $2) ...)
fn build_select(n: usize) -> SelectBuilder<'static, NoopDb> {
    let columns: Vec<String> = (0..n).map(|i| format!("col{i}")).collect();
    let conditions: Vec<Condition> = (0..n).map(|i| equal(format!("col{i}"), i as i64)).collect();
    select(columns).from_table("t").where_(conditions)
}

fn bench_simple_select(c: &mut Criterion) {
    c.bench_function("sql_builder/simple_select", |b| {
        b.iter(|| {
            let builder = select(["id", "name"])
                .from_table("person")
                .where_([equal("name", "Joe")]);
            black_box(builder.sql().unwrap());
        });
    });
}

fn bench_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/compile");

    for n in [1, 5, 10, 50, 100] {
        let builder = build_select(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &builder, |b, builder| {
            b.iter(|| black_box(builder.sql().unwrap()));
        });
    }

    group.finish();
}

fn bench_build_and_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/build_and_compile");

    for n in [1, 5, 10, 50, 100] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| black_box(build_select(n).sql().unwrap()));
        });
    }

    group.finish();
}

fn bench_in_list(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/in_list");

    for n in [5, 20, 100, 500] {
        let values: Vec<i64> = (0..n).collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &values, |b, values| {
            b.iter(|| {
                let builder = select(["*"])
                    .from_table("t")
                    .where_([in_list("id", values.iter().copied())]);
                black_box(builder.sql().unwrap());
            });
        });
    }

    group.finish();
}

fn bench_nested_or(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/nested_or");

    for n in [1, 5, 10, 50] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| {
                let branches = (0..n).map(|i| equal("a", i as i64).and(equal("b", i as i64)));
                let builder = select(["*"]).from_table("t").where_([or(branches)]);
                black_box(builder.sql().unwrap());
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_simple_select,
    bench_compile,
    bench_build_and_compile,
    bench_in_list,
    bench_nested_or
);
criterion_main!(benches);
