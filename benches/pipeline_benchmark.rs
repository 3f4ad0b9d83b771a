// Pipeline benchmarks
// Author: Gabriel Demetrios Lafis

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rust_report_engine::{
    chart::{ChartFamily, ChartMapper},
    data::{Row, RowSet, Value},
    table::{ExportScope, SortDirection, SortState, TableEngine},
};

/// Daily rows with a label, two numeric columns and a category
fn build_rows(count: usize) -> RowSet {
    let mut rows = RowSet::new(vec![
        "date".to_string(),
        "count".to_string(),
        "amount".to_string(),
        "region".to_string(),
    ]);

    for i in 0..count {
        rows.add_row(Row::new(vec![
            Value::String(format!("2024-01-{:02}", i % 28 + 1)),
            Value::Integer((i * 7 % 101) as i64),
            Value::Float(i as f64 * 1.5),
            Value::String(["north", "south", "east", "west"][i % 4].to_string()),
        ]))
        .expect("row matches columns");
    }

    rows
}

fn bench_chart_mapping(c: &mut Criterion) {
    let mut group = c.benchmark_group("chart_mapping");
    let mapper = ChartMapper::new();

    for count in [100, 1_000, 10_000] {
        let rows = build_rows(count);
        group.bench_with_input(BenchmarkId::new("bar", count), &rows, |b, rows| {
            b.iter(|| black_box(mapper.map(black_box(rows), ChartFamily::Bar)));
        });
        group.bench_with_input(BenchmarkId::new("pie", count), &rows, |b, rows| {
            b.iter(|| black_box(mapper.map(black_box(rows), ChartFamily::Pie)));
        });
    }

    group.finish();
}

fn bench_table_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("table_engine");

    for count in [100, 1_000, 10_000] {
        let mut engine = TableEngine::new(build_rows(count));
        engine.set_filter("north");
        engine.set_sort(SortState::by("amount", SortDirection::Descending));

        group.bench_with_input(BenchmarkId::new("filter_sort", count), &engine, |b, engine| {
            b.iter(|| black_box(engine.view_indices().len()));
        });
        group.bench_with_input(BenchmarkId::new("export_view", count), &engine, |b, engine| {
            b.iter(|| black_box(engine.export(ExportScope::View, ',')));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_chart_mapping, bench_table_engine);
criterion_main!(benches);
