//! Chart Pipeline Benchmarks
//!
//! Benchmarks for CSV loading, summarising and chart rendering.
//!
//! Run with: `cargo bench --bench chart_ops`

use covplot::{
    render_to_bytes, summarize, Aggregation, ChartStyle, CoverageDataset, LoadOptions,
    SummaryOptions,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn coverage_csv(rows: usize) -> String {
    let mut csv = String::from("file,line_found,line_hit\n");
    for i in 0..rows {
        let found = 50 + (i * 13) % 400;
        let hit = (i * 7) % (found + 1);
        csv.push_str(&format!("src/module_{}/file_{i}.rs,{found},{hit}\n", i % 17));
    }
    csv
}

fn bench_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("load");

    for rows in [100, 1_000, 10_000] {
        let csv = coverage_csv(rows);
        group.bench_with_input(BenchmarkId::from_parameter(rows), &csv, |bench, csv| {
            bench.iter(|| {
                let dataset =
                    CoverageDataset::from_reader(black_box(csv.as_bytes()), &LoadOptions::new());
                black_box(dataset)
            });
        });
    }

    group.finish();
}

fn bench_summarize(c: &mut Criterion) {
    let mut group = c.benchmark_group("summarize");

    let dataset = CoverageDataset::from_reader(coverage_csv(10_000).as_bytes(), &LoadOptions::new())
        .expect("benchmark CSV should parse");

    for (name, aggregate) in [
        ("none", Aggregation::None),
        ("mean_by_file", Aggregation::MeanByFile),
    ] {
        let options = SummaryOptions::new().with_aggregate(aggregate);
        group.bench_function(name, |bench| {
            bench.iter(|| black_box(summarize(black_box(&dataset), &options)));
        });
    }

    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    group.sample_size(20);

    for rows in [10, 50, 200] {
        let dataset = CoverageDataset::from_reader(coverage_csv(rows).as_bytes(), &LoadOptions::new())
            .expect("benchmark CSV should parse");
        let summary = summarize(&dataset, &SummaryOptions::new());
        let style = ChartStyle::default();

        group.bench_with_input(BenchmarkId::from_parameter(rows), &summary, |bench, summary| {
            bench.iter(|| black_box(render_to_bytes(black_box(summary), &style)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_load, bench_summarize, bench_render);
criterion_main!(benches);
