//! Trend series benchmarks
//!
//! Measures gap filling and smoothing over the widest corpus window.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use relec_api::trend::{corpus_series, Corpus, YearRate};

fn trend_benchmark(c: &mut Criterion) {
    let sparse: Vec<YearRate> = (1789..=1963)
        .step_by(7)
        .map(|year| YearRate {
            year,
            n: year % 11,
            rate: f64::from(year % 13) * 0.5,
        })
        .collect();
    let dense: Vec<YearRate> = (1789..=1963)
        .map(|year| YearRate {
            year,
            n: 1,
            rate: 1.0,
        })
        .collect();

    c.bench_function("chronam_series_empty", |b| {
        b.iter(|| corpus_series(black_box(Corpus::Chronam), black_box(&[])))
    });
    c.bench_function("chronam_series_sparse", |b| {
        b.iter(|| corpus_series(black_box(Corpus::Chronam), black_box(&sparse)))
    });
    c.bench_function("chronam_series_dense", |b| {
        b.iter(|| corpus_series(black_box(Corpus::Chronam), black_box(&dense)))
    });
}

criterion_group!(benches, trend_benchmark);
criterion_main!(benches);
