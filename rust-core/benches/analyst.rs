//! Criterion benchmarks for the spectrum analyst
//!
//! Run with: cargo bench -p spectral-analyst-core

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use spectral_analyst::{Algorithm, AnalyzerConfig, SpectrumAnalyst};
use std::f32::consts::PI;

const SAMPLE_RATE: f32 = 44100.0;

/// One second of a tone with a few harmonics
fn generate_signal() -> Vec<f32> {
    (0..SAMPLE_RATE as usize)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE;
            let f1 = (2.0 * PI * 220.0 * t).sin();
            let f2 = 0.5 * (2.0 * PI * 440.0 * t).sin();
            let f3 = 0.25 * (2.0 * PI * 660.0 * t).sin();
            (f1 + f2 + f3) * 0.5
        })
        .collect()
}

fn bench_calculate(c: &mut Criterion) {
    let mut group = c.benchmark_group("Calculate");
    let signal = generate_signal();

    for algorithm in Algorithm::ALL {
        for window_size in [1024usize, 4096] {
            let config = AnalyzerConfig::default()
                .with_algorithm(algorithm)
                .with_window_size(window_size);
            let mut analyst = SpectrumAnalyst::new();

            group.bench_with_input(
                BenchmarkId::new(algorithm.name(), window_size),
                &config,
                |b, config| {
                    b.iter(|| analyst.calculate_with(black_box(config), black_box(&signal)))
                },
            );
        }
    }

    group.finish();
}

fn bench_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("Query");
    let signal = generate_signal();
    let mut analyst = SpectrumAnalyst::new();
    analyst
        .calculate_with(&AnalyzerConfig::default().with_window_size(4096), &signal)
        .unwrap();

    // One value per column of an 800 pixel plot, linear frequency axis
    group.bench_function("processed_value_sweep", |b| {
        let (x_min, x_max) = analyst.x_axis_range();
        let step = (x_max - x_min) / 800.0;
        b.iter(|| {
            let mut x = x_min;
            let mut acc = 0.0f32;
            for _ in 0..800 {
                acc += analyst.processed_value(x, x + step);
                x += step;
            }
            black_box(acc)
        })
    });

    group.bench_function("find_peak", |b| {
        b.iter(|| analyst.find_peak(black_box(445.0)))
    });

    group.finish();
}

criterion_group!(benches, bench_calculate, bench_queries);
criterion_main!(benches);
