//! Criterion benchmarks for Dalal hot paths.
//!
//! Benchmarks:
//! 1. Single indicators over one and ten years of daily bars
//! 2. Full overlay set (every configured series)
//! 3. Support/resistance scan
//! 4. End-to-end summary

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use dalal_core::config::AnalysisConfig;
use dalal_core::domain::{Bar, PriceSeries};
use dalal_core::indicators::{macd_of_series, rsi_of_series, Ema, Indicator, Sma};
use dalal_core::levels::find_levels;
use dalal_core::overlays::compute_indicators;
use dalal_core::summary::summarize;

// ── Helpers ──────────────────────────────────────────────────────────

fn make_series(n: usize) -> PriceSeries {
    let base_date = chrono::NaiveDate::from_ymd_opt(2015, 1, 1).unwrap();
    let bars = (0..n)
        .map(|i| {
            let close = 1000.0 + (i as f64 * 0.1).sin() * 80.0 + i as f64 * 0.05;
            let open = close - 2.0;
            Bar {
                date: base_date + chrono::Duration::days(i as i64),
                open,
                high: close + 6.0,
                low: open - 6.0,
                close,
                volume: 1_000_000 + (i as u64 % 500_000),
            }
        })
        .collect();
    PriceSeries::new("BENCH.NS", bars)
}

// ── 1. Single Indicators ─────────────────────────────────────────────

fn bench_indicators(c: &mut Criterion) {
    let mut group = c.benchmark_group("indicators");

    for &bar_count in &[252, 2520] {
        let series = make_series(bar_count);
        let closes = series.closes();

        let sma = Sma::new(20);
        group.bench_with_input(BenchmarkId::new("sma_20", bar_count), &bar_count, |b, _| {
            b.iter(|| sma.compute(black_box(series.bars())));
        });

        let ema = Ema::new(12);
        group.bench_with_input(BenchmarkId::new("ema_12", bar_count), &bar_count, |b, _| {
            b.iter(|| ema.compute(black_box(series.bars())));
        });

        group.bench_with_input(BenchmarkId::new("rsi_14", bar_count), &bar_count, |b, _| {
            b.iter(|| rsi_of_series(black_box(&closes), 14));
        });

        group.bench_with_input(
            BenchmarkId::new("macd_12_26_9", bar_count),
            &bar_count,
            |b, _| {
                b.iter(|| macd_of_series(black_box(&closes), 12, 26, 9));
            },
        );
    }

    group.finish();
}

// ── 2. Overlay Set ───────────────────────────────────────────────────

fn bench_overlays(c: &mut Criterion) {
    let mut group = c.benchmark_group("overlays");
    let config = AnalysisConfig::default();

    for &bar_count in &[252, 2520] {
        let series = make_series(bar_count);
        group.bench_with_input(
            BenchmarkId::new("full_set", bar_count),
            &bar_count,
            |b, _| {
                b.iter(|| compute_indicators(black_box(&series), black_box(&config)));
            },
        );
    }

    group.finish();
}

// ── 3. Support / Resistance ──────────────────────────────────────────

fn bench_levels(c: &mut Criterion) {
    let series = make_series(2520);
    c.bench_function("levels_2520_bars", |b| {
        b.iter(|| find_levels(black_box(&series), 20, 5));
    });
}

// ── 4. Summary ───────────────────────────────────────────────────────

fn bench_summary(c: &mut Criterion) {
    let mut group = c.benchmark_group("summary");
    let config = AnalysisConfig::default();

    for &bar_count in &[252, 1260] {
        let series = make_series(bar_count);
        group.bench_with_input(
            BenchmarkId::new("summarize", bar_count),
            &bar_count,
            |b, _| {
                b.iter(|| summarize(black_box(&series), black_box(&config)));
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_indicators,
    bench_overlays,
    bench_levels,
    bench_summary,
);
criterion_main!(benches);
