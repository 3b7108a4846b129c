use criterion::{black_box, criterion_group, criterion_main, Criterion};
use mnemos_core::{BehavioralSignal, SignalCategory, SignalOutcome};
use mnemos_scoring::{compute_breakdown, compute_effectiveness_with, correlate, SignalPolicy};

fn signals(n: usize) -> Vec<BehavioralSignal> {
    let categories = [
        SignalCategory::CommandSuccess,
        SignalCategory::TestResult,
        SignalCategory::TaskCompletion,
    ];
    (0..n)
        .map(|i| {
            BehavioralSignal::new(
                categories[i % 3].clone(),
                SignalOutcome::Continuous((i % 10) as f64 / 10.0),
                0.3,
            )
        })
        .collect()
}

fn bench_effectiveness(c: &mut Criterion) {
    let policy = SignalPolicy::canonical();
    let small = signals(3);
    let large = signals(300);
    c.bench_function("effectiveness_3", |b| {
        b.iter(|| compute_effectiveness_with(black_box(&small), &policy))
    });
    c.bench_function("effectiveness_300", |b| {
        b.iter(|| compute_effectiveness_with(black_box(&large), &policy))
    });
    c.bench_function("breakdown_300", |b| b.iter(|| compute_breakdown(black_box(&large), &policy)));
}

fn bench_correlation(c: &mut Criterion) {
    let xs: Vec<f64> = (0..1000).map(|i| (i % 97) as f64 / 97.0).collect();
    let ys: Vec<f64> = xs.iter().map(|x| x * 0.8 + 0.1).collect();
    c.bench_function("correlate_1000", |b| b.iter(|| correlate(black_box(&xs), black_box(&ys))));
}

criterion_group!(benches, bench_effectiveness, bench_correlation);
criterion_main!(benches);
