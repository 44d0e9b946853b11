mod common;

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use ledger_agg::prelude::*;
use rayon::prelude::*;

/// Parallel sum across worker counts, against a sequential fold baseline
fn bench_sum_payments(c: &mut Criterion) {
    let runtime = common::runtime(8);
    let mut group = c.benchmark_group("sum_payments");

    for size in common::LEDGER_SIZES {
        let ledger = common::shared_ledger(size);
        let engine = AggregationEngine::new(ledger.clone());

        group.bench_with_input(BenchmarkId::new("sequential", size), &size, |b, _| {
            b.iter(|| {
                let payments = ledger.read_all_payments();
                black_box(payments.iter().map(|p| p.amount).sum::<Money>())
            });
        });

        for workers in [1, 2, 4, 8, 32] {
            group.bench_with_input(
                BenchmarkId::new(format!("{workers}workers"), size),
                &workers,
                |b, &workers| {
                    b.to_async(&runtime)
                        .iter(|| async { black_box(engine.sum_payments(workers).await) });
                },
            );
        }
    }

    group.finish();
}

/// Rayon's work-stealing reduction as a reference point for the task fan-out
fn bench_rayon_baseline(c: &mut Criterion) {
    let mut group = c.benchmark_group("rayon_baseline");

    for size in common::LEDGER_SIZES {
        let ledger = common::shared_ledger(size);

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                let payments = ledger.read_all_payments();
                black_box(payments.par_iter().map(|p| p.amount.minor()).sum::<i64>())
            });
        });
    }

    group.finish();
}

/// Filter by account across worker counts
fn bench_filter_payments(c: &mut Criterion) {
    let runtime = common::runtime(8);
    let mut group = c.benchmark_group("filter_payments");
    group.sample_size(20);

    for size in common::LEDGER_SIZES {
        let engine = AggregationEngine::new(common::shared_ledger(size));

        for workers in [1, 4, 8] {
            group.bench_with_input(
                BenchmarkId::new(format!("{workers}workers"), size),
                &workers,
                |b, &workers| {
                    b.to_async(&runtime).iter(|| async {
                        black_box(engine.filter_payments(1, workers).await.ok())
                    });
                },
            );
        }
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_sum_payments,
    bench_rayon_baseline,
    bench_filter_payments
);
criterion_main!(benches);
