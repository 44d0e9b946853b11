mod common;

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use futures::StreamExt;
use ledger_agg::prelude::*;

/// Drain the progress stream for different chunk sizes and channel capacities
fn bench_sum_with_progress(c: &mut Criterion) {
    let runtime = common::runtime(8);
    let mut group = c.benchmark_group("sum_with_progress");

    let ledger = common::shared_ledger(1_000_000);

    for buffer in [1, 16] {
        let engine = AggregationEngine::new(ledger.clone()).with_progress_buffer(buffer);

        for unit_size in [1_000, 10_000, 100_000, DEFAULT_PROGRESS_UNIT] {
            group.bench_with_input(
                BenchmarkId::new(format!("buffer{buffer}"), unit_size),
                &unit_size,
                |b, &unit_size| {
                    b.to_async(&runtime).iter(|| async {
                        let total = engine
                            .sum_with_progress(unit_size)
                            .fold(Money::zero(), |acc, r| async move { acc + r.partial_sum })
                            .await;
                        black_box(total)
                    });
                },
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_sum_with_progress);
criterion_main!(benches);
