use std::panic;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll, ready};

use futures::Stream;
use futures::stream::FusedStream;
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, trace, warn};

use super::partition::chunk;
use crate::domain::{Money, Payment};
use crate::storage::PaymentSnapshot;

/// Partial total emitted by one chunk task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProgressRecord {
    pub items_processed: usize,
    pub partial_sum: Money,
}

/// Finite stream of [`ProgressRecord`]s, one per chunk, in completion order
///
/// The stream ends once every chunk task has emitted its record and keeps
/// returning `None` afterwards. A chunk task that panics instead of emitting
/// re-raises its panic in the consumer when the channel closes. Dropping the
/// stream early aborts every chunk task still owned by it.
pub struct ProgressStream {
    receiver: mpsc::Receiver<ProgressRecord>,
    tasks: JoinSet<()>,
    chunk_count: usize,
    terminated: bool,
}

impl ProgressStream {
    /// Number of chunk tasks spawned, i.e. the number of records to expect
    pub fn chunk_count(&self) -> usize {
        self.chunk_count
    }
}

impl Stream for ProgressStream {
    type Item = ProgressRecord;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if self.terminated {
            return Poll::Ready(None);
        }

        if let Some(record) = ready!(self.receiver.poll_recv(cx)) {
            return Poll::Ready(Some(record));
        }

        // Every sender is gone; a task that died without emitting shows up here
        while let Some(joined) = ready!(self.tasks.poll_join_next(cx)) {
            if let Err(err) = joined {
                if err.is_panic() {
                    self.terminated = true;
                    panic::resume_unwind(err.into_panic());
                }
                warn!(error = %err, "Chunk task cancelled");
            }
        }

        self.terminated = true;
        Poll::Ready(None)
    }
}

impl FusedStream for ProgressStream {
    fn is_terminated(&self) -> bool {
        self.terminated
    }
}

/// Spawn one summing task per chunk of `unit_size` payments
pub(crate) fn spawn_progress(
    payments: PaymentSnapshot,
    unit_size: usize,
    buffer: usize,
) -> ProgressStream {
    spawn_chunk_tasks(payments, unit_size, buffer, |chunk: &[Payment]| {
        chunk.iter().map(|p| p.amount).sum()
    })
}

fn spawn_chunk_tasks<F>(
    payments: PaymentSnapshot,
    unit_size: usize,
    buffer: usize,
    sum_chunk: F,
) -> ProgressStream
where
    F: Fn(&[Payment]) -> Money + Send + Sync + 'static,
{
    let chunks = chunk(payments.len(), unit_size);
    let chunk_count = chunks.len();

    debug!(
        payments = payments.len(),
        unit_size,
        chunks = chunk_count,
        "Starting progress aggregation"
    );

    let (tx, rx) = mpsc::channel(buffer.max(1));
    let sum_chunk = Arc::new(sum_chunk);
    let mut tasks = JoinSet::new();

    for (index, part) in chunks.into_iter().enumerate() {
        let payments = Arc::clone(&payments);
        let sum_chunk = Arc::clone(&sum_chunk);
        let tx = tx.clone();

        tasks.spawn(async move {
            let record = ProgressRecord {
                items_processed: part.len(),
                partial_sum: sum_chunk(&payments[part.range()]),
            };

            trace!(chunk = index, items = record.items_processed, "Chunk summed");

            if tx.send(record).await.is_err() {
                debug!(chunk = index, "Progress stream dropped before record was read");
            }
        });
    }

    // The stream closes once the last task drops its sender
    drop(tx);

    ProgressStream {
        receiver: rx,
        tasks,
        chunk_count,
        terminated: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio_test::{assert_pending, assert_ready_eq, task};

    fn snapshot(amounts: impl IntoIterator<Item = i64>) -> PaymentSnapshot {
        Arc::new(
            amounts
                .into_iter()
                .enumerate()
                .map(|(i, a)| Payment::new(format!("p-{i}"), 1, Money::from_minor(a), "test"))
                .collect(),
        )
    }

    #[tokio::test]
    async fn unit_larger_than_input_yields_single_record() {
        let records: Vec<_> = spawn_progress(snapshot(1..=10), 11, 4).collect().await;

        assert_eq!(
            records,
            vec![ProgressRecord {
                items_processed: 10,
                partial_sum: Money::from_minor(55),
            }]
        );
    }

    #[tokio::test]
    async fn empty_input_yields_zero_record() {
        let records: Vec<_> = spawn_progress(snapshot([]), 100, 4).collect().await;

        assert_eq!(
            records,
            vec![ProgressRecord {
                items_processed: 0,
                partial_sum: Money::zero(),
            }]
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn records_add_up_to_totals() {
        let stream = spawn_progress(snapshot(1..=1_003), 100, 2);
        assert_eq!(stream.chunk_count(), 10);

        let records: Vec<_> = stream.collect().await;

        assert_eq!(records.len(), 10);
        assert_eq!(
            records.iter().map(|r| r.items_processed).sum::<usize>(),
            1_003
        );
        assert_eq!(
            records.iter().map(|r| r.partial_sum).sum::<Money>(),
            Money::from_minor(1_003 * 1_004 / 2)
        );
    }

    #[tokio::test]
    async fn remainder_goes_to_last_chunk() {
        let mut sizes: Vec<_> = spawn_progress(snapshot(vec![1; 25]), 10, 1)
            .map(|r| r.items_processed)
            .collect()
            .await;
        sizes.sort_unstable();

        assert_eq!(sizes, vec![10, 15]);
    }

    #[tokio::test]
    async fn chunks_have_fixed_size() {
        let mut sizes: Vec<_> = spawn_progress(snapshot(vec![1; 47]), 10, 4)
            .map(|r| r.items_processed)
            .collect()
            .await;
        sizes.sort_unstable();

        assert_eq!(sizes, vec![10, 10, 10, 17]);
    }

    #[tokio::test]
    async fn zero_unit_size_is_clamped() {
        let records: Vec<_> = spawn_progress(snapshot([4, 5, 6]), 0, 1).collect().await;

        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|r| r.items_processed == 1));
    }

    #[tokio::test]
    async fn stays_exhausted_after_close() {
        let mut stream = spawn_progress(snapshot([1, 2]), 10, 1);

        assert!(stream.next().await.is_some());
        assert!(stream.next().await.is_none());
        assert!(stream.is_terminated());
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn does_not_close_before_every_chunk_emitted() {
        // Current-thread runtime: chunk tasks only run when this task yields
        let stream = spawn_progress(snapshot(vec![1; 30]), 10, 8);
        let mut polled = task::spawn(stream);

        assert_pending!(polled.poll_next());

        let mut seen = 0;
        while seen < 3 {
            tokio::task::yield_now().await;
            while let Poll::Ready(Some(_)) = polled.poll_next() {
                seen += 1;
            }
        }

        let mut closed = polled.poll_next();
        while closed.is_pending() {
            tokio::task::yield_now().await;
            closed = polled.poll_next();
        }
        assert_eq!(closed, Poll::Ready(None));
        assert_ready_eq!(polled.poll_next(), None);
    }

    #[tokio::test]
    #[should_panic(expected = "chunk exploded")]
    async fn panicking_chunk_is_raised_in_consumer() {
        let stream = spawn_chunk_tasks(snapshot([7, 1, 13, 1]), 2, 4, |chunk: &[Payment]| {
            if chunk.iter().any(|p| p.amount == Money::from_minor(13)) {
                panic!("chunk exploded");
            }
            chunk.iter().map(|p| p.amount).sum()
        });

        let _records: Vec<_> = stream.collect().await;
    }

    #[tokio::test]
    async fn dropping_stream_aborts_unstarted_chunks() {
        let summed = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&summed);

        // Current-thread runtime: nothing runs before the first yield
        let stream = spawn_chunk_tasks(snapshot(vec![1; 1_000]), 10, 1, move |chunk: &[Payment]| {
            counter.fetch_add(1, Ordering::SeqCst);
            chunk.iter().map(|p| p.amount).sum()
        });
        assert_eq!(stream.chunk_count(), 100);
        drop(stream);

        for _ in 0..10 {
            tokio::task::yield_now().await;
        }

        assert_eq!(summed.load(Ordering::SeqCst), 0);
    }
}
