use std::any::Any;
use std::convert::Infallible;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use super::error::EngineError;
use super::partition::partition;
use super::progress::{ProgressStream, spawn_progress};
use crate::domain::{AccountId, Money, Payment};
use crate::storage::LedgerStore;

const DEFAULT_PROGRESS_BUFFER: usize = 16;

/// Fan-out/fan-in aggregation over a ledger's payment sequence
///
/// Every call takes one snapshot of the payments, splits it into partitions,
/// spawns one Tokio task per partition and merges the partial results through
/// a channel drained by the calling task. Tasks are never reused across calls.
pub struct AggregationEngine<L: LedgerStore> {
    ledger: L,
    progress_buffer: usize,
}

impl<L: LedgerStore> AggregationEngine<L> {
    /// Create a new engine reading from the given ledger
    ///
    /// # Example
    /// ```rust,ignore
    /// let ledger = Arc::new(InMemoryLedger::new());
    /// let engine = AggregationEngine::new(ledger.clone());
    ///
    /// let total = engine.sum_payments(4).await;
    /// ```
    pub fn new(ledger: L) -> Self {
        Self {
            ledger,
            progress_buffer: DEFAULT_PROGRESS_BUFFER,
        }
    }

    /// Set the capacity of the progress channel (defaults to 16)
    ///
    /// Chunk tasks wait on a full channel until the consumer catches up.
    pub fn with_progress_buffer(mut self, capacity: usize) -> Self {
        self.progress_buffer = capacity.max(1);
        self
    }

    /// Get reference to the underlying ledger
    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Total of every payment amount, computed by `workers` concurrent tasks
    ///
    /// Zero workers runs a single partition. The result does not depend on
    /// the worker count or on task completion order. Amount overflow is not
    /// guarded; a worker panic is re-raised in the caller.
    pub async fn sum_payments(&self, workers: usize) -> Money {
        let payments = self.ledger.read_all_payments();
        let partitions = partition(payments.len(), workers);

        debug!(
            payments = payments.len(),
            workers = partitions.len(),
            "Summing payments"
        );

        let (tx, mut rx) = mpsc::channel(partitions.len());

        let handles: Vec<_> = partitions
            .into_iter()
            .enumerate()
            .map(|(index, part)| {
                let payments = Arc::clone(&payments);
                let tx = tx.clone();

                tokio::spawn(async move {
                    let partial: Money = payments[part.range()].iter().map(|p| p.amount).sum();
                    trace!(partition = index, partial = partial.minor(), "Partition summed");

                    // One slot per partition, so this never waits
                    let _ = tx.send(partial).await;
                })
            })
            .collect();

        drop(tx);

        let mut total = Money::zero();
        while let Some(partial) = rx.recv().await {
            total += partial;
        }

        for handle in handles {
            if let Err(err) = handle.await {
                resume_worker_panic(err);
            }
        }

        total
    }

    /// Copies of every payment owned by `account_id`
    ///
    /// Fails with [`EngineError::AccountNotFound`] before any task is spawned
    /// if the account does not exist.
    pub async fn filter_payments(
        &self,
        account_id: AccountId,
        workers: usize,
    ) -> Result<Vec<Payment>, EngineError> {
        let account = self.ledger.find_account(account_id)?;
        let owner = account.id();

        self.filter_payments_by(move |payment: &Payment| payment.account_id == owner, workers)
            .await
    }

    /// Copies of every payment matching `predicate`
    ///
    /// A panicking predicate aborts the call with
    /// [`EngineError::PredicateFailure`].
    pub async fn filter_payments_by<F>(
        &self,
        predicate: F,
        workers: usize,
    ) -> Result<Vec<Payment>, EngineError>
    where
        F: Fn(&Payment) -> bool + Send + Sync + 'static,
    {
        self.try_filter_payments_by(
            move |payment: &Payment| Ok::<_, Infallible>(predicate(payment)),
            workers,
        )
        .await
    }

    /// Copies of every payment for which a fallible `predicate` returns `Ok(true)`
    ///
    /// Results are merged in partition order, so they keep the order of the
    /// ledger. No match yields an empty vector. The first predicate error (or
    /// panic) cancels the remaining partitions and is returned instead of a
    /// partial result.
    pub async fn try_filter_payments_by<F, E>(
        &self,
        predicate: F,
        workers: usize,
    ) -> Result<Vec<Payment>, EngineError>
    where
        F: Fn(&Payment) -> Result<bool, E> + Send + Sync + 'static,
        E: fmt::Display + Send + 'static,
    {
        let payments = self.ledger.read_all_payments();
        let partitions = partition(payments.len(), workers);
        let partition_count = partitions.len();

        debug!(
            payments = payments.len(),
            workers = partition_count,
            "Filtering payments"
        );

        let predicate = Arc::new(predicate);
        let cancel = CancellationToken::new();
        let (tx, mut rx) = mpsc::channel(partition_count);
        let mut tasks = JoinSet::new();

        for (index, part) in partitions.into_iter().enumerate() {
            let payments = Arc::clone(&payments);
            let predicate = Arc::clone(&predicate);
            let cancel = cancel.clone();
            let tx = tx.clone();

            tasks.spawn(async move {
                let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                    filter_partition(&payments[part.range()], &*predicate, &cancel)
                }));

                let result = match outcome {
                    Ok(Ok(matches)) => Ok(matches),
                    Ok(Err(message)) => Err(EngineError::PredicateFailure {
                        partition: index,
                        message,
                    }),
                    Err(payload) => Err(EngineError::PredicateFailure {
                        partition: index,
                        message: panic_message(payload),
                    }),
                };

                let _ = tx.send((index, result)).await;
            });
        }

        drop(tx);

        let mut merged: Vec<Option<Vec<Payment>>> = vec![None; partition_count];
        while let Some((index, result)) = rx.recv().await {
            match result {
                Ok(matches) => merged[index] = Some(matches),
                Err(err) => {
                    warn!(error = %err, "Aborting filter");
                    cancel.cancel();
                    tasks.abort_all();
                    return Err(err);
                }
            }
        }

        while let Some(joined) = tasks.join_next().await {
            if let Err(err) = joined {
                resume_worker_panic(err);
            }
        }

        Ok(merged.into_iter().flatten().flatten().collect())
    }

    /// Stream one [`ProgressRecord`](super::ProgressRecord) per chunk of
    /// `unit_size` payments, as each chunk finishes
    ///
    /// Must be called from within a Tokio runtime. Each call spawns a fresh
    /// set of chunk tasks and returns a fresh stream.
    pub fn sum_with_progress(&self, unit_size: usize) -> ProgressStream {
        spawn_progress(
            self.ledger.read_all_payments(),
            unit_size,
            self.progress_buffer,
        )
    }
}

/// Filter one partition, stopping early once another partition has failed
fn filter_partition<F, E>(
    payments: &[Payment],
    predicate: &F,
    cancel: &CancellationToken,
) -> Result<Vec<Payment>, String>
where
    F: Fn(&Payment) -> Result<bool, E>,
    E: fmt::Display,
{
    let mut matches = Vec::new();

    for payment in payments {
        if cancel.is_cancelled() {
            return Ok(Vec::new());
        }

        if predicate(payment).map_err(|e| e.to_string())? {
            matches.push(payment.clone());
        }
    }

    Ok(matches)
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "predicate panicked".to_string()
    }
}

fn resume_worker_panic(err: JoinError) {
    if err.is_panic() {
        panic::resume_unwind(err.into_panic());
    }
    warn!(error = %err, "Aggregation worker cancelled");
}
