//! Write-batch coalescing.
//!
//! Registrations funnel their write jobs through a single worker thread.
//! The worker collects queued jobs until either `max_batch_size` jobs are
//! pending or `max_batch_delay` has elapsed since the first one, then runs
//! the whole group inside one transaction and one commit. Job bodies are
//! executed strictly in sequence, so no body ever observes a batch-mate's
//! partial writes mid-flight.
//!
//! If any body (or the group commit) fails, the transaction is rolled back
//! and every job is rerun in its own transaction. A single poisoned job
//! therefore fails alone instead of failing the whole batch; jobs must be
//! written to tolerate re-execution.

use std::sync::{mpsc, Arc, Mutex};
use std::time::{Duration, Instant};

use rusqlite::{Connection, TransactionBehavior};

use crate::error::StoreError;
use crate::kv::Bucket;

/// A queued write job. Must be re-callable for the solo-retry path.
pub(crate) type BatchJob = Box<dyn Fn(&Bucket<'_>) -> Result<(), StoreError> + Send>;

pub(crate) struct QueuedJob {
    pub(crate) job: BatchJob,
    pub(crate) reply: tokio::sync::oneshot::Sender<Result<(), StoreError>>,
}

/// Worker loop: drain the queue into bounded groups and execute them.
/// Returns when the sending side of the queue is dropped.
pub(crate) fn run_worker(
    conn: Arc<Mutex<Connection>>,
    rx: mpsc::Receiver<QueuedJob>,
    max_batch_size: usize,
    max_batch_delay: Duration,
) {
    loop {
        let first = match rx.recv() {
            Ok(job) => job,
            // All senders gone: the store is closing.
            Err(mpsc::RecvError) => return,
        };

        let mut jobs = vec![first];
        let deadline = Instant::now() + max_batch_delay;
        while jobs.len() < max_batch_size {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match rx.recv_timeout(remaining) {
                Ok(job) => jobs.push(job),
                Err(mpsc::RecvTimeoutError::Timeout) => break,
                Err(mpsc::RecvTimeoutError::Disconnected) => break,
            }
        }

        execute(&conn, jobs);
    }
}

fn execute(conn: &Arc<Mutex<Connection>>, jobs: Vec<QueuedJob>) {
    tracing::debug!(jobs = jobs.len(), "committing write batch");

    match run_group(conn, &jobs) {
        Ok(()) => {
            for queued in jobs {
                let _ = queued.reply.send(Ok(()));
            }
        }
        Err(err) => {
            // The group was rolled back. Rerun each job on its own so the
            // failing one fails alone and the rest still land.
            tracing::warn!(error = %err, "write batch failed, rerunning jobs individually");
            for queued in jobs {
                let result = run_solo(conn, &queued.job);
                let _ = queued.reply.send(result);
            }
        }
    }
}

fn run_group(conn: &Arc<Mutex<Connection>>, jobs: &[QueuedJob]) -> Result<(), StoreError> {
    let mut conn = conn.lock().map_err(|_| StoreError::LockPoisoned)?;
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    {
        let bucket = Bucket::new(&tx);
        for queued in jobs {
            (queued.job)(&bucket)?;
        }
    }
    tx.commit()?;
    Ok(())
}

fn run_solo(conn: &Arc<Mutex<Connection>>, job: &BatchJob) -> Result<(), StoreError> {
    let mut conn = conn.lock().map_err(|_| StoreError::LockPoisoned)?;
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    {
        let bucket = Bucket::new(&tx);
        job(&bucket)?;
    }
    tx.commit()?;
    Ok(())
}
