//! Dispatch engine.
//!
//! Consumes a batch plan and drives one trigger invocation per batch, in
//! one of two mutually exclusive modes:
//!
//! - **Sequential** (`parallelism == 1`): planned order, one invocation at a
//!   time, with a configurable pause between consecutive real invocations.
//! - **Bounded-parallel** (`parallelism > 1`): a fixed pool of worker tasks
//!   pulls batches from a shared cursor and reports outcomes over an MPSC
//!   channel; a single aggregation loop folds them into the summary in
//!   completion order, so workers never contend on the counters.
//!
//! Dry-run is enforced here, not in the invoker: when it is set, the
//! invoker is never called and every batch records
//! [`TriggerOutcome::DryRun`]. Per-batch faults are contained by the
//! invoker's infallible signature; a run only errors when the engine's own
//! machinery breaks (a worker panics or the results channel closes short).

use crate::config::RunConfig;
use crate::error::{Error, Result};
use crate::invoker::TriggerInvoker;
use crate::outcome::{RunSummary, TriggerOutcome};
use crate::plan::BatchDescriptor;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::mpsc;
use tokio::time::sleep;

/// Buffer size of the results channel between workers and the aggregator.
/// Small is fine: the aggregator only increments counters, so it drains far
/// faster than workers produce.
const RESULT_BUFFER_SIZE: usize = 64;

/// Runs the full plan and returns the aggregate outcome counts.
///
/// All batches are awaited before the summary is returned; the engine never
/// finishes early, and a run whose every batch failed still completes
/// normally. Retrying is the caller's responsibility.
///
/// # Errors
///
/// Only internal faults error: a worker task that panicked, or a results
/// channel that closed before every planned batch reported an outcome.
#[tracing::instrument(skip_all, fields(batches = batches.len(), parallelism = config.parallelism))]
pub async fn run<I>(
    config: &RunConfig,
    batches: Vec<BatchDescriptor>,
    invoker: Arc<I>,
) -> Result<RunSummary>
where
    I: TriggerInvoker,
{
    if config.parallelism <= 1 {
        Ok(run_sequential(config, &batches, invoker.as_ref()).await)
    } else {
        run_parallel(config, batches, invoker).await
    }
}

/// Resolves one batch: dry-run short-circuits without touching the invoker.
async fn resolve<I: TriggerInvoker>(
    dry_run: bool,
    invoker: &I,
    batch: BatchDescriptor,
) -> TriggerOutcome {
    if dry_run {
        TriggerOutcome::DryRun
    } else {
        invoker.trigger(batch).await
    }
}

/// Logs one resolved batch as it arrives.
fn report(batch: BatchDescriptor, outcome: &TriggerOutcome) {
    match outcome {
        TriggerOutcome::Triggered => {
            tracing::info!("Triggered: offset={} - {}", batch.offset, batch.end());
        }
        TriggerOutcome::DryRun => {
            tracing::info!(
                "[DRY RUN] Would trigger: offset={}, batch_size={}",
                batch.offset,
                batch.size
            );
        }
        TriggerOutcome::Failed { message } => {
            tracing::warn!("Failed: offset={} - {message}", batch.offset);
        }
        TriggerOutcome::Error { message } => {
            tracing::error!("Error: offset={} - {message}", batch.offset);
        }
    }
}

/// Sequential mode: planned order, one invocation at a time.
///
/// The pause between invocations throttles consecutive submissions to a
/// trigger target that cannot tolerate bursts. Nothing follows the last
/// batch, and dry runs invoke nothing worth throttling, so both skip it.
async fn run_sequential<I: TriggerInvoker>(
    config: &RunConfig,
    batches: &[BatchDescriptor],
    invoker: &I,
) -> RunSummary {
    let mut summary = RunSummary::default();

    for (i, &batch) in batches.iter().enumerate() {
        let outcome = resolve(config.dry_run, invoker, batch).await;
        report(batch, &outcome);
        summary.record(&outcome);

        if !config.dry_run && !config.delay.is_zero() && i + 1 < batches.len() {
            sleep(config.delay).await;
        }
    }

    summary
}

/// Bounded-parallel mode: a fixed pool of `parallelism` workers over a
/// shared plan cursor, aggregated on a single consumer path.
///
/// At most `parallelism` invocations are in flight at any instant. Outcome
/// order is completion order and carries no guarantee; only the final
/// counts do.
async fn run_parallel<I: TriggerInvoker>(
    config: &RunConfig,
    batches: Vec<BatchDescriptor>,
    invoker: Arc<I>,
) -> Result<RunSummary> {
    let expected = batches.len();
    let batches = Arc::new(batches);
    let cursor = Arc::new(AtomicUsize::new(0));
    let (outcome_tx, mut outcome_rx) = mpsc::channel(RESULT_BUFFER_SIZE);

    let mut workers = Vec::with_capacity(config.parallelism);
    for worker_id in 0..config.parallelism {
        workers.push(tokio::spawn(worker_loop(
            worker_id,
            Arc::clone(&batches),
            Arc::clone(&cursor),
            Arc::clone(&invoker),
            outcome_tx.clone(),
            config.dry_run,
        )));
    }
    // The workers hold the only senders now; `recv()` returns `None` once
    // the last one exits.
    drop(outcome_tx);

    let mut summary = RunSummary::default();
    while let Some((batch, outcome)) = outcome_rx.recv().await {
        report(batch, &outcome);
        summary.record(&outcome);
    }

    for joined in futures::future::join_all(workers).await {
        if let Err(e) = joined {
            return Err(Error::WorkerFailed {
                context: e.to_string(),
            });
        }
    }

    if summary.total() as usize != expected {
        return Err(Error::ChannelClosed {
            context: format!(
                "expected {expected} outcomes, received {}",
                summary.total()
            ),
        });
    }

    Ok(summary)
}

/// Worker task: pulls the next unclaimed batch off the shared cursor,
/// resolves it, and reports the outcome to the aggregator.
async fn worker_loop<I: TriggerInvoker>(
    worker_id: usize,
    batches: Arc<Vec<BatchDescriptor>>,
    cursor: Arc<AtomicUsize>,
    invoker: Arc<I>,
    outcome_tx: mpsc::Sender<(BatchDescriptor, TriggerOutcome)>,
    dry_run: bool,
) {
    tracing::debug!("Worker {worker_id} started");

    loop {
        let idx = cursor.fetch_add(1, Ordering::Relaxed);
        let Some(&batch) = batches.get(idx) else {
            break;
        };

        let outcome = resolve(dry_run, invoker.as_ref(), batch).await;
        if outcome_tx.send((batch, outcome)).await.is_err() {
            tracing::error!("Worker {worker_id} results channel closed");
            break;
        }
    }

    tracing::debug!("Worker {worker_id} stopped");
}
