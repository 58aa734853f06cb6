//! Error types for the dispatch engine.
//!
//! Per-batch faults are never errors: a trigger that fails, times out, or
//! cannot be spawned is classified into a [`crate::TriggerOutcome`] and
//! folded into the run summary. The `Error` enum below only covers faults in
//! the engine's own machinery, where the summary can no longer be trusted to
//! account for every planned batch.

pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for the dispatch engine.
#[derive(Clone, thiserror::Error, Debug)]
pub enum Error {
    /// The results channel closed before every planned batch reported an
    /// outcome.
    #[error("Results channel closed early: {context}")]
    ChannelClosed { context: String },

    /// A worker task terminated abnormally (panicked or was aborted by the
    /// runtime) instead of draining its share of the plan.
    #[error("Worker task failed: {context}")]
    WorkerFailed { context: String },
}
