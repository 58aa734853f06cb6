//! Run configuration for the dispatch engine.
//!
//! [`RunConfig`] is a validated, immutable value supplied by the caller
//! (the CLI crate performs the validation). The engine trusts it: a zero
//! batch size or parallelism never reaches this layer.

use core::time::Duration;

/// Upper bound on a single real trigger invocation. An invocation that
/// exceeds it is classified as [`crate::TriggerOutcome::Error`] for that
/// batch only; the run continues.
pub const TRIGGER_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for one dispatch run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Total number of records in the range to cover.
    pub total: u64,
    /// Records per batch (and per trigger invocation). Must be positive.
    pub batch_size: u64,
    /// Number of concurrent trigger invocations. `1` selects sequential
    /// mode; anything larger selects the bounded worker pool.
    pub parallelism: usize,
    /// Record offset to resume from. At most `total`.
    pub start_offset: u64,
    /// Pause between consecutive invocations in sequential mode. Ignored in
    /// parallel mode, where concurrency itself is the throttle.
    pub delay: Duration,
    /// Plan and report without performing any real invocation.
    pub dry_run: bool,
}
