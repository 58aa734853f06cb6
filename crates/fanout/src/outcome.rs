//! Outcome classification and run summaries.
//!
//! Each batch resolves to exactly one [`TriggerOutcome`], which is folded
//! into the [`RunSummary`] as soon as it arrives. Individual outcomes are
//! not retained after aggregation: the dispatcher is fire-and-forget, and
//! only the per-kind counts survive a run.

use core::fmt;

/// Terminal classification of a single batch's processing attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// The trigger command ran and reported success.
    Triggered,

    /// Dry-run mode: no invocation was performed.
    DryRun,

    /// The trigger command ran but reported a non-zero completion. Carries
    /// the command's diagnostic text.
    Failed { message: String },

    /// The invocation could not be performed at all (spawn failure, timeout,
    /// unexpected fault).
    Error { message: String },
}

impl TriggerOutcome {
    /// Stable lowercase name of this outcome kind, used in summaries and
    /// progress logs.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Triggered => "triggered",
            Self::DryRun => "dry_run",
            Self::Failed { .. } => "failed",
            Self::Error { .. } => "error",
        }
    }
}

/// Aggregate outcome counts for one dispatch run.
///
/// The sole return value of a run. Once every planned batch has resolved,
/// [`RunSummary::total`] equals the number of planned batches; the engine
/// treats anything else as a broken results channel.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub triggered: u64,
    pub dry_run: u64,
    pub failed: u64,
    pub errored: u64,
}

impl RunSummary {
    /// Folds one outcome into the summary.
    pub fn record(&mut self, outcome: &TriggerOutcome) {
        match outcome {
            TriggerOutcome::Triggered => self.triggered += 1,
            TriggerOutcome::DryRun => self.dry_run += 1,
            TriggerOutcome::Failed { .. } => self.failed += 1,
            TriggerOutcome::Error { .. } => self.errored += 1,
        }
    }

    /// Total number of recorded outcomes across all kinds.
    pub const fn total(&self) -> u64 {
        self.triggered + self.dry_run + self.failed + self.errored
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "triggered: {}, dry_run: {}, failed: {}, error: {}",
            self.triggered, self.dry_run, self.failed, self.errored
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_increments_exactly_one_counter() {
        let mut summary = RunSummary::default();
        summary.record(&TriggerOutcome::Triggered);
        summary.record(&TriggerOutcome::Triggered);
        summary.record(&TriggerOutcome::DryRun);
        summary.record(&TriggerOutcome::Failed {
            message: "exit 1".into(),
        });
        summary.record(&TriggerOutcome::Error {
            message: "timed out".into(),
        });

        assert_eq!(summary.triggered, 2);
        assert_eq!(summary.dry_run, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.errored, 1);
        assert_eq!(summary.total(), 5);
    }

    #[test]
    fn labels_are_stable() {
        assert_eq!(TriggerOutcome::Triggered.label(), "triggered");
        assert_eq!(TriggerOutcome::DryRun.label(), "dry_run");
        assert_eq!(
            TriggerOutcome::Failed { message: "".into() }.label(),
            "failed"
        );
        assert_eq!(TriggerOutcome::Error { message: "".into() }.label(), "error");
    }

    #[test]
    fn display_renders_all_counts() {
        let summary = RunSummary {
            triggered: 3,
            dry_run: 0,
            failed: 1,
            errored: 2,
        };
        assert_eq!(
            summary.to_string(),
            "triggered: 3, dry_run: 0, failed: 1, error: 2"
        );
    }
}
