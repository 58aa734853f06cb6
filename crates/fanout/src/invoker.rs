//! Trigger invocation.
//!
//! The engine models "trigger processing of one batch" as a capability: a
//! function from a [`BatchDescriptor`] to a [`TriggerOutcome`]. This keeps
//! the dispatch engine testable with substitute invokers and independent of
//! process-spawning mechanics.
//!
//! [`CommandInvoker`] is the production implementation. It shells out to the
//! configured trigger binary (an Airflow-style `dags trigger` invocation by
//! default), passing the batch coordinates as a JSON conf payload, and
//! classifies the result into the three-valued completion contract:
//! success, non-zero completion, or could-not-run.

use crate::config::TRIGGER_TIMEOUT;
use crate::outcome::TriggerOutcome;
use crate::plan::BatchDescriptor;
use core::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

/// Maps one batch to its terminal outcome.
///
/// The signature is deliberately infallible: every fault an implementation
/// can hit must be classified into a [`TriggerOutcome`] rather than
/// propagated, so that one bad batch can never abort the run.
pub trait TriggerInvoker: Send + Sync + 'static {
    /// Triggers processing of `batch` and reports how it resolved.
    ///
    /// The returned future must be `Send` so it can be driven from a
    /// spawned worker task.
    fn trigger(&self, batch: BatchDescriptor) -> impl Future<Output = TriggerOutcome> + Send;
}

/// External command template for triggering one batch.
///
/// Rendered as `<program> dags trigger <dag_id> --conf <json>`, with the
/// batch offset and size embedded in the conf payload alongside the
/// configured data source and model backend.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    /// Trigger binary to execute.
    pub program: String,
    /// DAG (pipeline) identifier passed to the trigger binary.
    pub dag_id: String,
    /// `data_source` field of the conf payload.
    pub data_source: String,
    /// `model_backend` field of the conf payload.
    pub model_backend: String,
}

impl Default for CommandSpec {
    fn default() -> Self {
        Self {
            program: "airflow".into(),
            dag_id: "self_healing_pipeline".into(),
            data_source: "file".into(),
            model_backend: "ollama".into(),
        }
    }
}

/// Production [`TriggerInvoker`] that spawns the configured trigger command
/// once per batch, bounded by [`TRIGGER_TIMEOUT`].
#[derive(Debug, Clone)]
pub struct CommandInvoker {
    spec: CommandSpec,
    timeout: Duration,
}

impl CommandInvoker {
    pub const fn new(spec: CommandSpec) -> Self {
        Self::with_timeout(spec, TRIGGER_TIMEOUT)
    }

    /// Overrides the per-invocation bound. [`CommandInvoker::new`] keeps the
    /// default [`TRIGGER_TIMEOUT`].
    pub const fn with_timeout(spec: CommandSpec, timeout: Duration) -> Self {
        Self { spec, timeout }
    }

    /// JSON conf payload handed to the trigger target for one batch.
    fn conf(&self, batch: BatchDescriptor) -> String {
        serde_json::json!({
            "batch_size": batch.size,
            "offset": batch.offset,
            "data_source": self.spec.data_source,
            "model_backend": self.spec.model_backend,
        })
        .to_string()
    }
}

impl TriggerInvoker for CommandInvoker {
    async fn trigger(&self, batch: BatchDescriptor) -> TriggerOutcome {
        let conf = self.conf(batch);
        let mut cmd = Command::new(&self.spec.program);
        cmd.args(["dags", "trigger", self.spec.dag_id.as_str(), "--conf", conf.as_str()]);
        // A timed-out child must not outlive the run.
        cmd.kill_on_drop(true);

        match timeout(self.timeout, cmd.output()).await {
            Ok(Ok(output)) if output.status.success() => TriggerOutcome::Triggered,
            Ok(Ok(output)) => TriggerOutcome::Failed {
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            },
            Ok(Err(e)) => TriggerOutcome::Error {
                message: e.to_string(),
            },
            Err(_) => TriggerOutcome::Error {
                message: format!("trigger timed out after {:?}", self.timeout),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BATCH: BatchDescriptor = BatchDescriptor {
        offset: 3_000,
        size: 1_000,
    };

    #[test]
    fn conf_payload_carries_batch_coordinates() {
        let invoker = CommandInvoker::new(CommandSpec::default());
        let conf: serde_json::Value = serde_json::from_str(&invoker.conf(BATCH)).unwrap();

        assert_eq!(conf["offset"], 3_000);
        assert_eq!(conf["batch_size"], 1_000);
        assert_eq!(conf["data_source"], "file");
        assert_eq!(conf["model_backend"], "ollama");
    }

    // The classification tests drive real executables with well-known exit
    // behavior instead of a live trigger target: `true` ignores its
    // arguments and exits 0, `sh` rejects them with a diagnostic, and a
    // nonexistent program cannot be spawned at all.

    #[cfg(unix)]
    #[tokio::test]
    async fn successful_command_is_triggered() {
        let invoker = CommandInvoker::new(CommandSpec {
            program: "true".into(),
            ..CommandSpec::default()
        });
        assert_eq!(invoker.trigger(BATCH).await, TriggerOutcome::Triggered);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn nonzero_exit_is_failed_with_diagnostic() {
        let invoker = CommandInvoker::new(CommandSpec {
            program: "sh".into(),
            ..CommandSpec::default()
        });
        match invoker.trigger(BATCH).await {
            TriggerOutcome::Failed { message } => {
                // `sh dags ...` cannot open the script file "dags".
                assert!(message.contains("dags"), "unexpected stderr: {message}");
            }
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn stalled_command_times_out_as_error() {
        // `yes` echoes its arguments forever and never exits, so the
        // invocation can only resolve through the bounded wait.
        let invoker = CommandInvoker::with_timeout(
            CommandSpec {
                program: "yes".into(),
                ..CommandSpec::default()
            },
            Duration::from_millis(50),
        );
        match invoker.trigger(BATCH).await {
            TriggerOutcome::Error { message } => {
                assert!(message.contains("timed out"), "unexpected message: {message}");
            }
            other => panic!("expected Error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unspawnable_command_is_error() {
        let invoker = CommandInvoker::new(CommandSpec {
            program: "definitely-not-a-real-trigger-binary".into(),
            ..CommandSpec::default()
        });
        assert!(matches!(
            invoker.trigger(BATCH).await,
            TriggerOutcome::Error { .. }
        ));
    }
}
