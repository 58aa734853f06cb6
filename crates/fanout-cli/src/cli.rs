//! Argument parsing and validation for the `fanout` binary.
//!
//! All values are parsed from CLI arguments or environment variables, with
//! defaults matching a cautious sequential submission: one trigger at a
//! time, one second apart. Validation happens once, in
//! [`Settings::try_from`]; the engine receives only well-formed
//! configuration.

use anyhow::bail;
use clap::Parser;
use core::time::Duration;
use fanout::{CommandSpec, RunConfig};

/// Runtime configuration for the `fanout` binary.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "fanout",
    version,
    about = "Partitions a record range into fixed-size batches and triggers one pipeline run per batch"
)]
pub struct CliArgs {
    /// Total number of records to process.
    ///
    /// Environment variable: `FANOUT_TOTAL`
    #[arg(long, env = "FANOUT_TOTAL")]
    pub total: u64,

    /// Records per trigger invocation.
    ///
    /// Every batch carries this size, including the final one, which may
    /// extend past `--total`; the trigger target bounds its own reads.
    ///
    /// Environment variable: `FANOUT_BATCH_SIZE`
    #[arg(long, env = "FANOUT_BATCH_SIZE", default_value_t = 1000)]
    pub batch_size: u64,

    /// Number of triggers dispatched concurrently.
    ///
    /// `1` runs strictly in planned order with `--delay` between
    /// invocations. Anything larger runs a fixed pool of that many workers
    /// with no inter-invocation delay; completion order is unspecified.
    ///
    /// Environment variable: `FANOUT_PARALLEL`
    #[arg(long, env = "FANOUT_PARALLEL", default_value_t = 1)]
    pub parallel: usize,

    /// Record offset to resume from.
    ///
    /// This is the only resumption mechanism: the dispatcher keeps no state
    /// between runs. Must not exceed `--total`.
    ///
    /// Environment variable: `FANOUT_START`
    #[arg(long, env = "FANOUT_START", default_value_t = 0)]
    pub start: u64,

    /// Seconds to wait between consecutive triggers in sequential mode.
    ///
    /// Ignored in parallel mode and in dry runs.
    ///
    /// Environment variable: `FANOUT_DELAY`
    #[arg(long, env = "FANOUT_DELAY", default_value_t = 1.0)]
    pub delay: f64,

    /// Print what would be triggered without executing anything.
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    /// Trigger binary to execute once per batch.
    ///
    /// Environment variable: `FANOUT_TRIGGER_BIN`
    #[arg(long, env = "FANOUT_TRIGGER_BIN", default_value_t = String::from("airflow"))]
    pub trigger_bin: String,

    /// Pipeline (DAG) identifier passed to the trigger binary.
    ///
    /// Environment variable: `FANOUT_DAG_ID`
    #[arg(long, env = "FANOUT_DAG_ID", default_value_t = String::from("self_healing_pipeline"))]
    pub dag_id: String,

    /// `data_source` field of the per-batch conf payload.
    ///
    /// Environment variable: `FANOUT_DATA_SOURCE`
    #[arg(long, env = "FANOUT_DATA_SOURCE", default_value_t = String::from("file"))]
    pub data_source: String,

    /// `model_backend` field of the per-batch conf payload.
    ///
    /// Environment variable: `FANOUT_MODEL_BACKEND`
    #[arg(long, env = "FANOUT_MODEL_BACKEND", default_value_t = String::from("ollama"))]
    pub model_backend: String,
}

/// Validated settings: the engine's run configuration plus the trigger
/// command template.
#[derive(Debug, Clone)]
pub struct Settings {
    pub run: RunConfig,
    pub command: CommandSpec,
}

impl TryFrom<CliArgs> for Settings {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.batch_size == 0 {
            bail!("--batch-size must be greater than 0");
        }

        if args.parallel == 0 {
            bail!("--parallel must be greater than 0");
        }

        if args.start > args.total {
            bail!(
                "--start ({}) exceeds --total ({})",
                args.start,
                args.total
            );
        }

        if !args.delay.is_finite() || args.delay < 0.0 {
            bail!("--delay must be a non-negative number of seconds");
        }

        Ok(Self {
            run: RunConfig {
                total: args.total,
                batch_size: args.batch_size,
                parallelism: args.parallel,
                start_offset: args.start,
                delay: Duration::from_secs_f64(args.delay),
                dry_run: args.dry_run,
            },
            command: CommandSpec {
                program: args.trigger_bin,
                dag_id: args.dag_id,
                data_source: args.data_source,
                model_backend: args.model_backend,
            },
        })
    }
}
