#![doc = include_str!("../README.md")]

pub mod config;
pub mod engine;
pub mod error;
pub mod invoker;
pub mod outcome;
pub mod plan;

pub use config::{RunConfig, TRIGGER_TIMEOUT};
pub use engine::run;
pub use error::{Error, Result};
pub use invoker::{CommandInvoker, CommandSpec, TriggerInvoker};
pub use outcome::{RunSummary, TriggerOutcome};
pub use plan::{BatchDescriptor, plan};
