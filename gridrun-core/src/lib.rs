//! # Gridrun Core
//!
//! Core library for the gridrun experiment sweep tool.
//! Provides the process runner, metric extraction, sweep orchestration,
//! configuration, and fundamental types.

pub mod command;
pub mod config;
pub mod error;
pub mod grid;
pub mod metrics;
pub mod runner;
pub mod sweep;
pub mod sweep_log;
pub mod types;

// Re-export commonly used types at the crate root.
pub use command::JobCommand;
pub use config::{
    ConsoleConfig, GridrunConfig, LauncherConfig, OutputConfig, RunnerConfig, SweepConfig,
    config_exists, load_config,
};
pub use error::{ConfigError, GridrunError, ReportError, Result, RunError};
pub use grid::{BATCH_SWEEP, EPOCH_SWEEP, LR_SWEEP, build_grid};
pub use metrics::{AccuracyExtractor, MetricExtractor};
pub use runner::{JobRunner, ProcessRunner};
pub use sweep::ExperimentOrchestrator;
pub use sweep_log::{OutputSink, SweepLog};
pub use types::{ParamSet, ResultSet, RunOutput, RunRecord};
