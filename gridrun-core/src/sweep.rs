//! Sweep orchestration.
//!
//! Drives the planned runs strictly in order: build the job command,
//! announce the run, execute it, extract the metric, record the outcome.
//! One run's failure to produce a metric or a clean exit never skips the
//! remaining runs; only a failed launch aborts the sweep.

use tracing::info;

use crate::command::JobCommand;
use crate::config::LauncherConfig;
use crate::error::Result;
use crate::metrics::MetricExtractor;
use crate::runner::JobRunner;
use crate::sweep_log::SweepLog;
use crate::types::{ParamSet, ResultSet, RunRecord};

/// Runs every planned parameter set sequentially and collects the results.
pub struct ExperimentOrchestrator<'a> {
    runner: &'a dyn JobRunner,
    extractor: &'a dyn MetricExtractor,
    launcher: &'a LauncherConfig,
}

impl<'a> ExperimentOrchestrator<'a> {
    pub fn new(
        runner: &'a dyn JobRunner,
        extractor: &'a dyn MetricExtractor,
        launcher: &'a LauncherConfig,
    ) -> Self {
        Self {
            runner,
            extractor,
            launcher,
        }
    }

    /// Execute the plan in order, one run at a time.
    ///
    /// Every parameter set yields exactly one [`RunRecord`], even when the
    /// job exits non-zero or reports no metric (the accuracy defaults to
    /// 0.0). A launch failure aborts the sweep and propagates; records
    /// collected up to that point are dropped with the error.
    pub async fn run_sweep(&self, plan: &[ParamSet], log: &mut SweepLog) -> Result<ResultSet> {
        let mut results = ResultSet::new();

        for params in plan {
            let command = JobCommand::build(self.launcher, params);
            log.banner(params)?;
            info!(
                label = %params.label,
                epochs = params.epochs,
                batch_size = params.batch_size,
                learning_rate = params.learning_rate,
                "Starting run"
            );

            let output = self.runner.run(&command, log).await?;
            // 0.0 covers both a missing metric and a reported 0.00%; the
            // extractor cannot tell them apart, so neither is flagged.
            let accuracy = self.extractor.extract(&output.captured);

            let record = RunRecord::from_run(params, accuracy, output.duration_secs);
            log.run_summary(&record)?;
            info!(
                label = %record.label,
                accuracy = record.accuracy,
                duration_secs = record.duration_secs,
                exit_code = output.exit_code,
                "Run complete"
            );
            results.push(record);
        }

        log.finish()?;
        Ok(results)
    }
}
