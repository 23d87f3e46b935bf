//! Fundamental types shared across the sweep pipeline.

use serde::{Deserialize, Serialize};

/// One planned run: a sweep label plus a full parameter assignment.
///
/// Immutable once constructed. Exactly one [`RunRecord`] is produced for
/// every `ParamSet` handed to the orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamSet {
    /// Sweep this run belongs to (e.g. "Epoch Sweep").
    pub label: String,
    /// Number of training epochs.
    pub epochs: u32,
    /// Training batch size.
    pub batch_size: u32,
    /// Optimizer learning rate.
    pub learning_rate: f64,
}

/// The recorded outcome of one run attempt.
///
/// Created exactly once per completed attempt, including failed and
/// zero-metric attempts, and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub label: String,
    pub epochs: u32,
    pub batch_size: u32,
    pub learning_rate: f64,
    /// Extracted accuracy percentage, 0.0 when no metric line was found.
    pub accuracy: f64,
    /// Wall-clock runtime in seconds, rounded to two decimals.
    pub duration_secs: f64,
}

impl RunRecord {
    /// Combine a planned run with its measured outcome.
    pub fn from_run(params: &ParamSet, accuracy: f64, duration_secs: f64) -> Self {
        Self {
            label: params.label.clone(),
            epochs: params.epochs,
            batch_size: params.batch_size,
            learning_rate: params.learning_rate,
            accuracy,
            duration_secs,
        }
    }
}

/// Captured output and measurements from one completed run attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutput {
    /// Every merged stdout/stderr line, joined with newlines.
    pub captured: String,
    /// Wall-clock runtime in seconds, rounded to two decimals.
    pub duration_secs: f64,
    /// Process exit code, -1 when the job was killed or died on a signal.
    pub exit_code: i32,
}

/// Ordered collection of run records, in execution order.
///
/// Append-only while a sweep runs; read-only once reporting starts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultSet {
    records: Vec<RunRecord>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Append one record. Records arrive in run execution order.
    pub fn push(&mut self, record: RunRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[RunRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct sweep labels in first-seen order.
    pub fn labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = Vec::new();
        for record in &self.records {
            if !labels.contains(&record.label.as_str()) {
                labels.push(&record.label);
            }
        }
        labels
    }

    /// All records belonging to one sweep, in execution order.
    pub fn by_label(&self, label: &str) -> Vec<&RunRecord> {
        self.records.iter().filter(|r| r.label == label).collect()
    }
}

impl FromIterator<RunRecord> for ResultSet {
    fn from_iter<I: IntoIterator<Item = RunRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}
