//! The sweep log artifact and console tee.
//!
//! Every raw output line of every run lands in one append-only log file,
//! together with per-run banners and completion summaries. The console
//! only sees lines matching the configured progress keywords, so a noisy
//! training job stays readable in the terminal while the log keeps the
//! full transcript.
//!
//! This artifact is separate from `tracing` diagnostics: it is the
//! operator-facing record of what the jobs printed.

use chrono::Local;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::types::{ParamSet, RunRecord};

const RULER: &str = "================================================================================";

/// Receives raw output lines as a run produces them.
///
/// The process runner only depends on this seam, so tests can capture
/// lines without touching the filesystem.
pub trait OutputSink: Send {
    /// Record one raw output line.
    fn record_line(&mut self, line: &str) -> io::Result<()>;
}

/// Buffered writer for the sweep log file, plus the console echo filter.
pub struct SweepLog {
    writer: BufWriter<File>,
    echo_keywords: Vec<String>,
    path: PathBuf,
}

impl SweepLog {
    /// Create the log file (truncating any previous one) and write the
    /// opening header with the sweep start time.
    pub fn create(path: &Path, title: &str, echo_keywords: Vec<String>) -> io::Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = File::create(path)?;
        let mut log = Self {
            writer: BufWriter::new(file),
            echo_keywords,
            path: path.to_path_buf(),
        };
        writeln!(log.writer, "{title}")?;
        writeln!(log.writer, "{RULER}")?;
        writeln!(
            log.writer,
            "Started: {}",
            Local::now().format("%Y-%m-%d %H:%M:%S")
        )?;
        writeln!(log.writer)?;
        log.writer.flush()?;
        Ok(log)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A line is echoed to the console when it contains any keyword.
    /// An empty keyword list echoes nothing.
    fn should_echo(&self, line: &str) -> bool {
        self.echo_keywords.iter().any(|k| line.contains(k.as_str()))
    }

    /// Announce a run in the log and on the console.
    pub fn banner(&mut self, params: &ParamSet) -> io::Result<()> {
        writeln!(self.writer)?;
        writeln!(self.writer, "{RULER}")?;
        writeln!(
            self.writer,
            "Running {}: Epochs={}, Batch={}, LR={}",
            params.label, params.epochs, params.batch_size, params.learning_rate
        )?;
        writeln!(self.writer, "{RULER}")?;

        let starting = format!(
            "=== Starting experiment: {} | Epochs={}, Batch={}, LR={} ===",
            params.label, params.epochs, params.batch_size, params.learning_rate
        );
        println!("\n{starting}\n");
        writeln!(self.writer, "\n{starting}")?;
        self.writer.flush()
    }

    /// Report a finished run in the log and on the console, then flush so
    /// the log stays durable between runs.
    pub fn run_summary(&mut self, record: &RunRecord) -> io::Result<()> {
        println!(
            "Finished {}: accuracy={:.2}%, time={}s\n",
            record.label, record.accuracy, record.duration_secs
        );
        writeln!(
            self.writer,
            "✅ Completed: {} | Accuracy={:.2}% | Time={}s",
            record.label, record.accuracy, record.duration_secs
        )?;
        self.writer.flush()
    }

    /// Final flush after the last run.
    pub fn finish(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

impl OutputSink for SweepLog {
    fn record_line(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.writer, "{line}")?;
        if self.should_echo(line) {
            println!("{line}");
        }
        Ok(())
    }
}
