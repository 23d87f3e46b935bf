//! Error types for the Gridrun core library.
//!
//! Uses `thiserror` for public API error types with structured error variants
//! covering run execution, configuration, and report generation.

use std::path::PathBuf;

/// Top-level error type for the Gridrun core library.
#[derive(Debug, thiserror::Error)]
pub enum GridrunError {
    #[error("Run error: {0}")]
    Run(#[from] RunError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Report error: {0}")]
    Report(#[from] ReportError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from launching and supervising external jobs.
///
/// A failed launch is fatal to the whole sweep: the launcher itself is
/// broken and every later run would fail the same way. A job that starts
/// and then exits non-zero is not an error at this level; it is reported
/// through the run's exit code instead.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("Failed to launch '{program}': {message}")]
    Spawn { program: String, message: String },

    #[error("Failed to wait for job: {message}")]
    Wait { message: String },

    #[error("Sweep log write failed: {0}")]
    Log(#[from] std::io::Error),
}

/// Errors from the configuration system.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Configuration parse error: {message}")]
    ParseError { message: String },
}

/// Errors from writing the results table or rendering charts.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Results table error for {path}: {message}")]
    Table { path: PathBuf, message: String },

    #[error("Chart rendering failed for {path}: {message}")]
    Chart { path: PathBuf, message: String },
}

/// A type alias for results using the top-level `GridrunError`.
pub type Result<T> = std::result::Result<T, GridrunError>;
