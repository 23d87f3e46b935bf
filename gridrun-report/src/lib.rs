//! # Gridrun Report
//!
//! Reporting for gridrun sweeps: the CSV results table and the per-sweep
//! line charts rendered from it.

pub mod charts;
pub mod table;

// Re-export commonly used items at the crate root.
pub use charts::{Param, render_sweep_charts};
pub use table::{CSV_HEADER, read_results, write_results};
