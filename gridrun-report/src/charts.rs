//! Per-sweep line charts.
//!
//! Each sweep yields two PNG charts: accuracy and execution time, both
//! plotted against whichever parameter that sweep varies.

use std::path::{Path, PathBuf};

use gridrun_core::error::ReportError;
use gridrun_core::types::{ResultSet, RunRecord};
use plotters::prelude::*;
use tracing::debug;

const CHART_SIZE: (u32, u32) = (600, 400);

/// The hyperparameter a sweep varies, and therefore a chart's x axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Param {
    Epochs,
    BatchSize,
    LearningRate,
}

impl Param {
    /// Human-readable name, matching the results table column.
    pub fn column_name(self) -> &'static str {
        match self {
            Param::Epochs => "Epochs",
            Param::BatchSize => "Batch Size",
            Param::LearningRate => "Learning Rate",
        }
    }

    fn file_key(self) -> &'static str {
        match self {
            Param::Epochs => "epochs",
            Param::BatchSize => "batch",
            Param::LearningRate => "lr",
        }
    }

    fn value_of(self, record: &RunRecord) -> f64 {
        match self {
            Param::Epochs => f64::from(record.epochs),
            Param::BatchSize => f64::from(record.batch_size),
            Param::LearningRate => record.learning_rate,
        }
    }
}

/// Render the accuracy and time charts for every sweep in `results`.
///
/// Returns the rendered paths, accuracy chart first per sweep.
pub fn render_sweep_charts(
    out_dir: &Path,
    results: &ResultSet,
) -> Result<Vec<PathBuf>, ReportError> {
    std::fs::create_dir_all(out_dir).map_err(|err| chart_error(out_dir, err))?;

    let mut rendered = Vec::new();
    for label in results.labels() {
        let records = results.by_label(label);
        let param = varying_param(&records);

        let accuracy_points: Vec<(f64, f64)> = records
            .iter()
            .map(|r| (param.value_of(r), r.accuracy))
            .collect();
        let accuracy_path = out_dir.join(format!("accuracy_vs_{}.png", param.file_key()));
        render_line_chart(
            &accuracy_path,
            &format!("Accuracy vs. {}", param.column_name()),
            param.column_name(),
            "Accuracy (%)",
            &accuracy_points,
            BLUE,
        )?;
        debug!(path = %accuracy_path.display(), sweep = label, "Rendered chart");
        rendered.push(accuracy_path);

        let time_points: Vec<(f64, f64)> = records
            .iter()
            .map(|r| (param.value_of(r), r.duration_secs))
            .collect();
        let time_path = out_dir.join(format!("time_vs_{}.png", param.file_key()));
        render_line_chart(
            &time_path,
            &format!("Execution Time vs. {}", param.column_name()),
            param.column_name(),
            "Time (s)",
            &time_points,
            RED,
        )?;
        debug!(path = %time_path.display(), sweep = label, "Rendered chart");
        rendered.push(time_path);
    }
    Ok(rendered)
}

/// Pick the parameter a sweep actually varies.
///
/// Sweeps hold all but one parameter fixed, so at most one candidate has
/// more than one distinct value. A degenerate single-run sweep falls back
/// to epochs.
fn varying_param(records: &[&RunRecord]) -> Param {
    for param in [Param::Epochs, Param::BatchSize, Param::LearningRate] {
        let values: Vec<f64> = records.iter().map(|r| param.value_of(r)).collect();
        if distinct_count(&values) > 1 {
            return param;
        }
    }
    Param::Epochs
}

fn distinct_count(values: &[f64]) -> usize {
    let mut seen: Vec<u64> = Vec::new();
    for value in values {
        let bits = value.to_bits();
        if !seen.contains(&bits) {
            seen.push(bits);
        }
    }
    seen.len()
}

/// Axis range with a small margin so end points sit inside the frame.
fn padded_range(values: &[f64]) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &value in values {
        min = min.min(value);
        max = max.max(value);
    }
    if min > max {
        return (0.0, 1.0);
    }
    let span = max - min;
    let pad = if span > 0.0 {
        span * 0.05
    } else {
        max.abs().max(1.0) * 0.05
    };
    (min - pad, max + pad)
}

fn render_line_chart(
    path: &Path,
    title: &str,
    x_label: &str,
    y_label: &str,
    points: &[(f64, f64)],
    color: RGBColor,
) -> Result<(), ReportError> {
    let xs: Vec<f64> = points.iter().map(|p| p.0).collect();
    let ys: Vec<f64> = points.iter().map(|p| p.1).collect();
    let (x_min, x_max) = padded_range(&xs);
    let (y_min, y_max) = padded_range(&ys);

    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(|err| chart_error(path, err))?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)
        .map_err(|err| chart_error(path, err))?;

    chart
        .configure_mesh()
        .x_desc(x_label)
        .y_desc(y_label)
        .draw()
        .map_err(|err| chart_error(path, err))?;

    chart
        .draw_series(LineSeries::new(points.iter().copied(), color).point_size(3))
        .map_err(|err| chart_error(path, err))?;

    root.present().map_err(|err| chart_error(path, err))?;
    Ok(())
}

fn chart_error(path: &Path, err: impl std::fmt::Display) -> ReportError {
    ReportError::Chart {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}
