//! CSV results table.
//!
//! One row per completed run, in sweep order. The same file is read back
//! when charts are rendered from a previous sweep.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use gridrun_core::error::ReportError;
use gridrun_core::types::{ResultSet, RunRecord};
use tracing::info;

/// Column order of the results table.
pub const CSV_HEADER: [&str; 6] = [
    "Category",
    "Epochs",
    "Batch Size",
    "Learning Rate",
    "Accuracy (%)",
    "Time (s)",
];

/// Write the full results table to `path`, replacing any existing file.
pub fn write_results(path: &Path, results: &ResultSet) -> Result<(), ReportError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|err| table_error(path, err))?;
        }
    }
    let file = File::create(path).map_err(|err| table_error(path, err))?;
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_writer(BufWriter::new(file));
    writer
        .write_record(CSV_HEADER)
        .map_err(|err| table_error(path, err))?;
    for record in results.records() {
        writer
            .write_record([
                record.label.clone(),
                record.epochs.to_string(),
                record.batch_size.to_string(),
                record.learning_rate.to_string(),
                record.accuracy.to_string(),
                record.duration_secs.to_string(),
            ])
            .map_err(|err| table_error(path, err))?;
    }
    writer.flush().map_err(|err| table_error(path, err))?;
    info!(path = %path.display(), rows = results.len(), "Wrote results table");
    Ok(())
}

/// Read a results table previously written by [`write_results`].
pub fn read_results(path: &Path) -> Result<ResultSet, ReportError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|err| table_error(path, err))?;
    let mut results = ResultSet::new();
    for (row, result) in reader.records().enumerate() {
        let record = result.map_err(|err| table_error(path, err))?;
        results.push(parse_row(path, row, &record)?);
    }
    Ok(results)
}

fn parse_row(path: &Path, row: usize, record: &StringRecord) -> Result<RunRecord, ReportError> {
    Ok(RunRecord {
        label: field(path, row, record, 0)?.to_string(),
        epochs: parse_field(path, row, record, 1)?,
        batch_size: parse_field(path, row, record, 2)?,
        learning_rate: parse_field(path, row, record, 3)?,
        accuracy: parse_field(path, row, record, 4)?,
        duration_secs: parse_field(path, row, record, 5)?,
    })
}

fn field<'r>(
    path: &Path,
    row: usize,
    record: &'r StringRecord,
    idx: usize,
) -> Result<&'r str, ReportError> {
    record.get(idx).ok_or_else(|| ReportError::Table {
        path: path.to_path_buf(),
        message: format!("row {} is missing the {} column", row + 1, CSV_HEADER[idx]),
    })
}

fn parse_field<T: std::str::FromStr>(
    path: &Path,
    row: usize,
    record: &StringRecord,
    idx: usize,
) -> Result<T, ReportError> {
    let raw = field(path, row, record, idx)?;
    raw.parse().map_err(|_| ReportError::Table {
        path: path.to_path_buf(),
        message: format!(
            "row {} has an unparseable {} value: {:?}",
            row + 1,
            CSV_HEADER[idx],
            raw
        ),
    })
}

fn table_error(path: &Path, err: impl std::fmt::Display) -> ReportError {
    ReportError::Table {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn sample_results() -> ResultSet {
        let mut results = ResultSet::new();
        results.push(RunRecord {
            label: "Epoch Sweep".to_string(),
            epochs: 1,
            batch_size: 64,
            learning_rate: 0.01,
            accuracy: 97.43,
            duration_secs: 41.52,
        });
        results.push(RunRecord {
            label: "LR Sweep".to_string(),
            epochs: 5,
            batch_size: 64,
            learning_rate: 0.001,
            accuracy: 98.12,
            duration_secs: 183.07,
        });
        results
    }

    #[test]
    fn test_write_results_emits_expected_header_and_rows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("results.csv");
        write_results(&path, &sample_results()).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(
            lines.next(),
            Some("Category,Epochs,Batch Size,Learning Rate,Accuracy (%),Time (s)")
        );
        assert_eq!(lines.next(), Some("Epoch Sweep,1,64,0.01,97.43,41.52"));
        assert_eq!(lines.next(), Some("LR Sweep,5,64,0.001,98.12,183.07"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_write_results_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/out/results.csv");
        write_results(&path, &sample_results()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_read_results_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("results.csv");
        let original = sample_results();
        write_results(&path, &original).unwrap();

        let restored = read_results(&path).unwrap();
        assert_eq!(restored.records(), original.records());
    }

    #[test]
    fn test_read_results_missing_file_is_table_error() {
        let dir = TempDir::new().unwrap();
        let err = read_results(&dir.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, ReportError::Table { .. }));
    }

    #[test]
    fn test_read_results_rejects_unparseable_number() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("results.csv");
        std::fs::write(
            &path,
            "Category,Epochs,Batch Size,Learning Rate,Accuracy (%),Time (s)\n\
             Epoch Sweep,lots,64,0.01,97.43,41.52\n",
        )
        .unwrap();

        let err = read_results(&path).unwrap_err();
        match err {
            ReportError::Table { message, .. } => {
                assert!(message.contains("row 1"));
                assert!(message.contains("Epochs"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_read_results_empty_table_yields_empty_set() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("results.csv");
        write_results(&path, &ResultSet::new()).unwrap();
        let restored = read_results(&path).unwrap();
        assert!(restored.is_empty());
    }
}
