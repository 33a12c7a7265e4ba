//! CSV report output.

use std::fs::File;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::scan::HitRecord;

/// Report columns, in file order.
pub const COLUMNS: [&str; 9] = [
    "total_hits",
    "hit_index",
    "line_number",
    "target_text",
    "target_line",
    "operation_no_line",
    "tool_number_line",
    "tool_change_line",
    "parent_line",
];

/// Marker placed between the input name and the timestamp in report names.
pub const REPORT_TAG: &str = "MCDTargetHunter";

/// Errors that can occur while writing a report.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to create report {path}: {source}")]
    CreateError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write report {path}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// A persisted report row: the hit plus the run total.
#[derive(Debug, Serialize)]
struct ReportRow<'a> {
    total_hits: usize,
    hit_index: usize,
    line_number: usize,
    target_text: &'a str,
    target_line: &'a str,
    operation_no_line: &'a str,
    tool_number_line: &'a str,
    tool_change_line: &'a str,
    parent_line: &'a str,
}

impl<'a> ReportRow<'a> {
    fn new(total_hits: usize, hit: &'a HitRecord) -> Self {
        Self {
            total_hits,
            hit_index: hit.hit_index,
            line_number: hit.line_number,
            target_text: &hit.target_text,
            target_line: &hit.target_line,
            operation_no_line: &hit.operation_no_line,
            tool_number_line: &hit.tool_number_line,
            tool_change_line: &hit.tool_change_line,
            parent_line: &hit.parent_line,
        }
    }
}

/// Write `hits` to a CSV file at `path`, creating or overwriting it.
///
/// The header row is always written, even when there are no hits. Rows end
/// in CRLF so spreadsheet tools on Windows open the file cleanly.
///
/// # Errors
///
/// Returns `ReportError` if the file cannot be created or any row fails to
/// write. A failed report should be treated as unusable.
pub fn write_report(path: &Path, hits: &[HitRecord], total_hits: usize) -> Result<(), ReportError> {
    let file = File::create(path).map_err(|source| ReportError::CreateError {
        path: path.to_path_buf(),
        source,
    })?;

    let write_err = |source| ReportError::WriteError {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::CRLF)
        .from_writer(file);

    writer.write_record(COLUMNS).map_err(write_err)?;
    for hit in hits {
        writer
            .serialize(ReportRow::new(total_hits, hit))
            .map_err(write_err)?;
    }
    writer
        .flush()
        .map_err(|e| write_err(csv::Error::from(e)))?;

    Ok(())
}

/// Build the default report path for `input` inside `output_dir`.
///
/// The name is `{stem}_MCDTargetHunter_{YYYYMMDD_HHMMSS}.csv` using local
/// time. Two runs on the same input within one second get the same name.
#[must_use]
pub fn default_report_path(input: &Path, output_dir: &Path) -> PathBuf {
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S").to_string();
    report_path_with_timestamp(input, output_dir, &timestamp)
}

fn report_path_with_timestamp(input: &Path, output_dir: &Path, timestamp: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "report".to_string());

    output_dir.join(format!("{stem}_{REPORT_TAG}_{timestamp}.csv"))
}
