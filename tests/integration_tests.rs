//! Integration tests for the scan pipeline.
//!
//! These tests go through files on disk (read, scan, write, re-read) but never
//! touch the saved configuration, so they don't depend on the environment.

use std::fs;
use std::path::{Path, PathBuf};

use mcd_target_hunter::commands::scan_to_report;
use mcd_target_hunter::input::read_lines;
use mcd_target_hunter::report::{COLUMNS, write_report};
use mcd_target_hunter::scan::{ScanConfig, scan};
use tempfile::TempDir;

/// A sample milling program with two operations and three hits.
const SAMPLE_PROGRAM: &str = "\
%
O1000
(OPERATION NAME: FACE1)
(OPERATION NO. = 10)
N100 T10 M06
N110 S1200 M03
N120 G01 X10. Y0. (POST-GENERATED)
(OPERATION NAME: POCKET2)
(OPERATION NO. = 20)
N200 TOOL CALL 4
N210 G01 X20. (POST-GENERATED ARC FIT)
N220 T5 (POST-GENERATED TOOL PRESELECT)
M30
%
";

/// Test helper holding a temp directory with an input file and output folder.
struct TestJob {
    _temp_dir: TempDir,
    input: PathBuf,
    out_dir: PathBuf,
}

impl TestJob {
    fn with_bytes(name: &str, bytes: &[u8]) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let input = temp_dir.path().join(name);
        fs::write(&input, bytes).expect("Failed to write input");

        let out_dir = temp_dir.path().join("reports");
        fs::create_dir_all(&out_dir).expect("Failed to create output dir");

        Self {
            _temp_dir: temp_dir,
            input,
            out_dir,
        }
    }

    fn sample() -> Self {
        Self::with_bytes("PART_001.nc", SAMPLE_PROGRAM.as_bytes())
    }
}

/// Read a report back as (header, rows).
fn read_report(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
    let mut reader = csv::Reader::from_path(path).expect("Failed to open report");
    let header = reader
        .headers()
        .expect("Failed to read header")
        .iter()
        .map(str::to_string)
        .collect();
    let rows = reader
        .records()
        .map(|r| {
            r.expect("Failed to read row")
                .iter()
                .map(str::to_string)
                .collect()
        })
        .collect();
    (header, rows)
}

// =============================================================================
// Scan Pipeline Tests
// =============================================================================

mod pipeline_tests {
    use super::*;

    #[test]
    fn sample_program_context() {
        let job = TestJob::sample();
        let lines = read_lines(&job.input).unwrap();
        let (hits, total) = scan(&lines, &ScanConfig::default());

        assert_eq!(total, 3);

        assert_eq!(hits[0].line_number, 7);
        assert_eq!(hits[0].parent_line, "(OPERATION NAME: FACE1)");
        assert_eq!(hits[0].operation_no_line, "(OPERATION NO. = 10)");
        assert_eq!(hits[0].tool_number_line, "N100 T10 M06");
        assert_eq!(hits[0].tool_change_line, "N100 T10 M06");

        assert_eq!(hits[1].line_number, 11);
        assert_eq!(hits[1].parent_line, "(OPERATION NAME: POCKET2)");
        assert_eq!(hits[1].operation_no_line, "(OPERATION NO. = 20)");
        assert_eq!(hits[1].tool_number_line, "N200 TOOL CALL 4");
        assert_eq!(hits[1].tool_change_line, "N100 T10 M06");

        // The hit line itself names tool 5.
        assert_eq!(hits[2].tool_number_line, "N220 T5 (POST-GENERATED TOOL PRESELECT)");
    }

    #[test]
    fn report_round_trip() {
        let job = TestJob::sample();
        let summary = scan_to_report(&job.input, &job.out_dir, &ScanConfig::default()).unwrap();

        let (header, rows) = read_report(&summary.report_path);
        assert_eq!(header, COLUMNS.to_vec());
        assert_eq!(rows.len(), summary.total_hits);

        for (i, row) in rows.iter().enumerate() {
            assert_eq!(row[0], "3", "total_hits on every row");
            assert_eq!(row[1], (i + 1).to_string());
            assert_eq!(row[3], "POST-GENERATED");
        }
        assert_eq!(rows[1][4], "N210 G01 X20. (POST-GENERATED ARC FIT)");
    }

    #[test]
    fn empty_report_has_header_only() {
        let job = TestJob::sample();
        let config = ScanConfig {
            target_text: "NOT-IN-FILE".to_string(),
            ..ScanConfig::default()
        };
        let summary = scan_to_report(&job.input, &job.out_dir, &config).unwrap();

        assert_eq!(summary.total_hits, 0);
        let (header, rows) = read_report(&summary.report_path);
        assert_eq!(header.len(), COLUMNS.len());
        assert!(rows.is_empty());
    }

    #[test]
    fn report_name_uses_input_stem() {
        let job = TestJob::sample();
        let summary = scan_to_report(&job.input, &job.out_dir, &ScanConfig::default()).unwrap();

        let name = summary.report_path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("PART_001_MCDTargetHunter_"));
        assert!(
            Path::new(&name)
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
        );
        assert_eq!(summary.report_path.parent(), Some(job.out_dir.as_path()));
    }

    #[test]
    fn disabled_parent_leaves_column_empty() {
        let job = TestJob::sample();
        let config = ScanConfig {
            use_parent: false,
            ..ScanConfig::default()
        };
        let summary = scan_to_report(&job.input, &job.out_dir, &config).unwrap();

        let (_, rows) = read_report(&summary.report_path);
        assert!(rows.iter().all(|row| row[8].is_empty()));
    }

    #[test]
    fn case_sensitive_scan_misses_lowercase_target() {
        let job = TestJob::with_bytes("lower.nc", b"n10 t1\n(post-generated)\n");
        let lines = read_lines(&job.input).unwrap();

        let insensitive = scan(&lines, &ScanConfig::default());
        assert_eq!(insensitive.1, 1);
        assert_eq!(insensitive.0[0].tool_number_line, "n10 t1");

        let sensitive = scan(
            &lines,
            &ScanConfig {
                case_sensitive: true,
                ..ScanConfig::default()
            },
        );
        assert_eq!(sensitive.1, 0);
    }
}

// =============================================================================
// Input Decoding Tests
// =============================================================================

mod input_tests {
    use super::*;

    #[test]
    fn windows_1252_file_is_scanned() {
        // "Ø" as a single Windows-1252 byte makes this invalid UTF-8.
        let job = TestJob::with_bytes(
            "legacy.V11",
            b"(OPERATION NAME: BOHREN \xD8 8)\r\nT3 M06\r\nPOST-GENERATED\r\n",
        );
        let lines = read_lines(&job.input).unwrap();
        assert_eq!(lines.len(), 3);

        let (hits, total) = scan(&lines, &ScanConfig::default());
        assert_eq!(total, 1);
        assert_eq!(hits[0].parent_line, "(OPERATION NAME: BOHREN Ø 8)");
        assert_eq!(hits[0].tool_change_line, "T3 M06");
    }

    #[test]
    fn form_feed_separates_blocks() {
        let job = TestJob::with_bytes("tape.nc", b"N10 T1\x0cPOST-GENERATED\n");
        let lines = read_lines(&job.input).unwrap();
        assert_eq!(lines, vec!["N10 T1", "POST-GENERATED"]);

        let (hits, _) = scan(&lines, &ScanConfig::default());
        assert_eq!(hits[0].line_number, 2);
        assert_eq!(hits[0].target_line, "POST-GENERATED");
        assert_eq!(hits[0].tool_number_line, "N10 T1");
    }

    #[test]
    fn missing_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let result = read_lines(&temp_dir.path().join("missing.nc"));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("not found"));
    }

    #[test]
    fn empty_file_has_no_lines() {
        let job = TestJob::with_bytes("empty.nc", b"");
        assert!(read_lines(&job.input).unwrap().is_empty());
    }
}

// =============================================================================
// Report Writer Tests
// =============================================================================

mod report_tests {
    use super::*;

    #[test]
    fn write_fails_into_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing").join("report.csv");

        assert!(write_report(&path, &[], 0).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn multiline_safe_fields_survive_round_trip() {
        let job = TestJob::with_bytes(
            "quotes.nc",
            b"(OPERATION NAME: \"A, B\")\nPOST-GENERATED, \"quoted\"\n",
        );
        let summary = scan_to_report(&job.input, &job.out_dir, &ScanConfig::default()).unwrap();

        let (_, rows) = read_report(&summary.report_path);
        assert_eq!(rows[0][4], "POST-GENERATED, \"quoted\"");
        assert_eq!(rows[0][8], "(OPERATION NAME: \"A, B\")");
    }
}
