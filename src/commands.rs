//! Command implementations shared by CLI and MCP server.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::{AppConfig, ConfigError, default_output_dir, expand_tilde};
use crate::input::{self, InputError};
use crate::report::{self, ReportError};
use crate::scan::{self, HitRecord, ScanConfig};

/// Errors that stop a scan run.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("Target text cannot be blank (use --target or set it in config)")]
    BlankTarget,

    #[error("No input file given (use --input or set it in config)")]
    NoInput,

    #[error("Input file not found: {0}")]
    InputNotFound(PathBuf),

    #[error("Output directory not found: {0}")]
    OutputDirNotFound(PathBuf),

    #[error(transparent)]
    Read(#[from] InputError),

    #[error(transparent)]
    Write(#[from] ReportError),

    #[error("Failed to save config: {0}")]
    SaveConfig(#[from] ConfigError),
}

/// Per-run overrides. `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct ScanOverrides {
    pub input: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub target_text: Option<String>,
    pub parent_text: Option<String>,
    pub use_parent: Option<bool>,
    pub op_no_text: Option<String>,
    pub tool_change_text: Option<String>,
    pub case_sensitive: Option<bool>,
}

impl ScanOverrides {
    /// Apply the search-text overrides on top of `base`.
    #[must_use]
    pub fn apply(&self, base: ScanConfig) -> ScanConfig {
        ScanConfig {
            target_text: self.target_text.clone().unwrap_or(base.target_text),
            parent_text: self.parent_text.clone().unwrap_or(base.parent_text),
            use_parent: self.use_parent.unwrap_or(base.use_parent),
            op_no_text: self.op_no_text.clone().unwrap_or(base.op_no_text),
            tool_change_text: self
                .tool_change_text
                .clone()
                .unwrap_or(base.tool_change_text),
            case_sensitive: self.case_sensitive.unwrap_or(base.case_sensitive),
        }
    }
}

/// Result of a completed run.
#[derive(Debug, Clone)]
pub struct ScanSummary {
    pub input: PathBuf,
    pub report_path: PathBuf,
    pub total_hits: usize,
    pub hits: Vec<HitRecord>,
}

/// Resolve the input file: override first, then the remembered path.
fn resolve_input(overrides: &ScanOverrides, config: &AppConfig) -> Result<PathBuf, RunError> {
    let path = match &overrides.input {
        Some(path) => path.clone(),
        None if !config.input_file_path.trim().is_empty() => {
            expand_tilde(config.input_file_path.trim())
        }
        None => return Err(RunError::NoInput),
    };

    let path = std::path::absolute(&path).unwrap_or(path);
    if !path.is_file() {
        return Err(RunError::InputNotFound(path));
    }
    Ok(path)
}

/// Resolve the output directory: override, remembered path, then the desktop.
fn resolve_output_dir(overrides: &ScanOverrides, config: &AppConfig) -> Result<PathBuf, RunError> {
    let path = match &overrides.output_dir {
        Some(path) => path.clone(),
        None if !config.output_dir_path.trim().is_empty() => {
            expand_tilde(config.output_dir_path.trim())
        }
        None => default_output_dir(),
    };

    let path = std::path::absolute(&path).unwrap_or(path);
    if !path.is_dir() {
        return Err(RunError::OutputDirNotFound(path));
    }
    Ok(path)
}

/// Scan one file and write its CSV report.
///
/// Stored configuration supplies anything `overrides` leaves unset. When
/// `remember` is true the effective settings and both paths are saved after
/// the report is written.
///
/// # Errors
///
/// Returns `RunError` if the target text is blank, the input or output
/// location is missing, the input can't be read, the report can't be
/// written, or (with `remember`) the config can't be saved.
pub fn run_scan(overrides: &ScanOverrides, remember: bool) -> Result<ScanSummary, RunError> {
    let mut config = AppConfig::load();
    let scan_config = overrides.apply(config.scan_config());

    if scan_config.target_text.trim().is_empty() {
        return Err(RunError::BlankTarget);
    }

    let input = resolve_input(overrides, &config)?;
    let output_dir = resolve_output_dir(overrides, &config)?;

    let summary = scan_to_report(&input, &output_dir, &scan_config)?;

    if remember {
        config.set_scan_config(scan_config);
        config.input_file_path = input.display().to_string();
        config.output_dir_path = output_dir.display().to_string();
        config.save()?;
    }

    Ok(summary)
}

/// Read `input`, scan it, and write the report into `output_dir`.
///
/// Paths are used as given; callers validate them first.
///
/// # Errors
///
/// Returns `RunError::Read` or `RunError::Write` on I/O failures.
pub fn scan_to_report(
    input: &Path,
    output_dir: &Path,
    scan_config: &ScanConfig,
) -> Result<ScanSummary, RunError> {
    let lines = input::read_lines(input)?;
    tracing::debug!(path = %input.display(), lines = lines.len(), "read input");

    let (hits, total_hits) = scan::scan(&lines, scan_config);

    let report_path = report::default_report_path(input, output_dir);
    report::write_report(&report_path, &hits, total_hits)?;

    tracing::info!(
        input = %input.display(),
        report = %report_path.display(),
        total_hits,
        "scan complete"
    );

    Ok(ScanSummary {
        input: input.to_path_buf(),
        report_path,
        total_hits,
        hits,
    })
}

/// Apply `update` to the stored config and save it. Unset fields keep their
/// stored values; `input` and `output_dir` become the remembered paths.
///
/// # Errors
///
/// Returns an error if the config cannot be saved.
pub fn update_config(update: &ScanOverrides) -> anyhow::Result<(AppConfig, PathBuf)> {
    let mut config = AppConfig::load();
    let search = update.apply(config.scan_config());
    config.set_scan_config(search);

    if let Some(input) = &update.input {
        let input = std::path::absolute(input).unwrap_or_else(|_| input.clone());
        config.input_file_path = input.display().to_string();
    }
    if let Some(output_dir) = &update.output_dir {
        let output_dir = std::path::absolute(output_dir).unwrap_or_else(|_| output_dir.clone());
        config.output_dir_path = output_dir.display().to_string();
    }

    let path = config.save()?;
    Ok((config, path))
}

/// Overwrite the stored config with the built-in defaults.
///
/// # Errors
///
/// Returns an error if the config cannot be saved.
pub fn reset_config() -> anyhow::Result<PathBuf> {
    let path = AppConfig::default().save()?;
    Ok(path)
}
