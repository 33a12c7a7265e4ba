//! Configuration loading and saving for mcd-target-hunter.

use std::path::PathBuf;

use directories::{BaseDirs, ProjectDirs, UserDirs};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::scan::ScanConfig;

/// Environment variable that overrides the config file location.
pub const CONFIG_ENV: &str = "MCD_TARGET_HUNTER_CONFIG";

/// Errors that can occur when saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No config location available on this platform")]
    NoConfigPath,

    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("Failed to write config {path}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Settings persisted between runs.
///
/// Missing keys take their defaults, so older or hand-edited files still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub target_text: String,
    pub parent_text: String,
    pub use_parent: bool,
    pub op_no_text: String,
    pub tool_change_text: String,
    pub case_sensitive: bool,
    /// Last input file used (empty when unset).
    pub input_file_path: String,
    /// Last output directory used (empty when unset).
    pub output_dir_path: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_scan(ScanConfig::default())
    }
}

impl AppConfig {
    fn from_scan(scan: ScanConfig) -> Self {
        Self {
            target_text: scan.target_text,
            parent_text: scan.parent_text,
            use_parent: scan.use_parent,
            op_no_text: scan.op_no_text,
            tool_change_text: scan.tool_change_text,
            case_sensitive: scan.case_sensitive,
            input_file_path: String::new(),
            output_dir_path: String::new(),
        }
    }

    /// Load config from the config path, or return defaults.
    ///
    /// A missing, unreadable or malformed file is not an error: the built-in
    /// defaults are used and a warning is logged.
    #[must_use]
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };

        if !path.is_file() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Self::default();
        }

        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) => {
                tracing::warn!(path = %path.display(), "cannot read config, using defaults: {e}");
                return Self::default();
            }
        };

        match toml::from_str(&contents) {
            Ok(config) => {
                tracing::debug!(path = %path.display(), "loaded config");
                config
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), "invalid config, using defaults: {e}");
                Self::default()
            }
        }
    }

    /// Save config to the config path, creating its directory if needed.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if there is no config location or the file
    /// cannot be written.
    pub fn save(&self) -> Result<PathBuf, ConfigError> {
        let path = Self::config_path().ok_or(ConfigError::NoConfigPath)?;
        let contents = toml::to_string_pretty(self)?;

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::WriteError {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        std::fs::write(&path, contents).map_err(|source| ConfigError::WriteError {
            path: path.clone(),
            source,
        })?;

        tracing::info!(path = %path.display(), "saved config");
        Ok(path)
    }

    /// `$MCD_TARGET_HUNTER_CONFIG`, or `config.toml` in the platform config dir.
    #[must_use]
    pub fn config_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
            return Some(PathBuf::from(path));
        }

        ProjectDirs::from("", "", "mcd-target-hunter")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// The search settings of this config.
    #[must_use]
    pub fn scan_config(&self) -> ScanConfig {
        ScanConfig {
            target_text: self.target_text.clone(),
            parent_text: self.parent_text.clone(),
            use_parent: self.use_parent,
            op_no_text: self.op_no_text.clone(),
            tool_change_text: self.tool_change_text.clone(),
            case_sensitive: self.case_sensitive,
        }
    }

    /// Replace the search settings, keeping the remembered paths.
    pub fn set_scan_config(&mut self, scan: ScanConfig) {
        let remembered = (
            std::mem::take(&mut self.input_file_path),
            std::mem::take(&mut self.output_dir_path),
        );
        *self = Self::from_scan(scan);
        (self.input_file_path, self.output_dir_path) = remembered;
    }
}

/// Default folder for reports: the user's desktop.
///
/// Falls back to `~/Desktop`, then to the current directory, when the platform
/// doesn't report a desktop folder.
#[must_use]
pub fn default_output_dir() -> PathBuf {
    if let Some(desktop) = UserDirs::new().and_then(|dirs| dirs.desktop_dir().map(PathBuf::from)) {
        return desktop;
    }

    if let Some(base_dirs) = BaseDirs::new() {
        return base_dirs.home_dir().join("Desktop");
    }

    PathBuf::from(".")
}

/// Expand ~ to the user's home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/")
        && let Some(base_dirs) = BaseDirs::new()
    {
        return base_dirs.home_dir().join(rest);
    }
    PathBuf::from(path)
}
