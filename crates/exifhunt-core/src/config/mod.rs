//! Configuration management for ExifHunt.
//!
//! Configuration is loaded from the platform config directory with sensible
//! defaults. Every section implements `Default`, so a partial file is fine.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use crate::report::ReportOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure for ExifHunt.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Media kinds and extension allow-lists
    pub scan: ScanConfig,

    /// Report output settings
    pub report: ReportConfig,

    /// Thumbnail settings
    pub thumbnail: ThumbnailConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate and write the configuration to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        self.validate()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Get the default config file path.
    ///
    /// Uses platform-appropriate directories:
    /// - macOS: ~/Library/Application Support/com.exifhunt.exifhunt/config.toml
    /// - Linux: ~/.config/exifhunt/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\exifhunt\config\config.toml
    ///
    /// Falls back to ~/.exifhunt/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "exifhunt", "exifhunt")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".exifhunt").join("config.toml")
            })
    }

    /// Get the resolved report output directory (with ~ expansion).
    pub fn output_dir(&self) -> PathBuf {
        let expanded = shellexpand::tilde(&self.report.output_dir);
        PathBuf::from(expanded.into_owned())
    }

    /// The configured thumbnail directory with `~` expanded, not yet joined
    /// to an output directory.
    pub(crate) fn expanded_thumbnail_dir(&self) -> PathBuf {
        let path_str = self.thumbnail.dir.to_string_lossy();
        PathBuf::from(shellexpand::tilde(&path_str).into_owned())
    }

    /// Resolve the thumbnail directory for a given report output directory.
    pub fn thumbnail_dir(&self, output_dir: &Path) -> PathBuf {
        let expanded = self.expanded_thumbnail_dir();
        if expanded.is_absolute() {
            expanded
        } else {
            output_dir.join(expanded)
        }
    }

    /// Build the renderer options for a run writing into `output_dir`.
    ///
    /// The format is left at the configured default; the batch driver resolves
    /// the final format before rendering.
    pub fn report_options(&self, output_dir: &Path) -> ReportOptions {
        ReportOptions {
            format: self.report.default_format.unwrap_or_default(),
            include_file_size: self.report.include_file_size,
            include_timestamps: self.report.include_timestamps,
            thumbnail_max_dim: self.thumbnail.max_dim,
            thumbnail_dir: self.thumbnail_dir(output_dir),
            cleanup_thumbnails: self.thumbnail.cleanup_after_run,
            font: self
                .report
                .font
                .as_deref()
                .map(|f| PathBuf::from(shellexpand::tilde(f).into_owned())),
        }
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}
