//! Configuration validation with range checks.

use std::path::{Component, Path};

use crate::error::ConfigError;

use super::{Config, MAX_THUMBNAIL_DIM, MIN_THUMBNAIL_DIM};

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_THUMBNAIL_DIM..=MAX_THUMBNAIL_DIM).contains(&self.thumbnail.max_dim) {
            return Err(ConfigError::ValidationError(format!(
                "thumbnail.max_dim must be between {MIN_THUMBNAIL_DIM} and {MAX_THUMBNAIL_DIM}"
            )));
        }
        if self.scan.image_extensions.is_empty() {
            return Err(ConfigError::ValidationError(
                "scan.image_extensions must not be empty".into(),
            ));
        }
        if self.scan.video_extensions.is_empty() {
            return Err(ConfigError::ValidationError(
                "scan.video_extensions must not be empty".into(),
            ));
        }
        if self.report.output_dir.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "report.output_dir must not be empty".into(),
            ));
        }
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(ConfigError::ValidationError(
                "logging.format must be \"pretty\" or \"json\"".into(),
            ));
        }
        self.validate_thumbnail_dir()
    }

    /// The thumbnail directory must not be the output directory or one of
    /// its ancestors.
    fn validate_thumbnail_dir(&self) -> Result<(), ConfigError> {
        let dir = self.expanded_thumbnail_dir();
        let overlaps = if dir.is_absolute() {
            let output = self.output_dir();
            let output = if output.is_absolute() {
                Some(output)
            } else {
                std::env::current_dir().ok().map(|cwd| cwd.join(output))
            };
            output.is_some_and(|output| output.starts_with(&dir))
        } else {
            !descends(&dir)
        };

        if overlaps {
            return Err(ConfigError::ValidationError(format!(
                "thumbnail.dir {:?} must be a subdirectory of the output directory \
                 or a separate absolute path",
                self.thumbnail.dir
            )));
        }
        Ok(())
    }
}

/// Whether a relative path, resolved lexically, ends below its base.
fn descends(path: &Path) -> bool {
    let mut depth: usize = 0;
    for component in path.components() {
        match component {
            Component::Normal(_) => depth += 1,
            Component::ParentDir => match depth.checked_sub(1) {
                Some(d) => depth = d,
                None => return false,
            },
            _ => {}
        }
    }
    depth > 0
}
