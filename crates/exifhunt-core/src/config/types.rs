//! Sub-configuration structs with defaults matching the original settings form.

use crate::report::ReportFormat;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Smallest thumbnail edge the settings accept.
pub const MIN_THUMBNAIL_DIM: u32 = 100;

/// Largest thumbnail edge the settings accept.
pub const MAX_THUMBNAIL_DIM: u32 = 600;

/// Which media kinds to scan and how to recognize them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Include image files when no kind is given on the command line
    pub include_images: bool,

    /// Include video files when no kind is given on the command line
    pub include_videos: bool,

    /// Extensions read as images (case-insensitive, no dot)
    pub image_extensions: Vec<String>,

    /// Extensions read as videos (case-insensitive, no dot)
    pub video_extensions: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            include_images: true,
            include_videos: true,
            image_extensions: vec!["jpg".to_string(), "jpeg".to_string(), "png".to_string()],
            video_extensions: vec!["mp4".to_string(), "mov".to_string(), "avi".to_string()],
        }
    }
}

/// Report settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Where reports are written (supports `~`)
    pub output_dir: String,

    /// Format used when none is chosen for a run; `"none"` means ask each time
    #[serde(with = "optional_format")]
    pub default_format: Option<ReportFormat>,

    /// Add the file size under each heading (PDF only)
    pub include_file_size: bool,

    /// Add created/modified timestamps under each heading (PDF only)
    pub include_timestamps: bool,

    /// Open the report in the system viewer once written
    pub open_when_done: bool,

    /// TrueType/OpenType file for PDF text (supports `~`). Unset uses the
    /// bundled DejaVu Sans, which has no CJK glyphs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: "reports".to_string(),
            default_format: Some(ReportFormat::Pdf),
            include_file_size: true,
            include_timestamps: true,
            open_when_done: false,
            font: None,
        }
    }
}

/// `Option<ReportFormat>` as `"pdf"`, `"text"` or `"none"`.
///
/// TOML has no null, and a missing key falls back to the PDF default.
mod optional_format {
    use super::ReportFormat;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<ReportFormat>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(format) => serializer.serialize_str(&format.to_string()),
            None => serializer.serialize_str("none"),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<ReportFormat>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw.eq_ignore_ascii_case("none") {
            return Ok(None);
        }
        ReportFormat::parse(&raw).map(Some).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "unknown report format `{raw}` (expected pdf, text or none)"
            ))
        })
    }
}

/// Thumbnail generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThumbnailConfig {
    /// Longest edge in pixels, 100..=600
    pub max_dim: u32,

    /// Working directory for thumbnails. Relative paths live under the
    /// report output directory and must name a subdirectory of it.
    pub dir: PathBuf,

    /// Delete the thumbnails a PDF run wrote once the report is done
    pub cleanup_after_run: bool,
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            max_dim: 300,
            dir: PathBuf::from("thumbnails"),
            cleanup_after_run: true,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
