//! Report rendering: a paginated PDF with thumbnails, or a flat text file.
//!
//! Both variants consume the same ordered list of [`MediaEntry`] values and
//! write one timestamped artifact into the output directory.

mod artifact;
pub mod document;
pub mod font;
pub mod text;

pub use artifact::{artifact_stem, create_artifact};
pub use document::{Block, DocumentLayout};
pub use font::{FontSet, Typeface};
pub use text::write_text_report;

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use crate::error::ReportError;
use crate::pipeline::ThumbnailGenerator;
use crate::types::MediaEntry;

/// The two report kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Paginated PDF with thumbnails
    #[default]
    Pdf,
    /// Plain UTF-8 text
    Text,
}

impl ReportFormat {
    /// Parse format from string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "text" | "txt" => Some(Self::Text),
            _ => None,
        }
    }

    /// File extension of the artifact.
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Pdf => "pdf",
            ReportFormat::Text => "txt",
        }
    }

    /// Pick the format for a run: an explicit choice wins over the default.
    pub fn resolve(explicit: Option<Self>, default: Option<Self>) -> Option<Self> {
        explicit.or(default)
    }
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportFormat::Pdf => write!(f, "pdf"),
            ReportFormat::Text => write!(f, "text"),
        }
    }
}

/// Everything the renderer needs to know about one run.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Which artifact to produce
    pub format: ReportFormat,
    /// Add `File Size:` under each PDF heading
    pub include_file_size: bool,
    /// Add `Created:`/`Modified:` under each PDF heading
    pub include_timestamps: bool,
    /// Longest thumbnail edge in pixels
    pub thumbnail_max_dim: u32,
    /// Where PDF thumbnails are written
    pub thumbnail_dir: PathBuf,
    /// Remove this run's thumbnails once the PDF is written
    pub cleanup_thumbnails: bool,
    /// TrueType/OpenType file for PDF text; `None` uses the bundled DejaVu Sans
    pub font: Option<PathBuf>,
}

/// Render `entries` into a new artifact in `output_dir`, named after the
/// current local time.
pub fn render(
    entries: &[MediaEntry],
    options: &ReportOptions,
    output_dir: &Path,
) -> Result<PathBuf, ReportError> {
    render_at(entries, options, output_dir, Local::now().naive_local())
}

/// Render with an explicit timestamp for the artifact name.
///
/// A partially written artifact is removed when rendering fails.
pub fn render_at(
    entries: &[MediaEntry],
    options: &ReportOptions,
    output_dir: &Path,
    at: NaiveDateTime,
) -> Result<PathBuf, ReportError> {
    std::fs::create_dir_all(output_dir).map_err(|source| ReportError::Write {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let (path, file) = create_artifact(output_dir, options.format, at)?;

    if let Err(e) = write_report(entries, options, &path, file) {
        if let Err(cleanup) = std::fs::remove_file(&path) {
            tracing::warn!("Could not remove partial report {:?}: {cleanup}", path);
        }
        return Err(e);
    }

    tracing::info!(
        "Wrote {} report with {} entr{} to {:?}",
        options.format,
        entries.len(),
        if entries.len() == 1 { "y" } else { "ies" },
        path
    );
    Ok(path)
}

fn write_report(
    entries: &[MediaEntry],
    options: &ReportOptions,
    path: &Path,
    file: File,
) -> Result<(), ReportError> {
    match options.format {
        ReportFormat::Text => {
            write_text_report(entries, BufWriter::new(file)).map_err(|source| {
                ReportError::Write {
                    path: path.to_path_buf(),
                    source,
                }
            })
        }
        ReportFormat::Pdf => {
            let fonts = FontSet::select(options.font.as_deref())?;
            let thumbnails =
                ThumbnailGenerator::new(options.thumbnail_max_dim, &options.thumbnail_dir);
            let created_dirs = thumbnails.missing_dirs();
            let layout = DocumentLayout::build(entries, options, &thumbnails);
            let written = layout.write_pdf(&fonts, file);

            if options.cleanup_thumbnails {
                if let Err(e) = thumbnails.discard(&layout.thumbnails(), &created_dirs) {
                    tracing::warn!(
                        "Could not remove thumbnails in {:?}: {e}",
                        options.thumbnail_dir
                    );
                }
            }

            let pages = written?;
            tracing::debug!("PDF has {pages} page(s)");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MediaKind, Metadata, MetadataValue};
    use chrono::NaiveDate;

    fn entry(name: &str, pairs: &[(&str, MetadataValue)]) -> MediaEntry {
        let metadata: Metadata = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        MediaEntry {
            file_name: name.to_string(),
            path: PathBuf::from(name),
            kind: MediaKind::Image,
            metadata,
        }
    }

    fn options(format: ReportFormat, dir: &Path) -> ReportOptions {
        ReportOptions {
            format,
            include_file_size: false,
            include_timestamps: false,
            thumbnail_max_dim: 100,
            thumbnail_dir: dir.join("thumbnails"),
            cleanup_thumbnails: true,
            font: None,
        }
    }

    fn fixed_time() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 2)
            .unwrap()
            .and_hms_opt(3, 4, 5)
            .unwrap()
    }

    #[test]
    fn test_format_parse() {
        assert_eq!(ReportFormat::parse("PDF"), Some(ReportFormat::Pdf));
        assert_eq!(ReportFormat::parse("txt"), Some(ReportFormat::Text));
        assert_eq!(ReportFormat::parse("text"), Some(ReportFormat::Text));
        assert_eq!(ReportFormat::parse("docx"), None);
    }

    #[test]
    fn test_format_resolution() {
        use ReportFormat::*;
        assert_eq!(ReportFormat::resolve(Some(Text), Some(Pdf)), Some(Text));
        assert_eq!(ReportFormat::resolve(None, Some(Pdf)), Some(Pdf));
        assert_eq!(ReportFormat::resolve(None, None), None);
    }

    #[test]
    fn test_render_text_artifact_name() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("reports");
        let entries = vec![entry("a.jpg", &[("Orientation", MetadataValue::Integer(1))])];

        let path = render_at(&entries, &options(ReportFormat::Text, dir.path()), &out, fixed_time())
            .unwrap();

        assert_eq!(path, out.join("exif_20250102030405.txt"));
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "a.jpg\n  Orientation: 1\n\n");
    }

    #[test]
    fn test_render_same_second_does_not_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let opts = options(ReportFormat::Text, dir.path());
        let first_entries = vec![entry("first.jpg", &[])];
        let second_entries = vec![entry("second.jpg", &[])];

        let first = render_at(&first_entries, &opts, dir.path(), fixed_time()).unwrap();
        let second = render_at(&second_entries, &opts, dir.path(), fixed_time()).unwrap();

        assert_ne!(first, second);
        assert!(std::fs::read_to_string(&first).unwrap().starts_with("first.jpg"));
        assert!(std::fs::read_to_string(&second).unwrap().starts_with("second.jpg"));
    }

    #[test]
    fn test_render_empty_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let path = render_at(&[], &options(ReportFormat::Pdf, dir.path()), dir.path(), fixed_time())
            .unwrap();

        assert_eq!(path.extension().unwrap(), "pdf");
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_render_into_unwritable_location_fails() {
        let dir = tempfile::tempdir().unwrap();
        // A regular file where the output directory should be.
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"").unwrap();

        let result = render_at(
            &[],
            &options(ReportFormat::Text, dir.path()),
            &blocker.join("reports"),
            fixed_time(),
        );
        assert!(matches!(result, Err(ReportError::Write { .. })));
    }

    #[test]
    fn test_pdf_with_missing_font_fails_and_leaves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut opts = options(ReportFormat::Pdf, dir.path());
        opts.font = Some(dir.path().join("missing.ttf"));

        let result = render_at(&[], &opts, dir.path(), fixed_time());
        assert!(matches!(result, Err(ReportError::Font { .. })));
        assert!(!dir.path().join("exif_20250102030405.pdf").exists());
    }

    #[test]
    fn test_text_run_never_touches_thumbnail_dir() {
        let dir = tempfile::tempdir().unwrap();
        let opts = options(ReportFormat::Text, dir.path());
        std::fs::create_dir(&opts.thumbnail_dir).unwrap();
        std::fs::write(opts.thumbnail_dir.join("mine.jpg"), b"x").unwrap();

        render_at(&[], &opts, dir.path(), fixed_time()).unwrap();
        assert!(opts.thumbnail_dir.join("mine.jpg").exists());
    }
}
