//! Batch driver - validates a run request, walks the folder and renders once.

use std::path::PathBuf;
use std::time::Instant;

use crate::config::Config;
use crate::error::{InputError, Result};
use crate::report::{self, ReportFormat};
use crate::types::MediaEntry;

use super::discovery::{DiscoveredFile, FileDiscovery};
use super::metadata::MetadataExtractor;

/// What the user asked for.
#[derive(Debug, Clone)]
pub struct BatchRequest {
    /// Folder to scan (not recursive)
    pub input_dir: PathBuf,
    /// Where the report and the working thumbnail directory go
    pub output_dir: PathBuf,
    pub include_images: bool,
    pub include_videos: bool,
    /// Explicit format; `None` falls back to the configured default
    pub format: Option<ReportFormat>,
}

/// What a completed run produced.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    /// The written artifact
    pub report_path: PathBuf,
    /// Entries in report order
    pub entries: Vec<MediaEntry>,
    /// Working thumbnail directory. With cleanup on, this run's thumbnails
    /// are already gone from it.
    pub thumbnail_dir: PathBuf,
}

/// Runs one report generation end to end.
pub struct BatchDriver {
    config: Config,
    discovery: FileDiscovery,
}

impl BatchDriver {
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
            discovery: FileDiscovery::new(config.scan.clone()),
        }
    }

    /// Run without progress reporting.
    pub fn run(&self, request: &BatchRequest) -> Result<BatchOutcome> {
        self.run_with_progress(request, |_, _, _| {})
    }

    /// Run, calling `on_file(index, total, file)` before each file is read.
    ///
    /// Request problems are reported before the filesystem is touched. After
    /// that, per-file failures only shrink what the report shows; the run
    /// fails only if the report itself cannot be written.
    pub fn run_with_progress<F>(&self, request: &BatchRequest, mut on_file: F) -> Result<BatchOutcome>
    where
        F: FnMut(usize, usize, &DiscoveredFile),
    {
        let format = self.check_request(request)?;
        if !request.input_dir.is_dir() {
            return Err(InputError::FolderNotFound(request.input_dir.clone()).into());
        }

        let start = Instant::now();
        let files = self.discovery.discover(
            &request.input_dir,
            request.include_images,
            request.include_videos,
        );
        tracing::info!("Found {} file(s) in {:?}", files.len(), request.input_dir);

        let total = files.len();
        let mut entries = Vec::with_capacity(total);
        for (index, file) in files.iter().enumerate() {
            on_file(index, total, file);
            tracing::debug!("Reading {:?}", file.path);
            let metadata = MetadataExtractor::extract(&file.path, file.kind);
            entries.push(MediaEntry {
                file_name: file.file_name.clone(),
                path: file.path.clone(),
                kind: file.kind,
                metadata,
            });
        }

        let mut options = self.config.report_options(&request.output_dir);
        options.format = format;
        let report_path = report::render(&entries, &options, &request.output_dir)?;

        tracing::info!(
            "Report for {} file(s) written in {:.2}s",
            entries.len(),
            start.elapsed().as_secs_f64()
        );

        Ok(BatchOutcome {
            report_path,
            entries,
            thumbnail_dir: options.thumbnail_dir,
        })
    }

    /// Reject incomplete requests and settle the output format. Touches
    /// nothing on disk.
    pub fn check_request(&self, request: &BatchRequest) -> Result<ReportFormat> {
        if request.input_dir.as_os_str().is_empty() {
            return Err(InputError::NoFolderSelected.into());
        }
        if !request.include_images && !request.include_videos {
            return Err(InputError::NoMediaKind.into());
        }
        ReportFormat::resolve(request.format, self.config.report.default_format)
            .ok_or_else(|| InputError::NoOutputFormat.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExifHuntError;
    use crate::pipeline::metadata::tests::{jpeg_with_exif, orientation_field};
    use std::path::Path;

    fn request(input: &Path, output: &Path, format: Option<ReportFormat>) -> BatchRequest {
        BatchRequest {
            input_dir: input.to_path_buf(),
            output_dir: output.to_path_buf(),
            include_images: true,
            include_videos: true,
            format,
        }
    }

    #[test]
    fn test_no_folder_selected() {
        let driver = BatchDriver::new(&Config::default());
        let req = request(Path::new(""), Path::new("out"), Some(ReportFormat::Text));
        assert!(matches!(
            driver.run(&req),
            Err(ExifHuntError::Input(InputError::NoFolderSelected))
        ));
    }

    #[test]
    fn test_neither_kind_fails_before_io() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        let driver = BatchDriver::new(&Config::default());
        let mut req = request(dir.path(), &out, Some(ReportFormat::Text));
        req.include_images = false;
        req.include_videos = false;

        assert!(matches!(
            driver.run(&req),
            Err(ExifHuntError::Input(InputError::NoMediaKind))
        ));
        assert!(!out.exists());
    }

    #[test]
    fn test_no_format_and_no_default() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        let mut config = Config::default();
        config.report.default_format = None;
        let driver = BatchDriver::new(&config);

        assert!(matches!(
            driver.run(&request(dir.path(), &out, None)),
            Err(ExifHuntError::Input(InputError::NoOutputFormat))
        ));
        assert!(!out.exists());
    }

    #[test]
    fn test_default_format_used_when_not_given() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.report.default_format = Some(ReportFormat::Text);
        let driver = BatchDriver::new(&config);

        let outcome = driver
            .run(&request(dir.path(), &dir.path().join("out"), None))
            .unwrap();
        assert_eq!(outcome.report_path.extension().unwrap(), "txt");
    }

    #[test]
    fn test_missing_folder() {
        let dir = tempfile::tempdir().unwrap();
        let driver = BatchDriver::new(&Config::default());
        let req = request(&dir.path().join("nope"), &dir.path().join("out"), None);
        assert!(matches!(
            driver.run(&req),
            Err(ExifHuntError::Input(InputError::FolderNotFound(_)))
        ));
    }

    #[test]
    fn test_empty_folder_gives_empty_report() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let driver = BatchDriver::new(&Config::default());

        let outcome = driver
            .run(&request(input.path(), output.path(), Some(ReportFormat::Text)))
            .unwrap();

        assert!(outcome.entries.is_empty());
        assert_eq!(std::fs::read_to_string(&outcome.report_path).unwrap(), "");
    }

    #[test]
    fn test_orientation_in_text_report() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        std::fs::write(
            input.path().join("photo.jpg"),
            jpeg_with_exif(&[orientation_field(1)]),
        )
        .unwrap();
        let driver = BatchDriver::new(&Config::default());

        let outcome = driver
            .run(&request(input.path(), output.path(), Some(ReportFormat::Text)))
            .unwrap();

        let content = std::fs::read_to_string(&outcome.report_path).unwrap();
        assert!(content.starts_with("photo.jpg\n"));
        assert!(content.contains("  Orientation: 1\n"));
    }

    #[test]
    fn test_skips_unrequested_kinds_and_keeps_order() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        for name in ["b.jpg", "a.png", "c.mp4", "notes.txt"] {
            std::fs::write(input.path().join(name), b"x").unwrap();
        }
        let driver = BatchDriver::new(&Config::default());
        let mut req = request(input.path(), output.path(), Some(ReportFormat::Text));
        req.include_videos = false;

        let mut seen = Vec::new();
        let outcome = driver
            .run_with_progress(&req, |i, total, f| seen.push((i, total, f.file_name.clone())))
            .unwrap();

        let names: Vec<_> = outcome.entries.iter().map(|e| e.file_name.as_str()).collect();
        assert_eq!(names, vec!["a.png", "b.jpg"]);
        assert_eq!(
            seen,
            vec![(0, 2, "a.png".to_string()), (1, 2, "b.jpg".to_string())]
        );
        // Undecodable files still get an entry, just no metadata.
        assert!(outcome.entries.iter().all(|e| e.metadata.is_empty()));
    }

    #[test]
    fn test_repeat_runs_write_new_files_with_same_content() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        std::fs::write(
            input.path().join("photo.jpg"),
            jpeg_with_exif(&[orientation_field(3)]),
        )
        .unwrap();
        let driver = BatchDriver::new(&Config::default());
        let req = request(input.path(), output.path(), Some(ReportFormat::Text));

        let first = driver.run(&req).unwrap();
        let second = driver.run(&req).unwrap();

        assert_ne!(first.report_path, second.report_path);
        assert_eq!(
            std::fs::read_to_string(&first.report_path).unwrap(),
            std::fs::read_to_string(&second.report_path).unwrap()
        );
    }

    #[test]
    fn test_incompatible_folder_still_runs() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        std::fs::write(input.path().join("readme.md"), b"# hi").unwrap();
        assert!(!FileDiscovery::contains_compatible_files(input.path()).unwrap());

        let driver = BatchDriver::new(&Config::default());
        let outcome = driver
            .run(&request(input.path(), output.path(), Some(ReportFormat::Text)))
            .unwrap();
        assert!(outcome.entries.is_empty());
        assert!(outcome.report_path.exists());
    }

    #[test]
    fn test_pdf_run_cleans_thumbnails() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        std::fs::write(
            input.path().join("photo.jpg"),
            jpeg_with_exif(&[orientation_field(1)]),
        )
        .unwrap();
        let driver = BatchDriver::new(&Config::default());

        let outcome = driver
            .run(&request(input.path(), output.path(), Some(ReportFormat::Pdf)))
            .unwrap();

        assert!(std::fs::read(&outcome.report_path).unwrap().starts_with(b"%PDF"));
        assert!(!outcome.thumbnail_dir.exists());
    }

    #[test]
    fn test_pdf_run_keeps_thumbnails_when_asked() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        std::fs::write(
            input.path().join("photo.jpg"),
            jpeg_with_exif(&[orientation_field(1)]),
        )
        .unwrap();
        let mut config = Config::default();
        config.thumbnail.cleanup_after_run = false;
        let driver = BatchDriver::new(&config);

        let outcome = driver
            .run(&request(input.path(), output.path(), Some(ReportFormat::Pdf)))
            .unwrap();

        assert!(outcome.thumbnail_dir.join("photo_jpg_thumb.jpg").exists());
    }

    #[test]
    fn test_thumbnail_dir_at_output_root_keeps_reports() {
        let input = tempfile::tempdir().unwrap();
        let root = tempfile::tempdir().unwrap();
        let output = root.path().join("reports");
        std::fs::write(
            input.path().join("photo.jpg"),
            jpeg_with_exif(&[orientation_field(1)]),
        )
        .unwrap();
        let mut config = Config::default();
        config.thumbnail.dir = ".".into();
        assert!(config.validate().is_err());

        // Even when validation is bypassed, cleanup only removes thumbnails.
        let driver = BatchDriver::new(&config);
        let text = driver
            .run(&request(input.path(), &output, Some(ReportFormat::Text)))
            .unwrap();
        let pdf = driver
            .run(&request(input.path(), &output, Some(ReportFormat::Pdf)))
            .unwrap();

        assert!(text.report_path.exists());
        assert!(pdf.report_path.exists());
        assert!(!output.join("photo_jpg_thumb.jpg").exists());
    }

    #[test]
    fn test_existing_thumbnail_folder_is_left_alone() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        std::fs::write(
            input.path().join("photo.jpg"),
            jpeg_with_exif(&[orientation_field(1)]),
        )
        .unwrap();
        let user_dir = output.path().join("thumbnails");
        std::fs::create_dir(&user_dir).unwrap();
        std::fs::write(user_dir.join("user_file.jpg"), b"keep me").unwrap();
        let driver = BatchDriver::new(&Config::default());

        driver
            .run(&request(input.path(), output.path(), Some(ReportFormat::Text)))
            .unwrap();
        assert!(user_dir.join("user_file.jpg").exists());

        driver
            .run(&request(input.path(), output.path(), Some(ReportFormat::Pdf)))
            .unwrap();
        assert!(user_dir.join("user_file.jpg").exists());
        assert!(!user_dir.join("photo_jpg_thumb.jpg").exists());
    }

    #[test]
    fn test_image_and_video_text_report() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        if !crate::pipeline::probe::tests::synth_mp4(&input.path().join("clip.mp4"), 64, 48) {
            return;
        }
        std::fs::write(
            input.path().join("photo.jpg"),
            jpeg_with_exif(&[orientation_field(1)]),
        )
        .unwrap();
        let driver = BatchDriver::new(&Config::default());

        let outcome = driver
            .run(&request(input.path(), output.path(), Some(ReportFormat::Text)))
            .unwrap();

        let content = std::fs::read_to_string(&outcome.report_path).unwrap();
        let blocks: Vec<&str> = content.split("\n\n").filter(|b| !b.is_empty()).collect();
        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].starts_with("clip.mp4\n"));
        assert!(blocks[0].contains("\n  duration: "));
        assert!(blocks[1].starts_with("photo.jpg\n"));
        assert!(blocks[1].contains("\n  Orientation: 1"));
    }
}
