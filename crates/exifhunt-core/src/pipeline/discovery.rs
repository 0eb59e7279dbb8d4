//! File discovery: list a directory and classify entries by extension.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::ScanConfig;
use crate::types::MediaKind;

/// Image extensions accepted by the folder compatibility check.
pub const COMPATIBLE_IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "gif", "tiff"];

/// Video extensions accepted by the folder compatibility check.
pub const COMPATIBLE_VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "avi", "mkv", "wmv", "flv"];

/// Discovers media files in a single directory.
pub struct FileDiscovery {
    config: ScanConfig,
}

/// Information about a discovered file.
#[derive(Debug, Clone)]
pub struct DiscoveredFile {
    /// Full path to the file
    pub path: PathBuf,
    /// Filename portion, used as the report key
    pub file_name: String,
    /// Kind inferred from the extension
    pub kind: MediaKind,
}

impl FileDiscovery {
    /// Create a new file discovery instance.
    pub fn new(config: ScanConfig) -> Self {
        Self { config }
    }

    /// List the files directly inside `dir` whose kind was requested.
    ///
    /// Subdirectories are not entered. Unreadable entries and files outside
    /// both allow-lists are skipped. The result is sorted by file name.
    pub fn discover(
        &self,
        dir: &Path,
        include_images: bool,
        include_videos: bool,
    ) -> Vec<DiscoveredFile> {
        let mut files = Vec::new();

        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(kind) = self.classify(entry.path()) else {
                continue;
            };
            let wanted = match kind {
                MediaKind::Image => include_images,
                MediaKind::Video => include_videos,
            };
            if !wanted {
                continue;
            }
            files.push(DiscoveredFile {
                path: entry.path().to_path_buf(),
                file_name: entry.file_name().to_string_lossy().into_owned(),
                kind,
            });
        }

        files
    }

    /// Classify a path by its extension, images first.
    pub fn classify(&self, path: &Path) -> Option<MediaKind> {
        let ext = lowercase_extension(path)?;
        if self.config.image_extensions.iter().any(|e| e.eq_ignore_ascii_case(&ext)) {
            Some(MediaKind::Image)
        } else if self.config.video_extensions.iter().any(|e| e.eq_ignore_ascii_case(&ext)) {
            Some(MediaKind::Video)
        } else {
            None
        }
    }

    /// Check whether `dir` holds at least one file a user would expect to be
    /// reportable, using the broader compatibility lists.
    pub fn contains_compatible_files(dir: &Path) -> std::io::Result<bool> {
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            if let Some(ext) = lowercase_extension(&entry.path()) {
                if COMPATIBLE_IMAGE_EXTENSIONS.contains(&ext.as_str())
                    || COMPATIBLE_VIDEO_EXTENSIONS.contains(&ext.as_str())
                {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }
}

fn lowercase_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), b"x").unwrap();
    }

    #[test]
    fn test_classify() {
        let discovery = FileDiscovery::new(ScanConfig::default());

        assert_eq!(discovery.classify(Path::new("a.jpg")), Some(MediaKind::Image));
        assert_eq!(discovery.classify(Path::new("a.JPEG")), Some(MediaKind::Image));
        assert_eq!(discovery.classify(Path::new("a.png")), Some(MediaKind::Image));
        assert_eq!(discovery.classify(Path::new("a.MOV")), Some(MediaKind::Video));
        assert_eq!(discovery.classify(Path::new("a.avi")), Some(MediaKind::Video));
        assert_eq!(discovery.classify(Path::new("a.gif")), None);
        assert_eq!(discovery.classify(Path::new("a.txt")), None);
        assert_eq!(discovery.classify(Path::new("noext")), None);
    }

    #[test]
    fn test_discover_filters_by_kind() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "b.jpg");
        touch(dir.path(), "a.mp4");
        touch(dir.path(), "notes.txt");

        let discovery = FileDiscovery::new(ScanConfig::default());

        let both = discovery.discover(dir.path(), true, true);
        let names: Vec<_> = both.iter().map(|f| f.file_name.as_str()).collect();
        assert_eq!(names, vec!["a.mp4", "b.jpg"]);

        let images = discovery.discover(dir.path(), true, false);
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].kind, MediaKind::Image);

        let videos = discovery.discover(dir.path(), false, true);
        assert_eq!(videos.len(), 1);
        assert_eq!(videos[0].kind, MediaKind::Video);
    }

    #[test]
    fn test_discover_is_not_recursive() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested.jpg");
        std::fs::create_dir(&nested).unwrap();
        touch(&nested, "deep.jpg");
        touch(dir.path(), "top.jpg");

        let discovery = FileDiscovery::new(ScanConfig::default());
        let files = discovery.discover(dir.path(), true, true);

        assert_eq!(files.len(), 1);
        assert_eq!(files[0].file_name, "top.jpg");
    }

    #[test]
    fn test_discover_only_unsupported_files() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "readme.md");
        touch(dir.path(), "clip.mkv");

        let discovery = FileDiscovery::new(ScanConfig::default());
        assert!(discovery.discover(dir.path(), true, true).is_empty());
    }

    #[test]
    fn test_contains_compatible_files() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "readme.md");
        assert!(!FileDiscovery::contains_compatible_files(dir.path()).unwrap());

        // The compatibility list is broader than the default scan list.
        touch(dir.path(), "clip.MKV");
        assert!(FileDiscovery::contains_compatible_files(dir.path()).unwrap());
    }

    #[test]
    fn test_contains_compatible_files_missing_dir() {
        let result = FileDiscovery::contains_compatible_files(Path::new("/nonexistent/dir"));
        assert!(result.is_err());
    }
}
