//! Thumbnail generation with JPEG output on disk.

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, GenericImageView, ImageFormat, ImageReader};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{PipelineError, PipelineResult};
use crate::types::MediaKind;

const FFMPEG: &str = "ffmpeg";
const JPEG_QUALITY: u8 = 85;

/// Writes small JPEG previews of images and video first frames.
pub struct ThumbnailGenerator {
    max_dim: u32,
    dir: PathBuf,
}

impl ThumbnailGenerator {
    /// Create a generator writing thumbnails no larger than `max_dim` into `dir`.
    pub fn new(max_dim: u32, dir: impl Into<PathBuf>) -> Self {
        Self {
            max_dim,
            dir: dir.into(),
        }
    }

    /// The working thumbnail directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Generate a thumbnail for `path` and return where it was written.
    ///
    /// Images are decoded directly; videos contribute their first frame. Both
    /// are shrunk so neither side exceeds the configured size.
    pub fn generate(&self, path: &Path, kind: MediaKind) -> PipelineResult<PathBuf> {
        let source = match kind {
            MediaKind::Image => Self::decode_image(path)?,
            MediaKind::Video => Self::first_frame(path)?,
        };
        let thumbnail = self.shrink(source);

        std::fs::create_dir_all(&self.dir).map_err(|e| self.write_error(path, e))?;
        let target = self.thumbnail_path(path);
        let file = File::create(&target).map_err(|e| self.write_error(path, e))?;

        let mut writer = BufWriter::new(file);
        JpegEncoder::new_with_quality(&mut writer, JPEG_QUALITY)
            .encode_image(&thumbnail.to_rgb8())
            .map_err(|e| self.write_error(path, e))?;
        writer.flush().map_err(|e| self.write_error(path, e))?;

        tracing::debug!(
            "Thumbnail {:?} ({}x{})",
            target,
            thumbnail.width(),
            thumbnail.height()
        );
        Ok(target)
    }

    /// Thumbnail location for a source file: `<stem>_<ext>_thumb.jpg`.
    ///
    /// The extension is part of the name so `clip.jpg` and `clip.mp4` do not
    /// overwrite each other.
    pub fn thumbnail_path(&self, path: &Path) -> PathBuf {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "unknown".to_string());
        let name = match path.extension() {
            Some(ext) => format!("{stem}_{}_thumb.jpg", ext.to_string_lossy().to_lowercase()),
            None => format!("{stem}_thumb.jpg"),
        };
        self.dir.join(name)
    }

    /// Directories that `generate` would have to create, innermost first.
    ///
    /// Call before generating; pass the result to [`Self::discard`] so only
    /// directories this run made are removed again.
    pub fn missing_dirs(&self) -> Vec<PathBuf> {
        let mut missing = Vec::new();
        let mut current = Some(self.dir.as_path());
        while let Some(dir) = current {
            if dir.as_os_str().is_empty() || dir.exists() {
                break;
            }
            missing.push(dir.to_path_buf());
            current = dir.parent();
        }
        missing
    }

    /// Delete `files` written by this generator, then each of `created_dirs`
    /// that is left empty.
    ///
    /// Anything else in the thumbnail directory is left alone. Returns the
    /// first removal error after trying every file.
    pub fn discard(&self, files: &[PathBuf], created_dirs: &[PathBuf]) -> std::io::Result<()> {
        let mut first_error = None;
        for file in files.iter().filter(|f| f.parent() == Some(self.dir.as_path())) {
            match std::fs::remove_file(file) {
                Err(e) if e.kind() != std::io::ErrorKind::NotFound => {
                    first_error.get_or_insert(e);
                }
                _ => {}
            }
        }
        for dir in created_dirs {
            // Non-empty: someone else put files there.
            if std::fs::remove_dir(dir).is_err() {
                break;
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Downscale to fit `max_dim` x `max_dim`, preserving aspect ratio.
    /// Images already small enough are left alone.
    fn shrink(&self, image: DynamicImage) -> DynamicImage {
        let (width, height) = image.dimensions();
        if width <= self.max_dim && height <= self.max_dim {
            return image;
        }
        image.thumbnail(self.max_dim, self.max_dim)
    }

    fn decode_image(path: &Path) -> PipelineResult<DynamicImage> {
        let decode_error = |message: String| PipelineError::Decode {
            path: path.to_path_buf(),
            message,
        };
        ImageReader::open(path)
            .map_err(|e| decode_error(e.to_string()))?
            .with_guessed_format()
            .map_err(|e| decode_error(format!("Cannot detect image format: {e}")))?
            .decode()
            .map_err(|e| decode_error(e.to_string()))
    }

    /// Ask ffmpeg for the first decodable frame as a PNG on stdout.
    fn first_frame(path: &Path) -> PipelineResult<DynamicImage> {
        let output = Command::new(FFMPEG)
            .args(["-v", "error", "-i"])
            .arg(path)
            .args(["-frames:v", "1", "-f", "image2pipe", "-vcodec", "png", "-"])
            .output()
            .map_err(|e| PipelineError::ToolFailed {
                tool: FFMPEG.to_string(),
                message: e.to_string(),
            })?;

        if !output.status.success() || output.stdout.is_empty() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PipelineError::ToolFailed {
                tool: FFMPEG.to_string(),
                message: format!("no frame decoded from {}: {}", path.display(), stderr.trim()),
            });
        }

        image::load_from_memory_with_format(&output.stdout, ImageFormat::Png).map_err(|e| {
            PipelineError::Decode {
                path: path.to_path_buf(),
                message: format!("Unreadable frame: {e}"),
            }
        })
    }

    fn write_error(&self, path: &Path, e: impl std::fmt::Display) -> PipelineError {
        PipelineError::Thumbnail {
            path: path.to_path_buf(),
            message: e.to_string(),
        }
    }
}
