//! Timestamped, write-once artifact files.

use chrono::NaiveDateTime;
use std::fs::{File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::ReportFormat;
use crate::error::ReportError;

/// Attempts before giving up on finding a free name within one second.
const MAX_SUFFIX: u32 = 10_000;

/// `exif_<YYYYMMDDHHMMSS>` for the given time.
pub fn artifact_stem(at: NaiveDateTime) -> String {
    format!("exif_{}", at.format("%Y%m%d%H%M%S"))
}

/// Create a new artifact file that did not exist before.
///
/// The first candidate is `exif_<ts>.<ext>`; if that is taken the name gets a
/// counter, `exif_<ts>_1.<ext>`, `exif_<ts>_2.<ext>`, and so on.
pub fn create_artifact(
    output_dir: &Path,
    format: ReportFormat,
    at: NaiveDateTime,
) -> Result<(PathBuf, File), ReportError> {
    let stem = artifact_stem(at);
    let ext = format.extension();

    for n in 0..MAX_SUFFIX {
        let name = if n == 0 {
            format!("{stem}.{ext}")
        } else {
            format!("{stem}_{n}.{ext}")
        };
        let path = output_dir.join(name);

        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((path, file)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
            Err(source) => return Err(ReportError::Write { path, source }),
        }
    }

    Err(ReportError::Write {
        path: output_dir.join(format!("{stem}.{ext}")),
        source: std::io::Error::new(ErrorKind::AlreadyExists, "no free report name"),
    })
}
