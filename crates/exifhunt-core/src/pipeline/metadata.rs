//! Metadata extraction: EXIF tags for images, container fields for videos.

use chrono::NaiveDate;
use exif::{Field, In, Reader, Tag, Value};
use std::fs::File;
use std::io::BufReader;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use crate::error::{PipelineError, PipelineResult};
use crate::types::{MediaKind, Metadata, MetadataValue};

use super::probe::probe_container;

/// Extracts metadata from media files.
pub struct MetadataExtractor;

impl MetadataExtractor {
    /// Extract all metadata the decoder reports for `path`.
    ///
    /// Never fails: a missing metadata block, an unreadable file, a decode
    /// error or a decoder panic all yield an empty map.
    pub fn extract(path: &Path, kind: MediaKind) -> Metadata {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| Self::try_extract(path, kind)));

        match outcome {
            Ok(Ok(metadata)) => {
                tracing::debug!("{} field(s) from {:?}", metadata.len(), path);
                metadata
            }
            Ok(Err(e)) => {
                tracing::warn!("{e}");
                Metadata::new()
            }
            Err(_) => {
                tracing::warn!("Decoder panicked on {:?}; reporting no metadata", path);
                Metadata::new()
            }
        }
    }

    /// Extract metadata, surfacing decode errors to the caller.
    pub fn try_extract(path: &Path, kind: MediaKind) -> PipelineResult<Metadata> {
        match kind {
            MediaKind::Image => Self::extract_exif(path),
            MediaKind::Video => probe_container(path),
        }
    }

    /// Read every primary-image EXIF field.
    ///
    /// A file without an EXIF block is not an error.
    fn extract_exif(path: &Path) -> PipelineResult<Metadata> {
        let file = File::open(path).map_err(|e| PipelineError::Metadata {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let mut reader = BufReader::new(file);

        let exif = match Reader::new().read_from_container(&mut reader) {
            Ok(exif) => exif,
            Err(exif::Error::NotFound(_)) => return Ok(Metadata::new()),
            Err(e) => {
                return Err(PipelineError::Metadata {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })
            }
        };

        let mut metadata = Metadata::new();
        for field in exif.fields().filter(|f| f.ifd_num == In::PRIMARY) {
            metadata
                .entry(Self::tag_key(field.tag))
                .or_insert_with(|| Self::field_value(field, &exif));
        }
        Ok(metadata)
    }

    /// Tag name from the decoder's table, or the numeric id when unnamed.
    fn tag_key(tag: Tag) -> String {
        if tag.description().is_some() {
            tag.to_string()
        } else {
            tag.number().to_string()
        }
    }

    fn field_value(field: &Field, exif: &exif::Exif) -> MetadataValue {
        if matches!(
            field.tag,
            Tag::DateTime | Tag::DateTimeOriginal | Tag::DateTimeDigitized
        ) {
            if let Some(dt) = Self::get_datetime(&field.value) {
                return MetadataValue::DateTime(dt);
            }
        }

        let integer = match &field.value {
            Value::Short(v) if v.len() == 1 => Some(i64::from(v[0])),
            Value::Long(v) if v.len() == 1 => Some(i64::from(v[0])),
            Value::SShort(v) if v.len() == 1 => Some(i64::from(v[0])),
            Value::SLong(v) if v.len() == 1 => Some(i64::from(v[0])),
            _ => None,
        };
        if let Some(v) = integer {
            return MetadataValue::Integer(v);
        }

        let text = field.display_value().with_unit(exif).to_string();
        // Clean up the string (remove quotes if present)
        MetadataValue::Text(text.trim_matches('"').to_string())
    }

    /// Parse an EXIF ASCII date-time ("2024:05:01 13:04:05").
    fn get_datetime(value: &Value) -> Option<chrono::NaiveDateTime> {
        let Value::Ascii(parts) = value else {
            return None;
        };
        let dt = exif::DateTime::from_ascii(parts.first()?).ok()?;
        NaiveDate::from_ymd_opt(dt.year.into(), dt.month.into(), dt.day.into())?.and_hms_opt(
            dt.hour.into(),
            dt.minute.into(),
            dt.second.into(),
        )
    }
}
