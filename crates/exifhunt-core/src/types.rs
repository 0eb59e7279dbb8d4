//! Core data types: media kinds, metadata values and per-file entries.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// The two media families the pipeline knows how to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaKind::Image => write!(f, "image"),
            MediaKind::Video => write!(f, "video"),
        }
    }
}

/// A single decoded metadata value.
///
/// Keys and values come straight from the decoder; there is no schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Integer(i64),
    Float(f64),
    DateTime(NaiveDateTime),
    Text(String),
}

impl fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataValue::Integer(v) => write!(f, "{v}"),
            MetadataValue::Float(v) => write!(f, "{v}"),
            MetadataValue::DateTime(v) => write!(f, "{}", v.format("%Y-%m-%d %H:%M:%S")),
            MetadataValue::Text(v) => f.write_str(v),
        }
    }
}

impl From<String> for MetadataValue {
    fn from(value: String) -> Self {
        MetadataValue::Text(value)
    }
}

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        MetadataValue::Text(value.to_string())
    }
}

impl From<i64> for MetadataValue {
    fn from(value: i64) -> Self {
        MetadataValue::Integer(value)
    }
}

impl From<f64> for MetadataValue {
    fn from(value: f64) -> Self {
        MetadataValue::Float(value)
    }
}

impl From<NaiveDateTime> for MetadataValue {
    fn from(value: NaiveDateTime) -> Self {
        MetadataValue::DateTime(value)
    }
}

/// Decoded metadata for one file, keyed by field name.
pub type Metadata = BTreeMap<String, MetadataValue>;

/// One file of a batch together with its extracted metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaEntry {
    /// Just the filename portion, used as the report heading
    pub file_name: String,

    /// Full path to the source file
    pub path: PathBuf,

    /// Image or video, from the extension
    pub kind: MediaKind,

    /// Decoder-reported fields; empty when nothing could be read
    pub metadata: Metadata,
}

impl MediaEntry {
    /// Render every metadata pair as `key: value`, in map order.
    pub fn metadata_lines(&self) -> impl Iterator<Item = String> + '_ {
        self.metadata
            .iter()
            .map(|(key, value)| format!("{key}: {value}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_value_display() {
        assert_eq!(MetadataValue::Integer(6).to_string(), "6");
        assert_eq!(MetadataValue::Float(12.5).to_string(), "12.5");
        assert_eq!(MetadataValue::from("Canon").to_string(), "Canon");

        let dt = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(13, 4, 5)
            .unwrap();
        assert_eq!(MetadataValue::from(dt).to_string(), "2024-05-01 13:04:05");
    }

    #[test]
    fn test_metadata_lines_follow_key_order() {
        let mut metadata = Metadata::new();
        metadata.insert("Orientation".into(), 1i64.into());
        metadata.insert("Make".into(), "Nikon".into());

        let entry = MediaEntry {
            file_name: "a.jpg".into(),
            path: PathBuf::from("a.jpg"),
            kind: MediaKind::Image,
            metadata,
        };

        let lines: Vec<String> = entry.metadata_lines().collect();
        assert_eq!(lines, vec!["Make: Nikon", "Orientation: 1"]);
    }

    #[test]
    fn test_media_kind_serializes_lowercase() {
        let json = serde_json::to_string(&MediaKind::Video).unwrap();
        assert_eq!(json, "\"video\"");
    }
}
