//! Container metadata for video files via `ffprobe -print_format json`.

use chrono::DateTime;
use serde_json::{Map, Value};
use std::path::Path;
use std::process::Command;

use crate::error::{PipelineError, PipelineResult};
use crate::types::{Metadata, MetadataValue};

const FFPROBE: &str = "ffprobe";

/// Check if an external tool is on the PATH and runs.
pub fn tool_available(tool: &str) -> bool {
    Command::new(tool)
        .arg("-version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Run ffprobe on `path` and flatten its JSON report into metadata.
///
/// Fails if ffprobe cannot be started or rejects the file.
pub fn probe_container(path: &Path) -> PipelineResult<Metadata> {
    tracing::debug!("Probing container: {}", path.display());

    let output = Command::new(FFPROBE)
        .args([
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
        ])
        .arg(path)
        .output()
        .map_err(|e| PipelineError::ToolFailed {
            tool: FFPROBE.to_string(),
            message: e.to_string(),
        })?;

    if !output.status.success() {
        return Err(PipelineError::ToolFailed {
            tool: FFPROBE.to_string(),
            message: format!(
                "exit code {} for {}",
                output.status.code().unwrap_or(-1),
                path.display()
            ),
        });
    }

    let json: Value =
        serde_json::from_slice(&output.stdout).map_err(|e| PipelineError::Metadata {
            path: path.to_path_buf(),
            message: format!("Invalid ffprobe output: {e}"),
        })?;

    Ok(parse_probe_json(&json))
}

/// Flatten ffprobe's `format` and first audio/video `streams` into metadata.
///
/// Returns an empty map when there is no `format` object, which is what
/// ffprobe reports for files it cannot identify.
pub fn parse_probe_json(json: &Value) -> Metadata {
    let mut metadata = Metadata::new();

    let Some(format) = json.get("format").and_then(Value::as_object) else {
        return metadata;
    };

    if let Some(duration) = number_field(format, "duration") {
        metadata.insert("duration".into(), MetadataValue::Float(duration));
    }
    for key in ["format_name", "format_long_name"] {
        if let Some(text) = format.get(key).and_then(Value::as_str) {
            metadata.insert(key.into(), text.into());
        }
    }
    for key in ["bit_rate", "size", "nb_streams"] {
        if let Some(value) = integer_field(format, key) {
            metadata.insert(key.into(), MetadataValue::Integer(value));
        }
    }
    if let Some(tags) = format.get("tags").and_then(Value::as_object) {
        for (key, value) in tags {
            let Some(text) = value.as_str() else { continue };
            metadata
                .entry(key.clone())
                .or_insert_with(|| tag_value(key, text));
        }
    }

    let streams = json
        .get("streams")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    if let Some(video) = first_stream(streams, "video") {
        for key in ["width", "height"] {
            if let Some(value) = integer_field(video, key) {
                metadata.insert(key.into(), MetadataValue::Integer(value));
            }
        }
        if let Some(codec) = video.get("codec_name").and_then(Value::as_str) {
            metadata.insert("video_codec".into(), codec.into());
        }
        if let Some(rate) = video
            .get("r_frame_rate")
            .and_then(Value::as_str)
            .and_then(parse_frame_rate)
        {
            metadata.insert("frame_rate".into(), MetadataValue::Float(rate));
        }
    }

    if let Some(audio) = first_stream(streams, "audio") {
        if let Some(codec) = audio.get("codec_name").and_then(Value::as_str) {
            metadata.insert("audio_codec".into(), codec.into());
        }
        for key in ["sample_rate", "channels"] {
            if let Some(value) = integer_field(audio, key) {
                metadata.insert(key.into(), MetadataValue::Integer(value));
            }
        }
    }

    metadata
}

fn first_stream<'a>(streams: &'a [Value], codec_type: &str) -> Option<&'a Map<String, Value>> {
    streams
        .iter()
        .filter_map(Value::as_object)
        .find(|s| s.get("codec_type").and_then(Value::as_str) == Some(codec_type))
}

/// ffprobe prints most numbers as strings; accept both.
fn number_field(obj: &Map<String, Value>, key: &str) -> Option<f64> {
    match obj.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn integer_field(obj: &Map<String, Value>, key: &str) -> Option<i64> {
    match obj.get(key)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn tag_value(key: &str, text: &str) -> MetadataValue {
    if key == "creation_time" {
        if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
            return MetadataValue::DateTime(dt.naive_utc());
        }
    }
    MetadataValue::Text(text.to_string())
}

/// Parse "30000/1001" or "25" into frames per second, rounded to 3 decimals.
fn parse_frame_rate(rate: &str) -> Option<f64> {
    let fps = match rate.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.parse().ok()?;
            let den: f64 = den.parse().ok()?;
            if den == 0.0 {
                return None;
            }
            num / den
        }
        None => rate.parse().ok()?,
    };
    Some((fps * 1000.0).round() / 1000.0)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;

    /// Encode a one-second `width`x`height` MP4 with ffmpeg. Returns false
    /// when the tools are not installed, so callers can skip.
    pub(crate) fn synth_mp4(path: &Path, width: u32, height: u32) -> bool {
        if !tool_available("ffmpeg") || !tool_available(FFPROBE) {
            eprintln!("Skipping: ffmpeg/ffprobe not installed");
            return false;
        }
        Command::new("ffmpeg")
            .args(["-v", "error", "-y", "-f", "lavfi", "-i"])
            .arg(format!("color=c=blue:s={width}x{height}:d=1"))
            .args(["-pix_fmt", "yuv420p"])
            .arg(path)
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    fn sample_probe() -> Value {
        json!({
            "streams": [
                {
                    "codec_type": "audio",
                    "codec_name": "aac",
                    "sample_rate": "48000",
                    "channels": 2
                },
                {
                    "codec_type": "video",
                    "codec_name": "h264",
                    "width": 1920,
                    "height": 1080,
                    "r_frame_rate": "30000/1001"
                }
            ],
            "format": {
                "format_name": "mov,mp4,m4a,3gp,3g2,mj2",
                "format_long_name": "QuickTime / MOV",
                "duration": "12.345000",
                "size": "1048576",
                "bit_rate": "679477",
                "nb_streams": 2,
                "tags": {
                    "major_brand": "isom",
                    "creation_time": "2024-03-01T10:20:30.000000Z"
                }
            }
        })
    }

    #[test]
    fn test_parse_format_fields() {
        let metadata = parse_probe_json(&sample_probe());

        assert_eq!(metadata.get("duration"), Some(&MetadataValue::Float(12.345)));
        assert_eq!(metadata.get("size"), Some(&MetadataValue::Integer(1_048_576)));
        assert_eq!(metadata.get("bit_rate"), Some(&MetadataValue::Integer(679_477)));
        assert_eq!(metadata.get("nb_streams"), Some(&MetadataValue::Integer(2)));
        assert_eq!(
            metadata.get("format_long_name"),
            Some(&MetadataValue::from("QuickTime / MOV"))
        );
        assert_eq!(metadata.get("major_brand"), Some(&MetadataValue::from("isom")));
    }

    #[test]
    fn test_creation_time_becomes_datetime() {
        let metadata = parse_probe_json(&sample_probe());
        assert_eq!(
            metadata.get("creation_time").map(ToString::to_string).as_deref(),
            Some("2024-03-01 10:20:30")
        );
    }

    #[test]
    fn test_parse_stream_fields() {
        let metadata = parse_probe_json(&sample_probe());

        assert_eq!(metadata.get("width"), Some(&MetadataValue::Integer(1920)));
        assert_eq!(metadata.get("height"), Some(&MetadataValue::Integer(1080)));
        assert_eq!(metadata.get("video_codec"), Some(&MetadataValue::from("h264")));
        assert_eq!(metadata.get("frame_rate"), Some(&MetadataValue::Float(29.97)));
        assert_eq!(metadata.get("audio_codec"), Some(&MetadataValue::from("aac")));
        assert_eq!(metadata.get("sample_rate"), Some(&MetadataValue::Integer(48000)));
        assert_eq!(metadata.get("channels"), Some(&MetadataValue::Integer(2)));
    }

    #[test]
    fn test_unidentified_format_is_empty() {
        assert!(parse_probe_json(&json!({})).is_empty());
        assert!(parse_probe_json(&json!({ "streams": [] })).is_empty());
    }

    #[test]
    fn test_parse_frame_rate() {
        assert_eq!(parse_frame_rate("25/1"), Some(25.0));
        assert_eq!(parse_frame_rate("24"), Some(24.0));
        assert_eq!(parse_frame_rate("0/0"), None);
        assert_eq!(parse_frame_rate("abc"), None);
    }

    #[test]
    fn test_probe_missing_file_fails() {
        // Either ffprobe is absent (spawn error) or it rejects the path.
        assert!(probe_container(Path::new("/nonexistent/clip.mp4")).is_err());
    }

    #[test]
    fn test_probe_real_mp4() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.mp4");
        if !synth_mp4(&path, 64, 48) {
            return;
        }

        let metadata = probe_container(&path).unwrap();
        assert!(matches!(metadata.get("duration"), Some(MetadataValue::Float(d)) if *d > 0.0));
        assert_eq!(metadata.get("width"), Some(&MetadataValue::Integer(64)));
        assert_eq!(metadata.get("height"), Some(&MetadataValue::Integer(48)));
    }
}
