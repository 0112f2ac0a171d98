//! EXIF metadata extraction
//!
//! Reads a configured allow-list of EXIF tags from an uploaded file into a flat
//! `tag name -> value` mapping. Missing or unreadable EXIF data yields `None` and is
//! only logged.

use exif::{Exif, Field, In, Reader, Tag, Value};
use galerie_core::models::ExifData;
use serde_json::{json, Number};
use std::io::{BufRead, BufReader, Cursor, Seek};
use std::path::{Path, PathBuf};

/// Map an allow-list entry to its EXIF tag. Both the common aliases (`ISO`,
/// `CreateDate`, `ExifImageWidth`) and the EXIF 2.3 names are accepted.
pub fn tag_for_name(name: &str) -> Option<Tag> {
    let tag = match name {
        "Make" => Tag::Make,
        "Model" => Tag::Model,
        "Software" => Tag::Software,
        "Orientation" => Tag::Orientation,
        "FileSource" => Tag::FileSource,
        "ExifImageWidth" | "PixelXDimension" => Tag::PixelXDimension,
        "ExifImageHeight" | "PixelYDimension" => Tag::PixelYDimension,
        "FocalLength" => Tag::FocalLength,
        "FNumber" => Tag::FNumber,
        "ExposureTime" => Tag::ExposureTime,
        "ShutterSpeedValue" => Tag::ShutterSpeedValue,
        "ISO" | "PhotographicSensitivity" => Tag::PhotographicSensitivity,
        "Flash" => Tag::Flash,
        "LensModel" => Tag::LensModel,
        "DateTimeOriginal" => Tag::DateTimeOriginal,
        "CreateDate" | "DateTimeDigitized" => Tag::DateTimeDigitized,
        "ModifyDate" | "DateTime" => Tag::DateTime,
        "GPSLatitude" => Tag::GPSLatitude,
        "GPSLongitude" => Tag::GPSLongitude,
        "GPSAltitude" => Tag::GPSAltitude,
        _ => return None,
    };
    Some(tag)
}

/// Extracts allow-listed EXIF tags from images.
#[derive(Debug, Clone)]
pub struct MetadataExtractor {
    tags: Vec<(String, Tag)>,
}

impl MetadataExtractor {
    pub fn new(tag_names: &[String]) -> Self {
        let mut tags = Vec::with_capacity(tag_names.len());
        for name in tag_names {
            match tag_for_name(name) {
                Some(tag) => tags.push((name.clone(), tag)),
                None => tracing::warn!(tag = %name, "Unknown EXIF tag in allow-list, ignoring"),
            }
        }
        Self { tags }
    }

    pub fn tag_names(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(|(name, _)| name.as_str())
    }

    /// Extract allow-listed tags from the file at `path`.
    pub async fn extract(&self, path: &Path) -> Option<ExifData> {
        let path: PathBuf = path.to_path_buf();
        let extractor = self.clone();

        let result = tokio::task::spawn_blocking(move || {
            let file = std::fs::File::open(&path)?;
            Ok::<_, std::io::Error>(extractor.extract_from_reader(&mut BufReader::new(file), &path))
        })
        .await;

        match result {
            Ok(Ok(data)) => data,
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Failed to open file for EXIF extraction");
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "EXIF extraction task failed");
                None
            }
        }
    }

    /// Extract allow-listed tags from in-memory image bytes.
    pub fn extract_from_bytes(&self, data: &[u8]) -> Option<ExifData> {
        self.extract_from_reader(&mut Cursor::new(data), Path::new("<memory>"))
    }

    fn extract_from_reader<R: BufRead + Seek>(&self, reader: &mut R, origin: &Path) -> Option<ExifData> {
        let exif = match Reader::new().read_from_container(reader) {
            Ok(exif) => exif,
            Err(exif::Error::NotFound(_)) => {
                tracing::debug!(path = %origin.display(), "No EXIF data present");
                return None;
            }
            Err(e) => {
                tracing::warn!(path = %origin.display(), error = %e, "Failed to parse EXIF data");
                return None;
            }
        };

        let mut data = ExifData::new();
        for (name, tag) in &self.tags {
            if let Some(field) = exif.get_field(*tag, In::PRIMARY) {
                let value = field_value(&exif, field);
                if !value.is_null() {
                    data.insert(name.clone(), value);
                }
            }
        }

        if data.is_empty() {
            tracing::debug!(path = %origin.display(), "No allow-listed EXIF tags present");
            return None;
        }

        tracing::debug!(path = %origin.display(), tags = data.len(), "Extracted EXIF data");
        Some(data)
    }
}

fn field_value(exif: &Exif, field: &Field) -> serde_json::Value {
    match field.tag {
        Tag::GPSLatitude => gps_coordinate(exif, field, Tag::GPSLatitudeRef, b'S'),
        Tag::GPSLongitude => gps_coordinate(exif, field, Tag::GPSLongitudeRef, b'W'),
        Tag::DateTimeOriginal | Tag::DateTimeDigitized | Tag::DateTime => datetime_value(field),
        _ => plain_value(field),
    }
}

fn float_value(value: f64) -> serde_json::Value {
    Number::from_f64(value)
        .map(serde_json::Value::Number)
        .unwrap_or(serde_json::Value::Null)
}

/// Collapse single-element vectors to a scalar.
fn scalar_or_array(mut values: Vec<serde_json::Value>) -> serde_json::Value {
    match values.len() {
        0 => serde_json::Value::Null,
        1 => values.remove(0),
        _ => serde_json::Value::Array(values),
    }
}

fn ascii_value(parts: &[Vec<u8>]) -> Option<String> {
    parts
        .first()
        .map(|bytes| String::from_utf8_lossy(bytes).trim_end_matches('\0').trim().to_string())
        .filter(|s| !s.is_empty())
}

fn plain_value(field: &Field) -> serde_json::Value {
    match &field.value {
        Value::Ascii(parts) => ascii_value(parts)
            .map(serde_json::Value::String)
            .unwrap_or(serde_json::Value::Null),
        Value::Byte(v) => scalar_or_array(v.iter().map(|n| json!(n)).collect()),
        Value::Short(v) => scalar_or_array(v.iter().map(|n| json!(n)).collect()),
        Value::Long(v) => scalar_or_array(v.iter().map(|n| json!(n)).collect()),
        Value::SShort(v) => scalar_or_array(v.iter().map(|n| json!(n)).collect()),
        Value::SLong(v) => scalar_or_array(v.iter().map(|n| json!(n)).collect()),
        Value::Rational(v) => scalar_or_array(v.iter().map(|r| float_value(r.to_f64())).collect()),
        Value::SRational(v) => {
            scalar_or_array(v.iter().map(|r| float_value(r.to_f64())).collect())
        }
        Value::Float(v) => scalar_or_array(v.iter().map(|f| float_value(*f as f64)).collect()),
        Value::Double(v) => scalar_or_array(v.iter().map(|f| float_value(*f)).collect()),
        // FileSource is a single undefined byte (3 = digital camera)
        Value::Undefined(bytes, _) if bytes.len() == 1 => json!(bytes[0]),
        _ => serde_json::Value::String(field.display_value().to_string()),
    }
}

/// Degrees/minutes/seconds to signed decimal degrees.
fn gps_coordinate(exif: &Exif, field: &Field, ref_tag: Tag, negative_ref: u8) -> serde_json::Value {
    let Value::Rational(ref parts) = field.value else {
        return plain_value(field);
    };
    if parts.len() < 3 {
        return plain_value(field);
    }

    let mut degrees = parts[0].to_f64() + parts[1].to_f64() / 60.0 + parts[2].to_f64() / 3600.0;

    let negative = exif
        .get_field(ref_tag, In::PRIMARY)
        .and_then(|f| match &f.value {
            Value::Ascii(v) => v.first().and_then(|s| s.first().copied()),
            _ => None,
        })
        .map(|c| c.eq_ignore_ascii_case(&negative_ref))
        .unwrap_or(false);
    if negative {
        degrees = -degrees;
    }

    float_value(degrees)
}

/// EXIF `YYYY:MM:DD HH:MM:SS` to ISO 8601 without offset.
fn datetime_value(field: &Field) -> serde_json::Value {
    let Value::Ascii(ref parts) = field.value else {
        return plain_value(field);
    };
    let Some(raw) = parts.first() else {
        return serde_json::Value::Null;
    };

    match exif::DateTime::from_ascii(raw) {
        Ok(dt) => json!(format!(
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}",
            dt.year, dt.month, dt.day, dt.hour, dt.minute, dt.second
        )),
        Err(_) => plain_value(field),
    }
}
