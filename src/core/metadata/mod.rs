//! # Metadata Module
//!
//! Answers the two questions the archive asks about a file:
//! is it a photo or video, and when was it captured.
//!
//! ## Capture date
//! - EXIF `DateTimeOriginal` (when the photo was taken)
//! - EXIF `DateTime` as fallback
//! - File modification time when there is no usable EXIF data
//!
//! ## Media type
//! Detected from the file signature, not the extension, see [`media`].

pub mod media;

pub use media::{sniff, MediaKind};

use crate::error::MetadataError;
use chrono::{DateTime, Local, NaiveDateTime};
use exif::{In, Reader, Tag, Value};
use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::Path;

/// EXIF date format: "YYYY:MM:DD HH:MM:SS"
const EXIF_DATE_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// Source of media-type and capture-date information
///
/// Implement this trait to plug in other extractors (e.g., for testing).
pub trait MetadataOracle: Send + Sync {
    /// Whether the file is an image or a video
    fn is_media_file(&self, path: &Path) -> Result<bool, MetadataError>;

    /// Wall-clock time at which the media was captured
    fn capture_date(&self, path: &Path) -> Result<NaiveDateTime, MetadataError>;
}

/// Default oracle backed by file signatures, EXIF and file timestamps
#[derive(Debug, Default, Clone, Copy)]
pub struct ExifMetadataOracle;

impl ExifMetadataOracle {
    pub fn new() -> Self {
        Self
    }

    /// Detect the media kind of a file, `None` if it is not media
    pub fn media_kind(&self, path: &Path) -> Result<Option<MediaKind>, MetadataError> {
        let file = File::open(path).map_err(|e| MetadataError::MediaType {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut header = Vec::with_capacity(media::HEADER_LEN);
        file.take(media::HEADER_LEN as u64)
            .read_to_end(&mut header)
            .map_err(|e| MetadataError::MediaType {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(sniff(&header))
    }
}

impl MetadataOracle for ExifMetadataOracle {
    fn is_media_file(&self, path: &Path) -> Result<bool, MetadataError> {
        Ok(self.media_kind(path)?.is_some())
    }

    fn capture_date(&self, path: &Path) -> Result<NaiveDateTime, MetadataError> {
        let exif_error = match extract_exif_date(path) {
            Ok(date) => return Ok(date),
            Err(e) => e,
        };

        // No usable EXIF data, fall back to the file modification time
        modification_date(path).map_err(|stat_error| MetadataError::NoCaptureDate {
            path: path.to_path_buf(),
            reason: format!("{}; {}", exif_error, stat_error),
        })
    }
}

fn extract_exif_date(path: &Path) -> Result<NaiveDateTime, String> {
    let file = File::open(path).map_err(|e| e.to_string())?;
    let mut bufreader = BufReader::new(&file);
    let exif_reader = Reader::new()
        .read_from_container(&mut bufreader)
        .map_err(|e| e.to_string())?;

    for tag in [Tag::DateTimeOriginal, Tag::DateTime] {
        if let Some(field) = exif_reader.get_field(tag, In::PRIMARY) {
            if let Some(date) = parse_exif_datetime(&field.value) {
                return Ok(date);
            }
        }
    }

    Err("no usable EXIF date".to_string())
}

fn parse_exif_datetime(value: &Value) -> Option<NaiveDateTime> {
    if let Value::Ascii(ref vec) = value {
        let bytes = vec.first()?;
        let s = std::str::from_utf8(bytes).ok()?;
        let trimmed = s.trim_end_matches('\0').trim();
        return NaiveDateTime::parse_from_str(trimmed, EXIF_DATE_FORMAT).ok();
    }
    None
}

fn modification_date(path: &Path) -> Result<NaiveDateTime, String> {
    let metadata = fs::metadata(path).map_err(|e| e.to_string())?;
    let modified = metadata.modified().map_err(|e| e.to_string())?;
    let local: DateTime<Local> = modified.into();
    Ok(local.naive_local())
}
