//! Fixtures shared by the integration tests.

#![allow(dead_code)]

use chrono::{DateTime, Local};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Modification time given to fixture photos (2019-04-17 13:30:44 UTC)
pub fn fixture_mtime() -> SystemTime {
    UNIX_EPOCH + Duration::from_secs(1_555_507_844)
}

/// Calendar directory a fixture photo lands in, relative to the archive root
pub fn fixture_calendar_dir() -> PathBuf {
    let local: DateTime<Local> = fixture_mtime().into();
    PathBuf::from(local.format("%Y/%m").to_string())
}

/// File name prefix of a fixture photo in the archive
pub fn fixture_name_prefix() -> String {
    let local: DateTime<Local> = fixture_mtime().into();
    local.format("%Y%m%d_%H%M%S_").to_string()
}

/// Write a minimal PNG without EXIF data; `variant` changes its content
pub fn write_png(path: &Path, variant: u8) {
    let mut file = File::create(path).unwrap();
    file.write_all(&[
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, // PNG header
        0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52, // IHDR chunk
        0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, // 1x1
    ])
    .unwrap();
    file.write_all(&[variant; 16]).unwrap();
    file.set_modified(fixture_mtime()).unwrap();
}
