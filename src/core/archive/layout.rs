//! Naming rules of the archive tree.
//!
//! ```text
//! <root>/YEAR/MM/<YYYYMMDD_HHMMSS>_<hash8><ext>      canonical files
//! <root>/all/<canonical name>                        hard link
//! <root>/origin/<source subdir>/<canonical name>     hard link
//! ```

use crate::core::filesystem::ContentDigest;
use crate::core::paths;
use chrono::{Datelike, NaiveDateTime};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Timestamp part of canonical file names
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Flat index directory
pub const ALL_DIR: &str = "all";

/// Source mirror index directory
pub const ORIGIN_DIR: &str = "origin";

/// Name of the in-flight copy inside a calendar directory
pub const TEMP_FILE_NAME: &str = "photo-archive.tmp";

/// Path arithmetic for one archive root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveLayout {
    root: PathBuf,
}

impl ArchiveLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn all_dir(&self) -> PathBuf {
        self.root.join(ALL_DIR)
    }

    pub fn origin_dir(&self) -> PathBuf {
        self.root.join(ORIGIN_DIR)
    }

    /// `<root>/YEAR/MM` for the capture time, in the capture time's own zone
    pub fn calendar_dir(&self, captured: &NaiveDateTime) -> PathBuf {
        self.root
            .join(format!("{:04}", captured.year()))
            .join(format!("{:02}", captured.month()))
    }

    pub fn temp_file(&self, calendar_dir: &Path) -> PathBuf {
        calendar_dir.join(TEMP_FILE_NAME)
    }

    /// `<YYYYMMDD_HHMMSS>_<hash8><ext>`, extension copied verbatim from `source`
    pub fn canonical_file_name(
        captured: &NaiveDateTime,
        digest: &ContentDigest,
        source: &Path,
    ) -> OsString {
        let mut name = OsString::from(format!(
            "{}_{}",
            captured.format(TIMESTAMP_FORMAT),
            digest.short()
        ));
        if let Some(extension) = source.extension() {
            name.push(".");
            name.push(extension);
        }
        name
    }

    pub fn all_link(&self, file_name: impl AsRef<Path>) -> PathBuf {
        self.all_dir().join(file_name)
    }

    /// `<root>/origin/<dir of source relative to source_root>/<file_name>`
    ///
    /// Returns `None` when `source` is not below `source_root`.
    pub fn origin_link(
        &self,
        source_root: &Path,
        source: &Path,
        file_name: impl AsRef<Path>,
    ) -> Option<PathBuf> {
        let relative = paths::relative_within(source_root, source)?;
        let relative_dir = relative.parent().unwrap_or(Path::new(""));
        Some(self.origin_dir().join(relative_dir).join(file_name))
    }
}
