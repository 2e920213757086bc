//! # Error Module
//!
//! Error types for the photo archive.
//!
//! ## Design Principles
//! - **Never panic** on user data - return errors instead
//! - **Include context** - which step failed and which path was in flight
//! - **Skip is not failure** - a non-media file is reported, not fatal
//! - **Recovery hints** - e.g. the temp file left behind by a failed copy

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("Sort error: {0}")]
    Sort(#[from] SortError),

    #[error("Deduplication error: {0}")]
    Dedup(#[from] DedupError),

    #[error("Filesystem error: {0}")]
    FileSystem(#[from] FileSystemError),

    #[error("Metadata error: {0}")]
    Metadata(#[from] MetadataError),

    #[error("Scanning error: {0}")]
    Scan(#[from] ScanError),

    #[error("Watcher error: {0}")]
    Watcher(#[from] WatcherError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors from capture-date and media-type extraction
#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("Failed to read {path} to determine its media type: {source}")]
    MediaType {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could neither read EXIF data nor modification time of {path}: {reason}")]
    NoCaptureDate { path: PathBuf, reason: String },
}

/// Errors from the filesystem port
#[derive(Error, Debug)]
pub enum FileSystemError {
    #[error("Failed to remove {path}: {source}")]
    Remove {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to hard link {link} to {target}: {source}")]
    HardLink {
        target: PathBuf,
        link: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to rename {from} to {to}: {source}")]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to copy {from} to {to}: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to stat {path}: {source}")]
    Stat {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from sorting a single file into the archive
#[derive(Error, Debug)]
pub enum SortError {
    /// Not an error for orchestration purposes: the caller skips the file.
    #[error("given file is not a media file: {path}")]
    NotMediaFile { path: PathBuf },

    #[error("Could not determine media type: {0}")]
    MediaType(#[source] MetadataError),

    #[error("Could not determine creation date of media file: {0}")]
    CaptureDate(#[source] MetadataError),

    #[error("Could not create target directory: {0}")]
    TargetDirectory(#[source] FileSystemError),

    #[error("Could not copy file and compute checksum (temporary file {temp_path}): {source}")]
    Copy {
        temp_path: PathBuf,
        #[source]
        source: FileSystemError,
    },

    #[error("Could not move temporary file {temp_path} to its target name: {source}")]
    Rename {
        temp_path: PathBuf,
        #[source]
        source: FileSystemError,
    },

    #[error("Source file {path} is not below the source root {source_root}")]
    OutsideSourceRoot { path: PathBuf, source_root: PathBuf },

    #[error("Archived {canonical} but could not create its index links: {source}")]
    Link {
        canonical: PathBuf,
        #[source]
        source: FileSystemError,
    },

    #[error("Could not create archive directories: {0}")]
    Init(#[source] FileSystemError),
}

impl SortError {
    /// True for the "not a media file" sentinel, which callers treat as a skip
    pub fn is_skip(&self) -> bool {
        matches!(self, SortError::NotMediaFile { .. })
    }
}

/// Errors from planning or executing deduplication
#[derive(Error, Debug)]
pub enum DedupError {
    #[error("Path {path} is outside of archive {archive_root}")]
    OutsideArchive { path: PathBuf, archive_root: PathBuf },

    #[error("There is no file in a calendar directory among {count} duplicates (first: {first})")]
    NoCanonicalCopy { count: usize, first: PathBuf },

    #[error("Duplicate group is empty")]
    EmptyGroup,

    #[error("Failed to execute deduplication of group {group_index} (keeping {to_keep}): {source}")]
    Execute {
        group_index: usize,
        to_keep: PathBuf,
        #[source]
        source: FileSystemError,
    },

    #[error("Failed to plan deduplication of group {group_index}: {source}")]
    Plan {
        group_index: usize,
        #[source]
        source: Box<DedupError>,
    },

    #[error("Failed to read duplicate groups: {0}")]
    ReadInput(#[source] std::io::Error),
}

/// Errors that occur while enumerating the source tree
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("Failed to read {path}: {reason}")]
    ReadEntry { path: PathBuf, reason: String },
}

/// Errors from the source watcher
#[derive(Error, Debug)]
pub enum WatcherError {
    #[error("Failed to initialize watcher: {0}")]
    InitFailed(String),

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("Failed to watch {path}: {reason}")]
    WatchFailed { path: PathBuf, reason: String },

    #[error("Failed to unwatch {path}: {reason}")]
    UnwatchFailed { path: PathBuf, reason: String },
}

/// Invalid user-supplied configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid ignore pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Delimiter must be a single character, got '{0}'")]
    InvalidDelimiter(String),

    #[error("Missing required setting: {0}")]
    Missing(&'static str),

    #[error("Cannot resolve {path}: {source}")]
    ResolvePath {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, ArchiveError>;
