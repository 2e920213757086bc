//! # Core Module
//!
//! The archive engine, independent of any front end.
//!
//! ## Modules
//! - `metadata` - Media detection and capture dates
//! - `filesystem` - Filesystem port with real and dry-run implementations
//! - `archive` - Naming rules and placement of a single file
//! - `dedup` - Deduplication of an existing archive
//! - `scanner` - Enumerates source files
//! - `sorter` - Sorts batches of files
//! - `watcher` - Reports new files in the source tree

pub mod archive;
pub mod config;
pub mod dedup;
pub mod filesystem;
pub mod metadata;
pub mod paths;
pub mod scanner;
pub mod sorter;
pub mod watcher;

// Re-export commonly used types
pub use archive::{ArchiveAlgorithm, ArchiveLayout};
pub use config::ArchiveConfig;
pub use dedup::{DedupSummary, DedupTask};
pub use filesystem::{FileSystem, LoggingFileSystem, RealFileSystem};
pub use metadata::{ExifMetadataOracle, MediaKind, MetadataOracle};
pub use scanner::{IgnoreMatcher, SourceScanner};
pub use sorter::{SortReport, Sorter};
