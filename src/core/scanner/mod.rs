//! # Scanner Module
//!
//! Enumerates the files of a source tree for the initial sort run.
//!
//! Media detection is not done here: every regular file is listed and
//! the archive decides whether it is a photo or video.
//!
//! ## Example
//! ```rust,ignore
//! let ignores = IgnoreMatcher::from_config(&config)?;
//! let scanner = SourceScanner::new(ScanConfig::default(), ignores);
//! let result = scanner.scan(&config.source_root)?;
//! ```

mod filter;
mod walker;

pub use filter::IgnoreMatcher;
pub use walker::{ScanConfig, SourceScanner};

use crate::error::ScanError;
use std::path::PathBuf;

/// Result of a scan operation
#[derive(Debug, Default)]
pub struct ScanResult {
    /// Regular files, in walk order
    pub files: Vec<PathBuf>,
    /// Number of directories visited
    pub directories: usize,
    /// Errors that occurred during scanning (non-fatal)
    pub errors: Vec<ScanError>,
}
