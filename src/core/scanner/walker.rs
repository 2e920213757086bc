//! Directory walking implementation using walkdir.

use super::{IgnoreMatcher, ScanResult};
use crate::error::ScanError;
use std::path::Path;
use walkdir::WalkDir;

/// Configuration for the source scanner
#[derive(Debug, Clone, Default)]
pub struct ScanConfig {
    /// Whether to follow symbolic links
    pub follow_symlinks: bool,
    /// Maximum directory depth (None = unlimited)
    pub max_depth: Option<usize>,
}

/// Lists the regular files of a source tree
pub struct SourceScanner {
    config: ScanConfig,
    ignores: IgnoreMatcher,
}

impl SourceScanner {
    pub fn new(config: ScanConfig, ignores: IgnoreMatcher) -> Self {
        Self { config, ignores }
    }

    /// Walk `root` and collect every file that is not ignored.
    ///
    /// Ignored directories are not descended into. Entries that cannot be
    /// read are reported in [`ScanResult::errors`] and skipped.
    pub fn scan(&self, root: &Path) -> Result<ScanResult, ScanError> {
        if !root.is_dir() {
            return Err(ScanError::DirectoryNotFound {
                path: root.to_path_buf(),
            });
        }

        let mut result = ScanResult::default();

        let mut walker = WalkDir::new(root)
            .follow_links(self.config.follow_symlinks)
            .sort_by_file_name();
        if let Some(depth) = self.config.max_depth {
            walker = walker.max_depth(depth);
        }

        let entries = walker
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !self.ignores.is_ignored(entry.path()));

        for entry_result in entries {
            match entry_result {
                Ok(entry) => {
                    if entry.file_type().is_dir() {
                        result.directories += 1;
                    } else if entry.file_type().is_file() {
                        result.files.push(entry.into_path());
                    }
                }
                Err(e) => {
                    let path = e
                        .path()
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| root.to_path_buf());
                    result.errors.push(ScanError::ReadEntry {
                        path,
                        reason: e.to_string(),
                    });
                }
            }
        }

        Ok(result)
    }
}
