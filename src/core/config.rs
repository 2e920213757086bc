//! Archive configuration and its builder.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Patterns ignored by default (NAS thumbnails and sync tool temp files)
pub const DEFAULT_IGNORE_PATTERNS: &[&str] = &["*.@__thumb*", "*.syncthing.*tmp", "*.!sync"];

/// Configuration shared by the sorter, scanner and watcher
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveConfig {
    /// Directory the media files come from
    pub source_root: PathBuf,
    /// Root of the archive tree
    pub archive_root: PathBuf,
    /// Log filesystem mutations instead of performing them
    pub dry_run: bool,
    /// Glob patterns for paths that are never sorted
    pub ignore_patterns: Vec<String>,
    /// Whether hidden files and directories are sorted
    pub include_hidden: bool,
    /// Keep watching the source after the initial run
    pub watch: bool,
}

impl ArchiveConfig {
    pub fn builder() -> ArchiveConfigBuilder {
        ArchiveConfigBuilder::default()
    }
}

/// Builder for [`ArchiveConfig`]
#[derive(Debug, Clone)]
pub struct ArchiveConfigBuilder {
    source_root: Option<PathBuf>,
    archive_root: Option<PathBuf>,
    dry_run: bool,
    ignore_patterns: Vec<String>,
    include_hidden: bool,
    watch: bool,
}

impl Default for ArchiveConfigBuilder {
    fn default() -> Self {
        Self {
            source_root: None,
            archive_root: None,
            dry_run: false,
            ignore_patterns: DEFAULT_IGNORE_PATTERNS
                .iter()
                .map(|p| p.to_string())
                .collect(),
            include_hidden: false,
            watch: true,
        }
    }
}

impl ArchiveConfigBuilder {
    /// Set the source directory
    pub fn source_root(mut self, path: impl AsRef<Path>) -> Self {
        self.source_root = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the archive directory
    pub fn archive_root(mut self, path: impl AsRef<Path>) -> Self {
        self.archive_root = Some(path.as_ref().to_path_buf());
        self
    }

    /// Enable dry-run mode
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Replace the ignore patterns
    pub fn ignore_patterns(mut self, patterns: Vec<String>) -> Self {
        self.ignore_patterns = patterns;
        self
    }

    /// Include hidden files
    pub fn include_hidden(mut self, include: bool) -> Self {
        self.include_hidden = include;
        self
    }

    /// Keep watching after the initial run
    pub fn watch(mut self, watch: bool) -> Self {
        self.watch = watch;
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<ArchiveConfig, ConfigError> {
        Ok(ArchiveConfig {
            source_root: self.source_root.ok_or(ConfigError::Missing("source directory"))?,
            archive_root: self
                .archive_root
                .ok_or(ConfigError::Missing("archive directory"))?,
            dry_run: self.dry_run,
            ignore_patterns: self.ignore_patterns,
            include_hidden: self.include_hidden,
            watch: self.watch,
        })
    }
}
