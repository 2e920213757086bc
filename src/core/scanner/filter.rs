//! Path filtering shared by the scanner and the watcher.

use crate::core::config::ArchiveConfig;
use crate::error::ConfigError;
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::{Path, PathBuf};

/// Decides which source paths are never sorted
#[derive(Debug, Clone)]
pub struct IgnoreMatcher {
    globs: GlobSet,
    /// Directories excluded wholesale, e.g. an archive nested in the source
    excluded_roots: Vec<PathBuf>,
    include_hidden: bool,
}

impl IgnoreMatcher {
    /// Build a matcher from glob patterns, matched against the full path
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, ConfigError> {
        let globs = patterns
            .iter()
            .map(|p| {
                Glob::new(p.as_ref()).map_err(|e| ConfigError::InvalidPattern {
                    pattern: p.as_ref().to_string(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .fold(&mut GlobSetBuilder::new(), |builder, glob| builder.add(glob))
            .build()
            .map_err(|e| ConfigError::InvalidPattern {
                pattern: patterns
                    .iter()
                    .map(|p| p.as_ref())
                    .collect::<Vec<_>>()
                    .join(", "),
                reason: e.to_string(),
            })?;

        Ok(Self {
            globs,
            excluded_roots: Vec::new(),
            include_hidden: true,
        })
    }

    /// Matcher for the patterns and hidden-file policy of `config`.
    ///
    /// The archive root is always excluded.
    pub fn from_config(config: &ArchiveConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(&config.ignore_patterns)?
            .with_hidden(config.include_hidden)
            .with_excluded_root(&config.archive_root))
    }

    /// Include hidden files (starting with .)
    pub fn with_hidden(mut self, include: bool) -> Self {
        self.include_hidden = include;
        self
    }

    /// Ignore everything below `root`
    pub fn with_excluded_root(mut self, root: impl AsRef<Path>) -> Self {
        self.excluded_roots.push(root.as_ref().to_path_buf());
        self
    }

    /// Check if a path should be skipped
    pub fn is_ignored(&self, path: &Path) -> bool {
        if !self.include_hidden && is_hidden(path) {
            return true;
        }
        if self.excluded_roots.iter().any(|root| path.starts_with(root)) {
            return true;
        }
        self.globs.is_match(path)
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|name| name.starts_with('.') && name != "." && name != "..")
        .unwrap_or(false)
}
