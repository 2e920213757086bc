//! Types for the dedup module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// What to do with one group of duplicates
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DedupTask {
    /// The calendar-directory file that stays canonical
    pub to_keep: PathBuf,
    /// Paths that must become (or remain) hard links to `to_keep`
    pub recreate_links: Vec<PathBuf>,
    /// Redundant paths to remove
    pub delete_files: Vec<PathBuf>,
}

/// Result of executing the plans for all groups
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DedupSummary {
    pub groups_processed: usize,
    pub links_recreated: usize,
    pub files_deleted: usize,
    pub duration_ms: u64,
}
