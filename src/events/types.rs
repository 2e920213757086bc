//! Event type definitions for progress reporting.

use crate::core::dedup::{DedupSummary, DedupTask};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// All events emitted by the archive
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// Sorting events (batch and watch mode)
    Sort(SortEvent),
    /// Deduplication events
    Dedup(DedupEvent),
    /// Source watching events
    Watch(WatchEvent),
}

/// Events while sorting files into the archive
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SortEvent {
    /// A batch has started
    Started { total_files: usize },
    /// Progress update during a batch
    Progress(SortProgress),
    /// A file was archived
    Sorted { source: PathBuf, canonical: PathBuf },
    /// A file was not a photo or video
    Skipped { path: PathBuf },
    /// A file could not be archived, sorting continues
    Error { path: PathBuf, message: String },
    /// A batch completed
    Completed { summary: SortSummary },
}

/// Progress information during a batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SortProgress {
    /// Number of files handled so far
    pub completed: usize,
    /// Total number of files in the batch
    pub total: usize,
    /// File currently being sorted
    pub current_path: PathBuf,
}

/// Summary of a sort batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SortSummary {
    pub sorted: usize,
    pub skipped: usize,
    pub failed: usize,
    pub duration_ms: u64,
}

/// Events while deduplicating an archive
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DedupEvent {
    /// Deduplication has started
    Started { total_groups: usize },
    /// A group was planned and is about to be applied
    GroupPlanned { group_index: usize, task: DedupTask },
    /// All groups were applied
    Completed { summary: DedupSummary },
}

/// Changes observed in a watched source tree
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum WatchEvent {
    /// A file was created or written
    FileChanged(PathBuf),
    /// The watch backend reported an error
    Error(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_serializable() {
        let event = Event::Sort(SortEvent::Progress(SortProgress {
            completed: 10,
            total: 50,
            current_path: PathBuf::from("/inbox/IMG_0010.jpg"),
        }));

        let json = serde_json::to_string(&event).unwrap();
        let deserialized: Event = serde_json::from_str(&json).unwrap();

        match deserialized {
            Event::Sort(SortEvent::Progress(p)) => {
                assert_eq!(p.total, 50);
            }
            _ => panic!("Wrong event type"),
        }
    }

    #[test]
    fn planned_group_carries_task() {
        let event = Event::Dedup(DedupEvent::GroupPlanned {
            group_index: 3,
            task: DedupTask {
                to_keep: PathBuf::from("/a/2019/04/x.jpg"),
                recreate_links: vec![PathBuf::from("/a/all/x.jpg")],
                delete_files: vec![],
            },
        });

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("/a/2019/04/x.jpg"));
        assert!(json.contains("\"group_index\":3"));
    }
}
