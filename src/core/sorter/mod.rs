//! # Sorter Module
//!
//! Drives [`ArchiveAlgorithm`] over many files.
//!
//! Files are sorted one at a time. A file that is not a photo or video is
//! counted as skipped; any other failure is recorded and the batch moves on.
//!
//! ## Example
//! ```rust,ignore
//! let sorter = Sorter::new(ArchiveAlgorithm::from_config(&config));
//! sorter.init()?;
//! let report = sorter.sort_all(&scan.files, &sender);
//! println!("{} sorted, {} failed", report.sorted.len(), report.failed.len());
//! ```

use crate::core::archive::ArchiveAlgorithm;
use crate::error::SortError;
use crate::events::{null_sender, Event, EventSender, SortEvent, SortProgress, SortSummary};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, warn};

/// What happened to a single file
#[derive(Debug, Clone, PartialEq)]
pub enum SortOutcome {
    /// Archived; holds the canonical path
    Sorted(PathBuf),
    /// Not a photo or video
    Skipped,
    /// Sorting failed with the given message
    Failed(String),
}

/// A file that made it into the archive
#[derive(Debug, Clone, Serialize)]
pub struct SortedFile {
    pub source: PathBuf,
    pub canonical: PathBuf,
}

/// A file that could not be archived
#[derive(Debug, Clone, Serialize)]
pub struct FailedFile {
    pub path: PathBuf,
    pub message: String,
}

/// Result of a batch run
#[derive(Debug, Default, Serialize)]
pub struct SortReport {
    pub sorted: Vec<SortedFile>,
    pub skipped: Vec<PathBuf>,
    pub failed: Vec<FailedFile>,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl SortReport {
    pub fn summary(&self) -> SortSummary {
        SortSummary {
            sorted: self.sorted.len(),
            skipped: self.skipped.len(),
            failed: self.failed.len(),
            duration_ms: self.duration_ms,
        }
    }
}

pub struct Sorter {
    algorithm: ArchiveAlgorithm,
}

impl Sorter {
    pub fn new(algorithm: ArchiveAlgorithm) -> Self {
        Self { algorithm }
    }

    pub fn algorithm(&self) -> &ArchiveAlgorithm {
        &self.algorithm
    }

    /// Prepare the archive index directories
    pub fn init(&self) -> Result<(), SortError> {
        self.algorithm.init()
    }

    /// Sort a single file, reporting the result as an event
    pub fn sort_one(&self, path: &Path, events: &EventSender) -> SortOutcome {
        match self.algorithm.sort(path) {
            Ok(canonical) => {
                events.send(Event::Sort(SortEvent::Sorted {
                    source: path.to_path_buf(),
                    canonical: canonical.clone(),
                }));
                SortOutcome::Sorted(canonical)
            }
            Err(e) if e.is_skip() => {
                debug!(path = %path.display(), "skipping non-media file");
                events.send(Event::Sort(SortEvent::Skipped {
                    path: path.to_path_buf(),
                }));
                SortOutcome::Skipped
            }
            Err(e) => {
                let message = e.to_string();
                warn!(path = %path.display(), error = %message, "failed to sort file");
                events.send(Event::Sort(SortEvent::Error {
                    path: path.to_path_buf(),
                    message: message.clone(),
                }));
                SortOutcome::Failed(message)
            }
        }
    }

    /// Sort a batch without events
    pub fn run(&self, files: &[PathBuf]) -> SortReport {
        self.sort_all(files, &null_sender())
    }

    /// Sort every file in order, continuing past failures
    pub fn sort_all(&self, files: &[PathBuf], events: &EventSender) -> SortReport {
        let start = Instant::now();
        let total = files.len();
        events.send(Event::Sort(SortEvent::Started { total_files: total }));

        let mut report = SortReport::default();
        for (index, path) in files.iter().enumerate() {
            match self.sort_one(path, events) {
                SortOutcome::Sorted(canonical) => report.sorted.push(SortedFile {
                    source: path.clone(),
                    canonical,
                }),
                SortOutcome::Skipped => report.skipped.push(path.clone()),
                SortOutcome::Failed(message) => report.failed.push(FailedFile {
                    path: path.clone(),
                    message,
                }),
            }

            events.send(Event::Sort(SortEvent::Progress(SortProgress {
                completed: index + 1,
                total,
                current_path: path.clone(),
            })));
        }

        report.duration_ms = start.elapsed().as_millis() as u64;
        events.send(Event::Sort(SortEvent::Completed {
            summary: report.summary(),
        }));
        report
    }
}
