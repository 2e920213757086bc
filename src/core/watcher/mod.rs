//! # Source Watcher Module
//!
//! Monitors the source tree and reports files that were created or written,
//! so they can be sorted as they arrive.
//!
//! Removals are not reported: the archive keeps its own hard links.
//!
//! ## Example
//! ```rust,ignore
//! let (tx, rx) = crossbeam_channel::unbounded();
//! let mut watcher = SourceWatcher::new(WatcherConfig::default(), ignores, move |event| {
//!     let _ = tx.send(event);
//! })?;
//! watcher.watch(&config.source_root)?;
//!
//! for event in rx {
//!     if let WatchEvent::FileChanged(path) = event {
//!         sorter.sort_one(&path, &sender);
//!     }
//! }
//! ```

use crate::core::scanner::IgnoreMatcher;
use crate::error::WatcherError;
pub use crate::events::WatchEvent;
use notify::event::{AccessKind, AccessMode, ModifyKind};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Configuration for the source watcher
#[derive(Debug, Clone)]
pub struct WatcherConfig {
    /// Whether to watch subdirectories recursively
    pub recursive: bool,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self { recursive: true }
    }
}

/// Watches source directories for new or changed files
pub struct SourceWatcher {
    watcher: RecommendedWatcher,
    config: WatcherConfig,
    watched_paths: Arc<Mutex<HashSet<PathBuf>>>,
}

impl SourceWatcher {
    /// Create a watcher that passes events to `event_handler`.
    ///
    /// The handler runs on the notify backend thread.
    pub fn new<F>(
        config: WatcherConfig,
        ignores: IgnoreMatcher,
        event_handler: F,
    ) -> Result<Self, WatcherError>
    where
        F: Fn(WatchEvent) + Send + 'static,
    {
        let watched_paths = Arc::new(Mutex::new(HashSet::new()));

        let watcher = notify::recommended_watcher(move |result: Result<Event, notify::Error>| {
            match result {
                Ok(event) => {
                    for path in Self::changed_paths(event, &ignores) {
                        event_handler(WatchEvent::FileChanged(path));
                    }
                }
                Err(e) => event_handler(WatchEvent::Error(e.to_string())),
            }
        })
        .map_err(|e| WatcherError::InitFailed(e.to_string()))?;

        Ok(Self {
            watcher,
            config,
            watched_paths,
        })
    }

    /// Paths of a notify event worth sorting
    fn changed_paths(event: Event, ignores: &IgnoreMatcher) -> Vec<PathBuf> {
        if !Self::is_content_change(&event.kind) {
            return Vec::new();
        }
        event
            .paths
            .into_iter()
            .filter(|p| {
                let ignored = ignores.is_ignored(p);
                if ignored {
                    debug!(path = %p.display(), "ignoring watched path");
                }
                !ignored
            })
            .collect()
    }

    fn is_content_change(kind: &EventKind) -> bool {
        match kind {
            EventKind::Create(_) => true,
            EventKind::Modify(ModifyKind::Metadata(_)) => false,
            EventKind::Modify(_) => true,
            EventKind::Access(AccessKind::Close(AccessMode::Write)) => true,
            _ => false,
        }
    }

    /// Start watching a directory
    pub fn watch(&mut self, path: impl AsRef<Path>) -> Result<(), WatcherError> {
        let path = path.as_ref().to_path_buf();

        if !path.exists() {
            return Err(WatcherError::PathNotFound(path));
        }

        let mode = if self.config.recursive {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };

        self.watcher
            .watch(&path, mode)
            .map_err(|e| WatcherError::WatchFailed {
                path: path.clone(),
                reason: e.to_string(),
            })?;

        if let Ok(mut paths) = self.watched_paths.lock() {
            paths.insert(path);
        }

        Ok(())
    }

    /// Stop watching a directory
    pub fn unwatch(&mut self, path: impl AsRef<Path>) -> Result<(), WatcherError> {
        let path = path.as_ref();

        self.watcher
            .unwatch(path)
            .map_err(|e| WatcherError::UnwatchFailed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        if let Ok(mut paths) = self.watched_paths.lock() {
            paths.remove(path);
        }

        Ok(())
    }

    pub fn watched_paths(&self) -> Vec<PathBuf> {
        self.watched_paths
            .lock()
            .map(|paths| paths.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn is_watching(&self, path: impl AsRef<Path>) -> bool {
        self.watched_paths
            .lock()
            .map(|paths| paths.contains(path.as_ref()))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, DataChange, MetadataKind, RemoveKind};
    use std::sync::mpsc;
    use tempfile::TempDir;

    fn no_ignores() -> IgnoreMatcher {
        IgnoreMatcher::new::<&str>(&[]).unwrap()
    }

    fn event(kind: EventKind, path: &str) -> Event {
        Event::new(kind).add_path(PathBuf::from(path))
    }

    #[test]
    fn create_and_write_events_are_reported() {
        let created = event(EventKind::Create(CreateKind::File), "/src/a.jpg");
        assert_eq!(
            SourceWatcher::changed_paths(created, &no_ignores()),
            vec![PathBuf::from("/src/a.jpg")]
        );

        let written = event(
            EventKind::Modify(ModifyKind::Data(DataChange::Content)),
            "/src/b.jpg",
        );
        assert_eq!(SourceWatcher::changed_paths(written, &no_ignores()).len(), 1);

        let closed = event(
            EventKind::Access(AccessKind::Close(AccessMode::Write)),
            "/src/c.jpg",
        );
        assert_eq!(SourceWatcher::changed_paths(closed, &no_ignores()).len(), 1);
    }

    #[test]
    fn removals_and_metadata_changes_are_dropped() {
        let removed = event(EventKind::Remove(RemoveKind::File), "/src/a.jpg");
        assert!(SourceWatcher::changed_paths(removed, &no_ignores()).is_empty());

        let touched = event(
            EventKind::Modify(ModifyKind::Metadata(MetadataKind::Permissions)),
            "/src/a.jpg",
        );
        assert!(SourceWatcher::changed_paths(touched, &no_ignores()).is_empty());
    }

    #[test]
    fn ignored_paths_are_dropped() {
        let ignores = IgnoreMatcher::new(&["*.!sync"]).unwrap();
        let created = event(EventKind::Create(CreateKind::File), "/src/a.jpg.!sync");
        assert!(SourceWatcher::changed_paths(created, &ignores).is_empty());
    }

    #[test]
    fn watcher_creates_successfully() {
        let (tx, _rx) = mpsc::channel();
        let result = SourceWatcher::new(WatcherConfig::default(), no_ignores(), move |event| {
            let _ = tx.send(event);
        });
        assert!(result.is_ok());
    }

    #[test]
    fn watcher_fails_for_nonexistent_path() {
        let mut watcher =
            SourceWatcher::new(WatcherConfig::default(), no_ignores(), |_| {}).unwrap();

        let result = watcher.watch("/nonexistent/path/that/doesnt/exist");
        assert!(matches!(result, Err(WatcherError::PathNotFound(_))));
    }

    #[test]
    fn watcher_tracks_and_unwatches_paths() {
        let temp_dir = TempDir::new().unwrap();
        let mut watcher =
            SourceWatcher::new(WatcherConfig::default(), no_ignores(), |_| {}).unwrap();

        watcher.watch(temp_dir.path()).unwrap();
        assert!(watcher.is_watching(temp_dir.path()));
        assert_eq!(watcher.watched_paths(), vec![temp_dir.path().to_path_buf()]);

        watcher.unwatch(temp_dir.path()).unwrap();
        assert!(!watcher.is_watching(temp_dir.path()));
    }
}
