//! Executes deduplication plans against a filesystem backend.

use super::planner::deduplicate;
use super::types::{DedupSummary, DedupTask};
use crate::core::filesystem::FileSystem;
use crate::error::{DedupError, FileSystemError};
use crate::events::{null_sender, DedupEvent, Event, EventSender};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::debug;

/// Plan and execute every duplicate group in order.
///
/// The first failure aborts the run. Groups handled before the failure
/// stay handled; every step is idempotent, so the run can be repeated.
pub fn deduplicate_all(
    archive_root: &Path,
    groups: &[Vec<PathBuf>],
    fs: &dyn FileSystem,
) -> Result<DedupSummary, DedupError> {
    deduplicate_all_with_events(archive_root, groups, fs, &null_sender())
}

/// Same as [`deduplicate_all`], publishing progress events
pub fn deduplicate_all_with_events(
    archive_root: &Path,
    groups: &[Vec<PathBuf>],
    fs: &dyn FileSystem,
    events: &EventSender,
) -> Result<DedupSummary, DedupError> {
    let start = Instant::now();
    let mut summary = DedupSummary::default();

    events.send(Event::Dedup(DedupEvent::Started {
        total_groups: groups.len(),
    }));

    for (group_index, group) in groups.iter().enumerate() {
        let task = deduplicate(archive_root, group).map_err(|e| DedupError::Plan {
            group_index,
            source: Box::new(e),
        })?;

        events.send(Event::Dedup(DedupEvent::GroupPlanned {
            group_index,
            task: task.clone(),
        }));

        apply(&task, fs).map_err(|e| DedupError::Execute {
            group_index,
            to_keep: task.to_keep.clone(),
            source: e,
        })?;
        debug!(group_index, to_keep = %task.to_keep.display(), "group deduplicated");

        summary.groups_processed += 1;
        summary.links_recreated += task.recreate_links.len();
        summary.files_deleted += task.delete_files.len();
    }

    summary.duration_ms = start.elapsed().as_millis() as u64;
    events.send(Event::Dedup(DedupEvent::Completed {
        summary: summary.clone(),
    }));

    Ok(summary)
}

/// Recreate every link to `to_keep`, then remove the redundant files
fn apply(task: &DedupTask, fs: &dyn FileSystem) -> Result<(), FileSystemError> {
    let links: Vec<&Path> = task.recreate_links.iter().map(PathBuf::as_path).collect();
    fs.create_links(&links, &task.to_keep)?;

    for path in &task.delete_files {
        fs.ensure_absent(path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::filesystem::{FsOperation, LoggingFileSystem, RealFileSystem};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn dry_run_records_links_then_deletes() {
        let dry_run = LoggingFileSystem::new();
        let groups = vec![vec![
            PathBuf::from("Archive/2019/04/20190417_133044_537842c8.jpg"),
            PathBuf::from("Archive/all/20190417_133044_537842c8.jpg"),
            PathBuf::from("Archive/all/20190417_151708_537842c8.jpg"),
        ]];

        let summary = deduplicate_all(Path::new("Archive"), &groups, &dry_run).unwrap();

        assert_eq!(summary.groups_processed, 1);
        assert_eq!(summary.links_recreated, 1);
        assert_eq!(summary.files_deleted, 1);
        assert_eq!(
            dry_run.operations(),
            vec![
                FsOperation::Remove {
                    path: PathBuf::from("Archive/all/20190417_133044_537842c8.jpg")
                },
                FsOperation::CreateDirectory {
                    path: PathBuf::from("Archive/all")
                },
                FsOperation::HardLink {
                    target: PathBuf::from("Archive/2019/04/20190417_133044_537842c8.jpg"),
                    link: PathBuf::from("Archive/all/20190417_133044_537842c8.jpg"),
                },
                FsOperation::Remove {
                    path: PathBuf::from("Archive/all/20190417_151708_537842c8.jpg")
                },
            ]
        );
    }

    #[test]
    fn planning_failure_aborts_remaining_groups() {
        let dry_run = LoggingFileSystem::new();
        let groups = vec![
            vec![PathBuf::from("Archive/all/x.jpg")],
            vec![
                PathBuf::from("Archive/2019/04/a.jpg"),
                PathBuf::from("Archive/2019/04/b.jpg"),
            ],
        ];

        let err = deduplicate_all(Path::new("Archive"), &groups, &dry_run).unwrap_err();

        assert!(matches!(err, DedupError::Plan { group_index: 0, .. }));
        assert!(dry_run.operations().is_empty());
    }

    #[test]
    fn real_run_relinks_and_deletes() {
        let archive = TempDir::new().unwrap();
        let root = archive.path();
        let keep = root.join("2019/04/20190417_133044_537842c8.jpg");
        let second = root.join("2019/04/20190417_151708_537842c8.jpg");
        let stale_link = root.join("origin/trip/20190417_151708_537842c8.jpg");
        fs::create_dir_all(keep.parent().unwrap()).unwrap();
        fs::create_dir_all(stale_link.parent().unwrap()).unwrap();
        fs::write(&keep, b"photo").unwrap();
        fs::write(&second, b"photo").unwrap();
        fs::hard_link(&second, &stale_link).unwrap();

        let groups = vec![vec![keep.clone(), second.clone(), stale_link.clone()]];
        deduplicate_all(root, &groups, &RealFileSystem::new()).unwrap();

        assert!(keep.exists());
        assert!(!second.exists());
        assert!(stale_link.exists());
        #[cfg(unix)]
        {
            use std::os::unix::fs::MetadataExt;
            assert_eq!(
                fs::metadata(&stale_link).unwrap().ino(),
                fs::metadata(&keep).unwrap().ino()
            );
        }

        // A second run over the same group is a no-op
        let groups = vec![vec![keep.clone(), stale_link.clone()]];
        deduplicate_all(root, &groups, &RealFileSystem::new()).unwrap();
        assert!(keep.exists());
        assert!(stale_link.exists());
    }

    #[test]
    fn repeated_paths_never_delete_the_kept_file() {
        let archive = TempDir::new().unwrap();
        let root = archive.path();
        let keep = root.join("2019/04/20190417_133044_537842c8.jpg");
        let all_link = root.join("all/20190417_133044_537842c8.jpg");
        fs::create_dir_all(keep.parent().unwrap()).unwrap();
        fs::create_dir_all(all_link.parent().unwrap()).unwrap();
        fs::write(&keep, b"photo").unwrap();
        fs::hard_link(&keep, &all_link).unwrap();

        let respelled = root.join("x/../2019/04/20190417_133044_537842c8.jpg");
        let groups = vec![vec![
            keep.clone(),
            keep.clone(),
            respelled,
            all_link.clone(),
            all_link.clone(),
        ]];
        let summary = deduplicate_all(root, &groups, &RealFileSystem::new()).unwrap();

        assert_eq!(summary.files_deleted, 0);
        assert_eq!(summary.links_recreated, 1);
        assert!(keep.is_file());
        assert!(all_link.is_file());
    }
}
