//! Dry-run filesystem backend.

use super::{digest, ContentDigest, FileSystem, FsOperation};
use crate::error::FileSystemError;
use std::fs;
use std::path::Path;
use std::sync::Mutex;
use tracing::info;

/// Filesystem that logs intended mutations instead of performing them.
///
/// Reads are still served from disk so that a dry run computes the same
/// canonical names as a real one.
#[derive(Debug, Default)]
pub struct LoggingFileSystem {
    operations: Mutex<Vec<FsOperation>>,
}

impl LoggingFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// All operations recorded so far, in call order
    pub fn operations(&self) -> Vec<FsOperation> {
        self.operations
            .lock()
            .map(|ops| ops.clone())
            .unwrap_or_default()
    }

    fn record(&self, operation: FsOperation) {
        info!("[DRY-RUN] {}", operation);
        if let Ok(mut ops) = self.operations.lock() {
            ops.push(operation);
        }
    }
}

impl FileSystem for LoggingFileSystem {
    fn ensure_absent(&self, path: &Path) -> Result<(), FileSystemError> {
        self.record(FsOperation::Remove {
            path: path.to_path_buf(),
        });
        Ok(())
    }

    fn ensure_directory(&self, path: &Path) -> Result<(), FileSystemError> {
        self.record(FsOperation::CreateDirectory {
            path: path.to_path_buf(),
        });
        Ok(())
    }

    fn hard_link(&self, target: &Path, link: &Path) -> Result<(), FileSystemError> {
        self.record(FsOperation::HardLink {
            target: target.to_path_buf(),
            link: link.to_path_buf(),
        });
        Ok(())
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<(), FileSystemError> {
        self.record(FsOperation::Rename {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
        });
        Ok(())
    }

    fn copy_with_digest(&self, src: &Path, dst: &Path) -> Result<ContentDigest, FileSystemError> {
        let digest = digest::digest_file(src)?;
        self.record(FsOperation::Copy {
            from: src.to_path_buf(),
            to: dst.to_path_buf(),
        });
        Ok(digest)
    }

    fn file_size(&self, path: &Path) -> Result<u64, FileSystemError> {
        fs::metadata(path)
            .map(|m| m.len())
            .map_err(|e| FileSystemError::Stat {
                path: path.to_path_buf(),
                source: e,
            })
    }
}
