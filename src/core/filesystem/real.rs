//! Filesystem backend that performs real disk operations.

use super::{digest, ContentDigest, FileSystem};
use crate::error::FileSystemError;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

/// `std::fs` backed filesystem
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFileSystem;

impl RealFileSystem {
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for RealFileSystem {
    fn ensure_absent(&self, path: &Path) -> Result<(), FileSystemError> {
        match fs::remove_file(path) {
            Ok(()) => {
                debug!(path = %path.display(), "removed file");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(FileSystemError::Remove {
                path: path.to_path_buf(),
                source: e,
            }),
        }
    }

    fn ensure_directory(&self, path: &Path) -> Result<(), FileSystemError> {
        fs::create_dir_all(path).map_err(|e| FileSystemError::CreateDirectory {
            path: path.to_path_buf(),
            source: e,
        })
    }

    fn hard_link(&self, target: &Path, link: &Path) -> Result<(), FileSystemError> {
        fs::hard_link(target, link).map_err(|e| FileSystemError::HardLink {
            target: target.to_path_buf(),
            link: link.to_path_buf(),
            source: e,
        })?;
        debug!(target = %target.display(), link = %link.display(), "linked");
        Ok(())
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<(), FileSystemError> {
        fs::rename(from, to).map_err(|e| FileSystemError::Rename {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
            source: e,
        })
    }

    fn copy_with_digest(&self, src: &Path, dst: &Path) -> Result<ContentDigest, FileSystemError> {
        digest::copy_with_digest(src, dst)
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
