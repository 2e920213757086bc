//! Filesystem backend trait definition.

use super::ContentDigest;
use crate::error::FileSystemError;
use std::path::Path;

/// Trait for filesystem backends
///
/// Every disk mutation performed by the archive goes through this trait,
/// so swapping the real backend for a logging one gives a dry run with
/// identical control flow.
pub trait FileSystem: Send + Sync {
    /// Remove a file. A file that is already absent is not an error.
    fn ensure_absent(&self, path: &Path) -> Result<(), FileSystemError>;

    /// Create a directory and all of its parents. Idempotent.
    fn ensure_directory(&self, path: &Path) -> Result<(), FileSystemError>;

    /// Create a hard link at `link` pointing to the inode of `target`
    fn hard_link(&self, target: &Path, link: &Path) -> Result<(), FileSystemError>;

    /// Rename a file within the same filesystem
    fn rename(&self, from: &Path, to: &Path) -> Result<(), FileSystemError>;

    /// Copy `src` to `dst` while hashing the copied bytes in the same pass
    fn copy_with_digest(&self, src: &Path, dst: &Path) -> Result<ContentDigest, FileSystemError>;

    /// Size of a file in bytes
    fn file_size(&self, path: &Path) -> Result<u64, FileSystemError>;

    /// Make every path in `paths` a hard link to `target`.
    ///
    /// Existing files are removed first (unlink-then-link), and missing
    /// parent directories are created.
    fn create_links(&self, paths: &[&Path], target: &Path) -> Result<(), FileSystemError> {
        for path in paths {
            self.ensure_absent(path)?;
            if let Some(parent) = path.parent() {
                self.ensure_directory(parent)?;
            }
            self.hard_link(target, path)?;
        }
        Ok(())
    }

    /// Whether two files have the same size
    fn equal_size(&self, a: &Path, b: &Path) -> Result<bool, FileSystemError> {
        Ok(self.file_size(a)? == self.file_size(b)?)
    }
}
