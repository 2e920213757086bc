//! # Filesystem Module
//!
//! The only place that mutates the disk.
//!
//! ## Backends
//! - `RealFileSystem` - performs the operations with `std::fs`
//! - `LoggingFileSystem` - logs and records them (dry run)
//!
//! Both the archive algorithm and the deduplication engine take a
//! `Box<dyn FileSystem>`/`&dyn FileSystem`, so a dry run walks exactly
//! the same code path as a real run.

mod digest;
mod logging;
mod real;
mod traits;

pub use digest::{copy_with_digest, digest_file};
pub use logging::LoggingFileSystem;
pub use real::RealFileSystem;
pub use traits::FileSystem;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// SHA-224 digest of a file's content
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentDigest(Vec<u8>);

impl ContentDigest {
    /// Number of hex characters used in canonical file names
    pub const SHORT_LEN: usize = 8;

    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Full lowercase hex representation
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{:02x}", b)).collect()
    }

    /// First eight hex characters, as used in canonical file names
    pub fn short(&self) -> String {
        let mut hex = self.to_hex();
        hex.truncate(Self::SHORT_LEN);
        hex
    }
}

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// A filesystem mutation, as recorded by the dry-run backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum FsOperation {
    Remove { path: PathBuf },
    CreateDirectory { path: PathBuf },
    HardLink { target: PathBuf, link: PathBuf },
    Rename { from: PathBuf, to: PathBuf },
    Copy { from: PathBuf, to: PathBuf },
}

impl fmt::Display for FsOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FsOperation::Remove { path } => write!(f, "will delete file: {}", path.display()),
            FsOperation::CreateDirectory { path } => {
                write!(f, "create directory {}", path.display())
            }
            FsOperation::HardLink { target, link } => {
                write!(f, "link {} to {}", target.display(), link.display())
            }
            FsOperation::Rename { from, to } => {
                write!(f, "rename {} to {}", from.display(), to.display())
            }
            FsOperation::Copy { from, to } => {
                write!(f, "copy {} to {}", from.display(), to.display())
            }
        }
    }
}
