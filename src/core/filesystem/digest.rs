//! Single-pass copy with SHA-224 content digest.

use super::ContentDigest;
use crate::error::FileSystemError;
use sha2::{Digest, Sha224};
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, Read, Write};
use std::path::Path;

const BUFFER_SIZE: usize = 64 * 1024;

/// Copy `src` to `dst`, hashing the bytes as they are written.
///
/// `dst` is created or truncated. Permissions and modification time of
/// the source are carried over. The source is read exactly once.
pub fn copy_with_digest(src: &Path, dst: &Path) -> Result<ContentDigest, FileSystemError> {
    let copy_error = |source: io::Error| FileSystemError::Copy {
        from: src.to_path_buf(),
        to: dst.to_path_buf(),
        source,
    };

    let metadata = fs::metadata(src).map_err(copy_error)?;
    if metadata.is_dir() {
        return Err(copy_error(io::Error::new(
            io::ErrorKind::InvalidInput,
            "source is a directory",
        )));
    }

    let mut reader = BufReader::new(File::open(src).map_err(copy_error)?);
    let mut writer = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(dst)
        .map_err(copy_error)?;

    let digest = pump(&mut reader, Some(&mut writer)).map_err(copy_error)?;

    writer.sync_all().map_err(copy_error)?;
    if let Ok(modified) = metadata.modified() {
        writer.set_modified(modified).map_err(copy_error)?;
    }
    writer
        .set_permissions(metadata.permissions())
        .map_err(copy_error)?;

    Ok(digest)
}

/// Digest a file without writing anything
pub fn digest_file(path: &Path) -> Result<ContentDigest, FileSystemError> {
    let read_error = |source: io::Error| FileSystemError::Stat {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = BufReader::new(File::open(path).map_err(read_error)?);
    pump(&mut reader, None).map_err(read_error)
}

fn pump<R: Read>(reader: &mut R, mut writer: Option<&mut File>) -> io::Result<ContentDigest> {
    let mut hasher = Sha224::new();
    let mut buffer = vec![0u8; BUFFER_SIZE];

    loop {
        let bytes_read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buffer[..bytes_read]);
        if let Some(ref mut w) = writer {
            w.write_all(&buffer[..bytes_read])?;
        }
    }

    Ok(ContentDigest::from_bytes(hasher.finalize().to_vec()))
}
