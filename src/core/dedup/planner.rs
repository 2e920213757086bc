//! Plans which copy of a duplicate group survives.

use super::types::DedupTask;
use crate::core::paths;
use crate::error::DedupError;
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

/// Plan the deduplication of one group of equivalent files.
///
/// All paths must lie within `archive_root`. The lexically first file in
/// a `YEAR/MM` calendar directory is kept; every other calendar copy is
/// deleted. Outside the calendar tree at most one file per directory
/// survives and is relinked to the kept file. Repeated entries, including
/// spellings that normalize to the same path, are planned once.
pub fn deduplicate(archive_root: &Path, duplicates: &[PathBuf]) -> Result<DedupTask, DedupError> {
    if duplicates.is_empty() {
        return Err(DedupError::EmptyGroup);
    }

    // Containment is checked for every path before anything is classified
    let mut located = duplicates
        .iter()
        .map(|path| {
            paths::relative_within(archive_root, path)
                .map(|relative| (path.clone(), relative))
                .ok_or_else(|| DedupError::OutsideArchive {
                    path: path.clone(),
                    archive_root: archive_root.to_path_buf(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    located.sort_by(|(a, _), (b, _)| a.as_os_str().cmp(b.as_os_str()));

    let mut to_keep: Option<PathBuf> = None;
    let mut recreate_links = Vec::new();
    let mut delete_files = Vec::new();
    let mut seen_dirs: HashSet<PathBuf> = HashSet::new();
    let mut handled: HashSet<PathBuf> = HashSet::new();

    for (path, relative) in located {
        // The same file listed twice must not be deleted as its own duplicate
        if !handled.insert(relative.clone()) {
            continue;
        }

        if is_calendar_stored(&relative) {
            if to_keep.is_none() {
                to_keep = Some(path);
            } else {
                delete_files.push(path);
            }
            continue;
        }

        let dir = relative.parent().unwrap_or(Path::new("")).to_path_buf();
        if seen_dirs.insert(dir) {
            recreate_links.push(path);
        } else {
            delete_files.push(path);
        }
    }

    let to_keep = to_keep.ok_or_else(|| DedupError::NoCanonicalCopy {
        count: duplicates.len(),
        first: duplicates[0].clone(),
    })?;

    Ok(DedupTask {
        to_keep,
        recreate_links,
        delete_files,
    })
}

/// Whether an archive-relative path has the `DDDD/DD/<name>` shape
pub fn is_calendar_stored(relative: &Path) -> bool {
    let parts: Vec<&str> = match relative
        .components()
        .map(|c| match c {
            Component::Normal(name) => name.to_str(),
            _ => None,
        })
        .collect::<Option<Vec<_>>>()
    {
        Some(parts) => parts,
        None => return false,
    };

    match parts.as_slice() {
        [year, month, name] => all_digits(year, 4) && all_digits(month, 2) && !name.is_empty(),
        _ => false,
    }
}

fn all_digits(s: &str, len: usize) -> bool {
    s.len() == len && s.bytes().all(|b| b.is_ascii_digit())
}
