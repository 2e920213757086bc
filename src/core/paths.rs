//! Lexical path helpers.
//!
//! Nothing here touches the disk: paths are compared as written, after
//! collapsing `.` and `..` components.

use std::io;
use std::path::{Component, Path, PathBuf};

/// Collapse `.` and `..` components without resolving symlinks.
///
/// Leading `..` components of a relative path are kept.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                // ".." directly below the root stays at the root
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }

    out.iter().collect()
}

/// Absolute, normalized form of `path`, resolved against the current directory.
///
/// Symlinks are not followed and `path` need not exist.
pub fn absolute(path: &Path) -> io::Result<PathBuf> {
    Ok(normalize(&std::path::absolute(path)?))
}

/// Path of `path` relative to `root`, or `None` if it escapes `root`.
///
/// Both paths must be of the same kind (both absolute or both relative).
/// `path == root` yields an empty path.
pub fn relative_within(root: &Path, path: &Path) -> Option<PathBuf> {
    let root = normalize(root);
    let path = normalize(path);

    let relative = path.strip_prefix(&root).ok()?;
    if matches!(relative.components().next(), Some(Component::ParentDir)) {
        return None;
    }
    Some(relative.to_path_buf())
}
