//! Conversion between git's forward-slash paths and host paths
//!
//! Git always stores paths with `/`. Everything handed back to callers uses
//! the host separator instead.

use std::path::{Component, MAIN_SEPARATOR, MAIN_SEPARATOR_STR, Path, PathBuf};

/// Convert a git tree path (`a/b.txt`) to the host convention
pub fn to_host_path(git_path: &str) -> String {
    if MAIN_SEPARATOR == '/' {
        git_path.to_string()
    } else {
        git_path.replace('/', MAIN_SEPARATOR_STR)
    }
}

/// Convert a repository-relative host path to git's `/`-joined form
pub fn to_git_path(path: &Path) -> String {
    path.components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// `path` expressed relative to `base`, climbing with `..` where needed.
///
/// Both must be absolute. Returns `None` when they share no root, such as
/// different drives on Windows.
pub fn relative_to(path: &Path, base: &Path) -> Option<PathBuf> {
    let mut path_parts = path.components().peekable();
    let mut base_parts = base.components().peekable();

    match (path_parts.peek(), base_parts.peek()) {
        (Some(Component::Prefix(a)), Some(Component::Prefix(b))) if a != b => return None,
        _ => {}
    }

    while let (Some(a), Some(b)) = (path_parts.peek(), base_parts.peek()) {
        if a != b {
            break;
        }
        path_parts.next();
        base_parts.next();
    }

    let mut relative: PathBuf = base_parts.map(|_| Component::ParentDir).collect();
    relative.extend(path_parts);
    if relative.as_os_str().is_empty() {
        relative.push(".");
    }
    Some(relative)
}
