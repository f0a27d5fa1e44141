//! Filesystem path helpers.
//!
//! Pure functions except for `normalize_path`, which reads the working
//! directory for relative paths.

use std::path::{Component, Path, PathBuf};

/// Normalize a file system path to absolute form.
///
/// Relative paths join the working directory; `.` and `..` are resolved
/// lexically. Symlinks are never followed, so a linked file keeps the
/// location it was found at.
pub fn normalize_path(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    normalized
}

/// Render a path with `/` separators regardless of platform.
pub fn to_slash(path: &Path) -> String {
    let text = path.to_string_lossy();
    if std::path::MAIN_SEPARATOR == '/' {
        text.into_owned()
    } else {
        text.replace(std::path::MAIN_SEPARATOR, "/")
    }
}

/// Public name of `path` relative to `root`: `/`-separated with a leading `/`.
///
/// Paths outside `root` fall back to `/<file name>`.
pub fn public_name(path: &Path, root: &Path) -> String {
    let Ok(rel) = path.strip_prefix(root) else {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        return format!("/{file_name}");
    };

    let mut name = String::new();
    for component in rel.components() {
        if let Component::Normal(part) = component {
            name.push('/');
            name.push_str(&part.to_string_lossy());
        }
    }
    if name.is_empty() {
        name.push('/');
    }
    name
}
