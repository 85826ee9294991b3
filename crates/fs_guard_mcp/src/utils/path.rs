use std::io;
use std::path::{Component, Path, PathBuf};

/// Expand a leading `~` to the user's home directory.
///
/// Only the bare `~` and `~/...` forms are expanded; `~user` forms and
/// tildes elsewhere in the path are left untouched. When no home directory
/// is known the input is returned as-is.
pub fn expand_home(path: &str) -> String {
    if let Some(rest) = path.strip_prefix('~')
        && (rest.is_empty() || rest.starts_with('/') || rest.starts_with('\\'))
        && let Some(home) = dirs::home_dir()
    {
        return format!("{}{}", home.to_string_lossy(), rest);
    }
    path.to_string()
}

/// Lexically resolve `.` and `..` segments.
///
/// Pure string work, no filesystem access: symlinks are left alone (that is
/// canonicalization's job) and `..` at the root stays at the root.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
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

/// Resolve a path against the process current directory and normalize it.
///
/// The result is always absolute; the path itself need not exist.
pub fn absolutize(path: &Path) -> io::Result<PathBuf> {
    if path.is_absolute() {
        Ok(normalize_path(path))
    } else {
        let cwd = std::env::current_dir()?;
        Ok(normalize_path(&cwd.join(path)))
    }
}

/// Check whether a path is contained in at least one allowed directory.
///
/// Containment is decided on whole path components (`Path::starts_with`):
/// a path is contained when it equals an allowed directory or has one as a
/// proper ancestor. A raw string-prefix test would let an allow-list entry
/// `/home/user` admit `/home/user2`; this check does not.
///
/// Purely lexical: callers canonicalize whichever form of the path they
/// mean to judge before asking.
pub fn is_path_within_allowed_directories(path: &Path, allowed_directories: &[PathBuf]) -> bool {
    allowed_directories
        .iter()
        .any(|allowed| path.starts_with(allowed))
}
