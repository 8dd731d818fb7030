//! Path utilities for declared and generated destinations
//!
//! Archive authors supply relative paths in the sidecar (target directory, file
//! mapping entries, post-integration scripts). Those paths are only ever joined onto
//! a known root, so they must be relative and must not climb out of it.

use std::path::{Component, Path, PathBuf};

use crate::error::{Result, merge};

/// Validate that `declared` is a non-empty relative path that stays inside its root
///
/// `.` components are dropped; `..`, root and prefix components are rejected.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(relative_within("custom/./path")?, PathBuf::from("custom/path"));
/// assert!(relative_within("../elsewhere").is_err());
/// ```
pub fn relative_within(declared: &str) -> Result<PathBuf> {
    let mut clean = PathBuf::new();

    for component in Path::new(declared).components() {
        match component {
            Component::Normal(part) => clean.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                return Err(merge::invalid_target(declared, "climbs out of its root"));
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(merge::invalid_target(declared, "must be a relative path"));
            }
        }
    }

    if clean.as_os_str().is_empty() {
        return Err(merge::invalid_target(declared, "path is empty"));
    }

    Ok(clean)
}

/// Convert path to string with forward slashes
pub fn to_forward_slashes(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_paths_pass() {
        assert_eq!(
            relative_within("custom/path").unwrap(),
            PathBuf::from("custom/path")
        );
        assert_eq!(
            relative_within("./custom/./path/").unwrap(),
            PathBuf::from("custom/path")
        );
    }

    #[test]
    fn test_escaping_paths_fail() {
        assert!(relative_within("../outside").is_err());
        assert!(relative_within("a/../../b").is_err());
        assert!(relative_within("/etc/passwd").is_err());
    }

    #[test]
    fn test_empty_paths_fail() {
        assert!(relative_within("").is_err());
        assert!(relative_within(".").is_err());
    }

    #[test]
    fn test_to_forward_slashes() {
        assert_eq!(to_forward_slashes(Path::new("a/b/c")), "a/b/c");
    }
}
