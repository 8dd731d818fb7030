//! Empty-directory cleanup
//!
//! Walks the project top-down to collect candidates, pruning dependency and VCS
//! directories and modfold's own state directory, then removes empty ones deepest
//! first so parents emptied by their children's removal go too. A few well-known
//! directories are never removed.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::settings::STATE_DIR;
use crate::error::{ModfoldError, fs};
use crate::journal::Journal;

/// Outcome of one cleanup pass
#[derive(Debug, Default)]
pub struct CleanupReport {
    pub removed: Vec<PathBuf>,
    pub failed: Vec<ModfoldError>,
}

/// Remove empty directories under `root`
///
/// `root` itself and everything in `protected` stay; subtrees whose directory name is
/// in `skip_dirs` are not descended into.
pub fn remove_empty_dirs(
    root: &Path,
    protected: &[&Path],
    skip_dirs: &[String],
    journal: &Journal,
) -> CleanupReport {
    journal.info("Cleaning up empty directories");
    let mut report = CleanupReport::default();

    let state_dir = root.join(STATE_DIR);
    let walker = WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .filter_entry(|entry| {
            if !entry.file_type().is_dir() {
                return false;
            }
            let name = entry.file_name().to_string_lossy();
            entry.path() != state_dir && !skip_dirs.iter().any(|skip| name == skip.as_str())
        });

    let mut candidates = Vec::new();
    for entry in walker {
        match entry {
            Ok(entry) => candidates.push(entry.into_path()),
            Err(e) => {
                let path = e.path().unwrap_or(root).to_path_buf();
                journal.warn(format!("Error reading {}: {}", path.display(), e));
                report.failed.push(fs::cleanup_failed(&path, e));
            }
        }
    }

    // Reversed pre-order visits children before their parents
    for path in candidates.iter().rev() {
        let path = path.as_path();
        if protected.contains(&path) {
            continue;
        }

        let is_empty = std::fs::read_dir(path).is_ok_and(|mut children| children.next().is_none());
        if !is_empty {
            continue;
        }

        match std::fs::remove_dir(path) {
            Ok(()) => {
                journal.info(format!("Removed empty directory: {}", path.display()));
                report.removed.push(path.to_path_buf());
            }
            Err(e) => {
                journal.warn(format!("Error removing directory {}: {}", path.display(), e));
                report.failed.push(fs::cleanup_failed(path, e));
            }
        }
    }

    report
}
