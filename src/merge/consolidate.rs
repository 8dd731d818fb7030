//! Batch-level consolidation
//!
//! After every module of a batch is merged, the contents of each distinct destination
//! are overlaid onto the root of one consolidated tree, with the same directory-union
//! and file-overwrite rules as a module merge. `frontend/src` and `backend/src` both
//! land in `consolidated/src`. Destinations are visited in path order, so on a file
//! clash the later path wins.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::common::fs::{CopyOptions, union_dir_recursive};
use crate::journal::Journal;

/// Outcome of one consolidation pass
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConsolidationReport {
    /// Destinations unioned into the consolidated tree
    pub merged: Vec<PathBuf>,

    /// Destinations left out because they overlap the consolidated tree or are gone
    pub skipped: Vec<PathBuf>,

    /// Destinations whose union failed part way
    pub failed: Vec<(PathBuf, String)>,

    pub files_copied: usize,
}

/// Overlay the contents of every destination (relative to `root`) onto `consolidated`
///
/// Failures are journaled per destination and never stop the pass.
pub fn consolidate<'a, I>(
    root: &Path,
    consolidated: &Path,
    destinations: I,
    journal: &Journal,
) -> ConsolidationReport
where
    I: IntoIterator<Item = &'a Path>,
{
    let unique: BTreeSet<&Path> = destinations.into_iter().collect();
    let mut report = ConsolidationReport::default();

    for relative in unique {
        let source = root.join(relative);

        if source.starts_with(consolidated) || consolidated.starts_with(&source) {
            journal.warn(format!(
                "Skipping consolidation of {}: overlaps {}",
                source.display(),
                consolidated.display()
            ));
            report.skipped.push(relative.to_path_buf());
            continue;
        }

        if !source.is_dir() {
            journal.warn(format!(
                "Skipping consolidation of {}: not a directory",
                source.display()
            ));
            report.skipped.push(relative.to_path_buf());
            continue;
        }

        match union_dir_recursive(&source, consolidated, &CopyOptions::default()) {
            Ok(count) => {
                journal.info(format!(
                    "Consolidated {} ({} files) into {}",
                    relative.display(),
                    count.files,
                    consolidated.display()
                ));
                report.files_copied += count.files;
                report.merged.push(relative.to_path_buf());
            }
            Err(e) => {
                journal.warn(format!(
                    "Error consolidating {}: {}",
                    relative.display(),
                    e
                ));
                report.failed.push((relative.to_path_buf(), e.to_string()));
            }
        }
    }

    report
}
