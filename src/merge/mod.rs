//! Tree merging
//!
//! Copies an extracted module into its destination. Two modes:
//! - direct: every top-level entry except metadata files is unioned into the destination
//! - mapped: only the entries named in the sidecar's `file_mapping` are copied
//!
//! In both modes directories are unioned and files overwritten, so re-running a merge
//! never loses files that only the destination had. The batch-level union of all
//! destinations lives in [`consolidate`].

pub mod consolidate;

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use crate::common::fs::{CopyCount, CopyOptions, copy_file, union_dir_recursive};
use crate::config::SIDECAR_FILE;
use crate::error::{Result, merge};
use crate::journal::Journal;
use crate::path_utils::relative_within;

pub use consolidate::{ConsolidationReport, consolidate};

/// Top-level files never copied in direct mode
pub const METADATA_FILES: &[&str] = &[SIDECAR_FILE, "readme.md", "readme.txt"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeMode {
    Direct,
    Mapped,
}

impl fmt::Display for MergeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergeMode::Direct => f.write_str("direct"),
            MergeMode::Mapped => f.write_str("mapped"),
        }
    }
}

/// What a merge wrote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeStats {
    pub mode: MergeMode,
    pub files_copied: usize,
    pub dirs_created: usize,

    /// Mapping sources absent from the archive
    pub missing_sources: Vec<String>,
}

impl MergeStats {
    fn new(mode: MergeMode) -> Self {
        Self {
            mode,
            files_copied: 0,
            dirs_created: 0,
            missing_sources: Vec::new(),
        }
    }

    fn add(&mut self, count: CopyCount) {
        self.files_copied += count.files;
        self.dirs_created += count.dirs_created;
    }
}

/// Merge an extracted module at `source` into `destination`
///
/// A non-empty `mapping` selects mapped mode. Any copy failure aborts the merge with
/// [`crate::error::ModfoldError::MergeConflict`]; whatever was already copied stays.
pub fn merge_module(
    source: &Path,
    destination: &Path,
    mapping: &BTreeMap<String, String>,
    journal: &Journal,
) -> Result<MergeStats> {
    if !destination.exists() {
        std::fs::create_dir_all(destination).map_err(|e| merge::conflict(destination, e))?;
        journal.info(format!(
            "Created target directory: {}",
            destination.display()
        ));
    }

    if mapping.is_empty() {
        merge_direct(source, destination, journal)
    } else {
        merge_mapped(source, destination, mapping, journal)
    }
}

fn merge_direct(source: &Path, destination: &Path, journal: &Journal) -> Result<MergeStats> {
    let mut stats = MergeStats::new(MergeMode::Direct);
    let options = CopyOptions::excluding(METADATA_FILES.iter().copied());

    let count = union_dir_recursive(source, destination, &options)
        .map_err(|e| merge::conflict(destination, e))?;
    stats.add(count);

    journal.info(format!(
        "Copied {} files to {}",
        stats.files_copied,
        destination.display()
    ));
    Ok(stats)
}

fn merge_mapped(
    source: &Path,
    destination: &Path,
    mapping: &BTreeMap<String, String>,
    journal: &Journal,
) -> Result<MergeStats> {
    let mut stats = MergeStats::new(MergeMode::Mapped);

    for (from, to) in mapping {
        let source_path = source.join(relative_within(from)?);
        let dest_path = destination.join(relative_within(to)?);

        if !source_path.exists() {
            journal.warn(format!("Mapping source not found in archive: {from}"));
            stats.missing_sources.push(from.clone());
            continue;
        }

        if source_path.is_dir() {
            let count = union_dir_recursive(&source_path, &dest_path, &CopyOptions::default())
                .map_err(|e| merge::conflict(&dest_path, e))?;
            stats.add(count);
        } else {
            copy_file(&source_path, &dest_path).map_err(|e| merge::conflict(&dest_path, e))?;
            stats.files_copied += 1;
        }

        journal.info(format!("Mapped {from} -> {to}"));
    }

    Ok(stats)
}
