//! Scratch directory allocation
//!
//! Each archive is unpacked into its own `extract_<unix-seconds>_<random>` directory.
//! The time component keeps names readable in the journal; the random component keeps
//! rapid or concurrent runs from colliding. The directory is removed when the
//! returned [`TempDir`] is dropped.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use tempfile::TempDir;

use crate::error::{Result, fs};

/// Allocate a fresh, uniquely named scratch directory under `base`
pub fn allocate_scratch(base: &Path) -> Result<TempDir> {
    std::fs::create_dir_all(base).map_err(|e| fs::write_failed(base, e))?;

    let seconds = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();

    tempfile::Builder::new()
        .prefix(&format!("extract_{seconds}_"))
        .tempdir_in(base)
        .map_err(|e| fs::write_failed(base, e))
}
