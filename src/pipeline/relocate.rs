//! Relocation of processed archives
//!
//! Archives are never deleted: a successfully integrated archive moves into the
//! processed store. A same-named archive already there is replaced only when its
//! content is identical; otherwise the incoming one gets a numeric suffix.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, fs as fs_error};
use crate::hash::same_content;

/// Move `archive` into `processed_dir`, returning its new path
pub fn relocate_archive(archive: &Path, processed_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(processed_dir).map_err(|e| fs_error::write_failed(processed_dir, e))?;

    let file_name = archive
        .file_name()
        .ok_or_else(|| fs_error::read_failed(archive, "archive path has no file name"))?;
    let preferred = processed_dir.join(file_name);

    let target = if !preferred.exists() || same_content(archive, &preferred)? {
        preferred
    } else {
        free_suffixed_name(&preferred)
    };

    move_file(archive, &target)?;
    Ok(target)
}

fn free_suffixed_name(preferred: &Path) -> PathBuf {
    let stem = preferred
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let extension = preferred
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    (1..)
        .map(|n| preferred.with_file_name(format!("{stem}-{n}{extension}")))
        .find(|candidate| !candidate.exists())
        .unwrap_or_else(|| preferred.to_path_buf())
}

fn move_file(from: &Path, to: &Path) -> Result<()> {
    if fs::rename(from, to).is_ok() {
        return Ok(());
    }

    // rename fails across devices
    fs::copy(from, to).map_err(|e| fs_error::write_failed(to, e))?;
    fs::remove_file(from).map_err(|e| fs_error::write_failed(from, e))?;
    Ok(())
}
