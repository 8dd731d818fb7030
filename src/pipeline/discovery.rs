//! Archive discovery in the input directory

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, archive};

/// List archives directly inside `input_dir`, sorted by file name
///
/// Non-recursive; the extension is matched case-insensitively. A missing input
/// directory is created and yields an empty batch.
pub fn find_archives(input_dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let input_display = input_dir.display().to_string();

    if !input_dir.exists() {
        fs::create_dir_all(input_dir).map_err(|e| archive::input_unreadable(&input_display, e))?;
        tracing::info!("Created input directory {}", input_display);
        return Ok(Vec::new());
    }

    let entries = fs::read_dir(input_dir).map_err(|e| archive::input_unreadable(&input_display, e))?;

    let mut archives = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| archive::input_unreadable(&input_display, e))?;
        let path = entry.path();
        if path.is_file() && has_extension(&path, extension) {
            archives.push(path);
        }
    }

    archives.sort();
    Ok(archives)
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case(extension))
}
