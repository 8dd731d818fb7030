//! BLAKE3 hashing utilities for archives and merged trees

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use blake3::Hasher;

use crate::error::{Result, fs};

/// Hash prefix for BLAKE3 hashes
pub const HASH_PREFIX: &str = "blake3:";

fn update_from_file(hasher: &mut Hasher, path: &Path) -> Result<()> {
    let file = File::open(path).map_err(|e| fs::read_failed(path, e))?;

    let mut reader = BufReader::new(file);
    let mut buffer = [0u8; 8192];

    loop {
        let bytes_read = reader
            .read(&mut buffer)
            .map_err(|e| fs::read_failed(path, e))?;

        if bytes_read == 0 {
            break;
        }

        hasher.update(&buffer[..bytes_read]);
    }

    Ok(())
}

/// Calculate BLAKE3 hash of a file
pub fn hash_file(path: &Path) -> Result<String> {
    let mut hasher = Hasher::new();
    update_from_file(&mut hasher, path)?;
    Ok(format!("{}{}", HASH_PREFIX, hasher.finalize().to_hex()))
}

/// Whether two files have identical content
pub fn same_content(a: &Path, b: &Path) -> Result<bool> {
    let (meta_a, meta_b) = (
        std::fs::metadata(a).map_err(|e| fs::read_failed(a, e))?,
        std::fs::metadata(b).map_err(|e| fs::read_failed(b, e))?,
    );
    if meta_a.len() != meta_b.len() {
        return Ok(false);
    }
    Ok(hash_file(a)? == hash_file(b)?)
}

/// Calculate BLAKE3 hash of a directory's contents
///
/// Hashes relative paths and contents of all files recursively, sorted by path,
/// so two trees hash equal exactly when they hold the same files.
#[cfg(test)]
pub fn hash_directory(path: &Path) -> Result<String> {
    if !path.is_dir() {
        return Err(fs::read_failed(path, "not a directory"));
    }

    let mut hasher = Hasher::new();
    let mut files: Vec<_> = walkdir::WalkDir::new(path)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|e| e.file_type().is_file())
        .collect();

    files.sort_by_key(|e| e.path().to_path_buf());

    for entry in files {
        let file_path = entry.path();

        let relative_path = file_path
            .strip_prefix(path)
            .unwrap_or(file_path)
            .to_string_lossy()
            .replace('\\', "/");
        hasher.update(relative_path.as_bytes());
        hasher.update(b"\0");

        update_from_file(&mut hasher, file_path)?;

        hasher.update(b"\0");
    }

    Ok(format!("{}{}", HASH_PREFIX, hasher.finalize().to_hex()))
}
