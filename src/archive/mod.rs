//! Archive extraction
//!
//! This module handles:
//! - Allocating collision-free scratch directories (see [`scratch`])
//! - Unpacking one zip archive into a scratch directory
//! - Reporting the manifest of extracted files
//!
//! Extraction never writes outside the scratch directory: entries whose names are
//! absolute or climb out with `..` are skipped.

pub mod scratch;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::domain::Manifest;
use crate::error::{Result, archive, fs as fs_error};

pub use scratch::allocate_scratch;

/// Result of unpacking one archive
#[derive(Debug)]
pub struct Extraction {
    /// Directory the archive was unpacked into
    pub root: PathBuf,

    /// Relative paths of extracted files, in archive order
    pub manifest: Manifest,

    /// Entry names that were not written because they would escape the root
    pub skipped: Vec<String>,
}

/// Unpack every entry of `archive_path` into `scratch`
///
/// `scratch` must not exist yet or be empty.
pub fn extract_archive(archive_path: &Path, scratch: &Path) -> Result<Extraction> {
    ensure_fresh(scratch)?;

    let display = archive_path.display().to_string();
    let file = fs::File::open(archive_path).map_err(|e| archive::corrupt(&display, e))?;
    let mut zip = zip::ZipArchive::new(file).map_err(|e| archive::corrupt(&display, e))?;

    let mut entries = Vec::new();
    let mut skipped = Vec::new();

    for i in 0..zip.len() {
        let mut entry = zip
            .by_index(i)
            .map_err(|e| archive::corrupt(&display, format!("entry {i}: {e}")))?;

        let Some(relative) = entry.enclosed_name() else {
            skipped.push(entry.name().to_string());
            continue;
        };

        let output_path = scratch.join(&relative);

        if entry.is_dir() {
            fs::create_dir_all(&output_path)
                .map_err(|e| archive::corrupt(&display, write_reason(&output_path, &e)))?;
            continue;
        }

        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| archive::corrupt(&display, write_reason(parent, &e)))?;
        }

        let mut outfile = fs::File::create(&output_path)
            .map_err(|e| archive::corrupt(&display, write_reason(&output_path, &e)))?;
        io::copy(&mut entry, &mut outfile)
            .map_err(|e| archive::corrupt(&display, write_reason(&output_path, &e)))?;

        entries.push(to_manifest_entry(&relative));
    }

    Ok(Extraction {
        root: scratch.to_path_buf(),
        manifest: Manifest::new(entries),
        skipped,
    })
}

fn ensure_fresh(scratch: &Path) -> Result<()> {
    if scratch.exists() {
        let mut children = fs::read_dir(scratch).map_err(|e| fs_error::read_failed(scratch, e))?;
        if children.next().is_some() {
            return Err(fs_error::write_failed(
                scratch,
                "scratch directory is not empty",
            ));
        }
    } else {
        fs::create_dir_all(scratch).map_err(|e| fs_error::write_failed(scratch, e))?;
    }
    Ok(())
}

fn write_reason(path: &Path, err: &io::Error) -> String {
    format!("cannot write {}: {}", path.display(), err)
}

fn to_manifest_entry(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}


#[cfg(test)]
mod tests {
    use super::test_support::create_test_zip;
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_extract_reports_manifest() {
        let temp = TempDir::new().unwrap();
        let zip_path = create_test_zip(
            temp.path(),
            "Widget.zip",
            &[
                ("src/", b""),
                ("src/app.py", b"print('hi')"),
                ("config.json", b"{}"),
            ],
        );
        let scratch = temp.path().join("scratch");

        let extraction = extract_archive(&zip_path, &scratch).unwrap();

        assert_eq!(
            extraction.manifest.entries(),
            &["src/app.py".to_string(), "config.json".to_string()]
        );
        assert!(extraction.skipped.is_empty());
        assert_eq!(
            fs::read_to_string(scratch.join("src/app.py")).unwrap(),
            "print('hi')"
        );
    }

    #[test]
    fn test_extract_skips_escaping_entries() {
        let temp = TempDir::new().unwrap();
        let zip_path = create_test_zip(
            temp.path(),
            "evil.zip",
            &[("../outside.txt", b"nope"), ("inside.txt", b"ok")],
        );
        let scratch = temp.path().join("scratch");

        let extraction = extract_archive(&zip_path, &scratch).unwrap();

        assert_eq!(extraction.manifest.entries(), &["inside.txt".to_string()]);
        assert_eq!(extraction.skipped, vec!["../outside.txt".to_string()]);
        assert!(!temp.path().join("outside.txt").exists());
    }

    #[test]
    fn test_corrupt_archive_is_reported() {
        let temp = TempDir::new().unwrap();
        let zip_path = temp.path().join("broken.zip");
        fs::write(&zip_path, b"this is not a zip file").unwrap();

        let err = extract_archive(&zip_path, &temp.path().join("scratch")).unwrap_err();
        assert!(matches!(err, crate::error::ModfoldError::ArchiveCorrupt { .. }));
    }

    #[test]
    fn test_missing_archive_is_reported_as_corrupt() {
        let temp = TempDir::new().unwrap();
        let err = extract_archive(&temp.path().join("gone.zip"), &temp.path().join("scratch"))
            .unwrap_err();
        assert!(matches!(err, crate::error::ModfoldError::ArchiveCorrupt { .. }));
    }

    #[test]
    fn test_non_empty_scratch_is_refused() {
        let temp = TempDir::new().unwrap();
        let zip_path = create_test_zip(temp.path(), "a.zip", &[("a.txt", b"a")]);
        let scratch = temp.path().join("scratch");
        fs::create_dir_all(&scratch).unwrap();
        fs::write(scratch.join("leftover"), "x").unwrap();

        assert!(extract_archive(&zip_path, &scratch).is_err());
    }
}
