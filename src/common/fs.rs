//! Common file system operations for tree merging

use std::fs;
use std::path::Path;

/// Options for [`union_dir_recursive`]
#[derive(Default, Clone)]
pub struct CopyOptions {
    /// Top-level entry names skipped, compared case-insensitively
    pub exclude: Vec<String>,

    /// Absolute paths never descended into (e.g. the destination nested in the source)
    pub skip_paths: Vec<std::path::PathBuf>,
}

impl CopyOptions {
    pub fn excluding<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            exclude: names.into_iter().map(Into::into).collect(),
            skip_paths: Vec::new(),
        }
    }

    fn is_excluded(&self, name: &str) -> bool {
        self.exclude
            .iter()
            .any(|excluded| excluded.eq_ignore_ascii_case(name))
    }
}

/// Count of entries written by a union
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CopyCount {
    pub files: usize,
    pub dirs_created: usize,
}

impl std::ops::AddAssign for CopyCount {
    fn add_assign(&mut self, other: Self) {
        self.files += other.files;
        self.dirs_created += other.dirs_created;
    }
}

/// Union `src` into `dst` recursively
///
/// Directories present on both sides are merged, never replaced; files from `src`
/// overwrite same-named files in `dst`. Nothing only present in `dst` is removed.
/// Exclusions apply to the top level of `src` only.
pub fn union_dir_recursive<P1, P2>(
    src: P1,
    dst: P2,
    options: &CopyOptions,
) -> std::io::Result<CopyCount>
where
    P1: AsRef<Path>,
    P2: AsRef<Path>,
{
    union_level(src.as_ref(), dst.as_ref(), options, true)
}

fn union_level(
    src: &Path,
    dst: &Path,
    options: &CopyOptions,
    top_level: bool,
) -> std::io::Result<CopyCount> {
    let mut count = CopyCount::default();

    if !dst.exists() {
        fs::create_dir_all(dst)?;
        count.dirs_created += 1;
    }

    let mut entries = fs::read_dir(src)?.collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(fs::DirEntry::file_name);

    for entry in entries {
        let entry_path = entry.path();
        let file_name = entry.file_name();

        if top_level && options.is_excluded(&file_name.to_string_lossy()) {
            continue;
        }
        if options.skip_paths.iter().any(|skip| skip == &entry_path) {
            continue;
        }

        let dst_path = dst.join(&file_name);

        if entry.file_type()?.is_dir() {
            count += union_level(&entry_path, &dst_path, options, false)?;
        } else {
            copy_file(&entry_path, &dst_path)?;
            count.files += 1;
        }
    }

    Ok(count)
}

/// Copy one file, creating the destination's parent directories
///
/// A directory standing where the file should go is an error, not replaced.
pub fn copy_file(src: &Path, dst: &Path) -> std::io::Result<()> {
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent)?;
    }
    if dst.is_dir() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            format!("{} is a directory", dst.display()),
        ));
    }
    fs::copy(src, dst)?;
    Ok(())
}
