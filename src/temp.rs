//! Absolute temp base for scratch directories that live outside the project
//! (e.g. `modfold inspect`), so nothing lands under the current working directory
//! when TMPDIR is relative.

use std::env;
use std::path::PathBuf;

/// Returns a directory path suitable for creating temporary directories.
/// Never returns a relative path.
pub fn temp_dir_base() -> PathBuf {
    let t = env::temp_dir();
    if t.is_absolute() {
        t
    } else {
        #[cfg(windows)]
        {
            env::var("TEMP")
                .or_else(|_| env::var("TMP"))
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("C:\\Windows\\Temp"))
        }
        #[cfg(not(windows))]
        {
            PathBuf::from("/tmp")
        }
    }
}

/// Base for scratch directories not tied to a project
pub fn scratch_base() -> PathBuf {
    temp_dir_base().join("modfold")
}
