//! File system errors

use std::path::Path;

use super::ModfoldError;

/// Creates a file read failed error
pub fn read_failed(path: &Path, reason: impl ToString) -> ModfoldError {
    ModfoldError::FileReadFailed {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}

/// Creates a file write failed error
pub fn write_failed(path: &Path, reason: impl ToString) -> ModfoldError {
    ModfoldError::FileWriteFailed {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}

/// Creates a cleanup failed error
pub fn cleanup_failed(path: &Path, reason: impl ToString) -> ModfoldError {
    ModfoldError::CleanupFailed {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}
