//! Merge and target resolution errors

use std::path::Path;

use super::ModfoldError;

/// Creates a merge conflict error for a destination path
pub fn conflict(path: &Path, reason: impl ToString) -> ModfoldError {
    ModfoldError::MergeConflict {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}

/// Creates an invalid target error
pub fn invalid_target(target: impl Into<String>, reason: impl Into<String>) -> ModfoldError {
    ModfoldError::InvalidTarget {
        target: target.into(),
        reason: reason.into(),
    }
}

/// Creates a destination lock error
pub fn lock_failed(path: &Path, reason: impl ToString) -> ModfoldError {
    ModfoldError::DestinationLockFailed {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}
