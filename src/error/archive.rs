//! Archive extraction errors

use super::ModfoldError;

/// Creates an archive corrupt error
pub fn corrupt(path: impl Into<String>, reason: impl ToString) -> ModfoldError {
    ModfoldError::ArchiveCorrupt {
        path: path.into(),
        reason: reason.to_string(),
    }
}

/// Creates an input directory unreadable error
pub fn input_unreadable(path: impl Into<String>, reason: impl ToString) -> ModfoldError {
    ModfoldError::InputDirUnreadable {
        path: path.into(),
        reason: reason.to_string(),
    }
}
