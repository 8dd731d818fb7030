//! Configuration errors

use super::ModfoldError;

/// Creates a config parse failed error
pub fn parse_failed(path: impl Into<String>, reason: impl Into<String>) -> ModfoldError {
    ModfoldError::ConfigParseFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates an invalid config error
pub fn invalid(message: impl Into<String>) -> ModfoldError {
    ModfoldError::ConfigInvalid {
        message: message.into(),
    }
}
