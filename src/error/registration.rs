//! Registration errors

use super::ModfoldError;

/// Creates a registration failed error
pub fn failed(module: impl Into<String>, reason: impl Into<String>) -> ModfoldError {
    ModfoldError::RegistrationFailed {
        module: module.into(),
        reason: reason.into(),
    }
}
