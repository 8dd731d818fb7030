//! Error types and handling for modfold
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! This module is organized into sub-modules by error domain:
//! - [`archive`]: Archive extraction errors
//! - [`merge`]: Tree merge and target resolution errors
//! - [`registration`]: Registry announcement errors
//! - [`config`]: Settings file errors
//! - [`fs`]: File system errors

pub mod archive;
pub mod config;
pub mod fs;
pub mod merge;
pub mod registration;


use miette::Diagnostic;
use thiserror::Error;

/// Main error type for modfold operations
#[derive(Error, Diagnostic, Debug)]
pub enum ModfoldError {
    // Archive errors
    #[error("Archive is corrupt or unreadable: {path}: {reason}")]
    #[diagnostic(
        code(modfold::archive::corrupt),
        help("The archive is left in the input directory so it can be retried")
    )]
    ArchiveCorrupt { path: String, reason: String },

    #[error("Cannot read input directory: {path}: {reason}")]
    #[diagnostic(
        code(modfold::archive::input_unreadable),
        help("Check that the input directory exists and is readable, or pass --input")
    )]
    InputDirUnreadable { path: String, reason: String },

    // Merge errors
    #[error("Failed to merge into {path}: {reason}")]
    #[diagnostic(code(modfold::merge::conflict))]
    MergeConflict { path: String, reason: String },

    #[error("Invalid target path '{target}': {reason}")]
    #[diagnostic(
        code(modfold::merge::invalid_target),
        help("Declared paths must be relative and stay inside their root")
    )]
    InvalidTarget { target: String, reason: String },

    #[error("Failed to lock destination {path}: {reason}")]
    #[diagnostic(code(modfold::merge::lock_failed))]
    DestinationLockFailed { path: String, reason: String },

    // Registration errors
    #[error("Registration of module '{module}' failed: {reason}")]
    #[diagnostic(
        code(modfold::registration::failed),
        help("Both the registry request and the local manifest fallback failed")
    )]
    RegistrationFailed { module: String, reason: String },

    // Cleanup errors
    #[error("Failed to remove empty directory {path}: {reason}")]
    #[diagnostic(code(modfold::cleanup::failed))]
    CleanupFailed { path: String, reason: String },

    // Configuration errors
    #[error("Failed to parse configuration file: {path}: {reason}")]
    #[diagnostic(code(modfold::config::parse_failed))]
    ConfigParseFailed { path: String, reason: String },

    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(modfold::config::invalid))]
    ConfigInvalid { message: String },

    // File system errors
    #[error("Failed to read file: {path}: {reason}")]
    #[diagnostic(code(modfold::fs::read_failed))]
    FileReadFailed { path: String, reason: String },

    #[error("Failed to write file: {path}: {reason}")]
    #[diagnostic(code(modfold::fs::write_failed))]
    FileWriteFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(modfold::fs::io_error))]
    IoError { message: String },
}

impl From<std::io::Error> for ModfoldError {
    fn from(err: std::io::Error) -> Self {
        ModfoldError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for ModfoldError {
    fn from(err: serde_yaml::Error) -> Self {
        ModfoldError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for ModfoldError {
    fn from(err: serde_json::Error) -> Self {
        ModfoldError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, ModfoldError>;
