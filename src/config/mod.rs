//! Configuration file handling for modfold
//!
//! This module contains data structures for:
//! - `modfold.yaml` - Project settings (directories, layout, registry, cleanup)
//! - `config.json` - Sidecar descriptor bundled inside a module archive

pub mod settings;
pub mod sidecar;

// Re-export commonly used types
pub use settings::{ProjectPaths, Settings};
pub use sidecar::{DeclaredConfig, SIDECAR_FILE};
