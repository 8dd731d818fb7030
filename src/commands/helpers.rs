//! Command helper utilities

use std::path::{Path, PathBuf};

use crate::config::settings::SETTINGS_FILE;
use crate::config::{ProjectPaths, Settings};
use crate::error::{ModfoldError, Result};

/// Resolve the project root from the optional argument
///
/// If a root is provided, use it. Otherwise, resolve to the current directory.
/// The result is canonical so that paths derived from it compare reliably.
pub fn resolve_root(root: Option<PathBuf>) -> Result<PathBuf> {
    let root = match root {
        Some(path) => path,
        None => std::env::current_dir().map_err(|e| ModfoldError::IoError {
            message: format!("Failed to get current directory: {e}"),
        })?,
    };

    dunce::canonicalize(&root).map_err(|e| ModfoldError::IoError {
        message: format!("Project root {} is not accessible: {}", root.display(), e),
    })
}

/// Settings and resolved paths for one invocation
pub struct Project {
    pub settings: Settings,
    pub paths: ProjectPaths,
}

impl Project {
    /// Load settings (`config` or `<root>/modfold.yaml`) and resolve paths against `root`
    pub fn load(root: &Path, config: Option<&Path>) -> Result<Self> {
        let settings_path = config.map_or_else(|| root.join(SETTINGS_FILE), Path::to_path_buf);
        let settings = Settings::load(&settings_path)?;
        tracing::debug!("Loaded settings from {}", settings_path.display());

        let paths = ProjectPaths::new(root, &settings);
        Ok(Self { settings, paths })
    }

    /// Point the run at another input directory, relative to the current directory
    pub fn with_input(mut self, input: &Path) -> Result<Self> {
        let absolute = if input.is_absolute() {
            input.to_path_buf()
        } else {
            std::env::current_dir()
                .map_err(|e| ModfoldError::IoError {
                    message: format!("Failed to get current directory: {e}"),
                })?
                .join(input)
        };
        let input = dunce::canonicalize(&absolute).unwrap_or(absolute);

        self.paths = self.paths.with_input(input, &self.settings);
        Ok(self)
    }
}
