//! Project settings (modfold.yaml) data structures
//!
//! Every field has a default, so a project without a settings file runs with the
//! conventional layout: archives in `attached_assets/`, modules under `frontend/`,
//! `backend/` and `services/`, and everything folded into `consolidated/`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, config};

/// Default settings filename, looked up in the project root
pub const SETTINGS_FILE: &str = "modfold.yaml";

/// Directory holding modfold's own state (destination locks)
pub const STATE_DIR: &str = ".modfold";

/// Project settings (modfold.yaml)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory scanned (non-recursively) for archives
    pub input_dir: PathBuf,

    /// Where processed archives are relocated; defaults to `<input_dir>/processed`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processed_dir: Option<PathBuf>,

    /// Base directory for per-archive scratch directories
    pub scratch_dir: PathBuf,

    /// Root of the batch-level consolidated tree
    pub consolidated_dir: PathBuf,

    /// Append-only run journal
    pub log_file: PathBuf,

    /// Archive file extension, matched case-insensitively
    pub archive_extension: String,

    /// Module names starting with this prefix keep their own name as destination
    pub namespace_prefix: String,

    pub layout: Layout,

    pub registry: RegistrySettings,

    pub cleanup: CleanupSettings,

    /// Script extension to interpreter program
    pub interpreters: BTreeMap<String, String>,
}

/// Canonical destination roots by module kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    pub frontend_root: String,
    pub backend_root: String,
    pub services_root: String,

    /// Appended to a service destination already claimed in the same run
    pub collision_suffix: String,
}

/// Integration registry endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrySettings {
    pub url: String,
    pub timeout_secs: u64,
}

/// Empty-directory cleanup behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanupSettings {
    /// Directory names whose subtrees are never touched
    pub skip_dirs: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        let interpreters = [("py", "python3"), ("js", "node"), ("sh", "bash")]
            .into_iter()
            .map(|(ext, program)| (ext.to_string(), program.to_string()))
            .collect();

        Self {
            input_dir: PathBuf::from("attached_assets"),
            processed_dir: None,
            scratch_dir: PathBuf::from("temp_extract"),
            consolidated_dir: PathBuf::from("consolidated"),
            log_file: PathBuf::from("modfold.log"),
            archive_extension: "zip".to_string(),
            namespace_prefix: "ehb-".to_string(),
            layout: Layout::default(),
            registry: RegistrySettings::default(),
            cleanup: CleanupSettings::default(),
            interpreters,
        }
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            frontend_root: "frontend".to_string(),
            backend_root: "backend".to_string(),
            services_root: "services".to_string(),
            collision_suffix: "-Service".to_string(),
        }
    }
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            url: "http://localhost:5003/api/integration/register-module".to_string(),
            timeout_secs: 5,
        }
    }
}

impl Default for CleanupSettings {
    fn default() -> Self {
        Self {
            skip_dirs: vec!["node_modules".to_string(), ".git".to_string()],
        }
    }
}

impl Settings {
    /// Parse settings from YAML string
    #[cfg(test)]
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let settings: Self = serde_yaml::from_str(yaml)?;
        Ok(settings)
    }

    /// Load settings from a file; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| config::parse_failed(path.display().to_string(), e.to_string()))?;

        let settings: Self = serde_yaml::from_str(&content)
            .map_err(|e| config::parse_failed(path.display().to_string(), e.to_string()))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        if self.archive_extension.trim_start_matches('.').is_empty() {
            return Err(config::invalid("archive_extension cannot be empty"));
        }

        if self.namespace_prefix.is_empty() {
            return Err(config::invalid("namespace_prefix cannot be empty"));
        }

        if self.registry.timeout_secs == 0 {
            return Err(config::invalid("registry.timeout_secs must be positive"));
        }

        Ok(())
    }

    /// Archive extension without a leading dot
    pub fn extension(&self) -> &str {
        self.archive_extension.trim_start_matches('.')
    }
}

/// Settings paths resolved against a project root
#[derive(Debug, Clone)]
pub struct ProjectPaths {
    pub root: PathBuf,
    pub input: PathBuf,
    pub processed: PathBuf,
    pub scratch: PathBuf,
    pub consolidated: PathBuf,
    pub log_file: PathBuf,
    pub locks: PathBuf,
}

impl ProjectPaths {
    pub fn new(root: &Path, settings: &Settings) -> Self {
        let resolve = |p: &Path| {
            if p.is_absolute() {
                p.to_path_buf()
            } else {
                root.join(p)
            }
        };

        let input = resolve(settings.input_dir.as_path());
        let processed = settings
            .processed_dir
            .as_deref()
            .map_or_else(|| input.join("processed"), resolve);

        Self {
            root: root.to_path_buf(),
            processed,
            scratch: resolve(settings.scratch_dir.as_path()),
            consolidated: resolve(settings.consolidated_dir.as_path()),
            log_file: resolve(settings.log_file.as_path()),
            locks: root.join(STATE_DIR).join("locks"),
            input,
        }
    }

    /// Override the input directory; the processed store follows unless set explicitly
    pub fn with_input(mut self, input: PathBuf, settings: &Settings) -> Self {
        if settings.processed_dir.is_none() {
            self.processed = input.join("processed");
        }
        self.input = input;
        self
    }
}
