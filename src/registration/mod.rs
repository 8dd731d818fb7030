//! Registration of merged modules
//!
//! A module is announced to the integration registry; when that fails for any reason
//! a `module-manifest.json` record is written at the module's destination instead.
//! Exactly one representation exists afterwards, unless both channels failed.

pub mod capabilities;
pub mod registry;

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::ModuleDescriptor;
use crate::error::{ModfoldError, Result, registration};
use crate::journal::Journal;

pub use capabilities::detect_capabilities;
pub use registry::{HttpRegistry, Registry, RegistrationPayload};

/// Local fallback record filename, at the destination root
pub const MANIFEST_FILE: &str = "module-manifest.json";

/// Local fallback record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalRecord {
    pub module_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub registered_by_zip_processor: bool,
    pub registration_date: String,
    #[serde(default)]
    pub capabilities: Vec<String>,
}

/// Remote acknowledgment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Acknowledgment {
    pub module_id: String,
    pub registered_at: String,
    pub status: u16,
}

/// How a registration attempt ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    Remote(Acknowledgment),
    Local {
        record: PathBuf,
        remote_error: String,
    },
    Failed {
        remote_error: String,
        local_error: String,
    },
}

impl Registration {
    /// Only a double failure is an error for the module
    pub fn into_result(self, module: &str) -> Result<Self> {
        match self {
            Registration::Failed {
                remote_error,
                local_error,
            } => Err(registration::failed(
                module,
                format!("registry: {remote_error}; local manifest: {local_error}"),
            )),
            other => Ok(other),
        }
    }
}

impl fmt::Display for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Registration::Remote(ack) => write!(
                f,
                "registered {} at {} (HTTP {})",
                ack.module_id, ack.registered_at, ack.status
            ),
            Registration::Local {
                record,
                remote_error,
            } => write!(
                f,
                "recorded locally at {} ({remote_error})",
                record.display()
            ),
            Registration::Failed { .. } => f.write_str("registration failed"),
        }
    }
}

/// Announce `descriptor`, merged at the absolute `destination`
pub fn register_module(
    registry: &dyn Registry,
    descriptor: &ModuleDescriptor,
    destination: &Path,
    journal: &Journal,
) -> Registration {
    let module_id = descriptor.module_id();
    let registration_date = chrono::Local::now().to_rfc3339();
    let absolute = dunce::canonicalize(destination).unwrap_or_else(|_| destination.to_path_buf());

    let payload = RegistrationPayload {
        module_id: module_id.clone(),
        name: descriptor.name.clone(),
        kind: descriptor.kind.to_string(),
        path: absolute.display().to_string(),
        discovered_by_zip_processor: true,
        registration_date: registration_date.clone(),
        capabilities: descriptor.capabilities.iter().cloned().collect(),
    };

    journal.info(format!(
        "Attempting to register module {} ({}) with capabilities [{}]",
        descriptor.name,
        module_id,
        payload.capabilities.join(", ")
    ));

    match registry.announce(&payload) {
        Ok(status) => {
            journal.info(format!("Module registration successful: {}", descriptor.name));
            remove_stale_record(destination, journal);
            Registration::Remote(Acknowledgment {
                module_id,
                registered_at: registration_date,
                status,
            })
        }
        Err(remote) => {
            journal.warn(format!(
                "Error registering module {}: {}",
                descriptor.name, remote
            ));

            let record = LocalRecord {
                module_id: payload.module_id,
                name: payload.name,
                kind: payload.kind,
                path: payload.path,
                registered_by_zip_processor: true,
                registration_date: payload.registration_date,
                capabilities: payload.capabilities,
            };

            match write_record(destination, &record) {
                Ok(path) => {
                    journal.info(format!(
                        "Created module manifest file as registration failed: {}",
                        path.display()
                    ));
                    Registration::Local {
                        record: path,
                        remote_error: remote.to_string(),
                    }
                }
                Err(local) => {
                    journal.warn(format!("Failed to create module manifest: {local}"));
                    Registration::Failed {
                        remote_error: remote.to_string(),
                        local_error: local.to_string(),
                    }
                }
            }
        }
    }
}

fn write_record(destination: &Path, record: &LocalRecord) -> Result<PathBuf> {
    let path = destination.join(MANIFEST_FILE);
    let json = serde_json::to_string_pretty(record).map_err(ModfoldError::from)?;
    std::fs::write(&path, json).map_err(|e| crate::error::fs::write_failed(&path, e))?;
    Ok(path)
}

/// Remove a fallback record an earlier run left, if it is ours
fn remove_stale_record(destination: &Path, journal: &Journal) {
    let path = destination.join(MANIFEST_FILE);
    let Ok(content) = std::fs::read_to_string(&path) else {
        return;
    };

    let ours = serde_json::from_str::<LocalRecord>(&content)
        .is_ok_and(|record| record.registered_by_zip_processor);
    if !ours {
        return;
    }

    match std::fs::remove_file(&path) {
        Ok(()) => journal.info(format!(
            "Removed stale module manifest: {}",
            path.display()
        )),
        Err(e) => journal.warn(format!(
            "Failed to remove stale module manifest {}: {}",
            path.display(),
            e
        )),
    }
}
