//! Integration registry client

use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

use crate::config::settings::RegistrySettings;
use crate::error::{Result, config};

/// Announcement body sent to the registry
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationPayload {
    pub module_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub path: String,
    pub discovered_by_zip_processor: bool,
    pub registration_date: String,
    pub capabilities: Vec<String>,
}

/// Why a remote announcement did not succeed
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("registry unreachable at {url}: {reason}")]
    Unreachable { url: String, reason: String },

    #[error("registry did not answer within {0}s")]
    Timeout(u64),

    #[error("registry answered {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// Something modules can be announced to
pub trait Registry {
    /// Announce a module; returns the HTTP status on success
    fn announce(&self, payload: &RegistrationPayload) -> std::result::Result<u16, RegistryError>;
}

/// Registry reached over HTTP with a bounded timeout
pub struct HttpRegistry {
    url: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl HttpRegistry {
    pub fn new(settings: &RegistrySettings) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| config::invalid(format!("cannot build registry client: {e}")))?;

        Ok(Self {
            url: settings.url.clone(),
            client,
            timeout_secs: settings.timeout_secs,
        })
    }
}

impl Registry for HttpRegistry {
    fn announce(&self, payload: &RegistrationPayload) -> std::result::Result<u16, RegistryError> {
        let response = self
            .client
            .post(&self.url)
            .json(payload)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    RegistryError::Timeout(self.timeout_secs)
                } else {
                    RegistryError::Unreachable {
                        url: self.url.clone(),
                        reason: e.to_string(),
                    }
                }
            })?;

        let status = response.status().as_u16();
        if matches!(status, 200 | 201) {
            return Ok(status);
        }

        let body = response.text().unwrap_or_default();
        Err(RegistryError::Rejected { status, body })
    }
}
