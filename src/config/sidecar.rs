//! Sidecar descriptor (config.json) bundled inside a module archive
//!
//! Every field is optional. A present field overrides the value modfold would
//! otherwise infer; an absent field leaves the inferred value in place.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, config};

/// Sidecar filename at the archive root
pub const SIDECAR_FILE: &str = "config.json";

/// Declared module configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeclaredConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_directory: Option<String>,

    /// Source-relative path to destination-relative path
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub file_mapping: BTreeMap<String, String>,

    /// Scripts run after the merge, relative to the destination
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub post_integration_scripts: Vec<String>,

    /// Accepts booleans, numbers and strings like `"true"` or `"yes"`
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub register_with_integration_hub: bool,
}

fn deserialize_flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Null => false,
        serde_json::Value::Bool(flag) => flag,
        serde_json::Value::Number(n) => n.as_f64().is_some_and(|f| f.abs() > 0.0),
        serde_json::Value::String(s) => !matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "" | "false" | "0" | "no" | "off"
        ),
        serde_json::Value::Array(items) => !items.is_empty(),
        serde_json::Value::Object(fields) => !fields.is_empty(),
    })
}

impl DeclaredConfig {
    /// Parse a sidecar from a JSON string
    #[cfg(test)]
    pub fn from_json(json: &str) -> Result<Self> {
        let declared: Self = serde_json::from_str(json)?;
        Ok(declared)
    }

    /// Load the sidecar from an extracted archive root
    ///
    /// Returns `Ok(None)` when the archive carries no sidecar.
    pub fn load(extract_dir: &Path) -> Result<Option<Self>> {
        let path = extract_dir.join(SIDECAR_FILE);
        if !path.is_file() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path)
            .map_err(|e| config::parse_failed(path.display().to_string(), e.to_string()))?;

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| config::parse_failed(path.display().to_string(), e.to_string()))
    }

    /// Whether the merge should run in mapped mode
    pub fn has_mapping(&self) -> bool {
        !self.file_mapping.is_empty()
    }

    /// Coalesce the declared module name over an inferred one
    pub fn module_name_or(&self, inferred: &str) -> String {
        self.module_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(inferred)
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_full_sidecar() {
        let json = r#"{
            "module_name": "EHB-Dashboard",
            "module_type": "frontend",
            "target_directory": "apps/dashboard",
            "file_mapping": {"src/index.js": "web/index.js"},
            "post_integration_scripts": ["setup.sh"],
            "register_with_integration_hub": true
        }"#;

        let declared = DeclaredConfig::from_json(json).unwrap();
        assert_eq!(declared.module_name.as_deref(), Some("EHB-Dashboard"));
        assert_eq!(declared.module_type.as_deref(), Some("frontend"));
        assert_eq!(declared.target_directory.as_deref(), Some("apps/dashboard"));
        assert_eq!(
            declared.file_mapping.get("src/index.js").map(String::as_str),
            Some("web/index.js")
        );
        assert_eq!(declared.post_integration_scripts, vec!["setup.sh"]);
        assert!(declared.register_with_integration_hub);
        assert!(declared.has_mapping());
    }

    #[test]
    fn test_empty_sidecar_overrides_nothing() {
        let declared = DeclaredConfig::from_json("{}").unwrap();
        assert_eq!(declared, DeclaredConfig::default());
        assert!(!declared.has_mapping());
        assert_eq!(declared.module_name_or("Widget"), "Widget");
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let declared =
            DeclaredConfig::from_json(r#"{"module_type": "backend", "author": "x"}"#).unwrap();
        assert_eq!(declared.module_type.as_deref(), Some("backend"));
    }

    #[test]
    fn test_registration_flag_is_lenient() {
        let cases = [
            (r#""true""#, true),
            (r#""Yes""#, true),
            ("1", true),
            ("null", false),
            ("0", false),
            (r#""false""#, false),
            (r#""""#, false),
        ];
        for (raw, expected) in cases {
            let json = format!(
                r#"{{"module_name": "Widget", "register_with_integration_hub": {raw}}}"#
            );
            let declared = DeclaredConfig::from_json(&json).unwrap();
            assert_eq!(declared.register_with_integration_hub, expected, "{raw}");
            assert_eq!(declared.module_name.as_deref(), Some("Widget"));
        }
    }

    #[test]
    fn test_module_name_override() {
        let declared = DeclaredConfig {
            module_name: Some("Renamed".to_string()),
            ..DeclaredConfig::default()
        };
        assert_eq!(declared.module_name_or("Widget"), "Renamed");
    }

    #[test]
    fn test_load_absent_and_malformed() {
        let temp = TempDir::new().unwrap();
        assert!(DeclaredConfig::load(temp.path()).unwrap().is_none());

        std::fs::write(temp.path().join(SIDECAR_FILE), "{ not json").unwrap();
        assert!(DeclaredConfig::load(temp.path()).is_err());
    }

    #[test]
    fn test_load_present() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join(SIDECAR_FILE),
            r#"{"target_directory": "custom/path"}"#,
        )
        .unwrap();
        let declared = DeclaredConfig::load(temp.path()).unwrap().unwrap();
        assert_eq!(declared.target_directory.as_deref(), Some("custom/path"));
    }
}
