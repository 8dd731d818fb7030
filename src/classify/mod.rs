//! Module classification
//!
//! Infers a module's kind from, in strict priority order:
//! 1. the sidecar's declared `module_type`, used verbatim
//! 2. structural evidence in the manifest (see [`rules::structural_rules`])
//! 3. substrings of the module's own name (see [`rules::name_rules`])
//! 4. `unknown`
//!
//! Nothing matching is not an error: it is the `unknown` kind.

pub mod rules;

use std::fmt;

use crate::domain::{Manifest, ModuleKind};

use rules::{Evidence, name_rules, structural_rules};

/// Which tier of the policy decided the kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Basis {
    Declared,
    Structure(&'static str),
    Name(&'static str),
    Default,
}

impl fmt::Display for Basis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Basis::Declared => f.write_str("declared module_type"),
            Basis::Structure(rule) => write!(f, "structure: {rule}"),
            Basis::Name(rule) => write!(f, "{rule}"),
            Basis::Default => f.write_str("no rule matched"),
        }
    }
}

/// Kind plus the reason it was chosen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub kind: ModuleKind,
    pub basis: Basis,
}

/// Classify a module
pub fn classify(
    module_name: &str,
    manifest: &Manifest,
    declared_kind: Option<&str>,
) -> Classification {
    if let Some(declared) = declared_kind {
        return Classification {
            kind: ModuleKind::from_declared(declared),
            basis: Basis::Declared,
        };
    }

    let evidence = Evidence::from_manifest(manifest);
    if let Some(rule) = structural_rules()
        .into_iter()
        .find(|rule| (rule.matches)(&evidence))
    {
        return Classification {
            kind: rule.kind,
            basis: Basis::Structure(rule.name),
        };
    }

    let lowercase = module_name.to_lowercase();
    if let Some(rule) = name_rules()
        .into_iter()
        .find(|rule| rule.matches(&lowercase))
    {
        return Classification {
            kind: rule.kind,
            basis: Basis::Name(rule.name),
        };
    }

    Classification {
        kind: ModuleKind::Unknown,
        basis: Basis::Default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest(files: &[&str]) -> Manifest {
        Manifest::new(files.iter().map(|f| (*f).to_string()).collect())
    }

    #[test]
    fn test_frontend_structure_beats_api_name() {
        let result = classify(
            "payments-api",
            &manifest(&["package.json", "next.config.js"]),
            None,
        );
        assert_eq!(result.kind, ModuleKind::Frontend);
        assert!(matches!(result.basis, Basis::Structure(_)));
    }

    #[test]
    fn test_package_without_framework_is_backend() {
        let result = classify("dashboard-ui", &manifest(&["package.json", "index.js"]), None);
        assert_eq!(result.kind, ModuleKind::Backend);
    }

    #[test]
    fn test_python_sources() {
        let result = classify("Widget-Service", &manifest(&["app.py"]), None);
        assert_eq!(result.kind, ModuleKind::PythonService);
    }

    #[test]
    fn test_script_beats_container() {
        let result = classify("x", &manifest(&["Dockerfile", "main.py"]), None);
        assert_eq!(result.kind, ModuleKind::PythonService);
    }

    #[test]
    fn test_container_descriptor() {
        let result = classify("x", &manifest(&["Dockerfile", "main.go"]), None);
        assert_eq!(result.kind, ModuleKind::ContainerService);
    }

    #[test]
    fn test_name_fallbacks_in_order() {
        let empty = manifest(&["README.md"]);
        assert_eq!(classify("Admin-UI", &empty, None).kind, ModuleKind::Frontend);
        assert_eq!(classify("Orders-API", &empty, None).kind, ModuleKind::Backend);
        assert_eq!(classify("Mail-Service", &empty, None).kind, ModuleKind::Service);
        assert_eq!(
            classify("frontend-backend", &empty, None).kind,
            ModuleKind::Frontend
        );
    }

    #[test]
    fn test_nothing_matches_is_unknown() {
        let result = classify("Widget", &manifest(&["notes.txt"]), None);
        assert_eq!(result.kind, ModuleKind::Unknown);
        assert_eq!(result.basis, Basis::Default);
    }

    #[test]
    fn test_declared_kind_always_wins() {
        let result = classify(
            "Widget",
            &manifest(&["package.json", "next.config.js"]),
            Some("backend"),
        );
        assert_eq!(result.kind, ModuleKind::Backend);
        assert_eq!(result.basis, Basis::Declared);

        let custom = classify("Widget", &manifest(&[]), Some("data-pipeline"));
        assert_eq!(custom.kind, ModuleKind::Declared("data-pipeline".to_string()));
    }
}
