//! Classification rule tables
//!
//! Rules are evaluated top to bottom and the first match wins. The order of each
//! table is part of the classification policy.

use crate::domain::{Manifest, ModuleKind};

/// Package manifest file names
const PACKAGE_MANIFESTS: &[&str] = &["package.json"];

/// Frontend framework config file name prefixes (e.g. `next.config.js`)
const FRONTEND_CONFIG_PREFIXES: &[&str] = &[
    "next.config.",
    "nuxt.config.",
    "vite.config.",
    "svelte.config.",
];

/// Frontend framework config files matched exactly
const FRONTEND_CONFIG_FILES: &[&str] = &["angular.json"];

/// Scripting-language source extensions
const SCRIPT_EXTENSIONS: &[&str] = &["py"];

/// Container build descriptor names
const CONTAINER_DESCRIPTORS: &[&str] = &["Dockerfile", "Containerfile"];

/// Structural facts extracted from a manifest once, then shared by all rules
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Evidence {
    pub package_manifest: bool,
    pub frontend_config: bool,
    pub script_source: bool,
    pub container_descriptor: bool,
}

impl Evidence {
    pub fn from_manifest(manifest: &Manifest) -> Self {
        let mut evidence = Self::default();

        for name in manifest.file_names() {
            evidence.package_manifest |= PACKAGE_MANIFESTS.contains(&name);
            evidence.frontend_config |= is_frontend_config(name);
            evidence.script_source |= has_script_extension(name);
            evidence.container_descriptor |= is_container_descriptor(name);
        }

        evidence
    }
}

fn is_frontend_config(name: &str) -> bool {
    FRONTEND_CONFIG_FILES.contains(&name)
        || FRONTEND_CONFIG_PREFIXES
            .iter()
            .any(|prefix| name.starts_with(prefix))
}

fn has_script_extension(name: &str) -> bool {
    name.rsplit_once('.')
        .is_some_and(|(stem, ext)| !stem.is_empty() && SCRIPT_EXTENSIONS.contains(&ext))
}

fn is_container_descriptor(name: &str) -> bool {
    CONTAINER_DESCRIPTORS
        .iter()
        .any(|d| name == *d || name.starts_with(&format!("{d}.")))
}

/// A rule over manifest evidence
pub struct StructuralRule {
    pub name: &'static str,
    pub kind: ModuleKind,
    pub matches: fn(&Evidence) -> bool,
}

/// A rule over the lowercased module name
pub struct NameRule {
    pub name: &'static str,
    pub kind: ModuleKind,
    pub needles: &'static [&'static str],
}

impl NameRule {
    pub fn matches(&self, lowercase_name: &str) -> bool {
        self.needles
            .iter()
            .any(|needle| lowercase_name.contains(needle))
    }
}

/// Structural rules in priority order
pub fn structural_rules() -> Vec<StructuralRule> {
    vec![
        StructuralRule {
            name: "package manifest with frontend framework config",
            kind: ModuleKind::Frontend,
            matches: |e| e.package_manifest && e.frontend_config,
        },
        StructuralRule {
            name: "package manifest",
            kind: ModuleKind::Backend,
            matches: |e| e.package_manifest,
        },
        StructuralRule {
            name: "scripting-language sources",
            kind: ModuleKind::PythonService,
            matches: |e| e.script_source,
        },
        StructuralRule {
            name: "container build descriptor",
            kind: ModuleKind::ContainerService,
            matches: |e| e.container_descriptor,
        },
    ]
}

/// Name rules in priority order
pub fn name_rules() -> Vec<NameRule> {
    vec![
        NameRule {
            name: "name mentions frontend",
            kind: ModuleKind::Frontend,
            needles: &["frontend", "ui"],
        },
        NameRule {
            name: "name mentions backend",
            kind: ModuleKind::Backend,
            needles: &["backend", "api"],
        },
        NameRule {
            name: "name mentions service",
            kind: ModuleKind::Service,
            needles: &["service"],
        },
    ]
}
