//! Module domain types
//!
//! Contains the descriptor computed for each archive and the manifest it is
//! classified from.

use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

use serde::{Serialize, Serializer};

/// Inferred or declared category of a module
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ModuleKind {
    Frontend,
    Backend,
    Service,
    PythonService,
    ContainerService,
    Unknown,
    /// A declared `module_type` outside the known set, kept verbatim
    Declared(String),
}

impl ModuleKind {
    /// Interpret a declared `module_type` verbatim
    pub fn from_declared(value: &str) -> Self {
        match value {
            "frontend" => ModuleKind::Frontend,
            "backend" => ModuleKind::Backend,
            "service" => ModuleKind::Service,
            "python-service" => ModuleKind::PythonService,
            "container-service" => ModuleKind::ContainerService,
            "unknown" => ModuleKind::Unknown,
            other => ModuleKind::Declared(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ModuleKind::Frontend => "frontend",
            ModuleKind::Backend => "backend",
            ModuleKind::Service => "service",
            ModuleKind::PythonService => "python-service",
            ModuleKind::ContainerService => "container-service",
            ModuleKind::Unknown => "unknown",
            ModuleKind::Declared(value) => value,
        }
    }

    /// Service kinds are namespaced under the services root
    pub fn is_service(&self) -> bool {
        matches!(self, ModuleKind::Service | ModuleKind::PythonService)
    }
}

impl fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ModuleKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Ordered relative file paths of an extracted archive, `/`-separated
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    entries: Vec<String>,
}

impl Manifest {
    pub fn new(entries: Vec<String>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Final path component of each entry
    pub fn file_names(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .map(|entry| entry.rsplit('/').next().unwrap_or(entry.as_str()))
    }
}

/// Everything the merger and notifier need to know about one module
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModuleDescriptor {
    pub name: String,
    pub kind: ModuleKind,

    /// Destination relative to the project root
    pub target_path: PathBuf,

    pub capabilities: BTreeSet<String>,
}

impl ModuleDescriptor {
    pub fn new(name: impl Into<String>, kind: ModuleKind, target_path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            kind,
            target_path: target_path.into(),
            capabilities: BTreeSet::new(),
        }
    }

    /// Registry id: the module name with separator characters stripped
    pub fn module_id(&self) -> String {
        self.name
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' ' | '.'))
            .collect()
    }
}
