//! Target resolution for modules
//!
//! Maps (module name, kind, declared target) to a project-relative destination.
//! Policy, first match wins:
//! 1. the sidecar's `target_directory`
//! 2. the module name itself when it carries the project namespace prefix
//! 3. by kind: shared frontend root, shared backend root, a per-module directory under
//!    the services root, otherwise the module name
//!
//! Frontend and backend roots are shared on purpose: modules of those kinds are unioned
//! into one tree. Service destinations are per module, so a second module claiming the
//! same service directory in one run gets a disambiguating suffix instead of merging
//! over the first.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::settings::Layout;
use crate::domain::ModuleKind;
use crate::error::Result;
use crate::path_utils::relative_within;

/// Which rule produced the destination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetBasis {
    Declared,
    Namespaced,
    SharedRoot,
    Service { disambiguated: bool },
    ModuleName,
}

impl fmt::Display for TargetBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetBasis::Declared => f.write_str("declared target_directory"),
            TargetBasis::Namespaced => f.write_str("namespaced module name"),
            TargetBasis::SharedRoot => f.write_str("shared kind root"),
            TargetBasis::Service {
                disambiguated: false,
            } => f.write_str("services root"),
            TargetBasis::Service {
                disambiguated: true,
            } => f.write_str("services root, disambiguated"),
            TargetBasis::ModuleName => f.write_str("module name"),
        }
    }
}

/// A resolved destination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub target: PathBuf,
    pub basis: TargetBasis,
}

/// Resolves destinations for one run, remembering which module claimed which path
#[derive(Debug)]
pub struct TargetResolver {
    layout: Layout,
    namespace_prefix: String,

    /// Destination -> owner (archive identity) that claimed it
    claims: HashMap<PathBuf, String>,
}

impl TargetResolver {
    pub fn new(layout: Layout, namespace_prefix: &str) -> Self {
        Self {
            layout,
            namespace_prefix: namespace_prefix.to_lowercase(),
            claims: HashMap::new(),
        }
    }

    /// Resolve the destination for a module owned by `owner`
    ///
    /// Resolving the same owner twice yields the same destination.
    pub fn resolve(
        &mut self,
        owner: &str,
        module_name: &str,
        kind: &ModuleKind,
        declared_target: Option<&str>,
    ) -> Result<Resolution> {
        let resolution = self.compute(owner, module_name, kind, declared_target)?;
        self.claims
            .entry(resolution.target.clone())
            .or_insert_with(|| owner.to_string());
        Ok(resolution)
    }

    fn compute(
        &self,
        owner: &str,
        module_name: &str,
        kind: &ModuleKind,
        declared_target: Option<&str>,
    ) -> Result<Resolution> {
        if let Some(declared) = declared_target {
            return Ok(Resolution {
                target: relative_within(declared)?,
                basis: TargetBasis::Declared,
            });
        }

        if module_name.to_lowercase().starts_with(&self.namespace_prefix) {
            return Ok(Resolution {
                target: relative_within(module_name)?,
                basis: TargetBasis::Namespaced,
            });
        }

        match kind {
            ModuleKind::Frontend => Ok(Resolution {
                target: relative_within(&self.layout.frontend_root)?,
                basis: TargetBasis::SharedRoot,
            }),
            ModuleKind::Backend => Ok(Resolution {
                target: relative_within(&self.layout.backend_root)?,
                basis: TargetBasis::SharedRoot,
            }),
            kind if kind.is_service() => self.service_target(owner, module_name),
            _ => Ok(Resolution {
                target: relative_within(module_name)?,
                basis: TargetBasis::ModuleName,
            }),
        }
    }

    fn service_target(&self, owner: &str, module_name: &str) -> Result<Resolution> {
        let root = relative_within(&self.layout.services_root)?;
        let base = root.join(relative_within(module_name)?);

        let mut candidate = base.clone();
        let mut attempt = 0usize;
        while !self.is_free_for(&candidate, owner) {
            attempt += 1;
            let suffix = if attempt == 1 {
                self.layout.collision_suffix.clone()
            } else {
                format!("{}-{}", self.layout.collision_suffix, attempt)
            };
            candidate = with_suffix(&base, &suffix);
        }

        Ok(Resolution {
            target: candidate,
            basis: TargetBasis::Service {
                disambiguated: attempt > 0,
            },
        })
    }

    fn is_free_for(&self, candidate: &Path, owner: &str) -> bool {
        self.claims
            .get(candidate)
            .is_none_or(|claimant| claimant == owner)
    }
}

fn with_suffix(base: &Path, suffix: &str) -> PathBuf {
    let mut name = base.file_name().unwrap_or_default().to_os_string();
    name.push(suffix);
    base.with_file_name(name)
}
