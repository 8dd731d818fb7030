//! Capability detection from a merged module's layout
//!
//! Advisory metadata for the registry payload; never used for classification.

use std::collections::BTreeSet;
use std::path::Path;

/// A subtree whose presence implies a capability, with nested subtrees implying more
struct CapabilityRule {
    subtree: &'static str,
    capability: &'static str,
    nested: &'static [(&'static str, &'static str)],
}

const RULES: &[CapabilityRule] = &[
    CapabilityRule {
        subtree: "frontend",
        capability: "ui",
        nested: &[("components", "components"), ("pages", "pages")],
    },
    CapabilityRule {
        subtree: "backend",
        capability: "api",
        nested: &[("routes", "rest-api"), ("controllers", "controllers")],
    },
];

/// Inspect `destination` for known substructure
pub fn detect_capabilities(destination: &Path) -> BTreeSet<String> {
    let mut capabilities = BTreeSet::new();

    for rule in RULES {
        let subtree = destination.join(rule.subtree);
        if !subtree.exists() {
            continue;
        }
        capabilities.insert(rule.capability.to_string());

        for (nested, capability) in rule.nested {
            if subtree.join(nested).exists() {
                capabilities.insert((*capability).to_string());
            }
        }
    }

    capabilities
}
