//! Inspect command
//!
//! Extracts one archive into a throwaway scratch directory and reports what
//! `process` would decide for it. Nothing is merged, registered or moved.

use std::path::PathBuf;

use console::Style;

use crate::archive::allocate_scratch;
use crate::cli::InspectArgs;
use crate::commands::helpers::{Project, resolve_root};
use crate::error::Result;
use crate::journal::Journal;
use crate::path_utils::to_forward_slashes;
use crate::pipeline::{Prepared, prepare_archive};
use crate::resolver::TargetResolver;
use crate::temp::scratch_base;

/// Run the inspect command
pub fn run(root: Option<PathBuf>, config: Option<PathBuf>, args: InspectArgs) -> Result<()> {
    let root = resolve_root(root)?;
    let project = Project::load(&root, config.as_deref())?;

    let scratch = allocate_scratch(&scratch_base())?;
    let mut resolver = TargetResolver::new(
        project.settings.layout.clone(),
        &project.settings.namespace_prefix,
    );
    let prepared = prepare_archive(
        &args.archive,
        scratch.path(),
        &mut resolver,
        &Journal::detached(),
    )?;

    print_inspection(&args, &prepared);
    Ok(())
}

fn print_inspection(args: &InspectArgs, prepared: &Prepared) {
    let label = Style::new().bold();

    println!("{}", Style::new().bold().yellow().apply_to(args.archive.display()));
    println!(
        "  {} {}",
        label.apply_to("Files:"),
        prepared.extraction.manifest.len()
    );
    if !prepared.extraction.skipped.is_empty() {
        println!(
            "  {} {}",
            label.apply_to("Unsafe entries skipped:"),
            prepared.extraction.skipped.join(", ")
        );
    }

    match &prepared.declared {
        Some(declared) => {
            println!("  {}", label.apply_to("Sidecar:"));
            if let Ok(yaml) = serde_yaml::to_string(declared) {
                for line in yaml.lines() {
                    println!("    {line}");
                }
            }
        }
        None => println!("  {} none", label.apply_to("Sidecar:")),
    }

    println!("  {} {}", label.apply_to("Module:"), prepared.module_name);
    println!(
        "  {} {} {}",
        label.apply_to("Kind:"),
        Style::new().cyan().apply_to(&prepared.classification.kind),
        Style::new().dim().apply_to(format!("({})", prepared.classification.basis))
    );
    println!(
        "  {} {} {}",
        label.apply_to("Destination:"),
        to_forward_slashes(&prepared.resolution.target),
        Style::new().dim().apply_to(format!("({})", prepared.resolution.basis))
    );

    let mapped = prepared
        .declared
        .as_ref()
        .is_some_and(crate::config::DeclaredConfig::has_mapping);
    println!(
        "  {} {}",
        label.apply_to("Merge mode:"),
        if mapped { "mapped" } else { "direct" }
    );

    if args.files {
        println!("  {}", label.apply_to("Manifest:"));
        for entry in prepared.extraction.manifest.entries() {
            println!("    {entry}");
        }
    }
}
