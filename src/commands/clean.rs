//! Clean command

use std::path::PathBuf;

use console::Style;

use crate::commands::helpers::{Project, resolve_root};
use crate::error::Result;
use crate::journal::Journal;
use crate::pipeline::remove_empty_dirs;

/// Remove empty directories from the project, keeping the input and processed stores
pub fn run(root: Option<PathBuf>, config: Option<PathBuf>) -> Result<()> {
    let root = resolve_root(root)?;
    let project = Project::load(&root, config.as_deref())?;
    let journal = Journal::open(&project.paths.log_file)?;

    let protected = [
        project.paths.input.as_path(),
        project.paths.processed.as_path(),
    ];
    let report = remove_empty_dirs(
        &project.paths.root,
        &protected,
        &project.settings.cleanup.skip_dirs,
        &journal,
    );

    for path in &report.removed {
        println!(
            "  {} {}",
            Style::new().dim().apply_to("removed"),
            path.strip_prefix(&project.paths.root).unwrap_or(path).display()
        );
    }
    for error in &report.failed {
        println!("  {} {}", Style::new().red().apply_to("failed"), error);
    }
    println!(
        "{} {} empty directories removed",
        Style::new().green().bold().apply_to("Cleanup:"),
        report.removed.len()
    );

    Ok(())
}
