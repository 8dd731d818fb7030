//! Process command
//!
//! Runs the full pipeline over the input directory and prints a batch summary.
//! Per-archive failures are part of the summary, not an error exit.

use std::path::PathBuf;

use console::Style;

use crate::cli::ProcessArgs;
use crate::commands::helpers::{Project, resolve_root};
use crate::error::Result;
use crate::journal::Journal;
use crate::path_utils::to_forward_slashes;
use crate::pipeline::scripts::ScriptOutcome;
use crate::pipeline::{BatchSummary, Pipeline, PipelineOptions};
use crate::progress::ProgressDisplay;
use crate::registration::HttpRegistry;

/// Run the process command
pub fn run(root: Option<PathBuf>, config: Option<PathBuf>, args: ProcessArgs) -> Result<()> {
    let root = resolve_root(root)?;
    let mut project = Project::load(&root, config.as_deref())?;
    if let Some(input) = &args.input {
        project = project.with_input(input)?;
    }

    let journal = Journal::open(&project.paths.log_file)?;
    journal.info("Starting archive processing");

    let registry = HttpRegistry::new(&project.settings.registry)?;
    let options = PipelineOptions {
        consolidate: !args.no_consolidate,
        cleanup: !args.no_cleanup,
        register: !args.no_register,
    };
    let mut pipeline = Pipeline::new(
        &project.settings,
        &project.paths,
        &journal,
        &registry,
        options,
    );

    let archives = pipeline.discover()?;
    if archives.is_empty() {
        println!(
            "No archives found in {}",
            project.paths.input.display()
        );
    }

    let total = archives.len();
    let progress = (total > 0).then(|| ProgressDisplay::new(u64::try_from(total).unwrap_or(u64::MAX)));
    let mut reports = Vec::with_capacity(total);

    for (index, archive) in archives.iter().enumerate() {
        if let Some(progress) = &progress {
            let name = archive
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            progress.update_archive(&name, index + 1, total);
        }

        reports.push(pipeline.process_archive(archive));

        if let Some(progress) = &progress {
            progress.inc_archive();
        }
    }

    if let Some(progress) = &progress {
        progress.finish();
    }

    let summary = pipeline.finish(total, reports);
    print_summary(&summary);
    println!(
        "{}",
        Style::new()
            .dim()
            .apply_to(format!("Journal: {}", journal.path().display()))
    );

    Ok(())
}

fn print_summary(summary: &BatchSummary) {
    let ok = Style::new().green().bold();
    let failed = Style::new().red().bold();
    let dim = Style::new().dim();

    for report in &summary.archives {
        match &report.outcome {
            Ok(module) => {
                println!(
                    "  {} {} {} {} {}",
                    ok.apply_to("✓"),
                    Style::new().bold().apply_to(&module.descriptor.name),
                    Style::new().cyan().apply_to(&module.descriptor.kind),
                    to_forward_slashes(&module.descriptor.target_path),
                    dim.apply_to(format!(
                        "({} files, {} new dirs, {})",
                        module.merge.files_copied, module.merge.dirs_created, module.merge.mode
                    ))
                );
                println!(
                    "      {}",
                    dim.apply_to(format!(
                        "kind by {}, destination by {}",
                        module.kind_basis, module.target_basis
                    ))
                );
                for source in &module.merge.missing_sources {
                    println!("      {} mapped source missing: {source}", failed.apply_to("!"));
                }
                for (script, outcome) in &module.scripts {
                    match outcome {
                        ScriptOutcome::Succeeded => {}
                        ScriptOutcome::Failed(reason) => {
                            println!("      {} script {script} failed: {reason}", failed.apply_to("!"));
                        }
                        ScriptOutcome::Skipped(reason) => {
                            println!("      {}", dim.apply_to(format!("script {script} skipped: {reason}")));
                        }
                    }
                }
                if let Some(registration) = &module.registration {
                    println!("      {}", dim.apply_to(registration));
                }
                println!(
                    "      {}",
                    dim.apply_to(format!("archived as {}", module.relocated_to.display()))
                );
            }
            Err(reason) => {
                println!(
                    "  {} {} {}",
                    failed.apply_to("✗"),
                    Style::new().bold().apply_to(report.archive_name()),
                    reason
                );
            }
        }
    }

    if let Some(consolidation) = &summary.consolidation {
        println!(
            "{} {} destinations ({} files), {} skipped",
            Style::new().bold().apply_to("Consolidated:"),
            consolidation.merged.len(),
            consolidation.files_copied,
            consolidation.skipped.len() + consolidation.failed.len()
        );
    }

    if let Some(cleanup) = &summary.cleanup {
        println!(
            "{} {} empty directories removed",
            Style::new().bold().apply_to("Cleanup:"),
            cleanup.removed.len()
        );
    }

    let headline = summary.headline();
    if summary.failed().next().is_some() {
        println!("{}", Style::new().yellow().bold().apply_to(headline));
    } else {
        println!("{}", ok.apply_to(headline));
    }
}
