//! Post-integration scripts
//!
//! Scripts named by the sidecar run after a successful merge, in declared order.
//! Each resolves relative to the module's destination, is dispatched to an
//! interpreter by extension and runs with the project root as working directory.
//! Nothing here fails the module: every problem is journaled and the next script runs.

use std::collections::BTreeMap;
use std::path::Path;
use std::process::Command;

use crate::journal::Journal;
use crate::path_utils::relative_within;

/// What happened to one script
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptOutcome {
    Succeeded,
    Failed(String),
    Skipped(String),
}

/// Run `scripts` for a module merged at `destination`
pub fn run_post_scripts(
    scripts: &[String],
    destination: &Path,
    project_root: &Path,
    interpreters: &BTreeMap<String, String>,
    journal: &Journal,
) -> Vec<(String, ScriptOutcome)> {
    scripts
        .iter()
        .map(|script| {
            let outcome = run_one(script, destination, project_root, interpreters, journal);
            match &outcome {
                ScriptOutcome::Succeeded => {
                    journal.info(format!("Post-integration script finished: {script}"));
                }
                ScriptOutcome::Failed(reason) => {
                    journal.warn(format!("Post-integration script {script} failed: {reason}"));
                }
                ScriptOutcome::Skipped(reason) => {
                    journal.warn(format!("Skipping post-integration script {script}: {reason}"));
                }
            }
            (script.clone(), outcome)
        })
        .collect()
}

fn run_one(
    script: &str,
    destination: &Path,
    project_root: &Path,
    interpreters: &BTreeMap<String, String>,
    journal: &Journal,
) -> ScriptOutcome {
    let relative = match relative_within(script) {
        Ok(relative) => relative,
        Err(e) => return ScriptOutcome::Skipped(e.to_string()),
    };

    let script_path = destination.join(relative);
    if !script_path.is_file() {
        return ScriptOutcome::Skipped("script not found".to_string());
    }

    let extension = script_path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    let Some(program) = interpreters.get(&extension) else {
        return ScriptOutcome::Skipped(format!("unknown script type: .{extension}"));
    };

    journal.info(format!("Running post-integration script: {script}"));

    match Command::new(program)
        .arg(&script_path)
        .current_dir(project_root)
        .status()
    {
        Ok(status) if status.success() => ScriptOutcome::Succeeded,
        Ok(status) => ScriptOutcome::Failed(format!("exited with {status}")),
        Err(e) => ScriptOutcome::Skipped(format!("cannot start {program}: {e}")),
    }
}
