//! CLI definitions using clap derive API
//!
//! This module is organized into submodules for each command's argument types:
//! - process: Process command arguments
//! - inspect: Inspect command arguments
//! - completions: Completions command arguments

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod completions;
pub mod inspect;
pub mod process;

pub use completions::CompletionsArgs;
pub use inspect::InspectArgs;
pub use process::ProcessArgs;

/// modfold - module archive integrator
///
/// Ingests module archives, classifies them and folds them into a consolidated project tree.
#[derive(Parser, Debug)]
#[command(
    name = "modfold",
    author,
    version,
    color = clap::ColorChoice::Always,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Fold module archives into a project tree",
    long_about = "modfold unpacks module archives (zip), classifies each one as frontend, backend, \
                  service or container service, merges it into the project tree without clobbering \
                  existing directories, optionally registers it with an integration registry, and \
                  moves the archive to a processed store.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  modfold process                        \x1b[90m# Integrate every archive in attached_assets/\x1b[0m\n   \
                  modfold process --input ./inbox        \x1b[90m# Integrate archives from another directory\x1b[0m\n   \
                  modfold inspect Widget.zip             \x1b[90m# Preview classification and destination\x1b[0m\n   \
                  modfold clean                          \x1b[90m# Remove empty directories\x1b[0m\n\n\
                  "
)]
pub struct Cli {
    /// Project root (defaults to current directory)
    #[arg(long, short = 'r', global = true, env = "MODFOLD_ROOT")]
    pub root: Option<PathBuf>,

    /// Settings file (defaults to <root>/modfold.yaml)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Integrate every archive in the input directory
    Process(ProcessArgs),

    /// Show how one archive would be classified and placed, without merging
    Inspect(InspectArgs),

    /// Remove empty directories from the project
    Clean,

    /// Show version information
    #[command(hide = true)]
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}
