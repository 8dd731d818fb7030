//! modfold - module archive integrator
//!
//! Ingests module archives delivered as zip files, classifies each by inferred purpose
//! and merges its contents into a canonical multi-module project tree.

use clap::Parser;
use miette::Diagnostic;
use tracing_subscriber::EnvFilter;

mod archive;
mod classify;
mod cli;
mod commands;
mod common;
mod config;
mod domain;
mod error;
mod hash;
mod journal;
mod merge;
mod path_utils;
mod pipeline;
mod progress;
mod registration;
mod resolver;
mod temp;

use cli::{Cli, Commands};

fn default_log_filter(verbose: bool) -> &'static str {
    if verbose { "modfold=debug" } else { "modfold=info" }
}

fn init_tracing(verbose: bool) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_log_filter(verbose))),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Process(args) => commands::process::run(cli.root, cli.config, args),
        Commands::Inspect(args) => commands::inspect::run(cli.root, cli.config, args),
        Commands::Clean => commands::clean::run(cli.root, cli.config),
        Commands::Version => commands::version::run(),
        Commands::Completions(args) => commands::completions::run(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        if let Some(help) = e.help() {
            eprintln!("  help: {help}");
        }
        std::process::exit(1);
    }
}
