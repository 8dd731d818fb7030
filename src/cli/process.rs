use clap::Parser;
use std::path::PathBuf;

/// Arguments for the process command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Process every archive in the configured input directory:\n    modfold process\n\n\
                  Process archives from another directory:\n    modfold process --input ./downloads\n\n\
                  Merge only, without consolidation or cleanup:\n    modfold process --no-consolidate --no-cleanup")]
pub struct ProcessArgs {
    /// Directory to scan for archives (overrides input_dir from modfold.yaml)
    #[arg(long, short = 'i')]
    pub input: Option<PathBuf>,

    /// Skip unioning destinations into the consolidated tree
    #[arg(long)]
    pub no_consolidate: bool,

    /// Skip removing empty directories after the batch
    #[arg(long)]
    pub no_cleanup: bool,

    /// Never contact the integration registry, even when an archive asks for it
    #[arg(long)]
    pub no_register: bool,
}
