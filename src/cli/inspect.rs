use clap::Parser;
use std::path::PathBuf;

/// Arguments for the inspect command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Show how an archive would be classified and where it would land:\n    \
                  modfold inspect attached_assets/Widget-Service.zip\n\n\
                  List every file in the archive as well:\n    modfold inspect Widget.zip --files")]
pub struct InspectArgs {
    /// Archive to inspect
    pub archive: PathBuf,

    /// Print the full manifest
    #[arg(long)]
    pub files: bool,
}
