use clap::Parser;
use clap_complete::Shell;

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    modfold completions --shell bash > ~/.bash_completion.d/modfold\n\n\
                  Generate zsh completions:\n    modfold completions --shell zsh > ~/.zfunc/_modfold\n\n\
                  Generate fish completions:\n    modfold completions --shell fish > ~/.config/fish/completions/modfold.fish")]
pub struct CompletionsArgs {
    /// Shell type
    #[arg(long, short = 's', value_enum)]
    pub shell: Shell,
}
