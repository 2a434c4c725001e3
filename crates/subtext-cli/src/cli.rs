use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    author = "bahdotsh",
    version = env!("CARGO_PKG_VERSION"),
    about = "subtext - a text replacement tool",
    long_about = "subtext watches what you type and swaps short triggers for the text they stand for. Run it with no arguments to start the replacer and its command shell."
)]
pub struct Subtext {
    #[clap(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a replacement rule
    Add {
        #[clap(long, short = 't', help = "Trigger to watch for")]
        trigger: String,

        #[clap(long, short = 'x', help = "Text the trigger expands to")]
        text: String,
    },
    /// Remove a replacement rule by trigger
    Remove {
        #[clap(long, short, help = "Trigger of the rule to remove")]
        trigger: String,
    },
    /// List all replacement rules
    List,
    /// Show usage statistics
    Stats,
}
