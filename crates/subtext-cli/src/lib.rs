pub mod cli;
pub mod commands;
pub mod shell;
pub mod utils;

use clap::Parser;

/// Entry point shared by the `subtext` and `subtext-cli` binaries.
pub fn run() -> subtext_core::Result<()> {
    let args = cli::Subtext::parse();
    commands::handle_command(args.command)
}
