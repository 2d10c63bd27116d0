//! Graft CLI - rebuild stacked branch trees after history edits.

use clap::Parser;

mod commands;
mod output;
mod services;

use commands::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    let timeout = cli.conflict_resolution_timeout;

    let result = match cli.command {
        Commands::Update {
            branches,
            push,
            json,
        } => commands::update::run(&branches, timeout, push, json),
        Commands::Rebase {
            onto,
            wo_root,
            branches,
            push,
            json,
        } => commands::rebase::run(&branches, onto.as_deref(), wo_root, timeout, push, json),
        Commands::Completions { shell } => commands::completions::run(shell),
    };

    if let Err(e) = result {
        output::error(&e.to_string());
        std::process::exit(1);
    }
}
