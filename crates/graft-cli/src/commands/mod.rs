//! Command-line interface definitions and command entry points.

use clap::{Parser, Subcommand};

pub mod completions;
pub mod rebase;
pub mod update;
pub mod utils;

/// Utility for working on git tree/chain branches.
#[derive(Debug, Parser)]
#[command(
    name = "graft",
    version,
    about = "Rebuild stacked branch trees by replaying each branch onto its updated base"
)]
pub struct Cli {
    /// Seconds to wait for conflicts to be resolved before failing
    #[arg(
        long = "conflict_resolution_timeout",
        global = true,
        value_name = "SECONDS"
    )]
    pub conflict_resolution_timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Update the local branch structure to reflect the remote structure
    Update {
        /// Local branches that are part of the tree/chain (each must have a
        /// remote branch)
        #[arg(value_name = "branch-name", required = true)]
        branches: Vec<String>,

        /// Force-push the rebuilt branches to the remote afterwards
        #[arg(long)]
        push: bool,

        /// Print a machine-readable summary instead of trees
        #[arg(long)]
        json: bool,
    },

    /// Rebase a local branch structure onto another local branch
    Rebase {
        /// Branch to rebase onto (defaults to the configured base branch)
        #[arg(long, value_name = "new-base-branch")]
        onto: Option<String>,

        /// Skip the root branch of the structure to rebase
        #[arg(long = "wo-root")]
        wo_root: bool,

        /// Local branches that are part of the tree/chain
        #[arg(value_name = "branch-name", required = true)]
        branches: Vec<String>,

        /// Force-push the rebuilt branches to the remote afterwards
        #[arg(long)]
        push: bool,

        /// Print a machine-readable summary instead of trees
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}
