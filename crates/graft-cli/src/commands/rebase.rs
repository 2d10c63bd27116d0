//! `graft rebase` command - rebase a local branch structure onto another
//! local branch.

use anyhow::Result;
use chrono::{DateTime, Utc};
use graft_core::{Progress, SilentProgress};
use serde::Serialize;

use crate::commands::utils;
use crate::output;
use crate::services::{RebaseConfig, RebaseService};

/// JSON output for the rebase command.
#[derive(Debug, Serialize)]
struct RebaseOutput {
    status: &'static str,
    onto: String,
    branches: Vec<String>,
    segments_replayed: usize,
    commits_replayed: usize,
    started_at: DateTime<Utc>,
}

/// Run the rebase command.
pub fn run(
    branches: &[String],
    onto: Option<&str>,
    without_root: bool,
    timeout_secs: Option<u64>,
    push: bool,
    json: bool,
) -> Result<()> {
    let (repo, config) = utils::open_repo_and_config()?;
    let service = RebaseService::new(&repo);

    let rebase_config = RebaseConfig {
        onto: onto.map_or_else(|| config.general.default_base.clone(), ToString::to_string),
        without_root,
    };
    let plan = service.plan(branches, &rebase_config)?;

    if !json {
        output::info("Local tree:");
        output::print_tree(&plan.tree);
    }

    let timeout = utils::conflict_timeout(timeout_secs, &config);
    let silent = SilentProgress;
    let console = output::ConsoleProgress;
    let progress: &dyn Progress = if json { &silent } else { &console };

    let report = service.execute(&plan, timeout, progress)?;

    if push {
        utils::push_branches(&repo, &report.branches, json)?;
    }

    if json {
        let out = RebaseOutput {
            status: "rebased",
            onto: plan.onto,
            branches: report.branches,
            segments_replayed: report.segments_replayed,
            commits_replayed: report.commits_replayed,
            started_at: report.started_at,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        output::info("Rebased local tree:");
        output::print_tree(&service.snapshot(plan.ancestor, branches)?);
        output::success(&format!(
            "Rebased {} branch(es) onto '{}'",
            report.branches.len(),
            plan.onto
        ));
    }

    Ok(())
}
