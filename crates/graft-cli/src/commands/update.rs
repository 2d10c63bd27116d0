//! `graft update` command - rebuild the local branch structure to reflect
//! the remote structure.

use anyhow::Result;
use chrono::{DateTime, Utc};
use graft_core::{Progress, SilentProgress};
use serde::Serialize;

use crate::commands::utils;
use crate::output;
use crate::services::UpdateService;

/// JSON output for the update command.
#[derive(Debug, Serialize)]
struct UpdateOutput {
    status: &'static str,
    branches: Vec<String>,
    segments_replayed: usize,
    commits_replayed: usize,
    started_at: DateTime<Utc>,
}

/// Run the update command.
pub fn run(branches: &[String], timeout_secs: Option<u64>, push: bool, json: bool) -> Result<()> {
    let (repo, config) = utils::open_repo_and_config()?;
    let service = UpdateService::new(&repo);

    let plan = service.plan(branches)?;

    if !json {
        output::info("Remote tree:");
        output::print_tree(&plan.remote_tree);
        output::info("Local tree:");
        output::print_tree(&plan.local_tree);
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
        let out = UpdateOutput {
            status: "updated",
            branches: report.branches,
            segments_replayed: report.segments_replayed,
            commits_replayed: report.commits_replayed,
            started_at: report.started_at,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        output::info("Updated local tree:");
        output::print_tree(&service.snapshot(plan.ancestor, branches)?);
        output::success(&format!("Updated {} branch(es)", report.branches.len()));
    }

    Ok(())
}
