use std::time::Duration;

use anyhow::{Context, Result};
use graft_core::Config;
use graft_git::{GitBackend, Repository};

use crate::output;

/// Helper to open the repository and its configuration.
pub fn open_repo_and_config() -> Result<(Repository, Config)> {
    let repo = Repository::open_current().context("Not inside a git repository")?;
    let config = Config::load_from_git_dir(repo.git_dir())?;
    Ok((repo, config))
}

/// Resolve the conflict timeout from the CLI flag, falling back to config.
pub const fn conflict_timeout(flag_secs: Option<u64>, config: &Config) -> Duration {
    match flag_secs {
        Some(secs) => Duration::from_secs(secs),
        None => Duration::from_secs(config.general.conflict_timeout_secs),
    }
}

/// Force-push every rebuilt branch to the configured remote.
pub fn push_branches(repo: &Repository, branches: &[String], json: bool) -> Result<()> {
    let remote = repo
        .remote_name()
        .context("--push requires a configured remote")?;
    for branch in branches {
        repo.push(&remote, branch, true)?;
        if !json {
            output::detail(&format!("pushed {branch} to {remote}"));
        }
    }
    Ok(())
}
