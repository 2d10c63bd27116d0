//! Update service for rebuilding the local tree to match the remote.
//!
//! This service encapsulates the business logic for the update command,
//! accepting trait-based dependencies for testability.

use std::time::Duration;

use anyhow::{Context, Result, bail};
use graft_core::{CommitGraph, Progress, ReconstructOptions, ReconstructReport, Reconstructor, verify};
use graft_git::{GitBackend, Oid};

/// Result of update planning: both trees and the ancestor they share.
#[derive(Debug)]
pub struct UpdatePlan {
    /// Common ancestor of all local branches and their remote counterparts.
    pub ancestor: Oid,
    /// The remote-derived ideal tree, labeled with the local branch names.
    pub remote_tree: CommitGraph,
    /// The current local tree, verified and kept for display.
    pub local_tree: CommitGraph,
}

/// Service for the update flow with trait-based dependencies.
pub struct UpdateService<'a, G: GitBackend> {
    backend: &'a G,
}

impl<'a, G: GitBackend> UpdateService<'a, G> {
    /// Create a new update service.
    #[must_use]
    pub const fn new(backend: &'a G) -> Self {
        Self { backend }
    }

    /// Validate inputs and build both trees. Performs no mutation.
    ///
    /// Every branch must exist locally and have a counterpart on the
    /// configured remote; both the remote-derived tree and the local tree
    /// must pass structural verification before anything is replayed.
    pub fn plan(&self, branches: &[String]) -> Result<UpdatePlan> {
        for name in branches {
            if !self.backend.branch_exists(name, false) {
                bail!("'{name}' is not a name of an existing local branch");
            }
            if !self.backend.branch_exists(name, true) {
                bail!("'{name}' does not have a remote branch");
            }
        }

        let remote = self
            .backend
            .remote_name()
            .context("update requires a configured remote")?;
        let remote_refs: Vec<String> = branches
            .iter()
            .map(|b| format!("{remote}/{b}"))
            .collect();

        let mut all_refs = branches.to_vec();
        all_refs.extend(remote_refs.iter().cloned());
        let ancestor = self.backend.common_ancestor(&all_refs)?;

        let remote_pairs: Vec<(String, String)> = branches
            .iter()
            .cloned()
            .zip(remote_refs)
            .collect();
        let remote_tree = CommitGraph::build(self.backend, ancestor, &remote_pairs)?;
        verify(&remote_tree)?;

        let local_tree = self.snapshot(ancestor, branches)?;
        verify(&local_tree)?;

        Ok(UpdatePlan {
            ancestor,
            remote_tree,
            local_tree,
        })
    }

    /// Replay the remote-derived tree onto the local repository.
    pub fn execute(
        &self,
        plan: &UpdatePlan,
        conflict_timeout: Duration,
        progress: &dyn Progress,
    ) -> Result<ReconstructReport> {
        let options = ReconstructOptions {
            root_base: None,
            conflict_timeout,
        };
        let report = Reconstructor::new(self.backend, progress).run(&plan.remote_tree, &options)?;
        Ok(report)
    }

    /// Build the current local tree over `ancestor` (for display).
    pub fn snapshot(&self, ancestor: Oid, branches: &[String]) -> Result<CommitGraph> {
        let pairs: Vec<(String, String)> = branches
            .iter()
            .map(|b| (b.clone(), b.clone()))
            .collect();
        Ok(CommitGraph::build(self.backend, ancestor, &pairs)?)
    }
}
