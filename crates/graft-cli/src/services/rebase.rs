//! Rebase service for moving a local branch structure onto another branch.
//!
//! Two variants share the same replay protocol and differ only in how the
//! common ancestor is computed: the default includes the base branch, so the
//! whole structure (root branch included) moves onto the base; `--wo-root`
//! computes the ancestor from the listed branches alone, leaving the root
//! branch untouched and reattaching its descendants directly onto the base.

use std::time::Duration;

use anyhow::{Result, bail};
use graft_core::{CommitGraph, Progress, ReconstructOptions, ReconstructReport, Reconstructor, verify};
use graft_git::{GitBackend, Oid};

/// Configuration for a rebase operation.
#[derive(Debug, Clone)]
pub struct RebaseConfig {
    /// The branch to rebase onto.
    pub onto: String,
    /// Skip the root branch of the structure.
    pub without_root: bool,
}

/// Result of rebase planning.
#[derive(Debug)]
pub struct RebasePlan {
    /// Common ancestor the tree was built from.
    pub ancestor: Oid,
    /// The verified local tree to replay.
    pub tree: CommitGraph,
    /// The base branch substituted at the tree's root.
    pub onto: String,
}

/// Service for rebase operations with trait-based dependencies.
pub struct RebaseService<'a, G: GitBackend> {
    backend: &'a G,
}

impl<'a, G: GitBackend> RebaseService<'a, G> {
    /// Create a new rebase service.
    #[must_use]
    pub const fn new(backend: &'a G) -> Self {
        Self { backend }
    }

    /// Validate inputs and build the local tree. Performs no mutation.
    pub fn plan(&self, branches: &[String], config: &RebaseConfig) -> Result<RebasePlan> {
        for name in branches {
            if !self.backend.branch_exists(name, false) {
                bail!("'{name}' is not a name of an existing local branch");
            }
        }
        if !self.backend.branch_exists(&config.onto, false) {
            bail!(
                "'{}' is not a name of an existing local branch",
                config.onto
            );
        }

        let ancestor = if config.without_root {
            self.backend.common_ancestor(branches)?
        } else {
            let mut refs = branches.to_vec();
            refs.push(config.onto.clone());
            self.backend.common_ancestor(&refs)?
        };

        let pairs: Vec<(String, String)> = branches
            .iter()
            .map(|b| (b.clone(), b.clone()))
            .collect();
        let tree = CommitGraph::build(self.backend, ancestor, &pairs)?;
        verify(&tree)?;

        Ok(RebasePlan {
            ancestor,
            tree,
            onto: config.onto.clone(),
        })
    }

    /// Replay the tree with the base branch substituted at its root.
    pub fn execute(
        &self,
        plan: &RebasePlan,
        conflict_timeout: Duration,
        progress: &dyn Progress,
    ) -> Result<ReconstructReport> {
        let options = ReconstructOptions {
            root_base: Some(plan.onto.clone()),
            conflict_timeout,
        };
        let report = Reconstructor::new(self.backend, progress).run(&plan.tree, &options)?;
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
