//! Trait abstractions for git backend operations.
//!
//! This module defines the `GitBackend` trait which abstracts the git
//! operations the reconstruction engine relies on, enabling dependency
//! injection and testability.

use git2::Oid;

use crate::Result;

/// One commit as returned by a log query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Full commit id.
    pub id: Oid,

    /// Parent commit ids, in recorded order. More than one marks a merge.
    pub parent_ids: Vec<Oid>,

    /// First line of the commit message.
    pub summary: String,
}

/// Trait for git backend operations.
///
/// This trait abstracts git operations, allowing for:
/// - Dependency injection in services and the reconstruction engine
/// - Mock implementations for testing
///
/// Operations are synchronous since git2 is a synchronous library.
#[allow(clippy::missing_errors_doc)]
pub trait GitBackend {
    // === Working tree ===

    /// Switch the working tree to `refname`.
    fn checkout(&self, refname: &str) -> Result<()>;

    /// Whether the working tree has unresolved or uncommitted changes
    /// (porcelain status non-empty).
    fn working_tree_has_unresolved_changes(&self) -> Result<bool>;

    // === Branch operations ===

    /// Create branch `name` at `start_ref` and check it out.
    fn create_branch(&self, name: &str, start_ref: &str) -> Result<()>;

    /// Delete the local branch `name`.
    fn delete_branch(&self, name: &str) -> Result<()>;

    /// Rename the local branch `from` to `to`.
    fn rename_branch(&self, from: &str, to: &str) -> Result<()>;

    /// Check whether a local branch (or, with `remote`, a remote-tracking
    /// branch on the first configured remote) with this name exists.
    fn branch_exists(&self, name: &str, remote: bool) -> bool;

    // === History queries ===

    /// Commits reachable from `end` but not from `start`, newest first.
    fn log_range(&self, start: &str, end: &str) -> Result<Vec<LogEntry>>;

    /// Metadata for the single commit `refname` points at.
    fn log_single(&self, refname: &str) -> Result<LogEntry>;

    /// Resolve a reference (branch, tag, or hash) to a commit id.
    fn ref_hash(&self, refname: &str) -> Result<Oid>;

    /// The best common ancestor of all given refs (octopus merge-base).
    fn common_ancestor(&self, refs: &[String]) -> Result<Oid>;

    // === Content replay ===

    /// Apply the change introduced by `id` onto the current branch tip,
    /// committing the result with the original author and message.
    ///
    /// Returns the id of the newly created commit. A content conflict is
    /// reported as [`crate::Error::CherryPickConflict`] with the conflicted
    /// paths, leaving the resolution state in the working tree for an
    /// external actor to fix and commit.
    fn cherry_pick(&self, id: Oid) -> Result<Oid>;

    // === Remote operations ===

    /// Name of the first configured remote.
    fn remote_name(&self) -> Result<String>;

    /// Push `branch` to `remote`, optionally forced.
    fn push(&self, remote: &str, branch: &str, force: bool) -> Result<()>;
}
