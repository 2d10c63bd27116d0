//! Error types for graft-git.

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during git backend operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Not inside a git repository.
    #[error("not a git repository")]
    NotARepository,

    /// Branch not found.
    #[error("branch not found: {0}")]
    BranchNotFound(String),

    /// Reference not found.
    #[error("reference not found: {0}")]
    RefNotFound(String),

    /// HEAD is detached (not on a branch).
    #[error("HEAD is detached - checkout a branch first")]
    DetachedHead,

    /// Cherry-pick left unresolved conflicts in the working tree.
    #[error("cherry-pick conflict in: {0:?}")]
    CherryPickConflict(Vec<String>),

    /// No remote is configured.
    #[error("no remote configured for this repository")]
    NoRemote,

    /// Push failed.
    #[error("push failed: {0}")]
    PushFailed(String),

    /// Underlying git2 error.
    #[error("git error: {0}")]
    Git2(#[from] git2::Error),
}
