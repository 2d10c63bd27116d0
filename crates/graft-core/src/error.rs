//! Error types for graft-core.

use graft_git::Oid;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in graft-core operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The tree contains a merge commit.
    #[error("commit {id} is a merge - merge commits are not supported")]
    MergeCommit {
        /// The offending commit.
        id: Oid,
    },

    /// A commit carries more than one branch label.
    #[error(
        "commit {id} has references [{}] - commits with multiple references are not supported",
        .labels.join(",")
    )]
    MultipleLabels {
        /// The offending commit.
        id: Oid,
        /// All labels on the commit, sorted.
        labels: Vec<String>,
    },

    /// A cherry-pick conflict was not resolved within the configured timeout.
    #[error("conflict not resolved in time")]
    ConflictTimeout {
        /// The original cherry-pick conflict.
        #[source]
        source: graft_git::Error,
    },

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error.
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Git backend error.
    #[error("git error: {0}")]
    Git(#[from] graft_git::Error),
}
