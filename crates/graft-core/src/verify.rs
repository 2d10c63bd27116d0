//! Structural verification of a built commit tree.

use crate::error::{Error, Result};
use crate::graph::CommitGraph;

/// Reject trees the engine cannot safely reconstruct.
///
/// Walks every node of the tree and fails closed on the first merge commit
/// or multi-labeled commit. This check must fully complete before any
/// backend-mutating call is issued; it is the sole gate protecting the
/// repository from a partially-understood source structure.
///
/// # Errors
/// Returns [`Error::MergeCommit`] or [`Error::MultipleLabels`] naming the
/// offending commit. Label lists are sorted for deterministic messages.
pub fn verify(tree: &CommitGraph) -> Result<()> {
    for node in tree.nodes() {
        if node.is_merge {
            return Err(Error::MergeCommit { id: node.id });
        }
        if node.labels.len() > 1 {
            let mut labels = node.labels.clone();
            labels.sort();
            return Err(Error::MultipleLabels { id: node.id, labels });
        }
    }
    Ok(())
}
