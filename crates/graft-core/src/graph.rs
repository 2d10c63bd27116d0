//! Commit tree model and builder.
//!
//! Queries the backend for the commit history between a common ancestor and
//! each named branch, and assembles an arena-indexed tree of commits linked
//! by child indices, with branch labels attached to the commits they
//! currently point at.

use std::collections::HashMap;

use graft_git::{GitBackend, LogEntry, Oid};

use crate::error::Result;

/// Index of a node in a [`CommitGraph`] arena.
pub type NodeId = usize;

/// One commit in the tree.
#[derive(Debug, Clone)]
pub struct CommitNode {
    /// Full commit id.
    pub id: Oid,

    /// First line of the commit message.
    pub summary: String,

    /// Branch labels currently pointing at this commit. Verification
    /// guarantees at most one.
    pub labels: Vec<String>,

    /// Whether the commit has more than one parent.
    pub is_merge: bool,

    /// Children of this commit, as arena indices.
    pub children: Vec<NodeId>,
}

impl CommitNode {
    /// The label attached to this commit, if any.
    #[must_use]
    pub fn first_label(&self) -> Option<&str> {
        self.labels.first().map(String::as_str)
    }
}

/// A single-rooted tree of commits, stored as an arena.
///
/// The root is the common ancestor of every branch being processed. The
/// tree is built once per operation and discarded afterwards; it is never
/// mutated after construction.
#[derive(Debug)]
pub struct CommitGraph {
    nodes: Vec<CommitNode>,
    root: NodeId,
}

impl CommitGraph {
    /// Build the tree of commits reachable from any of the given references
    /// and not reachable from `ancestor`, with the ancestor itself as root.
    ///
    /// Each `(label, reference)` pair attaches `label` to the tip of
    /// `reference`. For the update flow the reference is remote-qualified
    /// while the label stays the local branch name; everywhere else the two
    /// coincide. A label whose reference points directly at the ancestor is
    /// attached to the root.
    ///
    /// # Errors
    /// Returns error if the ancestor or any reference cannot be resolved by
    /// the backend (the inputs do not share enough history).
    pub fn build<G: GitBackend>(
        backend: &G,
        ancestor: Oid,
        labeled_refs: &[(String, String)],
    ) -> Result<Self> {
        // The root's own parents are irrelevant; the tree stops at the
        // ancestor.
        let root_entry = backend.log_single(&ancestor.to_string())?;
        let mut entries = vec![LogEntry {
            parent_ids: Vec::new(),
            ..root_entry
        }];
        let mut labels: Vec<Vec<String>> = vec![Vec::new()];
        let mut index: HashMap<Oid, NodeId> = HashMap::from([(ancestor, 0)]);

        // Labels pointing directly at the ancestor belong to the root.
        for (label, reference) in labeled_refs {
            if backend.ref_hash(reference)? == ancestor {
                labels[0].push(label.clone());
            }
        }

        for (label, reference) in labeled_refs {
            let range = backend.log_range(&ancestor.to_string(), reference)?;

            for entry in &range {
                if !index.contains_key(&entry.id) {
                    index.insert(entry.id, entries.len());
                    entries.push(entry.clone());
                    labels.push(Vec::new());
                }
            }

            // The range is ordered latest-to-earliest, so the first entry is
            // the branch tip.
            if let Some(tip) = range.first() {
                labels[index[&tip.id]].push(label.clone());
            }
        }

        let mut nodes: Vec<CommitNode> = entries
            .iter()
            .zip(labels)
            .map(|(entry, labels)| CommitNode {
                id: entry.id,
                summary: entry.summary.clone(),
                labels,
                is_merge: entry.parent_ids.len() > 1,
                children: Vec::new(),
            })
            .collect();

        // Invert the stored parent ordering into child lists.
        for (child, entry) in entries.iter().enumerate() {
            for parent in &entry.parent_ids {
                if let Some(&parent_idx) = index.get(parent) {
                    nodes[parent_idx].children.push(child);
                }
            }
        }

        Ok(Self { nodes, root: 0 })
    }

    /// Arena index of the root node.
    #[must_use]
    pub const fn root_id(&self) -> NodeId {
        self.root
    }

    /// The root node (the common ancestor).
    #[must_use]
    pub fn root(&self) -> &CommitNode {
        &self.nodes[self.root]
    }

    /// Look up a node by arena index.
    ///
    /// # Panics
    /// Panics if `id` did not come from this graph.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &CommitNode {
        &self.nodes[id]
    }

    /// Iterate over all nodes in arena order (root first).
    pub fn nodes(&self) -> impl Iterator<Item = &CommitNode> {
        self.nodes.iter()
    }

    /// Number of commits in the tree, including the root.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree holds no commits. A built tree always has at least
    /// its root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Find the node a label is attached to.
    #[must_use]
    pub fn find_label(&self, label: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|n| n.labels.iter().any(|l| l == label))
    }

    #[cfg(test)]
    pub(crate) const fn from_parts(nodes: Vec<CommitNode>, root: NodeId) -> Self {
        Self { nodes, root }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_backend::{oid, MockBackend};

    fn entry(id: Oid, parents: &[Oid], summary: &str) -> LogEntry {
        LogEntry {
            id,
            parent_ids: parents.to_vec(),
            summary: summary.to_string(),
        }
    }

    /// ancestor(1) <- a1(2) <- a2(3) ["branch-a"], plus b1(4) ["branch-b"]
    /// stacked on a2.
    fn backend_with_stack() -> MockBackend {
        MockBackend::new()
            .with_commit(entry(oid(1), &[], "ancestor"))
            .with_ref("branch-a", oid(3))
            .with_ref("branch-b", oid(4))
            .with_range(
                oid(1),
                "branch-a",
                vec![entry(oid(3), &[oid(2)], "a2"), entry(oid(2), &[oid(1)], "a1")],
            )
            .with_range(
                oid(1),
                "branch-b",
                vec![
                    entry(oid(4), &[oid(3)], "b1"),
                    entry(oid(3), &[oid(2)], "a2"),
                    entry(oid(2), &[oid(1)], "a1"),
                ],
            )
    }

    fn pairs(names: &[&str]) -> Vec<(String, String)> {
        names
            .iter()
            .map(|n| ((*n).to_string(), (*n).to_string()))
            .collect()
    }

    #[test]
    fn test_build_deduplicates_shared_commits() {
        let backend = backend_with_stack();
        let tree =
            CommitGraph::build(&backend, oid(1), &pairs(&["branch-a", "branch-b"])).unwrap();

        // ancestor + a1 + a2 + b1, with the shared commits modeled once
        assert_eq!(tree.len(), 4);
        assert_eq!(tree.root().id, oid(1));
    }

    #[test]
    fn test_build_attaches_labels_to_tips() {
        let backend = backend_with_stack();
        let tree =
            CommitGraph::build(&backend, oid(1), &pairs(&["branch-a", "branch-b"])).unwrap();

        let a2 = tree.find_label("branch-a").map(|id| tree.node(id)).unwrap();
        assert_eq!(a2.id, oid(3));
        let b1 = tree.find_label("branch-b").map(|id| tree.node(id)).unwrap();
        assert_eq!(b1.id, oid(4));
        assert!(tree.root().labels.is_empty());
    }

    #[test]
    fn test_build_inverts_parent_edges() {
        let backend = backend_with_stack();
        let tree =
            CommitGraph::build(&backend, oid(1), &pairs(&["branch-a", "branch-b"])).unwrap();

        let mut at = tree.root();
        let expected = [oid(2), oid(3), oid(4)];
        for id in expected {
            assert_eq!(at.children.len(), 1);
            at = tree.node(at.children[0]);
            assert_eq!(at.id, id);
        }
        assert!(at.children.is_empty());
    }

    #[test]
    fn test_build_attaches_label_at_ancestor_to_root() {
        let backend = backend_with_stack().with_ref("base", oid(1));
        let mut refs = pairs(&["branch-a", "branch-b"]);
        refs.push(("base".to_string(), "base".to_string()));

        let tree = CommitGraph::build(&backend, oid(1), &refs).unwrap();
        assert_eq!(tree.root().labels, vec!["base".to_string()]);
    }

    #[test]
    fn test_build_marks_merge_commits() {
        let backend = MockBackend::new()
            .with_commit(entry(oid(1), &[], "ancestor"))
            .with_ref("feature", oid(4))
            .with_range(
                oid(1),
                "feature",
                vec![
                    entry(oid(4), &[oid(2), oid(3)], "merge"),
                    entry(oid(3), &[oid(1)], "right"),
                    entry(oid(2), &[oid(1)], "left"),
                ],
            );

        let tree =
            CommitGraph::build(&backend, oid(1), &pairs(&["feature"])).unwrap();

        let merge = tree.nodes().find(|n| n.id == oid(4)).unwrap();
        assert!(merge.is_merge);
        // the merge commit appears as a child of both parents
        let parents_of_merge = tree
            .nodes()
            .filter(|n| n.children.iter().any(|&c| tree.node(c).id == oid(4)))
            .count();
        assert_eq!(parents_of_merge, 2);
    }

    #[test]
    fn test_build_applies_separate_label_names() {
        // Update flow: remote refs are queried, local names are attached.
        let backend = MockBackend::new()
            .with_commit(entry(oid(1), &[], "ancestor"))
            .with_ref("origin/branch-a", oid(2))
            .with_range(
                oid(1),
                "origin/branch-a",
                vec![entry(oid(2), &[oid(1)], "a1")],
            );

        let refs = vec![("branch-a".to_string(), "origin/branch-a".to_string())];
        let tree = CommitGraph::build(&backend, oid(1), &refs).unwrap();

        let labeled = tree.find_label("branch-a").map(|id| tree.node(id)).unwrap();
        assert_eq!(labeled.id, oid(2));
    }

    #[test]
    fn test_build_fails_on_unresolvable_reference() {
        let backend = MockBackend::new().with_commit(entry(oid(1), &[], "ancestor"));
        let refs = vec![("ghost".to_string(), "ghost".to_string())];

        assert!(CommitGraph::build(&backend, oid(1), &refs).is_err());
    }
}
