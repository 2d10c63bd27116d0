//! Breadth-first decomposition of a commit tree into replayable segments.

use std::collections::VecDeque;

use graft_git::Oid;

use crate::graph::{CommitGraph, NodeId};

/// One contiguous, independently replayable run of history between two
/// labeled points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Branch name on the ancestor side; `None` when the run starts at an
    /// unlabeled processing root.
    pub start_label: Option<String>,

    /// Commit the run starts after (exclusive).
    pub start_id: Oid,

    /// Branch name on the target side.
    pub end_label: String,

    /// Commit the end label points at.
    pub end_id: Oid,
}

/// A queued traversal position: a node plus the "currently open" segment
/// start inherited from its nearest labeled ancestor.
#[derive(Debug, Clone)]
struct Entry {
    node: NodeId,
    open_label: Option<String>,
    open_id: Oid,
}

/// Lazy breadth-first iterator over the segments of a tree.
///
/// Finite and non-restartable. Segments come out in a deterministic order
/// in which every segment's start label has already been produced as an end
/// label by an earlier segment, or belongs to the processing root. Unlabeled
/// commits are carried silently inside a segment's span; no segment is ever
/// emitted between two consecutive unlabeled nodes.
pub struct Segments<'a> {
    tree: &'a CommitGraph,
    queue: VecDeque<Entry>,
    emitted: VecDeque<Segment>,
}

/// Decompose `tree` into segments, breadth-first from the root.
#[must_use]
pub fn segments(tree: &CommitGraph) -> Segments<'_> {
    let root = tree.root();
    let mut queue = VecDeque::new();
    queue.push_back(Entry {
        node: tree.root_id(),
        open_label: root.first_label().map(ToString::to_string),
        open_id: root.id,
    });

    Segments {
        tree,
        queue,
        emitted: VecDeque::new(),
    }
}

impl Iterator for Segments<'_> {
    type Item = Segment;

    fn next(&mut self) -> Option<Segment> {
        let tree = self.tree;
        loop {
            if let Some(segment) = self.emitted.pop_front() {
                return Some(segment);
            }

            let parent = self.queue.pop_front()?;
            let root = tree.root();

            for &child_id in &tree.node(parent.node).children {
                let child = tree.node(child_id);
                let entry = if child.labels.is_empty() {
                    // Unlabeled commits extend the open run.
                    Entry {
                        node: child_id,
                        open_label: parent.open_label.clone(),
                        open_id: parent.open_id,
                    }
                } else {
                    // A labeled commit closes the open run and starts a new
                    // one at itself.
                    Entry {
                        node: child_id,
                        open_label: child.first_label().map(ToString::to_string),
                        open_id: child.id,
                    }
                };

                match (&entry.open_label, &parent.open_label) {
                    (Some(end), Some(start)) if end != start => {
                        self.emitted.push_back(Segment {
                            start_label: Some(start.clone()),
                            start_id: parent.open_id,
                            end_label: end.clone(),
                            end_id: entry.open_id,
                        });
                    }
                    // Root-adjacent rule: the first labeled commit below the
                    // processing root still closes a segment even when the
                    // root carries no label of its own.
                    (Some(end), _) if parent.open_id == root.id => {
                        self.emitted.push_back(Segment {
                            start_label: root.first_label().map(ToString::to_string),
                            start_id: root.id,
                            end_label: end.clone(),
                            end_id: entry.open_id,
                        });
                    }
                    _ => {}
                }

                self.queue.push_back(entry);
            }
        }
    }
}
