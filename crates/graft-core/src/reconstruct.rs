//! Reconstruction orchestrator.
//!
//! Consumes segments in extractor order, rebuilds every labeled branch on a
//! temporary name by cherry-picking the segment's commits, and finally swaps
//! the temporaries into place with a delete-then-rename pass. No original
//! branch is destroyed before its replacement is fully built, and no two
//! branches ever hold the same name.

use std::time::Duration;

use chrono::{DateTime, Utc};
use graft_git::{GitBackend, Oid};
use serde::Serialize;

use crate::config::DEFAULT_CONFLICT_TIMEOUT_SECS;
use crate::error::Result;
use crate::graph::CommitGraph;
use crate::names::TempNames;
use crate::segment::{Segment, segments};
use crate::waiter;

/// Observer for reconstruction progress.
///
/// The engine itself stays silent; the CLI renders these events and tests
/// pass [`SilentProgress`].
pub trait Progress {
    /// A segment is about to be replayed onto the branch `onto`.
    fn segment_started(&self, _segment: &Segment, _onto: &str) {}

    /// One commit was replayed onto the current temporary branch.
    fn commit_replayed(&self, _id: Oid, _summary: &str) {}

    /// A cherry-pick hit a content conflict; the engine now waits for an
    /// external actor to resolve it.
    fn conflict_detected(&self, _id: Oid, _files: &[String]) {}

    /// The working tree is clean again; replay continues.
    fn conflict_resolved(&self) {}
}

/// [`Progress`] implementation that reports nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentProgress;

impl Progress for SilentProgress {}

/// Options for one reconstruction run.
#[derive(Debug, Clone)]
pub struct ReconstructOptions {
    /// Branch substituted as the start point for segments that begin exactly
    /// at the tree root. `Some` for the rebase variants, `None` for the
    /// update flow.
    pub root_base: Option<String>,

    /// How long to wait for an external actor to resolve a conflict.
    pub conflict_timeout: Duration,
}

impl Default for ReconstructOptions {
    fn default() -> Self {
        Self {
            root_base: None,
            conflict_timeout: Duration::from_secs(DEFAULT_CONFLICT_TIMEOUT_SECS),
        }
    }
}

/// Summary of a completed reconstruction.
#[derive(Debug, Clone, Serialize)]
pub struct ReconstructReport {
    /// Rebuilt branches, in replay order.
    pub branches: Vec<String>,

    /// Number of segments replayed.
    pub segments_replayed: usize,

    /// Number of commits cherry-picked.
    pub commits_replayed: usize,

    /// When the run started.
    pub started_at: DateTime<Utc>,
}

/// Mapping from original branch name to its temporary replacement.
///
/// Insertion order is preserved; it is also the order of the finalization
/// passes.
#[derive(Debug, Default)]
struct NameMap {
    entries: Vec<(String, String)>,
}

impl NameMap {
    fn get(&self, original: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(o, _)| o == original)
            .map(|(_, t)| t.as_str())
    }

    fn insert(&mut self, original: String, temporary: String) {
        self.entries.push((original, temporary));
    }
}

/// Replays a verified tree against the backend.
pub struct Reconstructor<'a, G: GitBackend> {
    backend: &'a G,
    progress: &'a dyn Progress,
}

impl<'a, G: GitBackend> Reconstructor<'a, G> {
    /// Create a new reconstructor.
    #[must_use]
    pub const fn new(backend: &'a G, progress: &'a dyn Progress) -> Self {
        Self { backend, progress }
    }

    /// Rebuild every labeled branch of `tree` so that it points at the
    /// commit sequence the tree implies.
    ///
    /// The tree must have passed [`crate::verify::verify`]. Each segment is
    /// replayed onto a freshly allocated temporary branch; once every
    /// segment is done, all original branches are deleted and the
    /// temporaries renamed into place. Deletion of all originals completes
    /// before any rename begins, so a rename can never find its destination
    /// name occupied.
    ///
    /// # Errors
    /// Propagates backend failures, and [`crate::Error::ConflictTimeout`]
    /// when a cherry-pick conflict is not resolved in time. On error,
    /// already-created temporary branches are left in place for inspection;
    /// there is no automatic rollback.
    pub fn run(
        &self,
        tree: &CommitGraph,
        options: &ReconstructOptions,
    ) -> Result<ReconstructReport> {
        let started_at = Utc::now();
        let mut names = NameMap::default();
        let mut temp_names = TempNames::new();
        let mut segments_replayed = 0;
        let mut commits_replayed = 0;

        for segment in segments(tree) {
            let onto = match names.get(&segment.end_label) {
                // A previous segment already ended at this label; reuse its
                // temporary.
                Some(existing) => {
                    let existing = existing.to_string();
                    self.backend.checkout(&existing)?;
                    existing
                }
                None => {
                    let temporary = temp_names.allocate(self.backend, &segment.end_label);
                    let start_point = start_point(&segment, tree, options, &names);
                    self.backend.create_branch(&temporary, &start_point)?;
                    names.insert(segment.end_label.clone(), temporary.clone());
                    temporary
                }
            };

            self.progress.segment_started(&segment, &onto);
            commits_replayed += self.replay(&segment, options.conflict_timeout)?;
            segments_replayed += 1;
        }

        // All originals must be gone before any temporary takes a name back.
        for (original, _) in &names.entries {
            self.backend.delete_branch(original)?;
        }
        for (original, temporary) in &names.entries {
            self.backend.rename_branch(temporary, original)?;
        }

        Ok(ReconstructReport {
            branches: names.entries.into_iter().map(|(o, _)| o).collect(),
            segments_replayed,
            commits_replayed,
            started_at,
        })
    }

    /// Cherry-pick the commits of one segment, oldest first, onto the
    /// currently checked-out temporary branch.
    fn replay(&self, segment: &Segment, timeout: Duration) -> Result<usize> {
        let range = self
            .backend
            .log_range(&segment.start_id.to_string(), &segment.end_label)?;

        for entry in range.iter().rev() {
            match self.backend.cherry_pick(entry.id) {
                Ok(_) => self.progress.commit_replayed(entry.id, &entry.summary),
                Err(graft_git::Error::CherryPickConflict(files)) => {
                    self.progress.conflict_detected(entry.id, &files);
                    waiter::wait_for_resolution(
                        self.backend,
                        timeout,
                        graft_git::Error::CherryPickConflict(files),
                    )?;
                    self.progress.conflict_resolved();
                }
                Err(e) => return Err(e.into()),
            }
        }

        Ok(range.len())
    }
}

/// Resolve what the new temporary branch for `segment` is created from.
fn start_point(
    segment: &Segment,
    tree: &CommitGraph,
    options: &ReconstructOptions,
    names: &NameMap,
) -> String {
    if let Some(base) = &options.root_base {
        if segment.start_id == tree.root().id {
            return base.clone();
        }
    }

    if let Some(label) = &segment.start_label {
        if let Some(temporary) = names.get(label) {
            return temporary.to_string();
        }
        return label.clone();
    }

    // Unlabeled root in the update flow: start from the raw commit.
    segment.start_id.to_string()
}
