//! Bounded wait for an external actor to resolve a cherry-pick conflict.

use std::thread;
use std::time::{Duration, Instant};

use graft_git::GitBackend;

use crate::error::{Error, Result};

/// Interval between working-tree polls.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Block until the working tree is clean again or `timeout` elapses.
///
/// Called after a cherry-pick reported a content conflict. An external actor
/// (a human, or an automated resolver on its own thread of control) is
/// expected to fix the conflict and commit the result, at which point the
/// working tree becomes clean and replay can continue.
///
/// # Errors
/// Returns [`Error::ConflictTimeout`] wrapping the original `conflict` if
/// the tree is still dirty when the timeout elapses; backend status failures
/// propagate as-is.
pub fn wait_for_resolution<G: GitBackend>(
    backend: &G,
    timeout: Duration,
    conflict: graft_git::Error,
) -> Result<()> {
    let deadline = Instant::now() + timeout;

    while backend.working_tree_has_unresolved_changes()? {
        if Instant::now() >= deadline {
            return Err(Error::ConflictTimeout { source: conflict });
        }
        thread::sleep(POLL_INTERVAL);
    }

    Ok(())
}
