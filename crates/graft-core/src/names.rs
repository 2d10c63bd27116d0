//! Collision-free temporary branch names.

use std::collections::HashMap;

use graft_git::GitBackend;

/// Allocates temporary branch names for the duration of one reconstruction
/// run.
///
/// Names follow the pattern `<label>-tmp-N`. The probe counter is owned by
/// the allocator and keeps counting across labels, so indices already found
/// occupied are never revisited. Repeated calls for the same label return
/// the same name.
#[derive(Debug, Default)]
pub struct TempNames {
    next_index: usize,
    assigned: HashMap<String, String>,
}

impl TempNames {
    /// Create a fresh allocator for one run.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a branch name guaranteed not to collide with any existing
    /// local branch, stable for this label for the rest of the run.
    pub fn allocate<G: GitBackend>(&mut self, backend: &G, label: &str) -> String {
        if let Some(name) = self.assigned.get(label) {
            return name.clone();
        }

        loop {
            let name = format!("{label}-tmp-{}", self.next_index);
            if backend.branch_exists(&name, false) {
                self.next_index += 1;
                continue;
            }
            self.assigned.insert(label.to_string(), name.clone());
            return name;
        }
    }
}
