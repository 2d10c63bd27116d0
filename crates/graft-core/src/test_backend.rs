//! Scripted in-memory backend for unit tests.
//!
//! Implements [`GitBackend`] over plain maps so the engine modules can be
//! tested without real repositories. Mutating operations are journaled into
//! `ops` so tests can assert on their order.

#![allow(clippy::unwrap_used)]

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet, VecDeque};

use graft_git::{Error, GitBackend, LogEntry, Oid, Result};

use crate::graph::{CommitNode, NodeId};

/// Deterministic 40-hex oid from a small number.
pub(crate) fn oid(n: u32) -> Oid {
    Oid::from_str(&format!("{n:040x}")).unwrap()
}

/// Arena node shorthand for hand-built trees.
pub(crate) fn node(id: Oid, labels: &[&str], children: &[NodeId]) -> CommitNode {
    CommitNode {
        id,
        summary: String::new(),
        labels: labels.iter().map(ToString::to_string).collect(),
        is_merge: false,
        children: children.to_vec(),
    }
}

/// Mock implementation of [`GitBackend`].
#[derive(Default)]
pub(crate) struct MockBackend {
    pub refs: RefCell<HashMap<String, Oid>>,
    pub local_branches: RefCell<HashSet<String>>,
    pub remote_branches: RefCell<HashSet<String>>,
    pub commits: RefCell<HashMap<Oid, LogEntry>>,
    pub ranges: RefCell<HashMap<(String, String), Vec<LogEntry>>>,
    pub conflict_on: RefCell<HashSet<Oid>>,
    pub failing_picks: RefCell<HashSet<Oid>>,
    pub unresolved_polls: RefCell<VecDeque<bool>>,
    pub always_unresolved: Cell<bool>,
    pub current: RefCell<String>,
    pub ops: RefCell<Vec<String>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ref(self, name: &str, id: Oid) -> Self {
        self.refs.borrow_mut().insert(name.to_string(), id);
        self
    }

    pub fn with_local_branch(self, name: &str) -> Self {
        self.local_branches.borrow_mut().insert(name.to_string());
        self
    }

    #[allow(dead_code)]
    pub fn with_remote_branch(self, name: &str) -> Self {
        self.remote_branches.borrow_mut().insert(name.to_string());
        self
    }

    pub fn with_commit(self, entry: LogEntry) -> Self {
        self.refs.borrow_mut().insert(entry.id.to_string(), entry.id);
        self.commits.borrow_mut().insert(entry.id, entry);
        self
    }

    pub fn with_range(self, start: Oid, end: &str, entries: Vec<LogEntry>) -> Self {
        self.ranges
            .borrow_mut()
            .insert((start.to_string(), end.to_string()), entries);
        self
    }

    pub fn with_conflict_on(self, id: Oid) -> Self {
        self.conflict_on.borrow_mut().insert(id);
        self
    }

    pub fn with_failing_pick(self, id: Oid) -> Self {
        self.failing_picks.borrow_mut().insert(id);
        self
    }

    pub fn with_unresolved_polls(self, polls: &[bool]) -> Self {
        self.unresolved_polls.borrow_mut().extend(polls);
        self
    }

    pub fn with_always_unresolved(self) -> Self {
        self.always_unresolved.set(true);
        self
    }

    fn resolve(&self, refname: &str) -> Result<Oid> {
        if let Some(id) = self.refs.borrow().get(refname) {
            return Ok(*id);
        }
        // Full hashes resolve to themselves, as they do in git.
        if refname.len() == 40 {
            if let Ok(id) = Oid::from_str(refname) {
                return Ok(id);
            }
        }
        Err(Error::RefNotFound(refname.to_string()))
    }
}

impl GitBackend for MockBackend {
    fn checkout(&self, refname: &str) -> Result<()> {
        if !self.local_branches.borrow().contains(refname) {
            return Err(Error::BranchNotFound(refname.to_string()));
        }
        self.ops.borrow_mut().push(format!("checkout {refname}"));
        *self.current.borrow_mut() = refname.to_string();
        Ok(())
    }

    fn working_tree_has_unresolved_changes(&self) -> Result<bool> {
        self.ops.borrow_mut().push("status".to_string());
        if self.always_unresolved.get() {
            return Ok(true);
        }
        Ok(self.unresolved_polls.borrow_mut().pop_front().unwrap_or(false))
    }

    fn create_branch(&self, name: &str, start_ref: &str) -> Result<()> {
        if self.local_branches.borrow().contains(name) {
            return Err(Error::Git2(git2::Error::from_str("branch already exists")));
        }
        let target = self.resolve(start_ref)?;
        self.local_branches.borrow_mut().insert(name.to_string());
        self.refs.borrow_mut().insert(name.to_string(), target);
        *self.current.borrow_mut() = name.to_string();
        self.ops
            .borrow_mut()
            .push(format!("create {name} from {start_ref}"));
        Ok(())
    }

    fn delete_branch(&self, name: &str) -> Result<()> {
        if !self.local_branches.borrow_mut().remove(name) {
            return Err(Error::BranchNotFound(name.to_string()));
        }
        self.refs.borrow_mut().remove(name);
        self.ops.borrow_mut().push(format!("delete {name}"));
        Ok(())
    }

    fn rename_branch(&self, from: &str, to: &str) -> Result<()> {
        if !self.local_branches.borrow().contains(from) {
            return Err(Error::BranchNotFound(from.to_string()));
        }
        if self.local_branches.borrow().contains(to) {
            return Err(Error::Git2(git2::Error::from_str("branch already exists")));
        }
        self.local_branches.borrow_mut().remove(from);
        self.local_branches.borrow_mut().insert(to.to_string());
        let id = self.refs.borrow_mut().remove(from);
        if let Some(id) = id {
            self.refs.borrow_mut().insert(to.to_string(), id);
        }
        self.ops.borrow_mut().push(format!("rename {from} -> {to}"));
        Ok(())
    }

    fn branch_exists(&self, name: &str, remote: bool) -> bool {
        if remote {
            self.remote_branches.borrow().contains(name)
        } else {
            self.local_branches.borrow().contains(name)
        }
    }

    fn log_range(&self, start: &str, end: &str) -> Result<Vec<LogEntry>> {
        Ok(self
            .ranges
            .borrow()
            .get(&(start.to_string(), end.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    fn log_single(&self, refname: &str) -> Result<LogEntry> {
        let id = self.resolve(refname)?;
        self.commits
            .borrow()
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::RefNotFound(refname.to_string()))
    }

    fn ref_hash(&self, refname: &str) -> Result<Oid> {
        self.resolve(refname)
    }

    fn common_ancestor(&self, refs: &[String]) -> Result<Oid> {
        let ids = refs
            .iter()
            .map(|r| self.resolve(r))
            .collect::<Result<Vec<_>>>()?;
        // Scripted graphs are linear; the smallest id plays the ancestor.
        ids.into_iter()
            .min()
            .ok_or_else(|| Error::RefNotFound("(no refs given)".to_string()))
    }

    fn cherry_pick(&self, id: Oid) -> Result<Oid> {
        self.ops.borrow_mut().push(format!("pick {id}"));
        if self.failing_picks.borrow().contains(&id) {
            return Err(Error::Git2(git2::Error::from_str(
                "scripted cherry-pick failure",
            )));
        }
        if self.conflict_on.borrow_mut().remove(&id) {
            return Err(Error::CherryPickConflict(vec!["f.txt".to_string()]));
        }
        Ok(id)
    }

    fn remote_name(&self) -> Result<String> {
        Ok("origin".to_string())
    }

    fn push(&self, remote: &str, branch: &str, force: bool) -> Result<()> {
        self.ops
            .borrow_mut()
            .push(format!("push {remote} {branch} force={force}"));
        Ok(())
    }
}
