//! Mock implementations for testing services.
//!
//! These mocks implement the `GitBackend` trait from graft-git to enable
//! unit testing of service logic without real git repos. Mutating
//! operations and history queries are journaled into `ops` so tests can
//! assert on order and arguments.

#![allow(clippy::unwrap_used)]

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet, VecDeque};

use graft_git::{Error, GitBackend, LogEntry, Oid, Result};

/// Deterministic 40-hex oid from a small number.
pub fn oid(n: u32) -> Oid {
    Oid::from_str(&format!("{n:040x}")).unwrap()
}

/// Log entry shorthand.
pub fn entry(id: Oid, parents: &[Oid], summary: &str) -> LogEntry {
    LogEntry {
        id,
        parent_ids: parents.to_vec(),
        summary: summary.to_string(),
    }
}

/// Mock implementation of `GitBackend` for testing.
#[derive(Default)]
pub struct MockBackend {
    pub refs: RefCell<HashMap<String, Oid>>,
    pub local_branches: RefCell<HashSet<String>>,
    pub remote_branches: RefCell<HashSet<String>>,
    pub commits: RefCell<HashMap<Oid, LogEntry>>,
    pub ranges: RefCell<HashMap<(String, String), Vec<LogEntry>>>,
    pub ancestor: Cell<Option<Oid>>,
    pub no_remote: Cell<bool>,
    pub conflict_on: RefCell<HashSet<Oid>>,
    pub unresolved_polls: RefCell<VecDeque<bool>>,
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

    pub fn with_remote_branch(self, name: &str) -> Self {
        self.remote_branches.borrow_mut().insert(name.to_string());
        self
    }

    pub fn with_commit(self, entry: LogEntry) -> Self {
        self.refs
            .borrow_mut()
            .insert(entry.id.to_string(), entry.id);
        self.commits.borrow_mut().insert(entry.id, entry);
        self
    }

    pub fn with_range(self, start: Oid, end: &str, entries: Vec<LogEntry>) -> Self {
        self.ranges
            .borrow_mut()
            .insert((start.to_string(), end.to_string()), entries);
        self
    }

    pub fn with_ancestor(self, id: Oid) -> Self {
        self.ancestor.set(Some(id));
        self
    }

    #[allow(dead_code)]
    pub fn with_no_remote(self) -> Self {
        self.no_remote.set(true);
        self
    }

    #[allow(dead_code)]
    pub fn with_conflict_on(self, id: Oid) -> Self {
        self.conflict_on.borrow_mut().insert(id);
        self
    }

    #[allow(dead_code)]
    pub fn with_unresolved_polls(self, polls: &[bool]) -> Self {
        self.unresolved_polls.borrow_mut().extend(polls);
        self
    }

    fn resolve(&self, refname: &str) -> Result<Oid> {
        if let Some(id) = self.refs.borrow().get(refname) {
            return Ok(*id);
        }
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
        Ok(self
            .unresolved_polls
            .borrow_mut()
            .pop_front()
            .unwrap_or(false))
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
        self.ops
            .borrow_mut()
            .push(format!("merge-base {}", refs.join(" ")));
        self.ancestor
            .get()
            .ok_or_else(|| Error::RefNotFound("(no ancestor scripted)".to_string()))
    }

    fn cherry_pick(&self, id: Oid) -> Result<Oid> {
        self.ops.borrow_mut().push(format!("pick {id}"));
        if self.conflict_on.borrow_mut().remove(&id) {
            return Err(Error::CherryPickConflict(vec!["f.txt".to_string()]));
        }
        Ok(id)
    }

    fn remote_name(&self) -> Result<String> {
        if self.no_remote.get() {
            return Err(Error::NoRemote);
        }
        Ok("origin".to_string())
    }

    fn push(&self, remote: &str, branch: &str, force: bool) -> Result<()> {
        self.ops
            .borrow_mut()
            .push(format!("push {remote} {branch} force={force}"));
        Ok(())
    }
}
