//! Repository wrapper providing high-level git operations.

use std::path::Path;

use git2::{BranchType, Oid, Sort, StatusOptions};

use crate::error::{Error, Result};
use crate::traits::{GitBackend, LogEntry};

/// High-level wrapper around a git repository.
pub struct Repository {
    inner: git2::Repository,
}

impl Repository {
    /// Open a repository at the given path.
    ///
    /// # Errors
    /// Returns error if no repository found at path or any parent.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let inner = git2::Repository::discover(path).map_err(|_| Error::NotARepository)?;
        Ok(Self { inner })
    }

    /// Open the repository containing the current directory.
    ///
    /// # Errors
    /// Returns error if not inside a git repository.
    pub fn open_current() -> Result<Self> {
        Self::open(".")
    }

    /// Get the path to the repository root (workdir).
    #[must_use]
    pub fn workdir(&self) -> Option<&Path> {
        self.inner.workdir()
    }

    /// Get the path to the .git directory.
    #[must_use]
    pub fn git_dir(&self) -> &Path {
        self.inner.path()
    }

    /// Get the name of the current branch.
    ///
    /// # Errors
    /// Returns error if HEAD is detached.
    pub fn current_branch(&self) -> Result<String> {
        let head = self.inner.head()?;
        if !head.is_branch() {
            return Err(Error::DetachedHead);
        }

        head.shorthand().map(String::from).ok_or(Error::DetachedHead)
    }

    /// Get a reference to the underlying git2 repository.
    ///
    /// Use sparingly - prefer the [`GitBackend`] methods.
    #[must_use]
    pub fn inner(&self) -> &git2::Repository {
        &self.inner
    }

    fn entry_for(&self, id: Oid) -> Result<LogEntry> {
        let commit = self.inner.find_commit(id)?;
        Ok(LogEntry {
            id,
            parent_ids: commit.parent_ids().collect(),
            summary: commit.summary().unwrap_or_default().to_string(),
        })
    }
}

impl GitBackend for Repository {
    fn checkout(&self, refname: &str) -> Result<()> {
        let branch = self
            .inner
            .find_branch(refname, BranchType::Local)
            .map_err(|_| Error::BranchNotFound(refname.into()))?;

        let reference = branch.get();
        let object = reference.peel(git2::ObjectType::Commit)?;

        self.inner.checkout_tree(&object, None)?;
        self.inner.set_head(&format!("refs/heads/{refname}"))?;

        Ok(())
    }

    fn working_tree_has_unresolved_changes(&self) -> Result<bool> {
        let mut opts = StatusOptions::new();
        opts.include_untracked(true).recurse_untracked_dirs(true);
        let statuses = self.inner.statuses(Some(&mut opts))?;
        Ok(!statuses.is_empty())
    }

    fn create_branch(&self, name: &str, start_ref: &str) -> Result<()> {
        let target = self
            .inner
            .revparse_single(start_ref)
            .map_err(|_| Error::RefNotFound(start_ref.into()))?
            .peel_to_commit()?;

        self.inner.branch(name, &target, false)?;
        self.inner.checkout_tree(target.as_object(), None)?;
        self.inner.set_head(&format!("refs/heads/{name}"))?;

        Ok(())
    }

    fn delete_branch(&self, name: &str) -> Result<()> {
        let mut branch = self
            .inner
            .find_branch(name, BranchType::Local)
            .map_err(|_| Error::BranchNotFound(name.into()))?;
        branch.delete()?;
        Ok(())
    }

    fn rename_branch(&self, from: &str, to: &str) -> Result<()> {
        let old_ref = format!("refs/heads/{from}");
        let was_head = self
            .inner
            .head()
            .ok()
            .and_then(|h| h.name().map(String::from))
            .as_deref()
            == Some(old_ref.as_str());

        let mut branch = self
            .inner
            .find_branch(from, BranchType::Local)
            .map_err(|_| Error::BranchNotFound(from.into()))?;
        branch.rename(to, false)?;

        // Unlike `git branch -m`, libgit2 leaves a symbolic HEAD pointing at
        // the old name.
        if was_head {
            self.inner.set_head(&format!("refs/heads/{to}"))?;
        }

        Ok(())
    }

    fn branch_exists(&self, name: &str, remote: bool) -> bool {
        if remote {
            let Ok(remote_name) = self.remote_name() else {
                return false;
            };
            self.inner
                .find_branch(&format!("{remote_name}/{name}"), BranchType::Remote)
                .is_ok()
        } else {
            self.inner.find_branch(name, BranchType::Local).is_ok()
        }
    }

    fn log_range(&self, start: &str, end: &str) -> Result<Vec<LogEntry>> {
        let start_id = self.ref_hash(start)?;
        let end_id = self.ref_hash(end)?;

        let mut revwalk = self.inner.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL)?;
        revwalk.push(end_id)?;
        revwalk.hide(start_id)?;

        let mut entries = Vec::new();
        for id in revwalk {
            entries.push(self.entry_for(id?)?);
        }

        Ok(entries)
    }

    fn log_single(&self, refname: &str) -> Result<LogEntry> {
        let id = self.ref_hash(refname)?;
        self.entry_for(id)
    }

    fn ref_hash(&self, refname: &str) -> Result<Oid> {
        let object = self
            .inner
            .revparse_single(refname)
            .map_err(|_| Error::RefNotFound(refname.into()))?;
        Ok(object.peel_to_commit()?.id())
    }

    fn common_ancestor(&self, refs: &[String]) -> Result<Oid> {
        let oids = refs
            .iter()
            .map(|r| self.ref_hash(r))
            .collect::<Result<Vec<_>>>()?;

        match oids.as_slice() {
            [] => Err(Error::RefNotFound("(no refs given)".into())),
            [only] => Ok(*only),
            many => Ok(self.inner.merge_base_many(many)?),
        }
    }

    fn cherry_pick(&self, id: Oid) -> Result<Oid> {
        let picked = self.inner.find_commit(id)?;
        self.inner.cherrypick(&picked, None)?;

        let mut index = self.inner.index()?;
        if index.has_conflicts() {
            let mut files: Vec<String> = index
                .conflicts()?
                .filter_map(std::result::Result::ok)
                .filter_map(|c| c.our.or(c.their).or(c.ancestor))
                .filter_map(|entry| String::from_utf8(entry.path).ok())
                .collect();
            files.sort();
            files.dedup();
            return Err(Error::CherryPickConflict(files));
        }

        let tree_id = index.write_tree()?;
        let tree = self.inner.find_tree(tree_id)?;
        let head = self.inner.head()?.peel_to_commit()?;
        let committer = self.inner.signature()?;
        let message = picked.message().unwrap_or_default().to_string();

        let new_id = self.inner.commit(
            Some("HEAD"),
            &picked.author(),
            &committer,
            &message,
            &tree,
            &[&head],
        )?;
        self.inner.cleanup_state()?;

        Ok(new_id)
    }

    fn remote_name(&self) -> Result<String> {
        let remotes = self.inner.remotes()?;
        remotes.get(0).map(String::from).ok_or(Error::NoRemote)
    }

    fn push(&self, remote: &str, branch: &str, force: bool) -> Result<()> {
        let mut remote = self
            .inner
            .find_remote(remote)
            .map_err(|_| Error::NoRemote)?;

        let prefix = if force { "+" } else { "" };
        let refspec = format!("{prefix}refs/heads/{branch}:refs/heads/{branch}");
        remote
            .push(&[&refspec], None)
            .map_err(|e| Error::PushFailed(e.to_string()))?;

        Ok(())
    }
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("path", &self.git_dir())
            .finish()
    }
}
