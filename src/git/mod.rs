//! Git integration layer for repo-sync
//!
//! This module provides a high-level interface for the version-control side
//! of a sync using git2: cloning the target repository, branch management,
//! staging, committing, diffing and force-pushing.

use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use git2::build::RepoBuilder;
use git2::{
    BranchType, Cred, Delta, IndexAddOption, Oid, PushOptions, RemoteCallbacks, Repository,
    Signature,
};
use tracing::debug;

/// Git operations handler for the ephemeral clone
pub struct GitRepo {
    repo: Repository,
}

impl GitRepo {
    /// Clone a repository into the given path.
    pub fn clone(url: &str, path: &Path) -> Result<Self> {
        debug!("cloning into {}", path.display());
        let repo = RepoBuilder::new()
            .clone(url, path)
            .context("failed to clone repository")?;

        Ok(Self { repo })
    }

    /// Get the current branch name.
    pub fn current_branch(&self) -> Result<String> {
        let head = self.repo.head().context("failed to get HEAD reference")?;
        let branch_name = head.shorthand().context("failed to get branch name")?;

        Ok(branch_name.to_string())
    }

    /// Check out a branch, creating a local branch from the `origin`
    /// tracking ref when it only exists remotely.
    pub fn checkout_branch(&self, name: &str) -> Result<()> {
        if self.repo.find_branch(name, BranchType::Local).is_err() {
            let remote = self
                .repo
                .find_branch(&format!("origin/{name}"), BranchType::Remote)
                .with_context(|| format!("branch '{name}' not found locally or on origin"))?;
            let commit = remote.get().peel_to_commit()?;
            let mut branch = self.repo.branch(name, &commit, false)?;
            branch.set_upstream(Some(&format!("origin/{name}")))?;
        }

        self.set_head_and_checkout(name)
    }

    /// Create a branch off HEAD and check it out. An existing branch with
    /// this name is reused as-is.
    pub fn create_branch(&self, name: &str) -> Result<()> {
        if self.repo.find_branch(name, BranchType::Local).is_err() {
            let head = self.repo.head()?.peel_to_commit()?;
            self.repo.branch(name, &head, false)?;
            debug!("created branch {name}");
        }

        self.set_head_and_checkout(name)
    }

    fn set_head_and_checkout(&self, name: &str) -> Result<()> {
        let reference = format!("refs/heads/{name}");
        let object = self
            .repo
            .revparse_single(&reference)
            .with_context(|| format!("failed to resolve branch '{name}'"))?;

        // Safe (non-forced) checkout: files staged for the sync survive a
        // branch switch, matching `git checkout` semantics.
        self.repo
            .checkout_tree(&object, None)
            .with_context(|| format!("failed to check out branch '{name}'"))?;
        self.repo.set_head(&reference)?;

        Ok(())
    }

    /// Stage every change in the working tree, including deletions.
    pub fn stage_all(&self) -> Result<()> {
        let mut index = self.repo.index()?;
        index.add_all(["*"], IndexAddOption::DEFAULT, None)?;
        index.update_all(["*"], None)?;
        index.write()?;

        Ok(())
    }

    /// Commit the staged index onto HEAD with the given identity.
    pub fn commit(&self, message: &str, author_name: &str, author_email: &str) -> Result<Oid> {
        let signature = Signature::now(author_name, author_email)?;
        let mut index = self.repo.index()?;
        let tree_id = index.write_tree()?;
        let tree = self.repo.find_tree(tree_id)?;
        let parent = self.repo.head()?.peel_to_commit()?;

        let oid = self
            .repo
            .commit(Some("HEAD"), &signature, &signature, message, &tree, &[&parent])
            .context("failed to create commit")?;
        debug!("created commit {oid}");

        Ok(oid)
    }

    /// Compact change summary between two branches.
    pub fn diff_summary(&self, base: &str, head: &str) -> Result<DiffSummary> {
        let base_tree = self.repo.revparse_single(base)?.peel_to_tree()?;
        let head_tree = self.repo.revparse_single(head)?.peel_to_tree()?;
        let diff = self
            .repo
            .diff_tree_to_tree(Some(&base_tree), Some(&head_tree), None)?;
        let stats = diff.stats()?;

        let mut files = Vec::new();
        for delta in diff.deltas() {
            let path = delta
                .new_file()
                .path()
                .or_else(|| delta.old_file().path())
                .map(|p| p.display().to_string())
                .unwrap_or_default();
            files.push(ChangedFile {
                status: status_letter(delta.status()),
                path,
            });
        }

        Ok(DiffSummary {
            files,
            insertions: stats.insertions(),
            deletions: stats.deletions(),
        })
    }

    /// Tree id a local branch points at.
    pub fn local_tree_id(&self, branch: &str) -> Result<Oid> {
        let tree = self
            .repo
            .revparse_single(&format!("refs/heads/{branch}"))?
            .peel_to_tree()?;

        Ok(tree.id())
    }

    /// Tree id the `origin` tracking ref points at, if the branch existed
    /// on the remote at clone time.
    pub fn remote_tree_id(&self, branch: &str) -> Option<Oid> {
        self.repo
            .find_branch(&format!("origin/{branch}"), BranchType::Remote)
            .ok()
            .and_then(|b| b.get().peel_to_tree().ok())
            .map(|tree| tree.id())
    }

    /// Force-push a branch to `origin`, overwriting any prior remote state.
    pub fn push_force(&self, branch: &str, token: &str) -> Result<()> {
        let mut remote = self.repo.find_remote("origin")?;

        let mut callbacks = RemoteCallbacks::new();
        callbacks.credentials(|_url, username_from_url, _allowed| {
            Cred::userpass_plaintext(username_from_url.unwrap_or("x-access-token"), token)
        });
        let mut options = PushOptions::new();
        options.remote_callbacks(callbacks);

        let refspec = format!("+refs/heads/{branch}:refs/heads/{branch}");
        remote
            .push(&[refspec.as_str()], Some(&mut options))
            .with_context(|| format!("failed to push branch '{branch}' to origin"))?;
        debug!("pushed {branch} to origin");

        Ok(())
    }
}

/// One changed file in a diff summary.
pub struct ChangedFile {
    pub status: char,
    pub path: String,
}

/// Compact summary of the changes between two branches.
pub struct DiffSummary {
    pub files: Vec<ChangedFile>,
    pub insertions: usize,
    pub deletions: usize,
}

impl DiffSummary {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl fmt::Display for DiffSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for file in &self.files {
            writeln!(f, " {} {}", file.status, file.path)?;
        }
        write!(
            f,
            " {} files changed, {} insertions(+), {} deletions(-)",
            self.files.len(),
            self.insertions,
            self.deletions
        )
    }
}

fn status_letter(status: Delta) -> char {
    match status {
        Delta::Added => 'A',
        Delta::Deleted => 'D',
        Delta::Modified => 'M',
        Delta::Renamed => 'R',
        Delta::Copied => 'C',
        Delta::Typechange => 'T',
        _ => '?',
    }
}
