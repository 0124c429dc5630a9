//! Git backend for gitsync
//!
//! Everything the controller needs to know about a working copy, and
//! everything it needs to do to one, goes through this module.
//!
//! # Layout
//!
//! - [`Repository`]: an opaque handle to a working copy.
//! - [`RepositoryStatus`]: an immutable snapshot of branch and tracking state.
//! - [`GitCommand`]: builds the argument list for one git invocation.
//! - [`VersionControlClient`]: runs commands against a repository. [`GitCli`]
//!   is the `git` binary implementation.
//! - [`RepositoryStatusProvider`]: tracks the selected repository.
//!   [`WorkingCopy`] reads status with libgit2.

use serde::Serialize;
use std::path::{Path, PathBuf};

mod client;
mod command;
mod status;

pub use client::{parse_remote_list, GitCli, VersionControlClient};
pub use command::GitCommand;
pub use status::{read_status, RepositoryStatusProvider, WorkingCopy};

use crate::error::{Error, Result};

/// Handle to a git working copy
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Repository {
    root: PathBuf,
}

impl Repository {
    /// Wrap a working copy root without touching the filesystem
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Find the working copy containing `path`
    pub fn discover(path: &Path) -> Result<Self> {
        let inner = git2::Repository::discover(path).map_err(|_| Error::RepositoryNotFound {
            path: path.to_path_buf(),
        })?;

        // Bare repositories have nothing to sync from
        let root = inner.workdir().ok_or_else(|| Error::RepositoryNotFound {
            path: path.to_path_buf(),
        })?;

        Ok(Self::new(root))
    }

    /// Root directory of the working copy
    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Commits on either side of the tracked upstream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AheadBehind {
    /// Local commits not on the upstream
    pub ahead: u32,
    /// Upstream commits not in the local branch
    pub behind: u32,
}

/// Snapshot of a working copy's branch state.
///
/// `upstream_branch` is only set when the branch tracks a remote, and
/// `ahead_behind` only when `upstream_branch` is set. The constructors
/// enforce this, so the fields are read through accessors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RepositoryStatus {
    branch: Option<String>,
    upstream_branch: Option<String>,
    ahead_behind: Option<AheadBehind>,
}

impl RepositoryStatus {
    /// Build a snapshot, dropping counts that have no upstream to count against
    pub fn new(
        branch: Option<String>,
        upstream_branch: Option<String>,
        ahead_behind: Option<AheadBehind>,
    ) -> Self {
        let ahead_behind = upstream_branch.as_ref().and(ahead_behind);
        Self {
            branch,
            upstream_branch,
            ahead_behind,
        }
    }

    /// A branch that tracks `upstream`
    pub fn tracking(
        branch: impl Into<String>,
        upstream: impl Into<String>,
        ahead_behind: Option<AheadBehind>,
    ) -> Self {
        Self::new(Some(branch.into()), Some(upstream.into()), ahead_behind)
    }

    /// A branch with no upstream yet
    pub fn untracked(branch: impl Into<String>) -> Self {
        Self::new(Some(branch.into()), None, None)
    }

    /// HEAD is not on a branch
    pub fn detached() -> Self {
        Self::default()
    }

    pub fn branch(&self) -> Option<&str> {
        self.branch.as_deref()
    }

    pub fn upstream_branch(&self) -> Option<&str> {
        self.upstream_branch.as_deref()
    }

    pub fn ahead_behind(&self) -> Option<AheadBehind> {
        self.ahead_behind
    }

    /// On a branch that already tracks a remote
    pub fn is_tracking(&self) -> bool {
        self.branch.is_some() && self.upstream_branch.is_some()
    }

    /// On a branch that has never been pushed with tracking
    pub fn is_unpublished(&self) -> bool {
        self.branch.is_some() && self.upstream_branch.is_none()
    }

    /// Short human form, e.g. `main → origin/main ↑1 ↓0`
    pub fn format_short(&self) -> String {
        let Some(branch) = self.branch() else {
            return "(detached HEAD)".to_string();
        };

        match (self.upstream_branch(), self.ahead_behind) {
            (Some(upstream), Some(counts)) => format!(
                "{} → {} ↑{} ↓{}",
                branch, upstream, counts.ahead, counts.behind
            ),
            (Some(upstream), None) => format!("{} → {}", branch, upstream),
            (None, _) => format!("{} (not published)", branch),
        }
    }
}
