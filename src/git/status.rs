//! Repository status tracking
//!
//! Reads branch, upstream, and ahead/behind counts with libgit2 and
//! keeps the most recent snapshot for cheap, non-blocking reads.

use git2::{BranchType, ErrorCode};
use std::path::Path;
use std::sync::{PoisonError, RwLock};

use super::{AheadBehind, Repository, RepositoryStatus};
use crate::error::Result;

/// Source of the currently selected repository and its last known status.
///
/// Both reads must be cheap; the controller calls them from eligibility
/// checks that never block.
pub trait RepositoryStatusProvider: Send + Sync {
    /// The repository workflows should act on, if any
    fn selected_repository(&self) -> Option<Repository>;

    /// Last known status of the selected repository (may be stale)
    fn selected_repository_status(&self) -> Option<RepositoryStatus>;
}

/// Read the current status of a working copy
pub fn read_status(repo: &Repository) -> Result<RepositoryStatus> {
    let inner = git2::Repository::open(repo.root())?;

    let head = match inner.head() {
        Ok(head) => head,
        Err(e) if e.code() == ErrorCode::UnbornBranch => {
            // No commits yet, but HEAD still names the branch to be born
            return Ok(RepositoryStatus::new(unborn_branch_name(&inner), None, None));
        }
        Err(e) => return Err(e.into()),
    };

    if !head.is_branch() {
        return Ok(RepositoryStatus::detached());
    }

    let Some(branch_name) = head.shorthand().map(String::from) else {
        return Ok(RepositoryStatus::detached());
    };

    let branch = inner.find_branch(&branch_name, BranchType::Local)?;
    let upstream = match branch.upstream() {
        Ok(upstream) => upstream,
        Err(e) if e.code() == ErrorCode::NotFound => {
            return Ok(RepositoryStatus::untracked(branch_name));
        }
        Err(e) => return Err(e.into()),
    };

    let upstream_name = match upstream.name()? {
        Some(name) => name.to_string(),
        None => return Ok(RepositoryStatus::untracked(branch_name)),
    };

    let ahead_behind = match (head.target(), upstream.get().target()) {
        (Some(local), Some(remote)) => {
            let (ahead, behind) = inner.graph_ahead_behind(local, remote)?;
            Some(AheadBehind {
                ahead: saturating_count(ahead),
                behind: saturating_count(behind),
            })
        }
        _ => None,
    };

    Ok(RepositoryStatus::tracking(
        branch_name,
        upstream_name,
        ahead_behind,
    ))
}

/// Commit counts past `u32::MAX` pin there rather than wrapping
fn saturating_count(count: usize) -> u32 {
    u32::try_from(count).unwrap_or(u32::MAX)
}

fn unborn_branch_name(repo: &git2::Repository) -> Option<String> {
    let head = repo.find_reference("HEAD").ok()?;
    let target = head.symbolic_target()?;
    target.strip_prefix("refs/heads/").map(String::from)
}

/// A single working copy and its cached status
#[derive(Debug)]
pub struct WorkingCopy {
    repository: Repository,
    status: RwLock<Option<RepositoryStatus>>,
}

impl WorkingCopy {
    /// Open the working copy containing `path` and read its status
    pub fn open(path: &Path) -> Result<Self> {
        Self::from_repository(Repository::discover(path)?)
    }

    /// Track an already discovered repository and read its status
    pub fn from_repository(repository: Repository) -> Result<Self> {
        let working_copy = Self {
            repository,
            status: RwLock::new(None),
        };
        working_copy.refresh()?;
        Ok(working_copy)
    }

    pub fn repository(&self) -> &Repository {
        &self.repository
    }

    /// Re-read status from disk, replacing the cached snapshot
    pub fn refresh(&self) -> Result<RepositoryStatus> {
        let status = read_status(&self.repository)?;
        tracing::debug!(status = %status.format_short(), "refreshed repository status");

        *self.status.write().unwrap_or_else(PoisonError::into_inner) = Some(status.clone());
        Ok(status)
    }
}

impl RepositoryStatusProvider for WorkingCopy {
    fn selected_repository(&self) -> Option<Repository> {
        Some(self.repository.clone())
    }

    fn selected_repository_status(&self) -> Option<RepositoryStatus> {
        self.status
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use git2::{Oid, Signature};
    use tempfile::TempDir;

    fn commit(repo: &git2::Repository, message: &str) -> Oid {
        let sig = Signature::now("gitsync", "gitsync@local").unwrap();
        let tree_id = repo.index().unwrap().write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();

        let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .unwrap()
    }

    fn current_branch(repo: &git2::Repository) -> String {
        repo.head().unwrap().shorthand().unwrap().to_string()
    }

    #[test]
    fn test_new_branch_has_no_upstream() {
        let tmp = TempDir::new().unwrap();
        let repo = git2::Repository::init(tmp.path()).unwrap();
        commit(&repo, "initial");

        let status = read_status(&Repository::new(tmp.path())).unwrap();
        assert_eq!(status.branch(), Some(current_branch(&repo).as_str()));
        assert!(status.upstream_branch().is_none());
        assert!(status.ahead_behind().is_none());
        assert!(status.is_unpublished());
    }

    #[test]
    fn test_unborn_branch_still_has_a_name() {
        let tmp = TempDir::new().unwrap();
        git2::Repository::init(tmp.path()).unwrap();

        let status = read_status(&Repository::new(tmp.path())).unwrap();
        assert!(status.branch().is_some());
        assert!(status.upstream_branch().is_none());
    }

    #[test]
    fn test_tracking_branch_counts_ahead() {
        let tmp = TempDir::new().unwrap();
        let repo = git2::Repository::init(tmp.path()).unwrap();
        let base = commit(&repo, "initial");
        let branch_name = current_branch(&repo);

        repo.remote("origin", "https://example.invalid/repo.git").unwrap();
        repo.reference(
            &format!("refs/remotes/origin/{}", branch_name),
            base,
            true,
            "fake fetch",
        )
        .unwrap();
        repo.find_branch(&branch_name, BranchType::Local)
            .unwrap()
            .set_upstream(Some(format!("origin/{}", branch_name).as_str()))
            .unwrap();

        commit(&repo, "local work");

        let status = read_status(&Repository::new(tmp.path())).unwrap();
        assert!(status.is_tracking());
        assert_eq!(
            status.upstream_branch(),
            Some(format!("origin/{}", branch_name).as_str())
        );
        assert_eq!(
            status.ahead_behind(),
            Some(AheadBehind { ahead: 1, behind: 0 })
        );
    }

    #[test]
    fn test_upstream_config_without_remote_ref_is_untracked() {
        let tmp = TempDir::new().unwrap();
        let repo = git2::Repository::init(tmp.path()).unwrap();
        commit(&repo, "initial");
        let branch_name = current_branch(&repo);

        // Tracking configured, but never fetched
        let mut config = repo.config().unwrap();
        config
            .set_str(&format!("branch.{}.remote", branch_name), "origin")
            .unwrap();
        config
            .set_str(
                &format!("branch.{}.merge", branch_name),
                &format!("refs/heads/{}", branch_name),
            )
            .unwrap();
        repo.remote("origin", "https://example.invalid/repo.git").unwrap();

        let status = read_status(&Repository::new(tmp.path())).unwrap();
        assert_eq!(status.branch(), Some(branch_name.as_str()));
        assert!(status.is_unpublished());
    }

    #[test]
    fn test_upstream_lookup_errors_are_propagated() {
        let tmp = TempDir::new().unwrap();
        let repo = git2::Repository::init(tmp.path()).unwrap();
        commit(&repo, "initial");
        let branch_name = current_branch(&repo);

        // An invalid remote name is broken config, not "untracked"
        let mut config = repo.config().unwrap();
        config
            .set_str(&format!("branch.{}.remote", branch_name), "not a remote")
            .unwrap();
        config
            .set_str(&format!("branch.{}.merge", branch_name), "refs/heads/main")
            .unwrap();

        assert!(read_status(&Repository::new(tmp.path())).is_err());
    }

    #[test]
    fn test_saturating_count() {
        assert_eq!(saturating_count(0), 0);
        assert_eq!(saturating_count(42), 42);
        assert_eq!(saturating_count(u32::MAX as usize), u32::MAX);
        #[cfg(target_pointer_width = "64")]
        assert_eq!(saturating_count(u32::MAX as usize + 1), u32::MAX);
    }

    #[test]
    fn test_detached_head_has_no_branch() {
        let tmp = TempDir::new().unwrap();
        let repo = git2::Repository::init(tmp.path()).unwrap();
        let oid = commit(&repo, "initial");
        repo.set_head_detached(oid).unwrap();

        let status = read_status(&Repository::new(tmp.path())).unwrap();
        assert!(status.branch().is_none());
        assert!(!status.is_tracking());
        assert!(!status.is_unpublished());
    }

    #[test]
    fn test_working_copy_refresh_replaces_snapshot() {
        let tmp = TempDir::new().unwrap();
        let repo = git2::Repository::init(tmp.path()).unwrap();
        let base = commit(&repo, "initial");

        let working_copy = WorkingCopy::open(tmp.path()).unwrap();
        let before = working_copy.selected_repository_status().unwrap();
        assert!(before.is_unpublished());

        let branch_name = current_branch(&repo);
        repo.remote("origin", "https://example.invalid/repo.git").unwrap();
        repo.reference(
            &format!("refs/remotes/origin/{}", branch_name),
            base,
            true,
            "fake fetch",
        )
        .unwrap();
        repo.find_branch(&branch_name, BranchType::Local)
            .unwrap()
            .set_upstream(Some(format!("origin/{}", branch_name).as_str()))
            .unwrap();

        // Cached until refreshed
        assert_eq!(working_copy.selected_repository_status(), Some(before));

        let after = working_copy.refresh().unwrap();
        assert!(after.is_tracking());
        assert_eq!(working_copy.selected_repository_status(), Some(after));
    }
}
