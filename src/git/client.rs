//! Running git commands
//!
//! [`VersionControlClient`] is the seam between the sync controller and
//! the actual version control tool. [`GitCli`] drives the `git` binary.

use async_trait::async_trait;
use std::path::PathBuf;
use tokio::process::Command;

use super::{read_status, GitCommand, Repository, RepositoryStatus};
use crate::error::CommandError;

/// Executes version control operations against a repository
#[async_trait]
pub trait VersionControlClient: Send + Sync {
    /// Names of the configured remotes, in the order git reports them
    async fn list_remotes(&self, repo: &Repository) -> Result<Vec<String>, CommandError>;

    /// Fresh status, read now rather than from any cache
    async fn get_status(&self, repo: &Repository) -> Result<RepositoryStatus, CommandError>;

    /// Run one command, given as argv without the binary name
    async fn execute(&self, repo: &Repository, args: &[String]) -> Result<(), CommandError>;
}

/// [`VersionControlClient`] backed by the `git` command-line tool
#[derive(Debug, Clone)]
pub struct GitCli {
    git_path: PathBuf,
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new("git")
    }
}

impl GitCli {
    pub fn new(git_path: impl Into<PathBuf>) -> Self {
        Self {
            git_path: git_path.into(),
        }
    }

    /// Run git and return its stdout, or the failure with stderr as message
    async fn run(&self, repo: &Repository, args: &[String]) -> Result<String, CommandError> {
        tracing::debug!(repo = %repo.root().display(), ?args, "running git");

        let output = Command::new(&self.git_path)
            .args(args)
            .current_dir(repo.root())
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let message = if stderr.trim().is_empty() {
                String::from_utf8_lossy(&output.stdout).into_owned()
            } else {
                stderr.into_owned()
            };

            tracing::warn!(?args, code = ?output.status.code(), "git exited unsuccessfully");
            return Err(CommandError::with_message(message).with_exit_code(output.status.code()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl VersionControlClient for GitCli {
    async fn list_remotes(&self, repo: &Repository) -> Result<Vec<String>, CommandError> {
        let stdout = self.run(repo, &GitCommand::remote_list().into_args()).await?;
        Ok(parse_remote_list(&stdout))
    }

    async fn get_status(&self, repo: &Repository) -> Result<RepositoryStatus, CommandError> {
        let repo = repo.clone();
        tokio::task::spawn_blocking(move || read_status(&repo))
            .await
            .map_err(|e| CommandError::with_message(e.to_string()))?
            .map_err(|e| CommandError::with_message(e.to_string()))
    }

    async fn execute(&self, repo: &Repository, args: &[String]) -> Result<(), CommandError> {
        self.run(repo, args).await.map(|_| ())
    }
}

/// Parse `git remote` output: one name per line
pub fn parse_remote_list(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_remote_list() {
        assert_eq!(
            parse_remote_list("origin\nupstream\n"),
            vec!["origin", "upstream"]
        );
        assert!(parse_remote_list("").is_empty());
        assert_eq!(parse_remote_list("\n  origin  \n\n"), vec!["origin"]);
    }

    #[tokio::test]
    async fn test_missing_binary_is_a_command_error() {
        let tmp = TempDir::new().unwrap();
        let client = GitCli::new(tmp.path().join("no-such-git"));

        let err = client
            .execute(&Repository::new(tmp.path()), &["status".to_string()])
            .await
            .unwrap_err();
        assert!(err.message.is_some());
        assert!(err.exit_code.is_none());
    }

    #[tokio::test]
    async fn test_get_status_reads_with_libgit2() {
        let tmp = TempDir::new().unwrap();
        git2::Repository::init(tmp.path()).unwrap();

        let status = GitCli::default()
            .get_status(&Repository::new(tmp.path()))
            .await
            .unwrap();
        assert!(status.upstream_branch().is_none());
    }

    #[tokio::test]
    async fn test_get_status_outside_repository_fails() {
        let tmp = TempDir::new().unwrap();
        let err = GitCli::default()
            .get_status(&Repository::new(tmp.path().join("missing")))
            .await
            .unwrap_err();
        assert!(err.message.is_some());
    }
}
