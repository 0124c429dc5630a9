//! Argument lists for git invocations
//!
//! Commands are built as ordered argv rather than a shell string:
//! operation first, then flags, then `remote branch` when both are known.

/// A single git invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitCommand {
    operation: &'static str,
    rebase: bool,
    set_upstream: bool,
    remote: Option<String>,
    branch: Option<String>,
}

impl GitCommand {
    fn new(operation: &'static str) -> Self {
        Self {
            operation,
            rebase: false,
            set_upstream: false,
            remote: None,
            branch: None,
        }
    }

    /// `git pull`
    pub fn pull() -> Self {
        Self::new("pull")
    }

    /// `git push`
    pub fn push() -> Self {
        Self::new("push")
    }

    /// `git remote`
    pub fn remote_list() -> Self {
        Self::new("remote")
    }

    /// Add `-r`
    pub fn rebase(mut self, rebase: bool) -> Self {
        self.rebase = rebase;
        self
    }

    /// Add `-u`
    pub fn set_upstream(mut self, set_upstream: bool) -> Self {
        self.set_upstream = set_upstream;
        self
    }

    pub fn remote(mut self, remote: impl Into<String>) -> Self {
        self.remote = Some(remote.into());
        self
    }

    pub fn branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    /// The argv to hand to git, without the binary name
    pub fn into_args(self) -> Vec<String> {
        let mut args = vec![self.operation.to_string()];

        if self.rebase {
            args.push("-r".to_string());
        }
        if self.set_upstream {
            args.push("-u".to_string());
        }

        // Positional arguments only make sense as a pair
        if let (Some(remote), Some(branch)) = (self.remote, self.branch) {
            args.push(remote);
            args.push(branch);
        }

        args
    }
}
