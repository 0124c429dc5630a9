//! The publish workflow: push a new branch and track it

use super::{SyncController, WorkflowOutcome};
use crate::git::GitCommand;
use crate::prompt::{self, Choice, PickItem};

/// Warning shown when there is nowhere to publish to
pub const NO_REMOTES_MESSAGE: &str = "Your repository has no remotes configured to publish to.";

impl SyncController {
    /// Push the current branch to a remote and set it as the upstream.
    ///
    /// With one remote it is used directly; with several the user picks.
    /// Publish does not mark the controller busy.
    pub async fn publish(&self) -> WorkflowOutcome {
        if !self.can_publish() {
            tracing::debug!(busy = self.is_busy(), "publish skipped: not eligible");
            return WorkflowOutcome::Ineligible;
        }
        let Some(repository) = self.status.selected_repository() else {
            return WorkflowOutcome::Ineligible;
        };
        let Some(branch) = self
            .status
            .selected_repository_status()
            .and_then(|status| status.branch().map(String::from))
        else {
            return WorkflowOutcome::Ineligible;
        };

        let mut remotes = match self.client.list_remotes(&repository).await {
            Ok(remotes) => remotes,
            Err(err) => {
                self.report_failure(&err);
                return WorkflowOutcome::Finished { failed: 1 };
            }
        };

        let remote = match remotes.len() {
            0 => {
                self.notifier.warn(NO_REMOTES_MESSAGE);
                return WorkflowOutcome::NoRemotes;
            }
            1 => remotes.remove(0),
            _ => {
                let items: Vec<PickItem<String>> =
                    remotes.into_iter().map(PickItem::plain).collect();
                let prompt_text = format!("Pick a remote to publish the branch '{}' to:", branch);
                match prompt::pick(self.prompt.as_ref(), &prompt_text, items).await {
                    Choice::Selected(remote) => remote,
                    Choice::Cancelled => return WorkflowOutcome::Cancelled,
                }
            }
        };

        let message = format!(
            "This will push your commits to '{}/{}' and track it as this branch's upstream.",
            remote, branch
        );
        if !self.prompt.confirm("Publish Branch", &message).await {
            return WorkflowOutcome::Cancelled;
        }

        tracing::info!(%remote, %branch, "publishing branch");

        let push = GitCommand::push()
            .set_upstream(true)
            .remote(remote)
            .branch(branch)
            .into_args();
        match self.client.execute(&repository, &push).await {
            Ok(()) => WorkflowOutcome::Finished { failed: 0 },
            Err(err) => {
                self.report_failure(&err);
                WorkflowOutcome::Finished { failed: 1 }
            }
        }
    }
}
