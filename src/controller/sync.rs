//! The sync workflow: pull, then push

use super::{SyncController, WorkflowOutcome};
use crate::git::GitCommand;
use crate::prompt::{self, Choice, PickItem};

/// How to bring in upstream commits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMethod {
    /// `git pull`
    Merge,
    /// `git pull -r`
    Rebase,
}

impl SyncMethod {
    pub fn label(self) -> &'static str {
        match self {
            SyncMethod::Merge => "Pull and push commits",
            SyncMethod::Rebase => "Fetch, rebase and push commits",
        }
    }

    /// What confirming a sync against `upstream` will do
    pub fn confirmation(self, upstream: &str) -> String {
        match self {
            SyncMethod::Merge => format!(
                "This action will pull and push commits from and to '{}'.",
                upstream
            ),
            SyncMethod::Rebase => format!(
                "This action will fetch, rebase and push commits from and to '{}'.",
                upstream
            ),
        }
    }

    fn choices() -> Vec<PickItem<SyncMethod>> {
        [SyncMethod::Merge, SyncMethod::Rebase]
            .into_iter()
            .map(|method| PickItem::new(method.label(), method))
            .collect()
    }
}

impl SyncController {
    /// Pull from the tracked upstream, then push.
    ///
    /// Asks for a [`SyncMethod`] and a confirmation first. A failed pull is
    /// reported and the push is still attempted.
    pub async fn sync(&self) -> WorkflowOutcome {
        let Some(repository) = self.status.selected_repository() else {
            tracing::debug!("sync skipped: no repository selected");
            return WorkflowOutcome::Ineligible;
        };
        if !self.can_sync() {
            tracing::debug!(busy = self.is_busy(), "sync skipped: not eligible");
            return WorkflowOutcome::Ineligible;
        }
        let Some(upstream) = self
            .status
            .selected_repository_status()
            .and_then(|status| status.upstream_branch().map(String::from))
        else {
            return WorkflowOutcome::Ineligible;
        };

        let method = match prompt::pick(
            self.prompt.as_ref(),
            "Select how you want to sync",
            SyncMethod::choices(),
        )
        .await
        {
            Choice::Selected(method) => method,
            Choice::Cancelled => return WorkflowOutcome::Cancelled,
        };

        if self.confirm_sync
            && !self
                .prompt
                .confirm("Synchronize", &method.confirmation(&upstream))
                .await
        {
            return WorkflowOutcome::Cancelled;
        }

        // Another sync may have started while we were prompting
        let Some(_busy) = self.busy.try_acquire() else {
            tracing::debug!("sync skipped: another sync started first");
            return WorkflowOutcome::Ineligible;
        };

        tracing::info!(?method, %upstream, "sync started");
        let mut failed = 0;

        let pull = GitCommand::pull()
            .rebase(method == SyncMethod::Rebase)
            .into_args();
        if let Err(err) = self.client.execute(&repository, &pull).await {
            self.report_failure(&err);
            failed += 1;
        }

        let ahead = match self.client.get_status(&repository).await {
            Ok(status) => status.ahead_behind().map(|counts| counts.ahead),
            Err(err) => {
                self.report_failure(&err);
                failed += 1;
                None
            }
        };

        // Pushes even with nothing ahead or no counts at all.
        // TODO: confirm with product whether a branch with nothing ahead should skip the push
        let should_push = match ahead {
            Some(ahead) if ahead > 0 => true,
            _ => true,
        };

        if should_push {
            let push = GitCommand::push().into_args();
            if let Err(err) = self.client.execute(&repository, &push).await {
                self.report_failure(&err);
                failed += 1;
            }
        }

        tracing::info!(failed, "sync finished");
        WorkflowOutcome::Finished { failed }
    }
}
