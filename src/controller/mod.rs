//! Sync and publish workflows
//!
//! [`SyncController`] decides when a branch can be synced or published,
//! asks the user how, runs the git commands, and reports what went wrong.
//!
//! # Workflows
//!
//! ```text
//! sync:    Idle → pick method → confirm → Running (pull, push) → Idle
//! publish: pick remote (if several) → confirm → push -u remote branch
//! ```
//!
//! Only sync marks the controller busy. Observers subscribe with
//! [`SyncController::on_did_change`] to hear about busy transitions.
//!
//! # Failure handling
//!
//! Nothing here returns an error. Ineligible calls and cancelled prompts
//! end quietly; command failures go to the [`NotificationSink`] and the
//! workflow carries on or stops as each step allows.

use std::sync::Arc;
use tokio::sync::broadcast;

mod busy;
mod publish;
mod sync;

pub use publish::NO_REMOTES_MESSAGE;
pub use sync::SyncMethod;

use busy::BusyState;

use crate::config::SyncConfig;
use crate::error::CommandError;
use crate::git::{RepositoryStatusProvider, VersionControlClient};
use crate::notify::NotificationSink;
use crate::prompt::UserPromptProvider;

/// How a workflow invocation ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowOutcome {
    /// Preconditions did not hold; nothing was asked or run
    Ineligible,
    /// The user cancelled a pick or declined a confirmation
    Cancelled,
    /// Publish had no remote to push to
    NoRemotes,
    /// Commands were dispatched; `failed` of them reported an error
    Finished { failed: usize },
}

impl WorkflowOutcome {
    /// Commands ran and none of them failed
    pub fn succeeded(&self) -> bool {
        matches!(self, WorkflowOutcome::Finished { failed: 0 })
    }
}

/// Coordinates sync and publish for the selected repository
pub struct SyncController {
    client: Arc<dyn VersionControlClient>,
    status: Arc<dyn RepositoryStatusProvider>,
    prompt: Arc<dyn UserPromptProvider>,
    notifier: Arc<dyn NotificationSink>,
    busy: BusyState,
    confirm_sync: bool,
}

impl SyncController {
    pub fn new(
        client: Arc<dyn VersionControlClient>,
        status: Arc<dyn RepositoryStatusProvider>,
        prompt: Arc<dyn UserPromptProvider>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            client,
            status,
            prompt,
            notifier,
            busy: BusyState::default(),
            confirm_sync: true,
        }
    }

    /// Apply settings from a loaded config
    pub fn with_config(mut self, config: &SyncConfig) -> Self {
        self.confirm_sync = config.confirm_sync;
        self
    }

    /// Whether sync asks for confirmation before running
    pub fn confirm_sync(mut self, confirm: bool) -> Self {
        self.confirm_sync = confirm;
        self
    }

    /// A sync is running
    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    /// Idle, on a branch, and that branch tracks an upstream
    pub fn can_sync(&self) -> bool {
        !self.is_busy()
            && self
                .status
                .selected_repository_status()
                .is_some_and(|status| status.is_tracking())
    }

    /// Idle, on a branch, and that branch has no upstream yet
    pub fn can_publish(&self) -> bool {
        !self.is_busy()
            && self
                .status
                .selected_repository_status()
                .is_some_and(|status| status.is_unpublished())
    }

    /// Receive an event every time the busy state flips.
    ///
    /// Events carry no payload; read [`SyncController::is_busy`] for the
    /// new value. Dropping the receiver unsubscribes.
    pub fn on_did_change(&self) -> broadcast::Receiver<()> {
        self.busy.subscribe()
    }

    fn report_failure(&self, err: &CommandError) {
        tracing::warn!(error = %err, code = ?err.exit_code, "git command failed");
        self.notifier.error(err.user_message());
    }
}
