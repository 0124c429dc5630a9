//! gitsync - Branch Sync & Publish Controller
//!
//! Decides when a git branch can be synced with its upstream or published
//! to a remote, asks the user how, and runs the right git commands.
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        SyncController                           │
//! │   busy state · eligibility · sync workflow · publish workflow   │
//! └───────┬──────────────┬──────────────────┬──────────────┬────────┘
//!         │              │                  │              │
//!         ▼              ▼                  ▼              ▼
//! ┌──────────────┐ ┌──────────────┐ ┌──────────────┐ ┌──────────────┐
//! │ Repository   │ │ Version      │ │ UserPrompt   │ │ Notification │
//! │ Status       │ │ Control      │ │ Provider     │ │ Sink         │
//! │ Provider     │ │ Client       │ │              │ │              │
//! ├──────────────┤ ├──────────────┤ ├──────────────┤ ├──────────────┤
//! │ WorkingCopy  │ │ GitCli       │ │ Terminal     │ │ Tracing      │
//! │ (libgit2)    │ │ (git binary) │ │ Prompt       │ │ Notifier     │
//! └──────────────┘ └──────────────┘ └──────────────┘ └──────────────┘
//! ```
//!
//! The controller only talks to the four traits; the boxes underneath are
//! the implementations the `gitsync` binary wires in.

pub mod config;
pub mod controller;
pub mod error;
pub mod git;
pub mod notify;
pub mod prompt;

pub use config::SyncConfig;
pub use controller::{SyncController, SyncMethod, WorkflowOutcome};
pub use error::{CommandError, Error, Result};
pub use git::{
    AheadBehind, GitCli, Repository, RepositoryStatus, RepositoryStatusProvider,
    VersionControlClient, WorkingCopy,
};
pub use notify::{NotificationSink, TracingNotifier};
pub use prompt::{Choice, PickItem, TerminalPrompt, UserPromptProvider};
