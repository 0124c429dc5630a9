//! gitsync CLI - sync and publish the current branch

use clap::{Parser, Subcommand};
use gitsync::{
    GitCli, Repository, RepositoryStatus, RepositoryStatusProvider, SyncConfig, SyncController,
    TerminalPrompt, TracingNotifier, WorkflowOutcome, WorkingCopy,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gitsync")]
#[command(about = "Sync and publish git branches", long_about = None)]
struct Cli {
    /// Working copy directory (defaults to current directory)
    #[arg(short, long, default_value = ".")]
    repo: PathBuf,

    /// Git binary to run (overrides .gitsync.yaml)
    #[arg(long)]
    git_path: Option<String>,

    /// Sync without asking for confirmation
    #[arg(long)]
    no_confirm: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pull from the tracked upstream, then push
    Sync,

    /// Push a branch with no upstream and start tracking it
    Publish,

    /// Show branch, upstream, and what can be done next
    Status {
        /// Print the status as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Config lives at the repository root and sets the log level
    let repository = Repository::discover(&cli.repo)?;
    let mut config = SyncConfig::load(repository.root())?;
    if let Some(git_path) = cli.git_path {
        config.git_path = git_path;
    }
    if cli.no_confirm {
        config.confirm_sync = false;
    }

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_deref().unwrap_or("warn")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let working_copy = Arc::new(WorkingCopy::from_repository(repository)?);

    let controller = SyncController::new(
        Arc::new(GitCli::new(&config.git_path)),
        working_copy.clone(),
        Arc::new(TerminalPrompt::stdin()),
        Arc::new(TracingNotifier),
    )
    .with_config(&config);

    match cli.command {
        Commands::Sync => sync_branch(&controller, &working_copy).await,
        Commands::Publish => publish_branch(&controller, &working_copy).await,
        Commands::Status { json } => show_status(&controller, &working_copy, json),
    }
}

async fn sync_branch(
    controller: &SyncController,
    working_copy: &WorkingCopy,
) -> anyhow::Result<()> {
    let outcome = controller.sync().await;
    if outcome == WorkflowOutcome::Ineligible {
        let status = working_copy.selected_repository_status();
        println!("{}", sync_ineligible_reason(status.as_ref()));
        return Ok(());
    }

    report(outcome, working_copy)
}

async fn publish_branch(
    controller: &SyncController,
    working_copy: &WorkingCopy,
) -> anyhow::Result<()> {
    let outcome = controller.publish().await;
    if outcome == WorkflowOutcome::Ineligible {
        let status = working_copy.selected_repository_status();
        println!("{}", publish_ineligible_reason(status.as_ref()));
        return Ok(());
    }

    report(outcome, working_copy)
}

const NO_STATUS: &str = "No repository status is available.";
const DETACHED_HEAD: &str = "HEAD is detached. Check out a branch first.";
const ALREADY_SYNCING: &str = "A sync is already running.";

/// Why `sync` declined to run, given the status it saw
fn sync_ineligible_reason(status: Option<&RepositoryStatus>) -> &'static str {
    match status {
        None => NO_STATUS,
        Some(status) if status.branch().is_none() => DETACHED_HEAD,
        Some(status) if status.is_unpublished() => {
            "Nothing to sync: the current branch does not track an upstream.\n\
             Use `gitsync publish` to push it and start tracking."
        }
        Some(_) => ALREADY_SYNCING,
    }
}

/// Why `publish` declined to run, given the status it saw
fn publish_ineligible_reason(status: Option<&RepositoryStatus>) -> &'static str {
    match status {
        None => NO_STATUS,
        Some(status) if status.branch().is_none() => DETACHED_HEAD,
        Some(status) if status.is_tracking() => {
            "Nothing to publish: the current branch already tracks an upstream.\n\
             Use `gitsync sync` to pull and push."
        }
        Some(_) => ALREADY_SYNCING,
    }
}

fn report(outcome: WorkflowOutcome, working_copy: &WorkingCopy) -> anyhow::Result<()> {
    match outcome {
        WorkflowOutcome::Cancelled => println!("Cancelled."),
        WorkflowOutcome::Finished { failed } => {
            let status = working_copy.refresh()?;
            println!("{}", status.format_short());
            if failed > 0 {
                anyhow::bail!("{} git command(s) failed", failed);
            }
        }
        WorkflowOutcome::Ineligible | WorkflowOutcome::NoRemotes => {}
    }

    Ok(())
}

fn show_status(
    controller: &SyncController,
    working_copy: &WorkingCopy,
    json: bool,
) -> anyhow::Result<()> {
    let Some(status) = working_copy.selected_repository_status() else {
        println!("No status available.");
        return Ok(());
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!("gitsync Status");
    println!("==============");
    println!("Path: {:?}", working_copy.repository().root());
    println!("Branch: {}", status.branch().unwrap_or("(detached HEAD)"));
    println!("Upstream: {}", status.upstream_branch().unwrap_or("(none)"));
    if let Some(counts) = status.ahead_behind() {
        println!("Ahead: {}  Behind: {}", counts.ahead, counts.behind);
    }
    println!();

    if controller.can_sync() {
        println!("Ready to sync: gitsync sync");
    } else if controller.can_publish() {
        println!("Ready to publish: gitsync publish");
    } else {
        println!("Check out a branch to sync or publish.");
    }

    Ok(())
}
