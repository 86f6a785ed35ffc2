use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tasksync_core::analyze::analyze;
use tasksync_core::commit::{commit_changes, CommitOptions};
use tasksync_core::config::{SyncConfig, WorkspaceConfig};
use tasksync_core::github::{
    find_issue_by_task, DryRunClient, GitHubApi, GitHubClient, ProjectField,
};
use tasksync_core::issue_sync::{
    close_completed, record_issue_url, reconcile_status, sync_task, SyncOutcome, SyncReport,
};
use tasksync_core::iteration::missing_iterations;
use tasksync_core::labels::label_definitions;
use tasksync_core::mover::{move_completed, MoveOptions};
use tasksync_core::project_sync::{plan_item, FieldReport, ProjectSyncer};
use tasksync_core::task::{load_task_files, parse_task_file, TaskFile};

// Pauses between remote mutations, mirroring the API's secondary rate
// limits. Skipped on dry runs.
const TASK_PAUSE: Duration = Duration::from_secs(1);
const LABEL_PAUSE: Duration = Duration::from_millis(300);
const ITEM_PAUSE: Duration = Duration::from_secs(2);

#[derive(Parser)]
#[command(name = "tasksync", version, about = "Sync markdown task files with GitHub issues and projects")]
struct Cli {
    /// Repository root containing the documentation tree
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sync task files with GitHub issues
    Sync {
        /// Only sync this file or directory
        path: Option<PathBuf>,
        #[arg(long)]
        dry_run: bool,
    },
    /// Push task metadata into GitHub Project board fields
    ProjectSync {
        #[arg(long)]
        dry_run: bool,
    },
    /// Reconcile status labels on existing issues only
    UpdateStatuses {
        #[arg(long)]
        dry_run: bool,
    },
    /// Close issues for tasks already in the deliver tree
    CloseCompleted {
        #[arg(long)]
        dry_run: bool,
    },
    /// Move DONE tasks into deliver/month-N/owner directories
    MoveCompleted {
        #[arg(long)]
        dry_run: bool,
    },
    /// Commit pending changes, one conventional commit per file
    Commit {
        #[arg(long)]
        dry_run: bool,
        /// Push after committing
        #[arg(long)]
        push: bool,
    },
    /// Create or refresh the repository's label set
    SetupLabels {
        #[arg(long)]
        dry_run: bool,
    },
    /// Compare the board's iterations against the sprint schedule
    Iterations,
    /// Report field completion across the project board
    Analyze,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let root = cli.root.as_path();
    match cli.command {
        Command::Sync { path, dry_run } => cmd_sync(root, path.as_deref(), dry_run),
        Command::ProjectSync { dry_run } => cmd_project_sync(root, dry_run),
        Command::UpdateStatuses { dry_run } => cmd_update_statuses(root, dry_run),
        Command::CloseCompleted { dry_run } => cmd_close_completed(root, dry_run),
        Command::MoveCompleted { dry_run } => cmd_move_completed(root, dry_run),
        Command::Commit { dry_run, push } => cmd_commit(root, dry_run, push),
        Command::SetupLabels { dry_run } => cmd_setup_labels(root, dry_run),
        Command::Iterations => cmd_iterations(root),
        Command::Analyze => cmd_analyze(root),
    }
}

fn make_client(config: &SyncConfig, dry_run: bool) -> Box<dyn GitHubClient> {
    let api = GitHubApi::new(config);
    if dry_run {
        Box::new(DryRunClient::new(api))
    } else {
        Box::new(api)
    }
}

fn cmd_sync(root: &Path, path: Option<&Path>, dry_run: bool) -> Result<()> {
    let config = SyncConfig::from_env(root)?;
    let client = make_client(&config, dry_run);

    // An explicitly named file must parse; inside a directory walk an
    // unreadable file is a logged skip.
    let tasks = match path {
        Some(path) if path.is_file() => vec![parse_task_file(path)
            .with_context(|| format!("parse {}", path.display()))?],
        Some(path) if path.is_dir() => load_task_files(&[path.to_path_buf()]),
        Some(path) => anyhow::bail!("no such file or directory: {}", path.display()),
        None => load_task_files(&config.workspace.task_dirs()),
    };
    tracing::info!(count = tasks.len(), dry_run, "syncing task files");

    let mut report = SyncReport::default();
    for task in &tasks {
        match sync_task(client.as_ref(), &config, task) {
            Ok(outcome) => {
                log_outcome(task, &outcome);
                if let SyncOutcome::Created { issue } = &outcome {
                    if !dry_run && issue.number != 0 {
                        let url =
                            format!("https://github.com/{}/issues/{}", config.repo, issue.number);
                        record_issue_url(&task.path, &url);
                    }
                }
                report.record(&outcome);
            }
            Err(err) => {
                tracing::error!(task = task.name, %err, "sync failed");
                report.record_error();
            }
        }
        if !dry_run {
            thread::sleep(TASK_PAUSE);
        }
    }

    println!("{report}");
    Ok(())
}

fn log_outcome(task: &TaskFile, outcome: &SyncOutcome) {
    match outcome {
        SyncOutcome::Created { issue } => {
            tracing::info!(task = task.name, number = issue.number, "created issue")
        }
        SyncOutcome::Closed { number } => {
            tracing::info!(task = task.name, number, "closed issue")
        }
        SyncOutcome::MarkedOverdue { number } => {
            tracing::info!(task = task.name, number, "marked issue overdue")
        }
        SyncOutcome::StatusUpdated { number, to, .. } => {
            tracing::info!(task = task.name, number, to = to.as_str(), "updated status")
        }
        SyncOutcome::Unchanged { number } => {
            tracing::debug!(task = task.name, number, "up to date")
        }
        SyncOutcome::AlreadyClosed { number } => {
            tracing::debug!(task = task.name, number, "already closed")
        }
        SyncOutcome::NotFound => {
            tracing::warn!(task = task.name, "no matching issue")
        }
    }
}

fn cmd_project_sync(root: &Path, dry_run: bool) -> Result<()> {
    let config = SyncConfig::from_env(root)?;
    let client = make_client(&config, dry_run);
    let syncer = ProjectSyncer::connect(client.as_ref())?;
    let items = client.project_items(&syncer.project_id)?;
    let issues = client.list_issues()?;
    let tasks = load_task_files(&config.workspace.task_dirs());
    let today = Local::now().date_naive();

    let mut report = FieldReport::default();
    let mut unmatched = 0usize;
    for task in &tasks {
        let Some(issue) = find_issue_by_task(&issues, &task.name) else {
            tracing::debug!(task = task.name, "no issue for task, skipping board update");
            unmatched += 1;
            continue;
        };
        let item_id = match syncer.ensure_item(&items, issue) {
            Ok(item_id) => item_id,
            Err(err) => {
                tracing::warn!(task = task.name, %err, "could not place issue on the board");
                continue;
            }
        };
        let plan = plan_item(task, issue, item_id, today);
        report.merge(&syncer.apply(&plan, today));
        if !dry_run {
            thread::sleep(ITEM_PAUSE);
        }
    }

    println!(
        "fields updated: {}, skipped: {}, failed: {}, tasks without issues: {}",
        report.updated, report.skipped, report.failed, unmatched
    );
    Ok(())
}

fn cmd_update_statuses(root: &Path, dry_run: bool) -> Result<()> {
    let config = SyncConfig::from_env(root)?;
    let client = make_client(&config, dry_run);
    let tasks = load_task_files(&[
        config.workspace.role_dir(),
        config.workspace.overdue_dir(),
    ]);

    let mut report = SyncReport::default();
    for task in &tasks {
        let matches = match client.search_issues(&task.name) {
            Ok(matches) => matches,
            Err(err) => {
                tracing::error!(task = task.name, %err, "issue lookup failed");
                report.record_error();
                continue;
            }
        };
        let Some(issue) = find_issue_by_task(&matches, &task.name) else {
            report.record(&SyncOutcome::NotFound);
            continue;
        };
        if !issue.is_open() {
            report.record(&SyncOutcome::AlreadyClosed { number: issue.number });
            continue;
        }
        match reconcile_status(client.as_ref(), task, issue) {
            Ok(outcome) => {
                log_outcome(task, &outcome);
                report.record(&outcome);
            }
            Err(err) => {
                tracing::error!(task = task.name, %err, "status update failed");
                report.record_error();
            }
        }
        if !dry_run {
            thread::sleep(LABEL_PAUSE);
        }
    }

    println!("{report}");
    Ok(())
}

fn cmd_close_completed(root: &Path, dry_run: bool) -> Result<()> {
    let config = SyncConfig::from_env(root)?;
    let client = make_client(&config, dry_run);
    let tasks = load_task_files(&[config.workspace.deliver_dir()]);
    tracing::info!(count = tasks.len(), "delivered task files found");

    let mut closed = 0usize;
    let mut skipped = 0usize;
    for task in &tasks {
        let matches = match client.search_issues(&task.name) {
            Ok(matches) => matches,
            Err(err) => {
                tracing::error!(task = task.name, %err, "issue lookup failed");
                continue;
            }
        };
        match find_issue_by_task(&matches, &task.name) {
            Some(issue) if issue.is_open() => {
                close_completed(
                    client.as_ref(),
                    issue.number,
                    "Task completed and moved to deliver/",
                );
                tracing::info!(task = task.name, number = issue.number, "closed issue");
                closed += 1;
                if !dry_run {
                    thread::sleep(TASK_PAUSE);
                }
            }
            _ => skipped += 1,
        }
    }

    println!("closed: {closed}, already closed or missing: {skipped}");
    Ok(())
}

fn cmd_move_completed(root: &Path, dry_run: bool) -> Result<()> {
    let workspace = WorkspaceConfig::load(root)?;
    let report = move_completed(&workspace, &MoveOptions { dry_run })?;
    for name in &report.moved {
        println!("moved {name}");
    }
    println!(
        "moved: {}, already delivered: {}, missing metadata: {}, unreadable: {}",
        report.moved.len(),
        report.skipped_existing.len(),
        report.missing_metadata.len(),
        report.unreadable.len()
    );
    Ok(())
}

fn cmd_commit(root: &Path, dry_run: bool, push: bool) -> Result<()> {
    let report = commit_changes(root, &CommitOptions { dry_run, push })?;
    for (path, err) in &report.failed {
        tracing::warn!(path, err, "commit failed");
    }
    println!(
        "committed: {}, failed: {}, excluded: {}{}",
        report.committed.len(),
        report.failed.len(),
        report.excluded,
        if report.pushed { ", pushed" } else { "" }
    );
    Ok(())
}

fn cmd_setup_labels(root: &Path, dry_run: bool) -> Result<()> {
    let config = SyncConfig::from_env(root)?;
    let client = make_client(&config, dry_run);

    let mut created = 0usize;
    let mut failed = 0usize;
    for spec in label_definitions() {
        match client.ensure_label(spec) {
            Ok(()) => created += 1,
            Err(err) => {
                tracing::warn!(label = spec.name, %err, "label setup failed");
                failed += 1;
            }
        }
        if !dry_run {
            thread::sleep(LABEL_PAUSE);
        }
    }

    println!("labels ensured: {created}, failed: {failed}");
    Ok(())
}

fn cmd_iterations(root: &Path) -> Result<()> {
    let config = SyncConfig::from_env(root)?;
    let client = make_client(&config, false);
    let syncer = ProjectSyncer::connect(client.as_ref())?;

    let buckets = syncer
        .fields()
        .iter()
        .find_map(|field| match field {
            ProjectField::Iteration { buckets, .. } => Some(buckets.clone()),
            _ => None,
        })
        .unwrap_or_default();

    println!("Board iterations:");
    for bucket in &buckets {
        println!(
            "  {} ({} to {})",
            bucket.title,
            bucket.start_date,
            bucket.end_date()
        );
    }

    let missing = missing_iterations(&buckets);
    if missing.is_empty() {
        println!("All planned iterations exist on the board.");
    } else {
        println!("Missing iterations (add these in the board's settings, the API cannot create them):");
        for planned in &missing {
            println!(
                "  {} ({} to {})",
                planned.title,
                planned.start_date,
                planned.end_date()
            );
        }
    }
    Ok(())
}

fn cmd_analyze(root: &Path) -> Result<()> {
    let config = SyncConfig::from_env(root)?;
    let client = make_client(&config, false);
    let project_id = client.project_id()?;
    let details = client.project_item_details(&project_id)?;
    print!("{}", analyze(&details));
    Ok(())
}
