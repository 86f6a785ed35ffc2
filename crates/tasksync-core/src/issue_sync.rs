use std::fmt;
use std::fs;
use std::path::Path;

use chrono::{Duration, Utc};
use regex::Regex;

use crate::config::SyncConfig;
use crate::github::{find_issue_by_task, GitHubClient, GitHubError, Issue};
use crate::labels::{labels_for_new_issue, status_label};
use crate::task::{Status, TaskFile};

/// What happened to one task during a sync pass.
#[derive(Debug, Clone)]
pub enum SyncOutcome {
    Created { issue: Issue },
    Closed { number: u64 },
    MarkedOverdue { number: u64 },
    StatusUpdated { number: u64, from: Option<Status>, to: Status },
    Unchanged { number: u64 },
    AlreadyClosed { number: u64 },
    NotFound,
}

/// Aggregate counts printed at the end of every run.
#[derive(Debug, Default, Clone)]
pub struct SyncReport {
    pub created: usize,
    pub updated: usize,
    pub closed: usize,
    pub unchanged: usize,
    pub skipped: usize,
    pub errors: usize,
}

impl SyncReport {
    pub fn record(&mut self, outcome: &SyncOutcome) {
        match outcome {
            SyncOutcome::Created { .. } => self.created += 1,
            SyncOutcome::Closed { .. } => self.closed += 1,
            SyncOutcome::MarkedOverdue { .. } | SyncOutcome::StatusUpdated { .. } => {
                self.updated += 1
            }
            SyncOutcome::Unchanged { .. } => self.unchanged += 1,
            SyncOutcome::AlreadyClosed { .. } | SyncOutcome::NotFound => self.skipped += 1,
        }
    }

    pub fn record_error(&mut self) {
        self.errors += 1;
    }
}

impl fmt::Display for SyncReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "created: {}, updated: {}, closed: {}, unchanged: {}, skipped: {}, errors: {}",
            self.created, self.updated, self.closed, self.unchanged, self.skipped, self.errors
        )
    }
}

/// Drive one task through the issue state machine. The file's directory and
/// metadata decide the transition; the remote issue is looked up by task-ID
/// substring in the title.
pub fn sync_task(
    client: &dyn GitHubClient,
    config: &SyncConfig,
    task: &TaskFile,
) -> Result<SyncOutcome, GitHubError> {
    let existing = {
        let matches = client.search_issues(&task.name)?;
        find_issue_by_task(&matches, &task.name).cloned()
    };

    // Completed: the file moved into the archive tree.
    if task.in_directory("deliver") {
        return match existing {
            Some(issue) if issue.is_open() => {
                close_completed(client, issue.number, "Task completed and moved to deliver/");
                Ok(SyncOutcome::Closed { number: issue.number })
            }
            Some(issue) => Ok(SyncOutcome::AlreadyClosed { number: issue.number }),
            None => Ok(SyncOutcome::NotFound),
        };
    }

    // Escalated: the file moved into the overdue tree. The issue stays open
    // but gets flagged; a missing issue falls through to creation below.
    if task.in_directory("overdue") {
        if let Some(issue) = &existing {
            if issue.is_open() {
                if let Some(stale) = issue.status_label() {
                    best_effort(
                        &task.name,
                        "remove stale status label",
                        client.remove_label(issue.number, stale),
                    );
                }
                client.add_labels(issue.number, &["status:overdue", "priority:critical"])?;
                best_effort(
                    &task.name,
                    "overdue comment",
                    client.comment(issue.number, "Task marked as OVERDUE"),
                );
                return Ok(SyncOutcome::MarkedOverdue { number: issue.number });
            }
        }
    }

    match existing {
        Some(issue) if issue.is_open() => reconcile_status(client, task, &issue),
        Some(issue) => Ok(SyncOutcome::AlreadyClosed { number: issue.number }),
        None => create_issue(client, config, task),
    }
}

/// Bring an open issue's status label in line with the task file's metadata.
pub fn reconcile_status(
    client: &dyn GitHubClient,
    task: &TaskFile,
    issue: &Issue,
) -> Result<SyncOutcome, GitHubError> {
    let desired = task.status().unwrap_or(Status::Backlog);
    let current = issue.status_label().and_then(crate::labels::status_from_label);
    if current == Some(desired) {
        return Ok(SyncOutcome::Unchanged { number: issue.number });
    }

    client.add_labels(issue.number, &[status_label(desired)])?;
    if let Some(stale) = issue.status_label() {
        best_effort(
            &task.name,
            "remove stale status label",
            client.remove_label(issue.number, stale),
        );
    }
    if desired.is_major() {
        let from = current.map(|s| s.as_str()).unwrap_or("UNKNOWN");
        let body = format!(
            "**Status Updated**: {from} -> {to}\n\nUpdated from PRD task file at {now}",
            to = desired.as_str(),
            now = Utc::now().to_rfc3339(),
        );
        best_effort(&task.name, "status comment", client.comment(issue.number, &body));
    }

    Ok(SyncOutcome::StatusUpdated {
        number: issue.number,
        from: current,
        to: desired,
    })
}

fn create_issue(
    client: &dyn GitHubClient,
    config: &SyncConfig,
    task: &TaskFile,
) -> Result<SyncOutcome, GitHubError> {
    let assignee = task
        .assignee()
        .map(|name| config.workspace.github_username(name));
    let labels = labels_for_new_issue(task);
    let title = format!("{}: {}", task.name, task.title);
    let body = issue_body(task, config);
    let issue = client.create_issue(&title, &body, assignee.as_deref(), &labels)?;
    Ok(SyncOutcome::Created { issue })
}

/// Close an issue for a delivered task: completion comment, close, final
/// status label. Each call is independent best-effort.
pub fn close_completed(client: &dyn GitHubClient, number: u64, reason: &str) {
    let body =
        format!("**Task Completed**\n\n{reason}\n\nClosed automatically from PRD task file.");
    best_effort("issue", "completion comment", client.comment(number, &body));
    best_effort("issue", "close", client.close_issue(number));
    best_effort("issue", "done label", client.add_labels(number, &["status:done"]));
}

/// Human-readable issue body mirroring the task file, including the dates
/// the project sync later reads back out of it.
pub fn issue_body(task: &TaskFile, config: &SyncConfig) -> String {
    let rel = repo_relative_path(&task.path);
    let url = format!(
        "https://github.com/{}/blob/main/src/documentation/{rel}",
        config.repo
    );
    let owner = task
        .assignee()
        .map(|name| config.workspace.github_username(name))
        .unwrap_or_default();
    let target = task
        .due_date()
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "TBD".to_string());
    let start = task
        .due_date()
        .map(|d| (d - Duration::days(7)).format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "TBD".to_string());

    let meta = |key: &str| {
        task.metadata
            .get(key)
            .map(String::as_str)
            .unwrap_or("N/A")
            .to_string()
    };
    let section = |text: &str| {
        if text.is_empty() {
            "See PRD Reference for details.".to_string()
        } else {
            text.to_string()
        }
    };

    format!(
        "**PRD Reference**: {url}\n\n\
         **Owner**: @{owner}\n\
         **Sprint**: {sprint}\n\
         **Start Date**: {start}\n\
         **Target Date**: {target}\n\n\
         ---\n\n\
         ## Problem\n{problem}\n\n\
         ## Goal\n{goal}\n\n\
         ## Metadata\n\
         - **Priority**: {priority}\n\
         - **Status**: {status}\n\
         - **Estimated Hours**: {hours}\n\
         - **Role**: {role}\n\n\
         ## Acceptance Criteria\n\
         See full details in [PRD Reference]({url})\n\n\
         ---\n\n\
         **Note**: This issue is automatically synced with GitHub Project views \
         (Backlog/Board/Current iteration/Roadmap). Status changes will \
         automatically update project views.",
        sprint = task.sprint(),
        problem = section(&task.problem),
        goal = section(&task.goal),
        priority = meta("priority"),
        status = meta("status"),
        hours = meta("estimated_hours"),
        role = meta("role"),
    )
}

/// Path of the task file relative to the documentation root, used for the
/// PRD reference link.
pub fn repo_relative_path(path: &Path) -> String {
    let normalized = path.to_string_lossy().replace('\\', "/");
    match normalized.find("src/documentation/") {
        Some(idx) => normalized[idx + "src/documentation/".len()..].to_string(),
        None => normalized,
    }
}

/// Record the created issue URL back into the task file's metadata block.
/// Best-effort: an unwritable file only logs.
pub fn record_issue_url(path: &Path, issue_url: &str) {
    let Ok(content) = fs::read_to_string(path) else {
        tracing::warn!(path = %path.display(), "could not read task file to record issue URL");
        return;
    };
    let updated = if content.contains("GitHub Issue:") {
        let re = Regex::new(r"GitHub Issue: .+").expect("regex");
        re.replace(&content, format!("GitHub Issue: {issue_url}"))
            .into_owned()
    } else {
        let re = Regex::new(r"(- Actual Hours: .+)").expect("regex");
        re.replace(&content, format!("$1\n- GitHub Issue: {issue_url}"))
            .into_owned()
    };
    if updated != content {
        if let Err(err) = fs::write(path, updated) {
            tracing::warn!(path = %path.display(), %err, "could not record issue URL");
        }
    }
}

fn best_effort(task: &str, what: &str, result: Result<(), GitHubError>) {
    if let Err(err) = result {
        tracing::warn!(task, what, %err, "best-effort call failed");
    }
}
