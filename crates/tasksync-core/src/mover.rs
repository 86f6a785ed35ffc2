use std::fs;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::WorkspaceConfig;
use crate::task::{find_task_files, parse_task_file, Status, TaskFile};

#[derive(Debug, Error)]
pub enum MoveError {
    #[error("Failed to move task: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Default)]
pub struct MoveOptions {
    pub dry_run: bool,
}

#[derive(Debug, Clone, Default)]
pub struct MoveReport {
    pub moved: Vec<String>,
    pub skipped_existing: Vec<String>,
    pub missing_metadata: Vec<String>,
    pub unreadable: Vec<PathBuf>,
    pub deliver_dir: PathBuf,
}

/// Move DONE tasks out of the working tree into
/// `deliver/month-<N>/<owner>/`. A file already present at the destination
/// is never overwritten, so re-runs are no-ops.
pub fn move_completed(
    workspace: &WorkspaceConfig,
    options: &MoveOptions,
) -> Result<MoveReport, MoveError> {
    let deliver_dir = workspace.deliver_dir();
    let mut report = MoveReport {
        deliver_dir: deliver_dir.clone(),
        ..MoveReport::default()
    };

    for path in find_task_files(&[workspace.role_dir()]) {
        // One bad file never aborts the batch.
        let task = match parse_task_file(&path) {
            Ok(task) => task,
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "skipping unreadable task file");
                report.unreadable.push(path);
                continue;
            }
        };
        if task.status() != Some(Status::Done) {
            continue;
        }
        let Some(destination) = destination_dir(workspace, &task) else {
            tracing::warn!(task = task.name, "DONE task lacks assignee or month, leaving in place");
            report.missing_metadata.push(task.name);
            continue;
        };
        let target = destination.join(format!("{}.md", task.name));
        if target.exists() {
            report.skipped_existing.push(task.name);
            continue;
        }
        if options.dry_run {
            tracing::info!(
                task = task.name,
                target = %target.display(),
                "[dry-run] would move completed task"
            );
            report.moved.push(task.name);
            continue;
        }
        fs::create_dir_all(&destination)?;
        fs::rename(&path, &target)?;
        report.moved.push(task.name);
    }

    Ok(report)
}

fn destination_dir(workspace: &WorkspaceConfig, task: &TaskFile) -> Option<PathBuf> {
    let assignee = task.assignee()?;
    let month = task.month_number()?;
    Some(
        workspace
            .deliver_dir()
            .join(format!("month-{month}"))
            .join(workspace.owner_dir(assignee)),
    )
}
