use std::path::Path;
use std::process::Command;

use anyhow::{anyhow, Context, Result};
use regex::Regex;

/// Paths never committed automatically. Glob-ish: `**` spans directories,
/// `*` stops at a separator.
const EXCLUDE_PATTERNS: &[&str] = &[
    "node_modules/**",
    "target/**",
    "dist/**",
    ".env*",
    "*.log",
    ".DS_Store",
];

/// Files per reported batch.
const BATCH_SIZE: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeStatus {
    Added,
    Modified,
    Deleted,
    Renamed,
    Untracked,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FileChange {
    pub status: ChangeStatus,
    pub path: String,
}

#[derive(Debug, Clone, Default)]
pub struct CommitOptions {
    pub dry_run: bool,
    pub push: bool,
}

#[derive(Debug, Default)]
pub struct CommitReport {
    pub committed: Vec<String>,
    pub failed: Vec<(String, String)>,
    pub excluded: usize,
    pub pushed: bool,
}

/// One `git status --porcelain` line per change. Renames keep the new path.
pub fn parse_porcelain(raw: &str) -> Vec<FileChange> {
    let mut changes = Vec::new();
    for line in raw.lines() {
        if line.len() < 4 {
            continue;
        }
        let (code, rest) = line.split_at(2);
        let path = rest.trim_start();
        let path = match path.split_once(" -> ") {
            Some((_, new)) => new,
            None => path,
        };
        let path = path.trim_matches('"').to_string();
        let status = if code == "??" {
            ChangeStatus::Untracked
        } else if code.contains('R') {
            ChangeStatus::Renamed
        } else if code.contains('D') {
            ChangeStatus::Deleted
        } else if code.contains('A') {
            ChangeStatus::Added
        } else {
            ChangeStatus::Modified
        };
        changes.push(FileChange { status, path });
    }
    changes
}

fn pattern_to_regex(pattern: &str) -> Regex {
    let mut escaped = regex::escape(pattern);
    escaped = escaped.replace(r"\*\*", "\u{1}");
    escaped = escaped.replace(r"\*", "[^/]*");
    escaped = escaped.replace('\u{1}', ".*");
    Regex::new(&format!("^(.*/)?{escaped}$")).expect("exclude pattern")
}

pub fn is_excluded(path: &str) -> bool {
    EXCLUDE_PATTERNS
        .iter()
        .any(|pattern| pattern_to_regex(pattern).is_match(path))
}

/// Split a task filename into its numeric ID and a human-readable slug,
/// e.g. `TASK-S2-004-wallet-audit.md` into `TASK-S2-004` and `wallet audit`.
fn task_parts(path: &str) -> Option<(String, String)> {
    let file = path.rsplit('/').next()?;
    let stem = file.strip_suffix(".md")?;
    let re = Regex::new(r"^(TASK-S\d+-\d+)(?:-(.+))?$").expect("task id pattern");
    let cap = re.captures(stem)?;
    let id = cap.get(1)?.as_str().to_string();
    let slug = cap
        .get(2)
        .map(|m| m.as_str().replace('-', " "))
        .unwrap_or_else(|| "task".to_string());
    Some((id, slug))
}

fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Conventional message for one changed file, derived from the path and the
/// change kind alone.
pub fn commit_message(change: &FileChange) -> String {
    let path = change.path.as_str();
    let name = file_name(path);

    if let Some((id, slug)) = task_parts(path) {
        if path.contains("/deliver/") || path.starts_with("deliver/") {
            return format!("task({id}): complete {slug}");
        }
        if path.contains("/overdue/") || path.starts_with("overdue/") {
            return format!("task({id}): escalate {slug}");
        }
        return match change.status {
            ChangeStatus::Added | ChangeStatus::Untracked => format!("task({id}): create {slug}"),
            ChangeStatus::Deleted => format!("task({id}): archive {slug}"),
            _ => format!("task({id}): update {slug}"),
        };
    }

    if path.contains("/deliver/") || path.starts_with("deliver/") {
        return format!("deliver: update {name}");
    }
    if name.to_lowercase().contains("sprint") {
        return format!("sprint: update {name}");
    }
    if change.status == ChangeStatus::Deleted {
        return format!("remove: {name}");
    }
    if name.ends_with(".md") {
        return format!("docs: update {name}");
    }
    if path.starts_with("src/") || path.contains("/src/") {
        return match change.status {
            ChangeStatus::Added | ChangeStatus::Untracked => format!("feat: add {name}"),
            _ => format!("update: {name}"),
        };
    }
    format!("chore: update {name}")
}

/// Commit every pending change one file per commit, in concurrent batches.
/// A failing file is reported and does not stop the rest of its batch.
pub fn commit_changes(repo_root: &Path, options: &CommitOptions) -> Result<CommitReport> {
    // -uall lists each untracked file individually; without it git collapses
    // a new directory into a single `?? dir/` entry.
    let raw = git_stdout(repo_root, &["status", "--porcelain", "-uall"])?;
    let mut report = CommitReport::default();
    let changes: Vec<FileChange> = parse_porcelain(&raw)
        .into_iter()
        .filter(|change| {
            if is_excluded(&change.path) {
                report.excluded += 1;
                false
            } else {
                true
            }
        })
        .collect();

    if changes.is_empty() {
        return Ok(report);
    }

    if options.dry_run {
        for change in &changes {
            tracing::info!(
                path = change.path,
                message = commit_message(change),
                "[dry-run] would commit"
            );
            report.committed.push(change.path.clone());
        }
        return Ok(report);
    }

    // One commit per file. Git serializes on the index lock anyway, so
    // batches only bound how much progress is reported at a time.
    for batch in changes.chunks(BATCH_SIZE) {
        for change in batch {
            match commit_one(repo_root, change) {
                Ok(()) => report.committed.push(change.path.clone()),
                Err(err) => report.failed.push((change.path.clone(), err.to_string())),
            }
        }
        tracing::info!(
            committed = report.committed.len(),
            failed = report.failed.len(),
            "commit batch done"
        );
    }

    if options.push && !report.committed.is_empty() {
        git_stdout(repo_root, &["push"])?;
        report.pushed = true;
    }
    Ok(report)
}

fn commit_one(repo_root: &Path, change: &FileChange) -> Result<()> {
    let message = commit_message(change);
    if change.status == ChangeStatus::Deleted {
        run_git(repo_root, &["rm", "--cached", "--ignore-unmatch", &change.path])?;
    } else {
        run_git(repo_root, &["add", &change.path])?;
    }
    run_git(repo_root, &["commit", "-m", &message, "--", &change.path])?;
    Ok(())
}

fn run_git(repo_root: &Path, args: &[&str]) -> Result<()> {
    git_stdout(repo_root, args).map(|_| ())
}

fn git_stdout(repo_root: &Path, args: &[&str]) -> Result<String> {
    let output = Command::new("git")
        .arg("-C")
        .arg(repo_root)
        .args(args)
        .output()
        .with_context(|| format!("run git {} under {}", args.join(" "), repo_root.display()))?;
    if !output.status.success() {
        return Err(anyhow!(
            "git {} failed: {}",
            args.join(" "),
            String::from_utf8_lossy(&output.stderr).trim()
        ));
    }
    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}
