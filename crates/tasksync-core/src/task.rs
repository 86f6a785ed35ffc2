use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use regex::Regex;
use thiserror::Error;

/// Task lifecycle status as declared in the `## Metadata` block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Backlog,
    InProgress,
    Review,
    Done,
    Blocked,
    Overdue,
}

impl Status {
    pub fn parse(value: &str) -> Option<Status> {
        match value.trim().to_ascii_uppercase().as_str() {
            "BACKLOG" => Some(Status::Backlog),
            "IN_PROGRESS" => Some(Status::InProgress),
            "REVIEW" => Some(Status::Review),
            "DONE" => Some(Status::Done),
            "BLOCKED" => Some(Status::Blocked),
            "OVERDUE" => Some(Status::Overdue),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Backlog => "BACKLOG",
            Status::InProgress => "IN_PROGRESS",
            Status::Review => "REVIEW",
            Status::Done => "DONE",
            Status::Blocked => "BLOCKED",
            Status::Overdue => "OVERDUE",
        }
    }

    /// Transitions worth announcing with an issue comment.
    pub fn is_major(&self) -> bool {
        matches!(
            self,
            Status::InProgress | Status::Review | Status::Done | Status::Overdue
        )
    }

    pub fn all() -> [Status; 6] {
        [
            Status::Backlog,
            Status::InProgress,
            Status::Review,
            Status::Done,
            Status::Blocked,
            Status::Overdue,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Priority {
    P0,
    P1,
    P2,
    P3,
}

impl Priority {
    pub fn parse(value: &str) -> Option<Priority> {
        match value.trim().to_ascii_uppercase().as_str() {
            "P0" => Some(Priority::P0),
            "P1" => Some(Priority::P1),
            "P2" => Some(Priority::P2),
            "P3" => Some(Priority::P3),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum TaskFileError {
    #[error("failed to read task file: {0}")]
    Io(#[from] std::io::Error),
}

/// A parsed markdown task file. The metadata map keeps every `- Key: Value`
/// line from the `## Metadata` block with keys lowercased and spaces turned
/// into underscores; missing sections simply yield empty fields.
#[derive(Debug, Clone)]
pub struct TaskFile {
    pub name: String,
    pub title: String,
    pub metadata: HashMap<String, String>,
    pub problem: String,
    pub goal: String,
    pub path: PathBuf,
}

impl TaskFile {
    pub fn status(&self) -> Option<Status> {
        self.metadata.get("status").and_then(|s| Status::parse(s))
    }

    pub fn priority(&self) -> Option<Priority> {
        self.metadata.get("priority").and_then(|s| Priority::parse(s))
    }

    pub fn assignee(&self) -> Option<&str> {
        self.metadata
            .get("assignee")
            .map(|s| s.as_str())
            .filter(|s| !s.is_empty())
    }

    pub fn month(&self) -> Option<&str> {
        self.metadata
            .get("month")
            .map(|s| s.as_str())
            .filter(|s| !s.is_empty())
    }

    pub fn month_number(&self) -> Option<u32> {
        self.month().and_then(month_number)
    }

    pub fn due_date(&self) -> Option<NaiveDate> {
        self.metadata
            .get("due_date")
            .and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok())
    }

    pub fn estimated_hours(&self) -> Option<f64> {
        self.metadata
            .get("estimated_hours")
            .and_then(|s| s.trim().parse::<f64>().ok())
    }

    /// Sprint tag derived from the month label, `S0` when no month is set.
    pub fn sprint(&self) -> String {
        match self.month_number() {
            Some(n) => format!("S{n}"),
            None => "S0".to_string(),
        }
    }

    /// Whether the file currently lives under the given lifecycle directory
    /// (e.g. `deliver` or `overdue`). The directory location is meaningful
    /// state, independent of the metadata block.
    pub fn in_directory(&self, dir_name: &str) -> bool {
        self.path
            .components()
            .any(|c| c.as_os_str().to_string_lossy() == dir_name)
    }
}

/// Extract the numeric month from a month label. Accepts `Month 3 (December
/// 2025)`, `3 (December 2025)` and plain `3`.
pub fn month_number(value: &str) -> Option<u32> {
    let re = Regex::new(r"Month (\d+)").expect("regex");
    if let Some(cap) = re.captures(value) {
        return cap.get(1).and_then(|m| m.as_str().parse().ok());
    }
    let alt = Regex::new(r"^(\d+)").expect("regex");
    alt.captures(value.trim())
        .and_then(|cap| cap.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Parse a task file. Only an unreadable file is an error; malformed or
/// missing sections produce empty fields so a batch run can keep going.
pub fn parse_task_file(path: &Path) -> Result<TaskFile, TaskFileError> {
    let content = fs::read_to_string(path)?;
    Ok(parse_task_content(path, &content))
}

fn parse_task_content(path: &Path, content: &str) -> TaskFile {
    let metadata_line = Regex::new(r"^- (\w+(?:\s+\w+)?): (.+)$").expect("regex");

    let mut metadata = HashMap::new();
    let mut problem = String::new();
    let mut goal = String::new();
    let mut in_metadata = false;
    let mut in_problem = false;
    let mut in_goal = false;

    for raw in content.lines() {
        let line = raw.trim();

        if line == "## Metadata" {
            in_metadata = true;
            continue;
        }
        if in_metadata && line.starts_with("##") {
            in_metadata = false;
        }
        if in_metadata {
            if let Some(cap) = metadata_line.captures(line) {
                let key = cap[1].to_lowercase().split_whitespace().collect::<Vec<_>>().join("_");
                metadata.insert(key, cap[2].trim().to_string());
            }
        }

        if line == "## Problem" {
            in_problem = true;
            continue;
        }
        if in_problem && line.starts_with("##") {
            in_problem = false;
        }
        if in_problem && !line.is_empty() {
            problem.push_str(line);
            problem.push('\n');
        }

        if line == "## Goal" {
            in_goal = true;
            continue;
        }
        if in_goal && line.starts_with("##") {
            in_goal = false;
        }
        if in_goal && !line.is_empty() {
            goal.push_str(line);
            goal.push('\n');
        }
    }

    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string();
    let title_re = Regex::new(r"^#\s*TASK-[^:]+:\s*").expect("regex");
    let title = content
        .lines()
        .next()
        .map(|first| title_re.replace(first, "").trim().to_string())
        .unwrap_or_default();

    TaskFile {
        name,
        title,
        metadata,
        problem: problem.trim().to_string(),
        goal: goal.trim().to_string(),
        path: path.to_path_buf(),
    }
}

/// Parse every task file found under the given roots. An unreadable file is
/// logged and skipped rather than aborting the batch.
pub fn load_task_files(roots: &[PathBuf]) -> Vec<TaskFile> {
    let mut tasks = Vec::new();
    for path in find_task_files(roots) {
        match parse_task_file(&path) {
            Ok(task) => tasks.push(task),
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "skipping unreadable task file");
            }
        }
    }
    tasks
}

/// Recursively collect `TASK-*.md` files under each of the given roots.
/// Missing roots are skipped. Results are sorted for deterministic runs.
pub fn find_task_files(roots: &[PathBuf]) -> Vec<PathBuf> {
    let mut found = Vec::new();
    for root in roots {
        walk(root, &mut found);
    }
    found.sort();
    found
}

fn walk(dir: &Path, found: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.filter_map(|entry| entry.ok()) {
        let path = entry.path();
        if path.is_dir() {
            walk(&path, found);
            continue;
        }
        let file_name = entry.file_name();
        let name = file_name.to_string_lossy();
        if name.starts_with("TASK-") && name.ends_with(".md") {
            found.push(path);
        }
    }
}
