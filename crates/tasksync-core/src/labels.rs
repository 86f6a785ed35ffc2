use crate::task::{month_number, Priority, Status, TaskFile};

pub const TYPE_LABEL: &str = "type:task";
pub const DEFAULT_PRIORITY_LABEL: &str = "priority:medium";
pub const DEFAULT_STATUS_LABEL: &str = "status:backlog";

pub fn priority_label(priority: Priority) -> &'static str {
    match priority {
        Priority::P0 => "priority:critical",
        Priority::P1 => "priority:high",
        Priority::P2 => "priority:medium",
        Priority::P3 => "priority:low",
    }
}

pub fn status_label(status: Status) -> &'static str {
    match status {
        Status::Backlog => "status:backlog",
        Status::InProgress => "status:in-progress",
        Status::Review => "status:review",
        Status::Done => "status:done",
        Status::Blocked => "status:blocked",
        Status::Overdue => "status:overdue",
    }
}

pub fn status_from_label(label: &str) -> Option<Status> {
    Status::all()
        .into_iter()
        .find(|status| status_label(*status) == label)
}

/// Category derived purely from the task ID by prefix substring match.
/// Unmatched IDs get no category label.
pub fn category_label(task_name: &str) -> Option<&'static str> {
    if task_name.contains("HA-") {
        return Some("category:hyperagent");
    }
    if task_name.contains("SDK-") {
        return Some("category:sdk");
    }
    if task_name.contains("AA-") {
        return Some("category:account-abstraction");
    }
    if task_name.contains("SEC-") {
        return Some("category:security");
    }
    if task_name.contains("UX-") || task_name.contains("UI-") || task_name.contains("frontend") {
        return Some("category:frontend");
    }
    None
}

pub fn month_label(month: &str) -> Option<String> {
    month_number(month).map(|n| format!("month:{n}"))
}

/// Label set for a freshly created issue. Unmapped priority/status fall back
/// to medium/backlog.
pub fn labels_for_new_issue(task: &TaskFile) -> Vec<String> {
    let mut labels = vec![
        task.priority()
            .map(priority_label)
            .unwrap_or(DEFAULT_PRIORITY_LABEL)
            .to_string(),
        task.status()
            .map(status_label)
            .unwrap_or(DEFAULT_STATUS_LABEL)
            .to_string(),
        TYPE_LABEL.to_string(),
    ];
    if let Some(category) = category_label(&task.name) {
        labels.push(category.to_string());
    }
    if let Some(month) = task.month().and_then(month_label) {
        labels.push(month);
    }
    labels
}

#[derive(Debug, Clone, Copy)]
pub struct LabelSpec {
    pub name: &'static str,
    pub color: &'static str,
    pub description: &'static str,
}

/// The full repository label vocabulary, used by `setup-labels` to seed a
/// fresh repository.
pub fn label_definitions() -> &'static [LabelSpec] {
    const LABELS: &[LabelSpec] = &[
        LabelSpec { name: "priority:critical", color: "d73a4a", description: "P0 - Critical priority" },
        LabelSpec { name: "priority:high", color: "e99695", description: "P1 - High priority" },
        LabelSpec { name: "priority:medium", color: "fbca04", description: "P2 - Medium priority" },
        LabelSpec { name: "priority:low", color: "0e8a16", description: "P3 - Low priority" },
        LabelSpec { name: "status:backlog", color: "ededed", description: "Task in backlog" },
        LabelSpec { name: "status:in-progress", color: "0052cc", description: "Task in progress" },
        LabelSpec { name: "status:review", color: "fbca04", description: "Task under review" },
        LabelSpec { name: "status:done", color: "0e8a16", description: "Task completed" },
        LabelSpec { name: "status:blocked", color: "d73a4a", description: "Task blocked" },
        LabelSpec { name: "status:overdue", color: "b60205", description: "Task overdue" },
        LabelSpec { name: "category:hyperagent", color: "1d76db", description: "HyperAgent related" },
        LabelSpec { name: "category:sdk", color: "0e8a16", description: "SDK related" },
        LabelSpec { name: "category:account-abstraction", color: "5319e7", description: "Account Abstraction related" },
        LabelSpec { name: "category:security", color: "b60205", description: "Security related" },
        LabelSpec { name: "category:frontend", color: "c2e0c6", description: "Frontend/UI related" },
        LabelSpec { name: "month:1", color: "bfd4f2", description: "Month 1 (October 2025)" },
        LabelSpec { name: "month:2", color: "bfd4f2", description: "Month 2 (November 2025)" },
        LabelSpec { name: "month:3", color: "bfd4f2", description: "Month 3 (December 2025)" },
        LabelSpec { name: "month:4", color: "bfd4f2", description: "Month 4 (January 2026)" },
        LabelSpec { name: "month:5", color: "bfd4f2", description: "Month 5 (February 2026)" },
        LabelSpec { name: "month:6", color: "bfd4f2", description: "Month 6 (March 2026)" },
        LabelSpec { name: "type:task", color: "7057ff", description: "Task from PRD" },
    ];
    LABELS
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn task_with(name: &str, metadata: &[(&str, &str)]) -> TaskFile {
        TaskFile {
            name: name.to_string(),
            title: String::new(),
            metadata: metadata
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<HashMap<_, _>>(),
            problem: String::new(),
            goal: String::new(),
            path: PathBuf::from(format!("{name}.md")),
        }
    }

    #[test]
    fn category_is_a_pure_function_of_the_task_id() {
        assert_eq!(category_label("TASK-S3-012-HA-cleanup"), Some("category:hyperagent"));
        assert_eq!(category_label("TASK-S3-013-SEC-audit"), Some("category:security"));
        assert_eq!(category_label("TASK-S1-020-SDK-docs"), Some("category:sdk"));
        assert_eq!(category_label("TASK-S1-021-AA-paymaster"), Some("category:account-abstraction"));
        assert_eq!(category_label("TASK-S1-022-UI-polish"), Some("category:frontend"));
        assert_eq!(category_label("TASK-S3-014-misc"), None);
    }

    #[test]
    fn status_labels_round_trip() {
        for status in Status::all() {
            assert_eq!(status_from_label(status_label(status)), Some(status));
        }
        assert_eq!(status_from_label("category:sdk"), None);
    }

    #[test]
    fn new_issue_defaults_to_medium_backlog() {
        let task = task_with("TASK-S3-014-misc", &[]);
        let labels = labels_for_new_issue(&task);
        assert_eq!(labels, vec!["priority:medium", "status:backlog", "type:task"]);
    }

    #[test]
    fn new_issue_includes_category_and_month() {
        let task = task_with(
            "TASK-S3-012-HA-cleanup",
            &[
                ("priority", "P0"),
                ("status", "IN_PROGRESS"),
                ("month", "Month 3 (December 2025)"),
            ],
        );
        let labels = labels_for_new_issue(&task);
        assert_eq!(
            labels,
            vec![
                "priority:critical",
                "status:in-progress",
                "type:task",
                "category:hyperagent",
                "month:3",
            ]
        );
    }

    #[test]
    fn label_definitions_cover_the_vocabulary() {
        let defs = label_definitions();
        let names: Vec<&str> = defs.iter().map(|spec| spec.name).collect();
        for status in Status::all() {
            assert!(names.contains(&status_label(status)));
        }
        for priority in [Priority::P0, Priority::P1, Priority::P2, Priority::P3] {
            assert!(names.contains(&priority_label(priority)));
        }
        assert!(names.contains(&TYPE_LABEL));
        // No duplicate names.
        let mut deduped = names.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), names.len());
    }
}
