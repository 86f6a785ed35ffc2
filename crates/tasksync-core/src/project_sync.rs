use chrono::{Duration, NaiveDate};
use regex::Regex;

use crate::github::{GitHubClient, GitHubError, Issue, ProjectField, ProjectItem};
use crate::iteration::match_bucket;
use crate::task::{Status, TaskFile};

/// Result of pushing one value into one board field. A board without the
/// field (or option) is a skip, not an error; only a refused API call fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldOutcome {
    Updated,
    SkippedMissingField,
    Failed,
}

#[derive(Debug, Default, Clone)]
pub struct FieldReport {
    pub updated: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl FieldReport {
    fn record(&mut self, outcome: FieldOutcome) {
        match outcome {
            FieldOutcome::Updated => self.updated += 1,
            FieldOutcome::SkippedMissingField => self.skipped += 1,
            FieldOutcome::Failed => self.failed += 1,
        }
    }

    pub fn merge(&mut self, other: &FieldReport) {
        self.updated += other.updated;
        self.skipped += other.skipped;
        self.failed += other.failed;
    }
}

/// Board status column for a task status.
pub fn project_status_option(status: Status) -> &'static str {
    match status {
        Status::Backlog => "Todo",
        Status::InProgress => "In Progress",
        Status::Review => "In Review",
        Status::Done => "Done",
        Status::Blocked => "Blocked",
        Status::Overdue => "Critical",
    }
}

/// Board status column for a task, with overdue inference: a past due date
/// forces Critical unless the file explicitly says DONE or OVERDUE.
pub fn resolve_status_option(task: &TaskFile, today: NaiveDate) -> &'static str {
    let status = task.status().unwrap_or(Status::Backlog);
    match status {
        Status::Done | Status::Overdue => project_status_option(status),
        _ => {
            let past_due = task.due_date().map(|due| due < today).unwrap_or(false);
            if past_due {
                "Critical"
            } else {
                project_status_option(status)
            }
        }
    }
}

/// Dates recorded in an issue body, used when the task file has no due date
/// (older files predate the metadata key).
pub fn dates_from_body(body: &str) -> (Option<NaiveDate>, Option<NaiveDate>) {
    let date = |label: &str| {
        let re = Regex::new(&format!(r"\*\*{label}\*\*:\s*(\d{{4}}-\d{{2}}-\d{{2}})"))
            .expect("date pattern");
        re.captures(body)
            .and_then(|cap| cap.get(1))
            .and_then(|m| NaiveDate::parse_from_str(m.as_str(), "%Y-%m-%d").ok())
    };
    (date("Start Date"), date("Target Date"))
}

/// Sprint recorded in an issue body.
pub fn sprint_from_body(body: &str) -> Option<String> {
    let re = Regex::new(r"\*\*Sprint\*\*:\s*(S\d+)").expect("sprint pattern");
    re.captures(body)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().to_string())
}

/// Everything to push for one board item, computed before any mutation.
#[derive(Debug, Clone)]
pub struct ItemPlan {
    pub issue_number: u64,
    pub item_id: String,
    pub status_option: &'static str,
    pub start_date: Option<NaiveDate>,
    pub target_date: Option<NaiveDate>,
    pub estimate: Option<f64>,
    pub due_date: Option<NaiveDate>,
    pub month: Option<u32>,
}

pub fn plan_item(task: &TaskFile, issue: &Issue, item_id: String, today: NaiveDate) -> ItemPlan {
    let due = task.due_date();
    let (mut start, mut target) = match due {
        Some(due) => (Some(due - Duration::days(7)), Some(due)),
        None => (None, None),
    };
    if start.is_none() || target.is_none() {
        if let Some(body) = &issue.body {
            let (body_start, body_target) = dates_from_body(body);
            start = start.or(body_start);
            target = target.or(body_target);
        }
    }

    ItemPlan {
        issue_number: issue.number,
        item_id,
        status_option: resolve_status_option(task, today),
        start_date: start,
        target_date: target,
        estimate: task.estimated_hours(),
        due_date: due.or(target),
        month: task.month_number(),
    }
}

/// Pushes planned values into a Projects v2 board. Field and option lookups
/// are case-insensitive; a field the board does not have is skipped.
pub struct ProjectSyncer<'a> {
    client: &'a dyn GitHubClient,
    pub project_id: String,
    fields: Vec<ProjectField>,
}

impl<'a> ProjectSyncer<'a> {
    pub fn connect(client: &'a dyn GitHubClient) -> Result<ProjectSyncer<'a>, GitHubError> {
        let project_id = client.project_id()?;
        let fields = client.project_fields(&project_id)?;
        Ok(ProjectSyncer {
            client,
            project_id,
            fields,
        })
    }

    pub fn fields(&self) -> &[ProjectField] {
        &self.fields
    }

    fn field(&self, name: &str) -> Option<&ProjectField> {
        self.fields
            .iter()
            .find(|field| field.name().eq_ignore_ascii_case(name))
    }

    /// Item id for an issue, adding it to the board when absent.
    pub fn ensure_item(
        &self,
        items: &[ProjectItem],
        issue: &Issue,
    ) -> Result<String, GitHubError> {
        if let Some(item) = items
            .iter()
            .find(|item| item.issue_number == Some(issue.number))
        {
            return Ok(item.id.clone());
        }
        self.client.add_item(&self.project_id, &issue.node_id)
    }

    /// Apply a full plan; every field is attempted independently.
    pub fn apply(&self, plan: &ItemPlan, today: NaiveDate) -> FieldReport {
        let mut report = FieldReport::default();
        report.record(self.set_status(plan));
        report.record(self.set_date(plan, "Start date", plan.start_date));
        report.record(self.set_date(plan, "Target date", plan.target_date));
        report.record(self.set_estimate(plan));
        report.record(self.set_iteration(plan, today));
        report
    }

    fn set_status(&self, plan: &ItemPlan) -> FieldOutcome {
        let Some(ProjectField::SingleSelect { id, options, .. }) = self.field("Status") else {
            return FieldOutcome::SkippedMissingField;
        };
        let Some(option) = options
            .iter()
            .find(|option| option.name.eq_ignore_ascii_case(plan.status_option))
        else {
            tracing::warn!(
                issue = plan.issue_number,
                option = plan.status_option,
                "status option not present on the board"
            );
            return FieldOutcome::SkippedMissingField;
        };
        self.push(
            plan.issue_number,
            "Status",
            self.client
                .set_field_option(&self.project_id, &plan.item_id, id, &option.id),
        )
    }

    fn set_date(&self, plan: &ItemPlan, name: &str, value: Option<NaiveDate>) -> FieldOutcome {
        let Some(date) = value else {
            return FieldOutcome::SkippedMissingField;
        };
        let Some(ProjectField::Date { id, .. }) = self.field(name) else {
            return FieldOutcome::SkippedMissingField;
        };
        self.push(
            plan.issue_number,
            name,
            self.client
                .set_field_date(&self.project_id, &plan.item_id, id, date),
        )
    }

    fn set_estimate(&self, plan: &ItemPlan) -> FieldOutcome {
        let Some(hours) = plan.estimate else {
            return FieldOutcome::SkippedMissingField;
        };
        let Some(ProjectField::Number { id, .. }) = self.field("Estimate") else {
            return FieldOutcome::SkippedMissingField;
        };
        self.push(
            plan.issue_number,
            "Estimate",
            self.client
                .set_field_number(&self.project_id, &plan.item_id, id, hours),
        )
    }

    fn set_iteration(&self, plan: &ItemPlan, today: NaiveDate) -> FieldOutcome {
        let Some(ProjectField::Iteration { id, buckets, .. }) = self.field("Iteration") else {
            return FieldOutcome::SkippedMissingField;
        };
        let Some(bucket) = match_bucket(buckets, plan.due_date, plan.month, today) else {
            return FieldOutcome::SkippedMissingField;
        };
        self.push(
            plan.issue_number,
            "Iteration",
            self.client
                .set_field_iteration(&self.project_id, &plan.item_id, id, &bucket.id),
        )
    }

    fn push(&self, issue: u64, field: &str, result: Result<(), GitHubError>) -> FieldOutcome {
        match result {
            Ok(()) => FieldOutcome::Updated,
            Err(err) => {
                tracing::warn!(issue, field, %err, "field update failed");
                FieldOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::SelectOption;
    use crate::iteration::IterationBucket;
    use crate::test_support::{issue, FakeClient, Mutation};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn task(metadata: &[(&str, &str)]) -> TaskFile {
        TaskFile {
            name: "TASK-S2-004-x".to_string(),
            title: "Sample".to_string(),
            metadata: metadata
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<HashMap<_, _>>(),
            problem: String::new(),
            goal: String::new(),
            path: PathBuf::from("src/documentation/agile.role/aaron/TASK-S2-004-x.md"),
        }
    }

    fn board_fields() -> Vec<ProjectField> {
        vec![
            ProjectField::SingleSelect {
                id: "F_status".to_string(),
                name: "Status".to_string(),
                options: ["Todo", "In Progress", "In Review", "Done", "Blocked", "Critical"]
                    .iter()
                    .map(|name| SelectOption {
                        id: format!("OPT_{}", name.replace(' ', "_")),
                        name: name.to_string(),
                    })
                    .collect(),
            },
            ProjectField::Date {
                id: "F_start".to_string(),
                name: "Start date".to_string(),
            },
            ProjectField::Date {
                id: "F_target".to_string(),
                name: "Target date".to_string(),
            },
            ProjectField::Number {
                id: "F_estimate".to_string(),
                name: "Estimate".to_string(),
            },
            ProjectField::Iteration {
                id: "F_iter".to_string(),
                name: "Iteration".to_string(),
                buckets: vec![
                    IterationBucket {
                        id: "it1".to_string(),
                        title: "Iteration".to_string(),
                        start_date: date(2025, 12, 15),
                        duration_days: 14,
                    },
                    IterationBucket {
                        id: "it2".to_string(),
                        title: "Iteration 2".to_string(),
                        start_date: date(2025, 12, 29),
                        duration_days: 14,
                    },
                ],
            },
        ]
    }

    #[test]
    fn status_mapping_covers_every_status() {
        assert_eq!(project_status_option(Status::Backlog), "Todo");
        assert_eq!(project_status_option(Status::InProgress), "In Progress");
        assert_eq!(project_status_option(Status::Review), "In Review");
        assert_eq!(project_status_option(Status::Done), "Done");
        assert_eq!(project_status_option(Status::Blocked), "Blocked");
        assert_eq!(project_status_option(Status::Overdue), "Critical");
    }

    #[test]
    fn past_due_open_task_resolves_to_critical() {
        let t = task(&[("status", "IN_PROGRESS"), ("due_date", "2025-12-01")]);
        assert_eq!(resolve_status_option(&t, date(2025, 12, 10)), "Critical");
        // Not yet due keeps the mapped column.
        assert_eq!(resolve_status_option(&t, date(2025, 11, 20)), "In Progress");
        // The due day itself is not past due.
        assert_eq!(resolve_status_option(&t, date(2025, 12, 1)), "In Progress");
    }

    #[test]
    fn explicit_done_and_overdue_beat_date_inference() {
        let done = task(&[("status", "DONE"), ("due_date", "2025-12-01")]);
        assert_eq!(resolve_status_option(&done, date(2026, 1, 1)), "Done");
        let overdue = task(&[("status", "OVERDUE"), ("due_date", "2099-01-01")]);
        assert_eq!(resolve_status_option(&overdue, date(2025, 1, 1)), "Critical");
    }

    #[test]
    fn body_dates_fill_in_for_missing_metadata() {
        let t = task(&[("status", "BACKLOG")]);
        let mut remote = issue(9, "TASK-S2-004-x: Sample", "open", &[]);
        remote.body = Some(
            "**Start Date**: 2025-11-14\n**Target Date**: 2025-11-21\n**Sprint**: S2".to_string(),
        );

        let plan = plan_item(&t, &remote, "ITEM_9".to_string(), date(2025, 11, 1));
        assert_eq!(plan.start_date, Some(date(2025, 11, 14)));
        assert_eq!(plan.target_date, Some(date(2025, 11, 21)));
        assert_eq!(plan.due_date, Some(date(2025, 11, 21)));
        assert_eq!(sprint_from_body(remote.body.as_deref().unwrap()), Some("S2".to_string()));
    }

    #[test]
    fn metadata_due_date_wins_over_body_dates() {
        let t = task(&[("due_date", "2025-12-05")]);
        let mut remote = issue(9, "TASK-S2-004-x: Sample", "open", &[]);
        remote.body = Some("**Target Date**: 2025-11-21".to_string());

        let plan = plan_item(&t, &remote, "ITEM_9".to_string(), date(2025, 11, 1));
        assert_eq!(plan.start_date, Some(date(2025, 11, 28)));
        assert_eq!(plan.target_date, Some(date(2025, 12, 5)));
    }

    #[test]
    fn ensure_item_reuses_an_existing_board_item() {
        let mut client = FakeClient::default();
        client.items = vec![ProjectItem {
            id: "ITEM_existing".to_string(),
            issue_number: Some(9),
        }];
        client.fields = board_fields();
        let syncer = ProjectSyncer::connect(&client).expect("connect");

        let remote = issue(9, "TASK-S2-004-x: Sample", "open", &[]);
        let item_id = syncer.ensure_item(&client.items, &remote).expect("item");
        assert_eq!(item_id, "ITEM_existing");
        assert!(client.mutations().is_empty());
    }

    #[test]
    fn ensure_item_adds_missing_issues_to_the_board() {
        let mut client = FakeClient::default();
        client.fields = board_fields();
        let syncer = ProjectSyncer::connect(&client).expect("connect");

        let remote = issue(9, "TASK-S2-004-x: Sample", "open", &[]);
        let item_id = syncer.ensure_item(&[], &remote).expect("item");
        assert_eq!(item_id, "ITEM_I_node_9");
        assert!(matches!(
            client.mutations().as_slice(),
            [Mutation::AddItem { issue_node_id }] if issue_node_id == "I_node_9"
        ));
    }

    #[test]
    fn apply_pushes_every_planned_field() {
        let mut client = FakeClient::default();
        client.fields = board_fields();
        let syncer = ProjectSyncer::connect(&client).expect("connect");

        let t = task(&[
            ("status", "IN_PROGRESS"),
            ("due_date", "2025-12-20"),
            ("estimated_hours", "12"),
        ]);
        let remote = issue(9, "TASK-S2-004-x: Sample", "open", &[]);
        let plan = plan_item(&t, &remote, "ITEM_9".to_string(), date(2025, 12, 1));
        let report = syncer.apply(&plan, date(2025, 12, 1));

        assert_eq!(report.updated, 5);
        assert_eq!(report.skipped, 0);
        assert_eq!(report.failed, 0);

        let mutations = client.mutations();
        assert!(mutations.iter().any(|m| matches!(
            m,
            Mutation::SetOption { field_id, option_id, .. }
                if field_id == "F_status" && option_id == "OPT_In_Progress"
        )));
        assert!(mutations.iter().any(|m| matches!(
            m,
            Mutation::SetDate { field_id, date: d, .. }
                if field_id == "F_start" && *d == date(2025, 12, 13)
        )));
        assert!(mutations.iter().any(|m| matches!(
            m,
            Mutation::SetDate { field_id, date: d, .. }
                if field_id == "F_target" && *d == date(2025, 12, 20)
        )));
        assert!(mutations.iter().any(|m| matches!(
            m,
            Mutation::SetNumber { field_id, value, .. }
                if field_id == "F_estimate" && *value == 12.0
        )));
        // Due 2025-12-20 falls inside the first iteration's range.
        assert!(mutations.iter().any(|m| matches!(
            m,
            Mutation::SetIteration { field_id, iteration_id, .. }
                if field_id == "F_iter" && iteration_id == "it1"
        )));
    }

    #[test]
    fn refused_date_updates_are_counted_without_stopping_the_rest() {
        let mut client = FakeClient::default();
        client.fields = board_fields();
        client.fail_set_date = true;
        let syncer = ProjectSyncer::connect(&client).expect("connect");

        let t = task(&[
            ("status", "IN_PROGRESS"),
            ("due_date", "2025-12-20"),
            ("estimated_hours", "12"),
        ]);
        let remote = issue(9, "TASK-S2-004-x: Sample", "open", &[]);
        let plan = plan_item(&t, &remote, "ITEM_9".to_string(), date(2025, 12, 1));
        let report = syncer.apply(&plan, date(2025, 12, 1));

        // Both date fields fail; status, estimate and iteration still land.
        assert_eq!(report.failed, 2);
        assert_eq!(report.updated, 3);
        assert_eq!(report.skipped, 0);
        assert!(client
            .mutations()
            .iter()
            .all(|m| !matches!(m, Mutation::SetDate { .. })));
    }

    #[test]
    fn missing_board_fields_are_skipped_not_failed() {
        let mut client = FakeClient::default();
        client.fields = vec![ProjectField::SingleSelect {
            id: "F_status".to_string(),
            name: "Status".to_string(),
            options: vec![SelectOption {
                id: "OPT_Todo".to_string(),
                name: "Todo".to_string(),
            }],
        }];
        let syncer = ProjectSyncer::connect(&client).expect("connect");

        let t = task(&[("due_date", "2025-12-20"), ("estimated_hours", "4")]);
        let remote = issue(9, "TASK-S2-004-x: Sample", "open", &[]);
        let plan = plan_item(&t, &remote, "ITEM_9".to_string(), date(2025, 12, 1));
        let report = syncer.apply(&plan, date(2025, 12, 1));

        assert_eq!(report.updated, 1);
        assert_eq!(report.skipped, 4);
        assert_eq!(report.failed, 0);
    }

    #[test]
    fn unknown_status_option_is_a_skip() {
        let mut client = FakeClient::default();
        client.fields = vec![ProjectField::SingleSelect {
            id: "F_status".to_string(),
            name: "Status".to_string(),
            options: vec![SelectOption {
                id: "OPT_Todo".to_string(),
                name: "Todo".to_string(),
            }],
        }];
        let syncer = ProjectSyncer::connect(&client).expect("connect");

        let t = task(&[("status", "BLOCKED")]);
        let remote = issue(9, "TASK-S2-004-x: Sample", "open", &[]);
        let plan = plan_item(&t, &remote, "ITEM_9".to_string(), date(2025, 12, 1));
        let report = syncer.apply(&plan, date(2025, 12, 1));

        assert_eq!(report.updated, 0);
        assert!(client.mutations().is_empty());
    }
}
