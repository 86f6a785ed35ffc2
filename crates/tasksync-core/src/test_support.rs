//! In-memory GitHub client fake used across sync tests.

use std::cell::RefCell;

use chrono::NaiveDate;

use crate::github::{
    GitHubClient, GitHubError, Issue, IssueLabel, ItemDetail, ProjectField, ProjectItem,
};
use crate::labels::LabelSpec;

#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    CreateIssue {
        title: String,
        assignee: Option<String>,
        labels: Vec<String>,
    },
    AddLabels {
        number: u64,
        labels: Vec<String>,
    },
    RemoveLabel {
        number: u64,
        label: String,
    },
    Comment {
        number: u64,
        body: String,
    },
    CloseIssue {
        number: u64,
    },
    EnsureLabel {
        name: String,
    },
    AddItem {
        issue_node_id: String,
    },
    SetOption {
        item_id: String,
        field_id: String,
        option_id: String,
    },
    SetDate {
        item_id: String,
        field_id: String,
        date: NaiveDate,
    },
    SetNumber {
        item_id: String,
        field_id: String,
        value: f64,
    },
    SetIteration {
        item_id: String,
        field_id: String,
        iteration_id: String,
    },
}

#[derive(Default)]
pub struct FakeClient {
    pub issues: Vec<Issue>,
    pub fields: Vec<ProjectField>,
    pub items: Vec<ProjectItem>,
    pub details: Vec<ItemDetail>,
    pub fail_remove_label: bool,
    pub fail_set_date: bool,
    recorded: RefCell<Vec<Mutation>>,
}

impl FakeClient {
    pub fn with_issues(issues: Vec<Issue>) -> FakeClient {
        FakeClient {
            issues,
            ..FakeClient::default()
        }
    }

    pub fn mutations(&self) -> Vec<Mutation> {
        self.recorded.borrow().clone()
    }

    fn record(&self, mutation: Mutation) {
        self.recorded.borrow_mut().push(mutation);
    }
}

pub fn issue(number: u64, title: &str, state: &str, labels: &[&str]) -> Issue {
    Issue {
        number,
        node_id: format!("I_node_{number}"),
        title: title.to_string(),
        state: state.to_string(),
        labels: labels
            .iter()
            .map(|name| IssueLabel {
                name: name.to_string(),
            })
            .collect(),
        body: None,
    }
}

impl GitHubClient for FakeClient {
    fn search_issues(&self, query: &str) -> Result<Vec<Issue>, GitHubError> {
        Ok(self
            .issues
            .iter()
            .filter(|issue| issue.title.contains(query))
            .cloned()
            .collect())
    }

    fn list_issues(&self) -> Result<Vec<Issue>, GitHubError> {
        Ok(self.issues.clone())
    }

    fn project_id(&self) -> Result<String, GitHubError> {
        Ok("PVT_fake".to_string())
    }

    fn project_fields(&self, _project_id: &str) -> Result<Vec<ProjectField>, GitHubError> {
        Ok(self.fields.clone())
    }

    fn project_items(&self, _project_id: &str) -> Result<Vec<ProjectItem>, GitHubError> {
        Ok(self.items.clone())
    }

    fn project_item_details(&self, _project_id: &str) -> Result<Vec<ItemDetail>, GitHubError> {
        Ok(self.details.clone())
    }

    fn create_issue(
        &self,
        title: &str,
        _body: &str,
        assignee: Option<&str>,
        labels: &[String],
    ) -> Result<Issue, GitHubError> {
        self.record(Mutation::CreateIssue {
            title: title.to_string(),
            assignee: assignee.map(str::to_string),
            labels: labels.to_vec(),
        });
        Ok(issue(
            100 + self.recorded.borrow().len() as u64,
            title,
            "open",
            &labels.iter().map(String::as_str).collect::<Vec<_>>(),
        ))
    }

    fn add_labels(&self, number: u64, labels: &[&str]) -> Result<(), GitHubError> {
        self.record(Mutation::AddLabels {
            number,
            labels: labels.iter().map(|l| l.to_string()).collect(),
        });
        Ok(())
    }

    fn remove_label(&self, number: u64, label: &str) -> Result<(), GitHubError> {
        if self.fail_remove_label {
            return Err(GitHubError::Api {
                status: 404,
                message: "label not found".to_string(),
            });
        }
        self.record(Mutation::RemoveLabel {
            number,
            label: label.to_string(),
        });
        Ok(())
    }

    fn comment(&self, number: u64, body: &str) -> Result<(), GitHubError> {
        self.record(Mutation::Comment {
            number,
            body: body.to_string(),
        });
        Ok(())
    }

    fn close_issue(&self, number: u64) -> Result<(), GitHubError> {
        self.record(Mutation::CloseIssue { number });
        Ok(())
    }

    fn ensure_label(&self, spec: &LabelSpec) -> Result<(), GitHubError> {
        self.record(Mutation::EnsureLabel {
            name: spec.name.to_string(),
        });
        Ok(())
    }

    fn add_item(&self, _project_id: &str, issue_node_id: &str) -> Result<String, GitHubError> {
        self.record(Mutation::AddItem {
            issue_node_id: issue_node_id.to_string(),
        });
        Ok(format!("ITEM_{issue_node_id}"))
    }

    fn set_field_option(
        &self,
        _project_id: &str,
        item_id: &str,
        field_id: &str,
        option_id: &str,
    ) -> Result<(), GitHubError> {
        self.record(Mutation::SetOption {
            item_id: item_id.to_string(),
            field_id: field_id.to_string(),
            option_id: option_id.to_string(),
        });
        Ok(())
    }

    fn set_field_date(
        &self,
        _project_id: &str,
        item_id: &str,
        field_id: &str,
        date: NaiveDate,
    ) -> Result<(), GitHubError> {
        if self.fail_set_date {
            return Err(GitHubError::Api {
                status: 500,
                message: "server error".to_string(),
            });
        }
        self.record(Mutation::SetDate {
            item_id: item_id.to_string(),
            field_id: field_id.to_string(),
            date,
        });
        Ok(())
    }

    fn set_field_number(
        &self,
        _project_id: &str,
        item_id: &str,
        field_id: &str,
        value: f64,
    ) -> Result<(), GitHubError> {
        self.record(Mutation::SetNumber {
            item_id: item_id.to_string(),
            field_id: field_id.to_string(),
            value,
        });
        Ok(())
    }

    fn set_field_iteration(
        &self,
        _project_id: &str,
        item_id: &str,
        field_id: &str,
        iteration_id: &str,
    ) -> Result<(), GitHubError> {
        self.record(Mutation::SetIteration {
            item_id: item_id.to_string(),
            field_id: field_id.to_string(),
            iteration_id: iteration_id.to_string(),
        });
        Ok(())
    }
}
