use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;

use crate::config::SyncConfig;
use crate::iteration::IterationBucket;
use crate::labels::LabelSpec;

const API_ROOT: &str = "https://api.github.com";
const USER_AGENT: &str = concat!("tasksync/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum GitHubError {
    #[error("GitHub request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("GitHub response decode failed: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("GitHub API error ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("GraphQL error: {0}")]
    GraphQl(String),
    #[error("project {number} not found for owner {owner}")]
    ProjectNotFound { owner: String, number: u64 },
}

#[derive(Debug, Clone, Deserialize)]
pub struct IssueLabel {
    pub name: String,
}

/// A remote issue as returned by the REST surface. The remote record is
/// canonical; we only read and patch it.
#[derive(Debug, Clone, Deserialize)]
pub struct Issue {
    pub number: u64,
    #[serde(default)]
    pub node_id: String,
    pub title: String,
    pub state: String,
    #[serde(default)]
    pub labels: Vec<IssueLabel>,
    #[serde(default)]
    pub body: Option<String>,
}

impl Issue {
    pub fn is_open(&self) -> bool {
        self.state.eq_ignore_ascii_case("open")
    }

    pub fn label_names(&self) -> Vec<&str> {
        self.labels.iter().map(|label| label.name.as_str()).collect()
    }

    pub fn status_label(&self) -> Option<&str> {
        self.labels
            .iter()
            .map(|label| label.name.as_str())
            .find(|name| name.starts_with("status:"))
    }

    pub fn priority_label(&self) -> Option<&str> {
        self.labels
            .iter()
            .map(|label| label.name.as_str())
            .find(|name| name.starts_with("priority:"))
    }
}

#[derive(Debug, Clone)]
pub struct SelectOption {
    pub id: String,
    pub name: String,
}

/// A project board field definition. Only the shapes we push values into are
/// modeled; anything else comes back as `Other` and is skipped.
#[derive(Debug, Clone)]
pub enum ProjectField {
    Number {
        id: String,
        name: String,
    },
    Date {
        id: String,
        name: String,
    },
    SingleSelect {
        id: String,
        name: String,
        options: Vec<SelectOption>,
    },
    Iteration {
        id: String,
        name: String,
        buckets: Vec<IterationBucket>,
    },
    Other {
        id: String,
        name: String,
    },
}

impl ProjectField {
    pub fn name(&self) -> &str {
        match self {
            ProjectField::Number { name, .. }
            | ProjectField::Date { name, .. }
            | ProjectField::SingleSelect { name, .. }
            | ProjectField::Iteration { name, .. }
            | ProjectField::Other { name, .. } => name,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            ProjectField::Number { id, .. }
            | ProjectField::Date { id, .. }
            | ProjectField::SingleSelect { id, .. }
            | ProjectField::Iteration { id, .. }
            | ProjectField::Other { id, .. } => id,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProjectItem {
    pub id: String,
    pub issue_number: Option<u64>,
}

/// A project item joined with the field values the backlog report cares
/// about.
#[derive(Debug, Clone, Default)]
pub struct ItemDetail {
    pub issue_number: Option<u64>,
    pub title: String,
    pub assignees: Vec<String>,
    pub status: Option<String>,
    pub iteration: Option<String>,
    pub estimate: Option<f64>,
    pub start_date: Option<NaiveDate>,
    pub target_date: Option<NaiveDate>,
}

/// The external collaborator boundary. Everything the scripts need from
/// GitHub, so sync logic can be exercised against a fake in tests and
/// wrapped for dry runs.
pub trait GitHubClient {
    // Reads.
    fn search_issues(&self, query: &str) -> Result<Vec<Issue>, GitHubError>;
    fn list_issues(&self) -> Result<Vec<Issue>, GitHubError>;
    fn project_id(&self) -> Result<String, GitHubError>;
    fn project_fields(&self, project_id: &str) -> Result<Vec<ProjectField>, GitHubError>;
    fn project_items(&self, project_id: &str) -> Result<Vec<ProjectItem>, GitHubError>;
    fn project_item_details(&self, project_id: &str) -> Result<Vec<ItemDetail>, GitHubError>;

    // Mutations.
    fn create_issue(
        &self,
        title: &str,
        body: &str,
        assignee: Option<&str>,
        labels: &[String],
    ) -> Result<Issue, GitHubError>;
    fn add_labels(&self, number: u64, labels: &[&str]) -> Result<(), GitHubError>;
    fn remove_label(&self, number: u64, label: &str) -> Result<(), GitHubError>;
    fn comment(&self, number: u64, body: &str) -> Result<(), GitHubError>;
    fn close_issue(&self, number: u64) -> Result<(), GitHubError>;
    fn ensure_label(&self, spec: &LabelSpec) -> Result<(), GitHubError>;
    fn add_item(&self, project_id: &str, issue_node_id: &str) -> Result<String, GitHubError>;
    fn set_field_option(
        &self,
        project_id: &str,
        item_id: &str,
        field_id: &str,
        option_id: &str,
    ) -> Result<(), GitHubError>;
    fn set_field_date(
        &self,
        project_id: &str,
        item_id: &str,
        field_id: &str,
        date: NaiveDate,
    ) -> Result<(), GitHubError>;
    fn set_field_number(
        &self,
        project_id: &str,
        item_id: &str,
        field_id: &str,
        value: f64,
    ) -> Result<(), GitHubError>;
    fn set_field_iteration(
        &self,
        project_id: &str,
        item_id: &str,
        field_id: &str,
        iteration_id: &str,
    ) -> Result<(), GitHubError>;
}

/// Find the issue mirroring a task by exact task-ID substring in the title.
pub fn find_issue_by_task<'a>(issues: &'a [Issue], task_name: &str) -> Option<&'a Issue> {
    issues.iter().find(|issue| issue.title.contains(task_name))
}

/// Blocking GitHub client: REST v3 for issues and labels, GraphQL for the
/// Projects v2 surface.
pub struct GitHubApi {
    http: reqwest::blocking::Client,
    token: String,
    repo: String,
    project_owner: String,
    project_number: u64,
}

impl GitHubApi {
    pub fn new(config: &SyncConfig) -> GitHubApi {
        GitHubApi {
            http: reqwest::blocking::Client::new(),
            token: config.token.clone(),
            repo: config.repo.clone(),
            project_owner: config.project_owner.clone(),
            project_number: config.project_number,
        }
    }

    fn rest(&self, method: reqwest::Method, path: &str) -> reqwest::blocking::RequestBuilder {
        self.http
            .request(method, format!("{API_ROOT}{path}"))
            .bearer_auth(&self.token)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
    }

    fn check(response: reqwest::blocking::Response) -> Result<reqwest::blocking::Response, GitHubError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().unwrap_or_default();
        Err(GitHubError::Api {
            status: status.as_u16(),
            message,
        })
    }

    fn graphql(&self, query: &str) -> Result<Value, GitHubError> {
        let response = self
            .http
            .post(format!("{API_ROOT}/graphql"))
            .bearer_auth(&self.token)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .json(&json!({ "query": query }))
            .send()?;
        let value: Value = Self::check(response)?.json()?;
        if let Some(errors) = value.get("errors").and_then(Value::as_array) {
            if !errors.is_empty() {
                let messages: Vec<String> = errors
                    .iter()
                    .filter_map(|err| err.get("message").and_then(Value::as_str))
                    .map(str::to_string)
                    .collect();
                return Err(GitHubError::GraphQl(messages.join("; ")));
            }
        }
        Ok(value)
    }

    /// The board may hang off an organization or a user account; probe the
    /// organization first and fall back to user.
    fn owner_query_field(&self) -> &'static str {
        let probe = format!(
            "query {{ organization(login: \"{}\") {{ id }} }}",
            self.project_owner
        );
        match self.graphql(&probe) {
            Ok(value)
                if value
                    .pointer("/data/organization/id")
                    .and_then(Value::as_str)
                    .is_some() =>
            {
                "organization"
            }
            _ => "user",
        }
    }

    fn parse_field(node: &Value) -> Option<ProjectField> {
        let id = node.get("id").and_then(Value::as_str)?.to_string();
        let name = node.get("name").and_then(Value::as_str)?.to_string();

        if let Some(options) = node.get("options").and_then(Value::as_array) {
            let options = options
                .iter()
                .filter_map(|option| {
                    Some(SelectOption {
                        id: option.get("id").and_then(Value::as_str)?.to_string(),
                        name: option.get("name").and_then(Value::as_str)?.to_string(),
                    })
                })
                .collect();
            return Some(ProjectField::SingleSelect { id, name, options });
        }

        if let Some(iterations) = node.pointer("/configuration/iterations").and_then(Value::as_array) {
            let buckets = iterations
                .iter()
                .filter_map(|iter| {
                    let start = iter.get("startDate").and_then(Value::as_str)?;
                    Some(IterationBucket {
                        id: iter.get("id").and_then(Value::as_str)?.to_string(),
                        title: iter.get("title").and_then(Value::as_str)?.to_string(),
                        start_date: NaiveDate::parse_from_str(start, "%Y-%m-%d").ok()?,
                        duration_days: iter.get("duration").and_then(Value::as_i64).unwrap_or(14),
                    })
                })
                .collect();
            return Some(ProjectField::Iteration { id, name, buckets });
        }

        match node.get("dataType").and_then(Value::as_str) {
            Some("NUMBER") => Some(ProjectField::Number { id, name }),
            Some("DATE") => Some(ProjectField::Date { id, name }),
            _ => Some(ProjectField::Other { id, name }),
        }
    }

    fn set_field_value(
        &self,
        project_id: &str,
        item_id: &str,
        field_id: &str,
        value_literal: &str,
    ) -> Result<(), GitHubError> {
        let mutation = format!(
            "mutation {{ updateProjectV2ItemFieldValue(input: {{ projectId: \"{project_id}\", \
             itemId: \"{item_id}\", fieldId: \"{field_id}\", value: {{ {value_literal} }} }}) \
             {{ projectV2Item {{ id }} }} }}"
        );
        self.graphql(&mutation)?;
        Ok(())
    }
}

impl GitHubClient for GitHubApi {
    fn search_issues(&self, query: &str) -> Result<Vec<Issue>, GitHubError> {
        let response = self
            .rest(reqwest::Method::GET, "/search/issues")
            .query(&[
                ("q", format!("repo:{} in:title {}", self.repo, query)),
                ("per_page", "100".to_string()),
            ])
            .send()?;
        #[derive(Deserialize)]
        struct SearchPage {
            #[serde(default)]
            items: Vec<Issue>,
        }
        let page: SearchPage = Self::check(response)?.json()?;
        Ok(page.items)
    }

    fn list_issues(&self) -> Result<Vec<Issue>, GitHubError> {
        let mut issues = Vec::new();
        // Two pages of 100 cover the repo's scale; mirrors the scripts'
        // fixed --limit 200.
        for page in 1..=2 {
            let response = self
                .rest(reqwest::Method::GET, &format!("/repos/{}/issues", self.repo))
                .query(&[
                    ("state", "all".to_string()),
                    ("per_page", "100".to_string()),
                    ("page", page.to_string()),
                ])
                .send()?;
            let batch: Vec<Issue> = Self::check(response)?.json()?;
            let done = batch.len() < 100;
            issues.extend(batch);
            if done {
                break;
            }
        }
        Ok(issues)
    }

    fn project_id(&self) -> Result<String, GitHubError> {
        let field = self.owner_query_field();
        let query = format!(
            "query {{ {field}(login: \"{}\") {{ projectV2(number: {}) {{ id }} }} }}",
            self.project_owner, self.project_number
        );
        let value = self.graphql(&query)?;
        value
            .pointer(&format!("/data/{field}/projectV2/id"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| GitHubError::ProjectNotFound {
                owner: self.project_owner.clone(),
                number: self.project_number,
            })
    }

    fn project_fields(&self, project_id: &str) -> Result<Vec<ProjectField>, GitHubError> {
        let query = format!(
            "query {{ node(id: \"{project_id}\") {{ ... on ProjectV2 {{ fields(first: 30) {{ nodes {{ \
             ... on ProjectV2Field {{ id name dataType }} \
             ... on ProjectV2SingleSelectField {{ id name options {{ id name }} }} \
             ... on ProjectV2IterationField {{ id name configuration {{ iterations {{ id title startDate duration }} }} }} \
             }} }} }} }} }}"
        );
        let value = self.graphql(&query)?;
        let nodes = value
            .pointer("/data/node/fields/nodes")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        Ok(nodes.iter().filter_map(Self::parse_field).collect())
    }

    fn project_items(&self, project_id: &str) -> Result<Vec<ProjectItem>, GitHubError> {
        let mut items = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let after = cursor
                .as_deref()
                .map(|c| format!(", after: \"{c}\""))
                .unwrap_or_default();
            let query = format!(
                "query {{ node(id: \"{project_id}\") {{ ... on ProjectV2 {{ \
                 items(first: 100{after}) {{ nodes {{ id content {{ ... on Issue {{ number }} }} }} \
                 pageInfo {{ hasNextPage endCursor }} }} }} }} }}"
            );
            let value = self.graphql(&query)?;
            let nodes = value
                .pointer("/data/node/items/nodes")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default();
            for node in &nodes {
                let Some(id) = node.get("id").and_then(Value::as_str) else {
                    continue;
                };
                items.push(ProjectItem {
                    id: id.to_string(),
                    issue_number: node.pointer("/content/number").and_then(Value::as_u64),
                });
            }
            let has_next = value
                .pointer("/data/node/items/pageInfo/hasNextPage")
                .and_then(Value::as_bool)
                .unwrap_or(false);
            if !has_next {
                break;
            }
            cursor = value
                .pointer("/data/node/items/pageInfo/endCursor")
                .and_then(Value::as_str)
                .map(str::to_string);
            if cursor.is_none() {
                break;
            }
        }
        Ok(items)
    }

    fn project_item_details(&self, project_id: &str) -> Result<Vec<ItemDetail>, GitHubError> {
        let query = format!(
            "query {{ node(id: \"{project_id}\") {{ ... on ProjectV2 {{ items(first: 200) {{ nodes {{ \
             content {{ ... on Issue {{ number title assignees(first: 10) {{ nodes {{ login }} }} }} }} \
             fieldValues(first: 30) {{ nodes {{ \
             ... on ProjectV2ItemFieldNumberValue {{ number field {{ ... on ProjectV2FieldCommon {{ name }} }} }} \
             ... on ProjectV2ItemFieldDateValue {{ date field {{ ... on ProjectV2FieldCommon {{ name }} }} }} \
             ... on ProjectV2ItemFieldSingleSelectValue {{ name field {{ ... on ProjectV2FieldCommon {{ name }} }} }} \
             ... on ProjectV2ItemFieldIterationValue {{ title field {{ ... on ProjectV2FieldCommon {{ name }} }} }} \
             }} }} }} }} }} }} }}"
        );
        let value = self.graphql(&query)?;
        let nodes = value
            .pointer("/data/node/items/nodes")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        let mut details = Vec::new();
        for node in &nodes {
            let mut detail = ItemDetail {
                issue_number: node.pointer("/content/number").and_then(Value::as_u64),
                title: node
                    .pointer("/content/title")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                assignees: node
                    .pointer("/content/assignees/nodes")
                    .and_then(Value::as_array)
                    .map(|nodes| {
                        nodes
                            .iter()
                            .filter_map(|a| a.get("login").and_then(Value::as_str))
                            .map(str::to_string)
                            .collect()
                    })
                    .unwrap_or_default(),
                ..ItemDetail::default()
            };

            let values = node
                .pointer("/fieldValues/nodes")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default();
            for field_value in &values {
                let Some(field_name) = field_value.pointer("/field/name").and_then(Value::as_str)
                else {
                    continue;
                };
                match field_name.to_lowercase().as_str() {
                    "status" => {
                        detail.status = field_value
                            .get("name")
                            .and_then(Value::as_str)
                            .map(str::to_string);
                    }
                    "iteration" => {
                        detail.iteration = field_value
                            .get("title")
                            .and_then(Value::as_str)
                            .map(str::to_string);
                    }
                    "estimate" => {
                        detail.estimate = field_value.get("number").and_then(Value::as_f64);
                    }
                    "start date" => {
                        detail.start_date = field_value
                            .get("date")
                            .and_then(Value::as_str)
                            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok());
                    }
                    "target date" => {
                        detail.target_date = field_value
                            .get("date")
                            .and_then(Value::as_str)
                            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok());
                    }
                    _ => {}
                }
            }
            details.push(detail);
        }
        Ok(details)
    }

    fn create_issue(
        &self,
        title: &str,
        body: &str,
        assignee: Option<&str>,
        labels: &[String],
    ) -> Result<Issue, GitHubError> {
        let mut payload = json!({
            "title": title,
            "body": body,
            "labels": labels,
        });
        if let Some(assignee) = assignee {
            payload["assignees"] = json!([assignee]);
        }
        let response = self
            .rest(reqwest::Method::POST, &format!("/repos/{}/issues", self.repo))
            .json(&payload)
            .send()?;
        Ok(Self::check(response)?.json()?)
    }

    fn add_labels(&self, number: u64, labels: &[&str]) -> Result<(), GitHubError> {
        let response = self
            .rest(
                reqwest::Method::POST,
                &format!("/repos/{}/issues/{number}/labels", self.repo),
            )
            .json(&json!({ "labels": labels }))
            .send()?;
        Self::check(response)?;
        Ok(())
    }

    fn remove_label(&self, number: u64, label: &str) -> Result<(), GitHubError> {
        let response = self
            .rest(
                reqwest::Method::DELETE,
                &format!("/repos/{}/issues/{number}/labels/{label}", self.repo),
            )
            .send()?;
        Self::check(response)?;
        Ok(())
    }

    fn comment(&self, number: u64, body: &str) -> Result<(), GitHubError> {
        let response = self
            .rest(
                reqwest::Method::POST,
                &format!("/repos/{}/issues/{number}/comments", self.repo),
            )
            .json(&json!({ "body": body }))
            .send()?;
        Self::check(response)?;
        Ok(())
    }

    fn close_issue(&self, number: u64) -> Result<(), GitHubError> {
        let response = self
            .rest(
                reqwest::Method::PATCH,
                &format!("/repos/{}/issues/{number}", self.repo),
            )
            .json(&json!({ "state": "closed" }))
            .send()?;
        Self::check(response)?;
        Ok(())
    }

    fn ensure_label(&self, spec: &LabelSpec) -> Result<(), GitHubError> {
        let response = self
            .rest(reqwest::Method::POST, &format!("/repos/{}/labels", self.repo))
            .json(&json!({
                "name": spec.name,
                "color": spec.color,
                "description": spec.description,
            }))
            .send()?;
        if response.status().as_u16() == 422 {
            // Already exists; refresh color and description instead.
            let response = self
                .rest(
                    reqwest::Method::PATCH,
                    &format!("/repos/{}/labels/{}", self.repo, spec.name),
                )
                .json(&json!({
                    "color": spec.color,
                    "description": spec.description,
                }))
                .send()?;
            Self::check(response)?;
            return Ok(());
        }
        Self::check(response)?;
        Ok(())
    }

    fn add_item(&self, project_id: &str, issue_node_id: &str) -> Result<String, GitHubError> {
        let mutation = format!(
            "mutation {{ addProjectV2ItemById(input: {{ projectId: \"{project_id}\", \
             contentId: \"{issue_node_id}\" }}) {{ item {{ id }} }} }}"
        );
        let value = self.graphql(&mutation)?;
        value
            .pointer("/data/addProjectV2ItemById/item/id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| GitHubError::GraphQl("addProjectV2ItemById returned no item".to_string()))
    }

    fn set_field_option(
        &self,
        project_id: &str,
        item_id: &str,
        field_id: &str,
        option_id: &str,
    ) -> Result<(), GitHubError> {
        self.set_field_value(
            project_id,
            item_id,
            field_id,
            &format!("singleSelectOptionId: \"{option_id}\""),
        )
    }

    fn set_field_date(
        &self,
        project_id: &str,
        item_id: &str,
        field_id: &str,
        date: NaiveDate,
    ) -> Result<(), GitHubError> {
        self.set_field_value(
            project_id,
            item_id,
            field_id,
            &format!("date: \"{}\"", date.format("%Y-%m-%d")),
        )
    }

    fn set_field_number(
        &self,
        project_id: &str,
        item_id: &str,
        field_id: &str,
        value: f64,
    ) -> Result<(), GitHubError> {
        self.set_field_value(project_id, item_id, field_id, &format!("number: {value}"))
    }

    fn set_field_iteration(
        &self,
        project_id: &str,
        item_id: &str,
        field_id: &str,
        iteration_id: &str,
    ) -> Result<(), GitHubError> {
        self.set_field_value(
            project_id,
            item_id,
            field_id,
            &format!("iterationId: \"{iteration_id}\""),
        )
    }
}

/// Wraps a client so every mutating call becomes a log line while reads pass
/// through. This is the entire `--dry-run` implementation.
pub struct DryRunClient<C> {
    inner: C,
}

impl<C> DryRunClient<C> {
    pub fn new(inner: C) -> DryRunClient<C> {
        DryRunClient { inner }
    }
}

impl<C: GitHubClient> GitHubClient for DryRunClient<C> {
    fn search_issues(&self, query: &str) -> Result<Vec<Issue>, GitHubError> {
        self.inner.search_issues(query)
    }

    fn list_issues(&self) -> Result<Vec<Issue>, GitHubError> {
        self.inner.list_issues()
    }

    fn project_id(&self) -> Result<String, GitHubError> {
        self.inner.project_id()
    }

    fn project_fields(&self, project_id: &str) -> Result<Vec<ProjectField>, GitHubError> {
        self.inner.project_fields(project_id)
    }

    fn project_items(&self, project_id: &str) -> Result<Vec<ProjectItem>, GitHubError> {
        self.inner.project_items(project_id)
    }

    fn project_item_details(&self, project_id: &str) -> Result<Vec<ItemDetail>, GitHubError> {
        self.inner.project_item_details(project_id)
    }

    fn create_issue(
        &self,
        title: &str,
        body: &str,
        assignee: Option<&str>,
        labels: &[String],
    ) -> Result<Issue, GitHubError> {
        tracing::info!(
            title,
            assignee = assignee.unwrap_or("-"),
            labels = labels.join(", "),
            "[dry-run] would create issue"
        );
        let _ = body;
        Ok(Issue {
            number: 0,
            node_id: String::new(),
            title: title.to_string(),
            state: "open".to_string(),
            labels: labels
                .iter()
                .map(|name| IssueLabel { name: name.clone() })
                .collect(),
            body: None,
        })
    }

    fn add_labels(&self, number: u64, labels: &[&str]) -> Result<(), GitHubError> {
        tracing::info!(number, labels = labels.join(", "), "[dry-run] would add labels");
        Ok(())
    }

    fn remove_label(&self, number: u64, label: &str) -> Result<(), GitHubError> {
        tracing::info!(number, label, "[dry-run] would remove label");
        Ok(())
    }

    fn comment(&self, number: u64, body: &str) -> Result<(), GitHubError> {
        tracing::info!(number, body, "[dry-run] would comment");
        Ok(())
    }

    fn close_issue(&self, number: u64) -> Result<(), GitHubError> {
        tracing::info!(number, "[dry-run] would close issue");
        Ok(())
    }

    fn ensure_label(&self, spec: &LabelSpec) -> Result<(), GitHubError> {
        tracing::info!(name = spec.name, color = spec.color, "[dry-run] would ensure label");
        Ok(())
    }

    fn add_item(&self, project_id: &str, issue_node_id: &str) -> Result<String, GitHubError> {
        tracing::info!(project_id, issue_node_id, "[dry-run] would add item to project");
        Ok("dry-run-item".to_string())
    }

    fn set_field_option(
        &self,
        _project_id: &str,
        item_id: &str,
        field_id: &str,
        option_id: &str,
    ) -> Result<(), GitHubError> {
        tracing::info!(item_id, field_id, option_id, "[dry-run] would set select field");
        Ok(())
    }

    fn set_field_date(
        &self,
        _project_id: &str,
        item_id: &str,
        field_id: &str,
        date: NaiveDate,
    ) -> Result<(), GitHubError> {
        tracing::info!(item_id, field_id, %date, "[dry-run] would set date field");
        Ok(())
    }

    fn set_field_number(
        &self,
        _project_id: &str,
        item_id: &str,
        field_id: &str,
        value: f64,
    ) -> Result<(), GitHubError> {
        tracing::info!(item_id, field_id, value, "[dry-run] would set number field");
        Ok(())
    }

    fn set_field_iteration(
        &self,
        _project_id: &str,
        item_id: &str,
        field_id: &str,
        iteration_id: &str,
    ) -> Result<(), GitHubError> {
        tracing::info!(item_id, field_id, iteration_id, "[dry-run] would set iteration field");
        Ok(())
    }
}
