use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const CONFIG_FILE_NAME: &str = ".tasksync.toml";
pub const DEFAULT_DOCS_ROOT: &str = "src/documentation";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "GITHUB_TOKEN or GH_TOKEN environment variable is required\n  \
         set it in your shell or export it before running\n  \
         get a token from https://github.com/settings/tokens\n  \
         required scopes: repo, read:org, project"
    )]
    MissingToken,
    #[error("repository is not configured: set GITHUB_REPO_NAME or `repo` in {CONFIG_FILE_NAME}")]
    MissingRepo,
    #[error(
        "project owner is not configured: set GITHUB_PROJECT_OWNER or `project_owner` in {CONFIG_FILE_NAME}"
    )]
    MissingProjectOwner,
    #[error(
        "project number is not configured: set GITHUB_PROJECT_NUMBER or `project_number` in {CONFIG_FILE_NAME}"
    )]
    MissingProjectNumber,
    #[error("invalid project number: {0}")]
    InvalidProjectNumber(String),
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// On-disk configuration, all optional. Environment variables override file
/// values; name maps extend the built-in defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub repo: Option<String>,
    pub project_owner: Option<String>,
    pub project_number: Option<u64>,
    pub docs_root: Option<String>,
    pub assignees: Option<HashMap<String, String>>,
    pub owner_dirs: Option<HashMap<String, String>>,
}

impl ConfigFile {
    pub fn load(repo_root: &Path) -> Result<Option<ConfigFile>, ConfigError> {
        let path = repo_root.join(CONFIG_FILE_NAME);
        if !path.is_file() {
            return Ok(None);
        }
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(_) => return Ok(None),
        };
        let config = toml::from_str::<ConfigFile>(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Some(config))
    }
}

/// Local workspace layout and name maps. Never fatal to load: everything has
/// a usable default, so file-only commands work without any configuration.
#[derive(Debug, Clone)]
pub struct WorkspaceConfig {
    pub repo_root: PathBuf,
    pub docs_root: PathBuf,
    assignees: HashMap<String, String>,
    owner_dirs: HashMap<String, String>,
}

impl WorkspaceConfig {
    pub fn load(repo_root: &Path) -> Result<WorkspaceConfig, ConfigError> {
        let file = ConfigFile::load(repo_root)?.unwrap_or_default();
        Ok(Self::from_file(repo_root, &file))
    }

    fn from_file(repo_root: &Path, file: &ConfigFile) -> WorkspaceConfig {
        let docs_root = file
            .docs_root
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(DEFAULT_DOCS_ROOT);

        let mut assignees = default_assignee_map();
        if let Some(extra) = &file.assignees {
            assignees.extend(extra.clone());
        }
        let mut owner_dirs = default_owner_dir_map();
        if let Some(extra) = &file.owner_dirs {
            owner_dirs.extend(extra.clone());
        }

        WorkspaceConfig {
            repo_root: repo_root.to_path_buf(),
            docs_root: repo_root.join(docs_root),
            assignees,
            owner_dirs,
        }
    }

    /// GitHub login for a task assignee; unmapped names pass through.
    pub fn github_username(&self, assignee: &str) -> String {
        self.assignees
            .get(assignee)
            .cloned()
            .unwrap_or_else(|| assignee.to_string())
    }

    /// Archive directory name for an assignee; unmapped names are lowercased.
    pub fn owner_dir(&self, assignee: &str) -> String {
        self.owner_dirs
            .get(assignee)
            .cloned()
            .unwrap_or_else(|| assignee.to_lowercase())
    }

    pub fn role_dir(&self) -> PathBuf {
        self.docs_root.join("agile.role")
    }

    pub fn deliver_dir(&self) -> PathBuf {
        self.docs_root.join("deliver")
    }

    pub fn overdue_dir(&self) -> PathBuf {
        self.docs_root.join("overdue")
    }

    pub fn task_dirs(&self) -> Vec<PathBuf> {
        vec![self.role_dir(), self.deliver_dir(), self.overdue_dir()]
    }
}

/// Full configuration for commands that talk to GitHub. Missing credentials
/// or project coordinates are fatal setup errors.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub token: String,
    pub repo: String,
    pub project_owner: String,
    pub project_number: u64,
    pub workspace: WorkspaceConfig,
}

impl SyncConfig {
    pub fn from_env(repo_root: &Path) -> Result<SyncConfig, ConfigError> {
        let file = ConfigFile::load(repo_root)?.unwrap_or_default();
        let workspace = WorkspaceConfig::from_file(repo_root, &file);

        let token = env_var("GITHUB_TOKEN")
            .or_else(|| env_var("GH_TOKEN"))
            .ok_or(ConfigError::MissingToken)?;
        let repo = env_var("GITHUB_REPO_NAME")
            .or(file.repo)
            .ok_or(ConfigError::MissingRepo)?;
        let project_owner = env_var("GITHUB_PROJECT_OWNER")
            .or(file.project_owner)
            .ok_or(ConfigError::MissingProjectOwner)?;
        let project_number = match env_var("GITHUB_PROJECT_NUMBER") {
            Some(raw) => raw
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidProjectNumber(raw))?,
            None => file
                .project_number
                .ok_or(ConfigError::MissingProjectNumber)?,
        };

        Ok(SyncConfig {
            token,
            repo,
            project_owner,
            project_number,
            workspace,
        })
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn default_assignee_map() -> HashMap<String, String> {
    [
        ("Aaron", "ArhonJay"),
        ("Justine", "Justinedevs"),
        ("Tristan", "Tristan-T-Dev"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

fn default_owner_dir_map() -> HashMap<String, String> {
    [
        ("Aaron", "aaron"),
        ("ArhonJay", "aaron"),
        ("Justine", "justine"),
        ("Tristan", "tristan"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}
