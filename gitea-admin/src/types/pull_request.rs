//! Pull request type definitions

use serde::{Deserialize, Serialize};

use super::user::UserRef;

/// Represents a pull request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequest {
    /// Pull request number (unique within repository)
    #[serde(default)]
    pub number: u64,

    /// State (open, closed)
    #[serde(default)]
    pub state: Option<String>,

    /// Author
    #[serde(default)]
    pub user: UserRef,

    /// Browsable URL
    #[serde(default)]
    pub html_url: String,

    /// Target branch and repository
    #[serde(default)]
    pub base: PullRequestBase,
}

/// Target side of a pull request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PullRequestBase {
    #[serde(default)]
    pub repo: Option<BaseRepo>,
}

/// Repository a pull request targets
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BaseRepo {
    #[serde(default)]
    pub name: String,
}

impl PullRequest {
    /// Name of the repository this pull request targets, if known
    pub fn base_repo_name(&self) -> Option<&str> {
        self.base.repo.as_ref().map(|r| r.name.as_str())
    }
}
