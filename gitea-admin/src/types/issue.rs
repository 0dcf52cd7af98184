//! Issue type definitions

use serde::{Deserialize, Serialize};

/// Represents an issue as returned after creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    /// Issue number (unique within repository)
    pub number: u64,

    /// Browsable URL
    #[serde(default)]
    pub html_url: String,
}

/// Payload for `POST repos/{owner}/{repo}/issues`
#[derive(Debug, Clone, Serialize)]
pub struct CreateIssueOption {
    pub title: String,
    pub body: String,
    pub assignees: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
}
