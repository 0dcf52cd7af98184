//! Repository type definitions

use serde::{Deserialize, Serialize};

use super::user::UserRef;

/// Represents a repository (also the shape of a fork)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Repository {
    /// Numeric repository id
    #[serde(default)]
    pub id: u64,

    /// Repository name
    #[serde(default)]
    pub name: String,

    /// `owner/name`
    #[serde(default)]
    pub full_name: Option<String>,

    /// Owning user or organization
    #[serde(default)]
    pub owner: UserRef,

    /// Browsable URL
    #[serde(default)]
    pub html_url: String,

    /// Last update timestamp (RFC 3339)
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Repository {
    /// Whether the listing entry shows `login` as the owner
    pub fn is_owned_by(&self, login: &str) -> bool {
        self.owner.login == login
    }
}
