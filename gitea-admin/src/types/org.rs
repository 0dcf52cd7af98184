//! Organization type definitions

use serde::{Deserialize, Serialize};

/// Represents an organization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    /// Numeric organization id
    #[serde(default)]
    pub id: u64,

    /// Organization login
    #[serde(default)]
    pub username: String,

    /// Organization name (newer servers)
    #[serde(default)]
    pub name: Option<String>,

    /// Display name
    #[serde(default)]
    pub full_name: Option<String>,
}

impl Organization {
    /// Login of the organization, as used in API paths
    pub fn login(&self) -> &str {
        if !self.username.is_empty() {
            return &self.username;
        }
        self.name.as_deref().unwrap_or_default()
    }
}
