//! Team type definitions

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Name of the built-in administrative team of every organization
pub const OWNERS_TEAM: &str = "Owners";

/// Repository access level of a team
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    None,
    Read,
    Write,
    Admin,
    Owner,
}

/// Represents a team of an organization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    /// Numeric team id
    pub id: u64,

    /// Team name (unique within the organization)
    pub name: String,

    /// Team description
    #[serde(default)]
    pub description: Option<String>,

    /// Access level
    #[serde(default)]
    pub permission: Option<Permission>,

    /// Enabled repository units (e.g. `repo.code`)
    #[serde(default)]
    pub units: Vec<String>,
}

impl Team {
    pub fn is_owners(&self) -> bool {
        self.name == OWNERS_TEAM
    }
}

/// Payload for `POST orgs/{org}/teams`
#[derive(Debug, Clone, Serialize)]
pub struct CreateTeamOption {
    pub name: String,
    pub description: String,
    pub permission: Permission,
    pub units: Vec<String>,
    pub includes_all_repositories: bool,
}

/// Payload for `PATCH teams/{id}`
#[derive(Debug, Clone, Serialize)]
pub struct EditTeamOption {
    pub permission: Permission,
    pub units_map: BTreeMap<String, Permission>,
    pub includes_all_repositories: bool,
}
