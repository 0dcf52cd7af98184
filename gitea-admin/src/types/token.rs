//! Access token type definitions

use serde::{Deserialize, Serialize};

/// Payload for `POST users/{username}/tokens`
#[derive(Debug, Clone, Serialize)]
pub struct CreateTokenOption {
    pub name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub scopes: Vec<String>,
}

/// A freshly created access token
#[derive(Debug, Clone, Deserialize)]
pub struct AccessToken {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub name: String,
    /// The token secret; only returned once, at creation
    pub sha1: String,
}
