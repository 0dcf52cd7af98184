//! User type definitions

use serde::{Deserialize, Serialize};

/// Represents a Gitea user account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Numeric user id
    #[serde(default)]
    pub id: u64,

    /// Login name
    #[serde(default)]
    pub login: String,

    /// Alias of `login` emitted by some Gitea versions
    #[serde(default)]
    pub username: Option<String>,

    /// Display name
    #[serde(default)]
    pub full_name: Option<String>,

    /// Primary e-mail address
    #[serde(default)]
    pub email: Option<String>,
}

impl User {
    /// Login name, falling back to `username` when `login` is absent
    pub fn login(&self) -> &str {
        if !self.login.is_empty() {
            return &self.login;
        }
        self.username.as_deref().unwrap_or_default()
    }

    /// Whether two records denote the same account
    ///
    /// Both the id and the login have to match; a login alone can be stale
    /// after an account was renamed and another one took the old name.
    pub fn same_account(&self, other: &User) -> bool {
        self.id == other.id && self.login() == other.login()
    }
}

/// Minimal user reference embedded in other objects (owner, author)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserRef {
    /// Login name
    #[serde(default)]
    pub login: String,
}

/// Account visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Limited,
    Private,
}

/// Payload for `POST admin/users`
#[derive(Debug, Clone, Serialize)]
pub struct CreateUserOption {
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub password: String,
    pub must_change_password: bool,
    pub restricted: bool,
    pub send_notify: bool,
    pub visibility: Visibility,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_login_prefers_login_field() {
        let user: User =
            serde_json::from_value(json!({"id": 3, "login": "alice", "username": "old"})).unwrap();
        assert_eq!(user.login(), "alice");

        let user: User = serde_json::from_value(json!({"id": 3, "username": "bob"})).unwrap();
        assert_eq!(user.login(), "bob");
    }

    #[test]
    fn test_same_account_requires_id_and_login() {
        let admin: User = serde_json::from_value(json!({"id": 1, "login": "root"})).unwrap();
        let renamed: User = serde_json::from_value(json!({"id": 7, "login": "root"})).unwrap();
        let same: User = serde_json::from_value(json!({"id": 1, "login": "root"})).unwrap();

        assert!(admin.same_account(&same));
        assert!(!admin.same_account(&renamed));
    }
}
