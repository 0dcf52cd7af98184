//! Declarative team/user roster
//!
//! A roster is a YAML document listing teams and their users:
//!
//! ```yaml
//! teams:
//!   - teamname: Group A
//!     description: Monday course
//!     users:
//!       - username: jdoe
//!         fullname: Jane Doe
//!         email: jdoe@example.org
//! ```
//!
//! Parsing validates that every team has a `teamname` and every user has
//! `username`, `fullname` and `email`. The same username may appear in
//! several teams; that is how a user joins more than one team.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AdminError, AdminResult};

/// A validated roster
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    pub teams: Vec<TeamEntry>,
}

/// A team to provision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamEntry {
    pub teamname: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub users: Vec<UserEntry>,
}

/// A user to provision into a team
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserEntry {
    pub username: String,
    pub fullname: String,
    pub email: String,
}

/// Position of an entry in the roster, 1-based
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RosterPosition {
    pub team: usize,
    pub user: Option<usize>,
}

impl fmt::Display for RosterPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.user {
            Some(user) => write!(f, "team #{}, user #{}", self.team, user),
            None => write!(f, "team #{}", self.team),
        }
    }
}

// Unvalidated shape: every field optional so missing ones can be reported
// with their position instead of a bare serde error.
#[derive(Debug, Deserialize)]
struct RawRoster {
    #[serde(default)]
    teams: Option<Vec<RawTeam>>,
}

#[derive(Debug, Deserialize)]
struct RawTeam {
    teamname: Option<String>,
    description: Option<String>,
    #[serde(default)]
    users: Option<Vec<RawUser>>,
}

#[derive(Debug, Deserialize)]
struct RawUser {
    username: Option<String>,
    fullname: Option<String>,
    email: Option<String>,
}

impl Roster {
    /// Parse and validate a roster document
    pub fn parse(document: &str) -> AdminResult<Self> {
        if document.trim().is_empty() {
            return Ok(Self::default());
        }

        let raw: Option<RawRoster> = serde_yaml::from_str(document)?;
        let raw_teams = raw.and_then(|r| r.teams).unwrap_or_default();

        let mut teams = Vec::with_capacity(raw_teams.len());
        for (t, raw_team) in raw_teams.into_iter().enumerate() {
            let team_pos = RosterPosition {
                team: t + 1,
                user: None,
            };
            let teamname = required(raw_team.teamname, "teamname", team_pos)?;

            let raw_users = raw_team.users.unwrap_or_default();
            let mut users = Vec::with_capacity(raw_users.len());
            for (u, raw_user) in raw_users.into_iter().enumerate() {
                let pos = RosterPosition {
                    team: t + 1,
                    user: Some(u + 1),
                };
                users.push(UserEntry {
                    username: login(required(raw_user.username, "username", pos)?, pos)?,
                    fullname: required(raw_user.fullname, "fullname", pos)?,
                    email: required(raw_user.email, "email", pos)?,
                });
            }

            teams.push(TeamEntry {
                teamname,
                description: raw_team.description.unwrap_or_default(),
                users,
            });
        }

        Ok(Self { teams })
    }

    /// Read and parse a roster file
    pub fn from_path(path: &Path) -> AdminResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| AdminError::RosterIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Serialize back into a roster document
    pub fn to_yaml(&self) -> AdminResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Total number of (team, user) pairs
    pub fn membership_count(&self) -> usize {
        self.teams.iter().map(|t| t.users.len()).sum()
    }
}

fn required(value: Option<String>, field: &'static str, position: RosterPosition) -> AdminResult<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(AdminError::MalformedRoster { field, position }),
    }
}

/// Reject usernames that would not stay a single URL path segment
fn login(username: String, position: RosterPosition) -> AdminResult<String> {
    if username.contains(['/', '?', '#']) {
        return Err(AdminError::InvalidUsername { username, position });
    }
    Ok(username)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROSTER: &str = r#"
teams:
  - teamname: Group A
    description: Monday course
    users:
      - username: jdoe
        fullname: Jane Doe
        email: jdoe@example.org
      - username: rroe
        fullname: Richard Roe
        email: rroe@example.org
  - teamname: Group B
    users:
      - username: jdoe
        fullname: Jane Doe
        email: jdoe@example.org
"#;

    #[test]
    fn test_parse_preserves_order() {
        let roster = Roster::parse(ROSTER).unwrap();

        assert_eq!(roster.teams.len(), 2);
        assert_eq!(roster.teams[0].teamname, "Group A");
        assert_eq!(roster.teams[0].description, "Monday course");
        assert_eq!(roster.teams[0].users[1].username, "rroe");
        assert_eq!(roster.teams[1].description, "");
        assert_eq!(roster.membership_count(), 3);
    }

    #[test]
    fn test_duplicate_usernames_across_teams_are_accepted() {
        let roster = Roster::parse(ROSTER).unwrap();
        assert_eq!(roster.teams[0].users[0].username, roster.teams[1].users[0].username);
    }

    #[test]
    fn test_missing_teamname_reports_position() {
        let doc = "teams:\n  - teamname: ok\n  - description: nameless\n";
        let err = Roster::parse(doc).unwrap_err();

        match err {
            AdminError::MalformedRoster { field, position } => {
                assert_eq!(field, "teamname");
                assert_eq!(position, RosterPosition { team: 2, user: None });
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_user_field_reports_position() {
        let doc = r#"
teams:
  - teamname: Group A
    users:
      - username: jdoe
        fullname: Jane Doe
        email: jdoe@example.org
      - username: nomail
        fullname: No Mail
"#;
        let err = Roster::parse(doc).unwrap_err();
        assert_eq!(
            err.to_string(),
            "malformed roster: missing `email` in team #1, user #2"
        );
    }

    #[test]
    fn test_blank_field_counts_as_missing() {
        let doc = "teams:\n  - teamname: '  '\n";
        assert!(matches!(
            Roster::parse(doc),
            Err(AdminError::MalformedRoster { field: "teamname", .. })
        ));
    }

    #[test]
    fn test_username_with_url_delimiter_is_rejected() {
        for name in ["jdoe?x", "jdoe#x", "../jdoe"] {
            let doc = format!(
                "teams:\n  - teamname: Group A\n    users:\n      - username: '{name}'\n        fullname: Jane Doe\n        email: jdoe@example.org\n"
            );
            match Roster::parse(&doc).unwrap_err() {
                AdminError::InvalidUsername { username, position } => {
                    assert_eq!(username, name);
                    assert_eq!(position, RosterPosition { team: 1, user: Some(1) });
                }
                other => panic!("unexpected error: {other}"),
            }
        }
    }

    #[test]
    fn test_empty_document_is_empty_roster() {
        assert_eq!(Roster::parse("").unwrap(), Roster::default());
        assert_eq!(Roster::parse("teams: []").unwrap(), Roster::default());
    }

    #[test]
    fn test_syntax_error() {
        let err = Roster::parse("teams: [unclosed").unwrap_err();
        assert!(matches!(err, AdminError::RosterSyntax(_)));
    }

    #[test]
    fn test_yaml_round_trip_shape() {
        let roster = Roster::parse(ROSTER).unwrap();
        let yaml = roster.to_yaml().unwrap();
        assert!(yaml.contains("teamname: Group A"));
        assert_eq!(Roster::parse(&yaml).unwrap(), roster);
    }
}
