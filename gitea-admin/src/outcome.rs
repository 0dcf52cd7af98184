//! Per-entity outcomes of batch operations
//!
//! Batch operations never abort because a single create/update/delete call
//! was refused. Each call's outcome is appended to an [`OutcomeLog`] in the
//! order it happened, and the caller decides how to present it.

use std::fmt;

use tracing::{debug, warn};

/// Outcome of one remote mutation (or of a skipped one)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    TeamCreated { team: String, id: u64 },
    TeamReused { team: String, id: u64 },
    TeamCreationFailed { team: String, status: u16 },
    UserCreated { username: String },
    UserExists { username: String },
    UserCreationFailed { username: String, status: u16 },
    MemberAdded { username: String, team: String },
    MembershipFailed { username: String, team: String, status: u16 },
    RightsNormalized { team: String, id: u64 },
    RightsFailed { team: String, id: u64, status: u16 },
    RepoDeleted { owner: String, repo: String },
    RepoDeletionFailed { owner: String, repo: String, status: u16 },
    MemberRemoved { username: String, org: String },
    MemberRemovalFailed { username: String, org: String, status: u16 },
    UserDeleted { username: String },
    UserDeletionFailed { username: String, status: u16 },
    TeamDeleted { team: String, id: u64 },
    TeamDeletionFailed { team: String, id: u64, status: u16 },
    OrgDeleted { org: String },
    OrgDeletionFailed { org: String, status: u16 },
    IssueCreated { username: String, number: u64, url: String },
    IssueCreationFailed { username: String, status: u16 },
}

impl Outcome {
    /// Whether this outcome is an entity-level failure
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Outcome::TeamCreationFailed { .. }
                | Outcome::UserCreationFailed { .. }
                | Outcome::MembershipFailed { .. }
                | Outcome::RightsFailed { .. }
                | Outcome::RepoDeletionFailed { .. }
                | Outcome::MemberRemovalFailed { .. }
                | Outcome::UserDeletionFailed { .. }
                | Outcome::TeamDeletionFailed { .. }
                | Outcome::OrgDeletionFailed { .. }
                | Outcome::IssueCreationFailed { .. }
        )
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::TeamCreated { team, id } => write!(f, "created team \"{}\" ({})", team, id),
            Outcome::TeamReused { team, id } => write!(f, "using existing team \"{}\" ({})", team, id),
            Outcome::TeamCreationFailed { team, status } => {
                write!(f, "create team \"{}\" failed: {}", team, status)
            }
            Outcome::UserCreated { username } => write!(f, "registered user \"{}\"", username),
            Outcome::UserExists { username } => write!(f, "user \"{}\" already exists", username),
            Outcome::UserCreationFailed { username, status } => {
                write!(f, "register user \"{}\" failed: {}", username, status)
            }
            Outcome::MemberAdded { username, team } => {
                write!(f, "added user \"{}\" to team \"{}\"", username, team)
            }
            Outcome::MembershipFailed { username, team, status } => {
                write!(f, "add user \"{}\" to team \"{}\" failed: {}", username, team, status)
            }
            Outcome::RightsNormalized { team, id } => {
                write!(f, "set team \"{}\" ({}) rights to read", team, id)
            }
            Outcome::RightsFailed { team, id, status } => {
                write!(f, "set team \"{}\" ({}) rights failed: {}", team, id, status)
            }
            Outcome::RepoDeleted { owner, repo } => write!(f, "deleted repo {}/{}", owner, repo),
            Outcome::RepoDeletionFailed { owner, repo, status } => {
                write!(f, "delete repo {}/{} failed: {}", owner, repo, status)
            }
            Outcome::MemberRemoved { username, org } => {
                write!(f, "removed {} from {}", username, org)
            }
            Outcome::MemberRemovalFailed { username, org, status } => {
                write!(f, "remove {} from {} failed: {}", username, org, status)
            }
            Outcome::UserDeleted { username } => write!(f, "deleted user {}", username),
            Outcome::UserDeletionFailed { username, status } => {
                write!(f, "delete user {} failed: {}", username, status)
            }
            Outcome::TeamDeleted { team, id } => write!(f, "deleted team \"{}\" ({})", team, id),
            Outcome::TeamDeletionFailed { team, id, status } => {
                write!(f, "delete team \"{}\" ({}) failed: {}", team, id, status)
            }
            Outcome::OrgDeleted { org } => write!(f, "deleted organization {}", org),
            Outcome::OrgDeletionFailed { org, status } => {
                write!(f, "delete organization {} failed: {}", org, status)
            }
            Outcome::IssueCreated { username, number, url } => {
                write!(f, "created issue #{} for {}: {}", number, username, url)
            }
            Outcome::IssueCreationFailed { username, status } => {
                write!(f, "create issue for {} failed: {}", username, status)
            }
        }
    }
}

/// How a command invocation ended, mapped to the process exit code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Every entity was processed successfully
    Clean,
    /// The batch ran to completion but at least one entity failed
    CompletedWithFailures,
}

impl RunStatus {
    pub fn exit_code(self) -> u8 {
        match self {
            RunStatus::Clean => 0,
            RunStatus::CompletedWithFailures => 2,
        }
    }
}

/// Ordered log of per-entity outcomes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutcomeLog {
    entries: Vec<Outcome>,
}

impl OutcomeLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an outcome, tracing it as it happens
    pub fn record(&mut self, outcome: Outcome) {
        if outcome.is_failure() {
            warn!("{}", outcome);
        } else {
            debug!("{}", outcome);
        }
        self.entries.push(outcome);
    }

    /// Append all outcomes of a nested operation
    pub fn extend(&mut self, other: OutcomeLog) {
        self.entries.extend(other.entries);
    }

    pub fn entries(&self) -> &[Outcome] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn failures(&self) -> impl Iterator<Item = &Outcome> {
        self.entries.iter().filter(|o| o.is_failure())
    }

    pub fn has_failures(&self) -> bool {
        self.entries.iter().any(Outcome::is_failure)
    }

    pub fn status(&self) -> RunStatus {
        if self.has_failures() {
            RunStatus::CompletedWithFailures
        } else {
            RunStatus::Clean
        }
    }

    /// One line per outcome followed by a failure count
    pub fn render(&self) -> String {
        let mut output = String::new();
        for outcome in &self.entries {
            output.push_str(&outcome.to_string());
            output.push('\n');
        }
        let failed = self.failures().count();
        output.push_str(&format!(
            "\n{} operations, {} failed\n",
            self.entries.len(),
            failed
        ));
        output
    }
}
