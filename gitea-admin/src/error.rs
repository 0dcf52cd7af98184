//! Error types for administrative operations
//!
//! Only failures that abort an operation live here. Failures scoped to one
//! entity of a batch are recorded in an [`OutcomeLog`](crate::outcome::OutcomeLog)
//! instead.

use std::path::PathBuf;

use thiserror::Error;

use crate::gateway::GatewayError;
use crate::roster::RosterPosition;

/// Errors that abort an administrative operation
#[derive(Error, Debug)]
pub enum AdminError {
    /// The organization does not exist on the server
    #[error("organization {0} not found")]
    OrganizationNotFound(String),

    /// No team of the organization has the given name
    #[error("team {team} not found in organization {org}")]
    TeamNotFound { org: String, team: String },

    /// More than one team of the organization has the given name
    #[error("team name {team} is ambiguous in organization {org}: {count} teams match")]
    AmbiguousTeam {
        org: String,
        team: String,
        count: usize,
    },

    /// A roster entry lacks a required field
    #[error("malformed roster: missing `{field}` in {position}")]
    MalformedRoster {
        field: &'static str,
        position: RosterPosition,
    },

    /// A roster username contains a character that cannot appear in a login
    #[error("malformed roster: invalid username `{username}` in {position}")]
    InvalidUsername {
        username: String,
        position: RosterPosition,
    },

    /// The roster document is not valid YAML of the expected shape
    #[error("failed to parse roster: {0}")]
    RosterSyntax(#[from] serde_yaml::Error),

    /// The roster file could not be read
    #[error("failed to read roster {}: {source}", path.display())]
    RosterIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Transport or decoding failure of a remote call
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Result type alias for administrative operations
pub type AdminResult<T> = Result<T, AdminError>;
