//! Type definitions for Gitea entities
//!
//! This module contains Rust structs that mirror the JSON objects returned by
//! the Gitea API, plus the typed request payloads sent to it. Unknown fields
//! are ignored on decode so newer server versions keep working.

pub mod issue;
pub mod org;
pub mod pull_request;
pub mod repo;
pub mod team;
pub mod token;
pub mod user;

pub use issue::{CreateIssueOption, Issue};
pub use org::Organization;
pub use pull_request::{PullRequest, PullRequestBase};
pub use repo::Repository;
pub use team::{CreateTeamOption, EditTeamOption, Permission, Team, OWNERS_TEAM};
pub use token::{AccessToken, CreateTokenOption};
pub use user::{CreateUserOption, User, UserRef, Visibility};
