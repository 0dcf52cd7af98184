//! Bulk provisioning, teardown and compliance reporting for Gitea organizations

pub mod compliance;
pub mod config;
pub mod decommission;
pub mod error;
pub mod gateway;
pub mod issues;
pub mod lookup;
pub mod outcome;
pub mod paginate;
pub mod password;
pub mod provision;
pub mod rights;
pub mod roster;
pub mod types;

pub use error::{AdminError, AdminResult};
pub use gateway::{Gateway, GatewayError, GatewayResult, HttpGateway};
pub use outcome::{Outcome, OutcomeLog, RunStatus};
pub use roster::{Roster, TeamEntry, UserEntry};
