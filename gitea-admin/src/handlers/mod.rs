//! Command handlers module
//!
//! This module contains handler functions for CLI commands, organized by feature.
//! CommandContext provides lazy-loaded resources shared across handlers.

use anyhow::{Context, Result};
use tokio::sync::OnceCell;

use gitea_admin::config::AdminConfig;
use gitea_admin::outcome::{OutcomeLog, RunStatus};
use gitea_admin::HttpGateway;

pub mod inspect;
pub mod provision;
pub mod report;
pub mod teardown;

pub use inspect::{check_user_exists, genpw, list_orgs, list_repos, list_teams, new_token};
pub use provision::{bulk_register, create_bulk_issues, set_team_rights};
pub use report::{list_forks, list_pull_requests};
pub use teardown::{delete_org, delete_org_teams, delete_teams_users, delete_user, delete_users};

/// Shared context for command handlers with lazy-loaded resources.
///
/// The gateway is only built when first accessed, so commands that do not
/// talk to the server (or that create the token) work without a token file.
pub struct CommandContext {
    pub config: AdminConfig,

    /// Lazy-loaded authenticated gateway
    gateway: OnceCell<HttpGateway>,
}

impl CommandContext {
    pub fn new(config: AdminConfig) -> Self {
        Self {
            config,
            gateway: OnceCell::new(),
        }
    }

    /// Get the authenticated gateway, reading the token file on first use
    pub async fn gateway(&self) -> Result<&HttpGateway> {
        self.gateway
            .get_or_try_init(|| async {
                HttpGateway::from_token_file(&self.config.api_url, &self.config.token_file)
                    .with_context(|| format!("cannot connect to {}", self.config.api_url))
            })
            .await
    }

    pub fn page_size(&self) -> usize {
        self.config.page_size
    }
}

/// Print an outcome log to stdout and map it to a run status
fn finish(log: &OutcomeLog) -> RunStatus {
    print!("{}", log.render());
    log.status()
}
