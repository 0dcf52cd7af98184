//! Provisioning handlers

use std::path::Path;

use anyhow::Result;
use chrono::NaiveDate;

use gitea_admin::issues::{IssueBroadcaster, IssueTemplate};
use gitea_admin::outcome::RunStatus;
use gitea_admin::provision::{ProvisionOptions, Provisioner};
use gitea_admin::rights::RightsNormalizer;
use gitea_admin::Roster;

use super::{finish, CommandContext};

/// Handle the `bulk-register` command
pub async fn bulk_register(
    ctx: &CommandContext,
    org: &str,
    bulkfile: &Path,
    no_notify: bool,
    existing_team: bool,
) -> Result<RunStatus> {
    // Validate the roster before touching the server.
    let roster = Roster::from_path(bulkfile)?;
    tracing::info!(
        teams = roster.teams.len(),
        memberships = roster.membership_count(),
        "roster loaded"
    );

    let options = ProvisionOptions {
        reuse_existing_team: existing_team,
        notify: !no_notify,
    };
    let gateway = ctx.gateway().await?;
    let log = Provisioner::new(gateway, ctx.page_size())
        .provision(org, &roster, options)
        .await?;
    Ok(finish(&log))
}

/// Handle the `set-team-rights` command
pub async fn set_team_rights(ctx: &CommandContext, org: &str, team: Option<&str>) -> Result<RunStatus> {
    let gateway = ctx.gateway().await?;
    let log = RightsNormalizer::new(gateway, ctx.page_size())
        .normalize(org, team)
        .await?;
    Ok(finish(&log))
}

/// Handle the `create-bulk-issues` command
pub async fn create_bulk_issues(
    ctx: &CommandContext,
    owner: &str,
    repo: &str,
    team: &str,
    title: &str,
    text: &str,
    due: Option<NaiveDate>,
) -> Result<RunStatus> {
    let template = IssueTemplate {
        title: title.to_string(),
        body: text.to_string(),
        due,
    };

    let gateway = ctx.gateway().await?;
    let log = IssueBroadcaster::new(gateway, ctx.page_size())
        .create_issues(owner, repo, team, &template)
        .await?;
    Ok(finish(&log))
}
