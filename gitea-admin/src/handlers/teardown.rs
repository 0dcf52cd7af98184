//! Teardown handlers

use anyhow::Result;

use gitea_admin::decommission::{Decommissioner, TeamTeardown};
use gitea_admin::outcome::RunStatus;

use super::{finish, CommandContext};

/// Handle the `delete-user` command
pub async fn delete_user(ctx: &CommandContext, name: &str) -> Result<RunStatus> {
    let gateway = ctx.gateway().await?;
    let log = Decommissioner::new(gateway, ctx.page_size()).delete_user(name).await?;
    Ok(finish(&log))
}

/// Handle the `delete-users` command; the authenticated account is kept
pub async fn delete_users(ctx: &CommandContext) -> Result<RunStatus> {
    let gateway = ctx.gateway().await?;
    let log = Decommissioner::new(gateway, ctx.page_size())
        .delete_all_users(true)
        .await?;
    Ok(finish(&log))
}

/// Handle the `delete-org-teams` command
pub async fn delete_org_teams(ctx: &CommandContext, org: &str, delete_owner_team: bool) -> Result<RunStatus> {
    let gateway = ctx.gateway().await?;
    let log = Decommissioner::new(gateway, ctx.page_size())
        .delete_all_teams(org, !delete_owner_team)
        .await?;
    Ok(finish(&log))
}

/// Handle the `delete-teams-users` command
pub async fn delete_teams_users(ctx: &CommandContext, org: &str, team: &str, dry: bool) -> Result<RunStatus> {
    let gateway = ctx.gateway().await?;
    let teardown = Decommissioner::new(gateway, ctx.page_size())
        .delete_team_and_members(org, team, dry)
        .await?;

    match teardown {
        TeamTeardown::Planned { team, members } => {
            println!("to be deleted with team {} (dry run):", team);
            for login in members {
                println!("{}", login);
            }
            Ok(RunStatus::Clean)
        }
        TeamTeardown::Executed(log) => Ok(finish(&log)),
    }
}

/// Handle the `delete-org` command
pub async fn delete_org(ctx: &CommandContext, org: &str) -> Result<RunStatus> {
    let gateway = ctx.gateway().await?;
    let log = Decommissioner::new(gateway, ctx.page_size())
        .delete_organization(org)
        .await?;
    Ok(finish(&log))
}
