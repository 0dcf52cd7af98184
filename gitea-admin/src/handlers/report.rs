//! Compliance report handlers
//!
//! Reports always exit cleanly; missing members are findings, not failures.

use anyhow::Result;

use gitea_admin::compliance::ComplianceReporter;
use gitea_admin::outcome::RunStatus;

use super::CommandContext;

/// Handle the `list-forks` command
pub async fn list_forks(ctx: &CommandContext, owner: &str, repo: &str, team: &str) -> Result<RunStatus> {
    let gateway = ctx.gateway().await?;
    let report = ComplianceReporter::new(gateway, ctx.page_size())
        .report_forks(owner, repo, team)
        .await?;
    print!("{}", report.render(ctx.config.timezone));
    Ok(RunStatus::Clean)
}

/// Handle the `list-pull-requests` command
pub async fn list_pull_requests(ctx: &CommandContext, owner: &str, repo: &str, team: &str) -> Result<RunStatus> {
    let gateway = ctx.gateway().await?;
    let report = ComplianceReporter::new(gateway, ctx.page_size())
        .report_pull_requests(owner, repo, team)
        .await?;
    print!("{}", report.render(ctx.config.timezone));
    Ok(RunStatus::Clean)
}
