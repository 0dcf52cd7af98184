//! Token, listing and utility handlers

use anyhow::{Context, Result};
use serde_json::Value;

use gitea_admin::gateway::create_access_token;
use gitea_admin::lookup::user_exists;
use gitea_admin::outcome::RunStatus;
use gitea_admin::paginate::Paginator;
use gitea_admin::password::generate_password;
use gitea_admin::types::CreateTokenOption;

use super::CommandContext;

/// Handle the `new-token` command
///
/// Uses basic authentication and writes the new token to the configured
/// token file.
pub async fn new_token(
    ctx: &CommandContext,
    username: &str,
    password: &str,
    token_name: &str,
    scopes: Vec<String>,
) -> Result<RunStatus> {
    let option = CreateTokenOption {
        name: token_name.to_string(),
        scopes,
    };
    let token = create_access_token(&ctx.config.api_url, username, password, &option)
        .await
        .context("failed to create access token")?;

    let path = &ctx.config.token_file;
    std::fs::write(path, &token.sha1)
        .with_context(|| format!("failed to write token to {}", path.display()))?;
    println!("token {:?} written to {}", token.name, path.display());
    Ok(RunStatus::Clean)
}

async fn print_collection(ctx: &CommandContext, endpoint: String) -> Result<RunStatus> {
    let gateway = ctx.gateway().await?;
    let items: Vec<Value> = Paginator::new(gateway, endpoint, ctx.page_size())
        .collect_all()
        .await?;
    println!("{}", serde_json::to_string_pretty(&items)?);
    Ok(RunStatus::Clean)
}

/// Handle the `list-orgs` command
pub async fn list_orgs(ctx: &CommandContext) -> Result<RunStatus> {
    print_collection(ctx, "admin/orgs".to_string()).await
}

/// Handle the `list-teams` command
pub async fn list_teams(ctx: &CommandContext, org: &str) -> Result<RunStatus> {
    print_collection(ctx, format!("orgs/{}/teams", org)).await
}

/// Handle the `list-repos` command
pub async fn list_repos(ctx: &CommandContext, username: &str) -> Result<RunStatus> {
    print_collection(ctx, format!("users/{}/repos", username)).await
}

/// Handle the `check-user-exists` command
pub async fn check_user_exists(ctx: &CommandContext, username: &str) -> Result<RunStatus> {
    let gateway = ctx.gateway().await?;
    println!("{}", user_exists(gateway, username).await?);
    Ok(RunStatus::Clean)
}

/// Handle the `genpw` command
pub fn genpw(length: usize) -> RunStatus {
    println!("{}", generate_password(length));
    RunStatus::Clean
}
