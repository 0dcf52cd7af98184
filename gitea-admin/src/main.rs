use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use gitea_admin::config::{AdminConfig, AdminFileConfig, CliOverrides};
use gitea_admin::outcome::RunStatus;

mod cli;
mod handlers;

use cli::{Cli, Commands};
use handlers::CommandContext;

/// Initialize tracing based on verbosity level
///
/// Verbosity levels:
/// - 0: warn (default)
/// - 1: info (-v)
/// - 2: debug (-vv)
/// - 3+: trace (-vvv)
///
/// `RUST_LOG` overrides the level; `LOG_FORMAT=json` switches to JSON lines.
/// Logs go to stderr so reports on stdout stay clean.
fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if use_json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

async fn run(cli: Cli) -> Result<RunStatus> {
    let overrides = CliOverrides {
        api_url: cli.base_url,
        token_file: cli.token_file,
        page_size: cli.page_size,
        timezone: cli.timezone,
    };
    let config = AdminConfig::resolve(overrides, AdminFileConfig::load()?)?;
    tracing::debug!(api_url = %config.api_url, page_size = config.page_size, "configuration resolved");

    let ctx = CommandContext::new(config);

    match cli.command {
        Commands::NewToken {
            username,
            password,
            token_name,
            scopes,
        } => handlers::new_token(&ctx, &username, &password, &token_name, scopes).await,
        Commands::ListOrgs => handlers::list_orgs(&ctx).await,
        Commands::ListTeams { org } => handlers::list_teams(&ctx, &org).await,
        Commands::ListRepos { username } => handlers::list_repos(&ctx, &username).await,
        Commands::CheckUserExists { username } => handlers::check_user_exists(&ctx, &username).await,
        Commands::DeleteUser { name } => handlers::delete_user(&ctx, &name).await,
        Commands::DeleteUsers => handlers::delete_users(&ctx).await,
        Commands::DeleteOrgTeams { org, delete_owner_team } => {
            handlers::delete_org_teams(&ctx, &org, delete_owner_team).await
        }
        Commands::DeleteTeamsUsers { org, team, dry } => handlers::delete_teams_users(&ctx, &org, &team, dry).await,
        Commands::DeleteOrg { org } => handlers::delete_org(&ctx, &org).await,
        Commands::BulkRegister {
            org,
            bulkfile,
            no_notify,
            existing_team,
        } => handlers::bulk_register(&ctx, &org, &bulkfile, no_notify, existing_team).await,
        Commands::SetTeamRights { org, team } => handlers::set_team_rights(&ctx, &org, team.as_deref()).await,
        Commands::CreateBulkIssues {
            owner,
            repo,
            team,
            title,
            text,
            due,
        } => handlers::create_bulk_issues(&ctx, &owner, &repo, &team, &title, &text, due).await,
        Commands::ListForks { owner, repo, team } => handlers::list_forks(&ctx, &owner, &repo, &team).await,
        Commands::ListPullRequests { owner, repo, team } => {
            handlers::list_pull_requests(&ctx, &owner, &repo, &team).await
        }
        Commands::Genpw { length } => Ok(handlers::genpw(length)),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Parse CLI first to get verbosity before initializing tracing
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(status) => ExitCode::from(status.exit_code()),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(1)
        }
    }
}
