//! CLI argument definitions
//!
//! Contains the main CLI struct and Commands enum for clap parsing.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "gitea-admin")]
#[command(about = "Provision, tear down and audit Gitea organizations in bulk")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// File holding the API token (default: from .gitea-admin.toml or .token)
    #[arg(long, env = "GITEA_TOKEN_FILE", global = true)]
    pub token_file: Option<PathBuf>,

    /// API base URL (default: from .gitea-admin.toml or https://code.frickelbude.ch/api/v1)
    #[arg(long, env = "GITEA_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Items requested per page from list endpoints
    ///
    /// Gitea caps this at its MAX_RESPONSE_ITEMS setting (50 by default); a
    /// larger value ends list reads after the first page.
    #[arg(long, env = "GITEA_PAGE_SIZE", global = true)]
    pub page_size: Option<usize>,

    /// Time zone for report timestamps, e.g. Europe/Zurich
    #[arg(long, env = "GITEA_TIMEZONE", global = true)]
    pub timezone: Option<String>,

    /// Increase verbosity (-v info, -vv debug, -vvv trace). Default is warn.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    // =========================================================================
    // Authentication
    // =========================================================================
    /// Create a new access token and store it in the token file
    NewToken {
        #[arg(long)]
        username: String,
        #[arg(long, env = "GITEA_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long, default_value = "api-token")]
        token_name: String,
        /// Token scopes, comma-separated (e.g. "write:admin,write:organization")
        #[arg(long, value_delimiter = ',')]
        scopes: Vec<String>,
    },

    // =========================================================================
    // Listings
    // =========================================================================
    /// List all organizations
    ListOrgs,
    /// List all teams of an organization
    ListTeams {
        #[arg(long)]
        org: String,
    },
    /// List all repos of a user
    ListRepos {
        #[arg(long)]
        username: String,
    },
    /// Check whether or not a user exists
    CheckUserExists {
        #[arg(long)]
        username: String,
    },

    // =========================================================================
    // Teardown
    // =========================================================================
    /// Delete a user with all owned repos and organization memberships
    DeleteUser {
        /// Username of the account to delete
        #[arg(long)]
        name: String,
    },
    /// Delete all users except the one authenticated
    DeleteUsers,
    /// Delete all the teams of an organization
    DeleteOrgTeams {
        #[arg(long)]
        org: String,
        /// Also delete the Owners team
        #[arg(long)]
        delete_owner_team: bool,
    },
    /// Delete a team of an organization and all its users
    DeleteTeamsUsers {
        #[arg(long)]
        org: String,
        #[arg(long)]
        team: String,
        /// Only list the users that would be deleted
        #[arg(long)]
        dry: bool,
    },
    /// Delete an organization with all its repos
    DeleteOrg {
        #[arg(long)]
        org: String,
    },

    // =========================================================================
    // Provisioning
    // =========================================================================
    /// Register all teams and users of a roster file in an organization
    BulkRegister {
        #[arg(long)]
        org: String,
        /// Roster YAML file
        #[arg(long)]
        bulkfile: PathBuf,
        /// Do not send notification e-mails
        #[arg(long)]
        no_notify: bool,
        /// Do not create teams; use the existing ones with the same names
        #[arg(long)]
        existing_team: bool,
    },
    /// Give teams read access to code, pull requests and releases, write access to issues
    SetTeamRights {
        #[arg(long)]
        org: String,
        /// Only update this team
        #[arg(long)]
        team: Option<String>,
    },
    /// Create an issue for each team member in a repository
    CreateBulkIssues {
        #[arg(long)]
        owner: String,
        #[arg(long)]
        repo: String,
        #[arg(long)]
        team: String,
        /// Title of the issue
        #[arg(long)]
        title: String,
        /// Body text of the issue
        #[arg(long, default_value = "")]
        text: String,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<NaiveDate>,
    },

    // =========================================================================
    // Reports
    // =========================================================================
    /// List the forks of a team for a repository
    ListForks {
        #[arg(long)]
        owner: String,
        #[arg(long)]
        repo: String,
        #[arg(long)]
        team: String,
    },
    /// List the pull requests of a team for a repository
    ListPullRequests {
        #[arg(long)]
        owner: String,
        #[arg(long)]
        repo: String,
        #[arg(long)]
        team: String,
    },

    // =========================================================================
    // Utilities
    // =========================================================================
    /// Generate a random password
    Genpw {
        #[arg(long, default_value_t = gitea_admin::password::DEFAULT_PASSWORD_LENGTH)]
        length: usize,
    },
}
