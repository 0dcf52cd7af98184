//! Roster provisioning
//!
//! Materializes a [`Roster`] inside an organization: teams are created (or
//! reused), missing users are registered and every user is added to its
//! team. Re-running the same roster is safe; existing users are skipped and
//! membership additions are idempotent on the server.

use tracing::{info, instrument};

use crate::error::AdminResult;
use crate::gateway::{payload, Gateway};
use crate::lookup::{ensure_org_exists, resolve_team, user_exists};
use crate::outcome::{Outcome, OutcomeLog};
use crate::password::{generate_password, DEFAULT_PASSWORD_LENGTH};
use crate::roster::{Roster, TeamEntry, UserEntry};
use crate::types::{CreateTeamOption, CreateUserOption, Permission, Team, Visibility};

/// Repository units enabled on newly created teams
pub const DEFAULT_TEAM_UNITS: [&str; 4] = ["repo.code", "repo.issues", "repo.pulls", "repo.releases"];

/// Options for [`Provisioner::provision`]
#[derive(Debug, Clone, Copy)]
pub struct ProvisionOptions {
    /// Look teams up by name instead of creating them
    pub reuse_existing_team: bool,
    /// Ask the server to e-mail new users their credentials
    pub notify: bool,
}

impl Default for ProvisionOptions {
    fn default() -> Self {
        Self {
            reuse_existing_team: false,
            notify: true,
        }
    }
}

/// Realizes rosters against a Gitea organization
pub struct Provisioner<'a> {
    gateway: &'a dyn Gateway,
    page_size: usize,
}

impl<'a> Provisioner<'a> {
    pub fn new(gateway: &'a dyn Gateway, page_size: usize) -> Self {
        Self { gateway, page_size }
    }

    /// Provision every team and user of `roster` into `org`
    ///
    /// Fails before any mutation if the organization does not exist or, in
    /// reuse mode, if a roster team does not resolve to exactly one team.
    /// After that, refused creates and membership additions are recorded in
    /// the returned log; only transport failures abort.
    #[instrument(skip(self, roster), fields(teams = roster.teams.len()))]
    pub async fn provision(
        &self,
        org: &str,
        roster: &Roster,
        options: ProvisionOptions,
    ) -> AdminResult<OutcomeLog> {
        ensure_org_exists(self.gateway, org).await?;

        let mut existing = Vec::with_capacity(roster.teams.len());
        if options.reuse_existing_team {
            for entry in &roster.teams {
                existing.push(Some(resolve_team(self.gateway, org, &entry.teamname, self.page_size).await?));
            }
        } else {
            existing.resize(roster.teams.len(), None);
        }

        let mut log = OutcomeLog::new();
        for (entry, existing) in roster.teams.iter().zip(existing) {
            let team_id = match existing {
                Some(team) => {
                    log.record(Outcome::TeamReused {
                        team: team.name.clone(),
                        id: team.id,
                    });
                    team.id
                }
                None => match self.create_team(org, entry, &mut log).await? {
                    Some(id) => id,
                    None => continue,
                },
            };

            for user in &entry.users {
                self.provision_user(&entry.teamname, team_id, user, options.notify, &mut log)
                    .await?;
            }
        }

        info!(
            org,
            operations = log.len(),
            failures = log.failures().count(),
            "provisioning finished"
        );
        Ok(log)
    }

    async fn create_team(&self, org: &str, entry: &TeamEntry, log: &mut OutcomeLog) -> AdminResult<Option<u64>> {
        let option = CreateTeamOption {
            name: entry.teamname.clone(),
            description: entry.description.clone(),
            permission: Permission::Read,
            units: DEFAULT_TEAM_UNITS.iter().map(|u| u.to_string()).collect(),
            includes_all_repositories: true,
        };

        let endpoint = format!("orgs/{}/teams", org);
        let response = self.gateway.post(&endpoint, &payload(&option)?).await?;
        if response.status != 201 {
            log.record(Outcome::TeamCreationFailed {
                team: entry.teamname.clone(),
                status: response.status,
            });
            return Ok(None);
        }

        let team: Team = response.json(&endpoint)?;
        log.record(Outcome::TeamCreated {
            team: entry.teamname.clone(),
            id: team.id,
        });
        Ok(Some(team.id))
    }

    async fn provision_user(
        &self,
        team: &str,
        team_id: u64,
        user: &UserEntry,
        notify: bool,
        log: &mut OutcomeLog,
    ) -> AdminResult<()> {
        if user_exists(self.gateway, &user.username).await? {
            log.record(Outcome::UserExists {
                username: user.username.clone(),
            });
        } else {
            let option = CreateUserOption {
                username: user.username.clone(),
                email: user.email.clone(),
                full_name: user.fullname.clone(),
                password: generate_password(DEFAULT_PASSWORD_LENGTH),
                must_change_password: true,
                restricted: true,
                send_notify: notify,
                visibility: Visibility::Limited,
            };

            let response = self.gateway.post("admin/users", &payload(&option)?).await?;
            if response.status == 201 {
                log.record(Outcome::UserCreated {
                    username: user.username.clone(),
                });
            } else {
                // membership is still attempted
                log.record(Outcome::UserCreationFailed {
                    username: user.username.clone(),
                    status: response.status,
                });
            }
        }

        let response = self
            .gateway
            .put(&format!("teams/{}/members/{}", team_id, user.username))
            .await?;
        if response.status == 204 {
            log.record(Outcome::MemberAdded {
                username: user.username.clone(),
                team: team.to_string(),
            });
        } else {
            log.record(Outcome::MembershipFailed {
                username: user.username.clone(),
                team: team.to_string(),
                status: response.status,
            });
        }
        Ok(())
    }
}
