//! Team rights normalization

use std::collections::BTreeMap;

use tracing::{instrument, warn};

use crate::error::AdminResult;
use crate::gateway::{payload, Gateway};
use crate::lookup::org_teams;
use crate::outcome::{Outcome, OutcomeLog};
use crate::types::{EditTeamOption, Permission};

/// The uniform rights applied to every team: read access to code, pull
/// requests and releases, write access to issues
pub fn normalized_rights() -> EditTeamOption {
    let mut units_map = BTreeMap::new();
    for unit in ["repo.code", "repo.pulls", "repo.releases"] {
        units_map.insert(unit.to_string(), Permission::Read);
    }
    units_map.insert("repo.issues".to_string(), Permission::Write);

    EditTeamOption {
        permission: Permission::Read,
        units_map,
        includes_all_repositories: true,
    }
}

pub struct RightsNormalizer<'a> {
    gateway: &'a dyn Gateway,
    page_size: usize,
}

impl<'a> RightsNormalizer<'a> {
    pub fn new(gateway: &'a dyn Gateway, page_size: usize) -> Self {
        Self { gateway, page_size }
    }

    /// Apply [`normalized_rights`] to all non-owner teams of `org`, or only
    /// to `team_filter` when given
    #[instrument(skip(self))]
    pub async fn normalize(&self, org: &str, team_filter: Option<&str>) -> AdminResult<OutcomeLog> {
        let teams: Vec<_> = org_teams(self.gateway, org, self.page_size)
            .await?
            .into_iter()
            .filter(|t| !t.is_owners())
            .filter(|t| team_filter.map_or(true, |name| t.name == name))
            .collect();

        let mut log = OutcomeLog::new();
        if teams.is_empty() {
            warn!(org, team = ?team_filter, "no team to update");
            return Ok(log);
        }

        let body = payload(&normalized_rights())?;
        for team in teams {
            let response = self.gateway.patch(&format!("teams/{}", team.id), &body).await?;
            if response.status == 200 {
                log.record(Outcome::RightsNormalized {
                    team: team.name,
                    id: team.id,
                });
            } else {
                log.record(Outcome::RightsFailed {
                    team: team.name,
                    id: team.id,
                    status: response.status,
                });
            }
        }
        Ok(log)
    }
}
