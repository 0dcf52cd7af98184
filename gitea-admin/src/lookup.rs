//! Remote lookups shared by the batch operations
//!
//! All reads are fresh; nothing is cached between calls.

use tracing::{debug, warn};

use crate::error::{AdminError, AdminResult};
use crate::gateway::{Gateway, GatewayResult};
use crate::paginate::Paginator;
use crate::types::{Team, User};

/// Fail with `OrganizationNotFound` unless `GET orgs/{org}` answers 200
pub async fn ensure_org_exists(gateway: &dyn Gateway, org: &str) -> AdminResult<()> {
    let response = gateway.get(&format!("orgs/{}", org), &[]).await?;
    if response.status != 200 {
        debug!(org, status = response.status, "organization lookup failed");
        return Err(AdminError::OrganizationNotFound(org.to_string()));
    }
    Ok(())
}

/// All teams of an organization
pub async fn org_teams(gateway: &dyn Gateway, org: &str, page_size: usize) -> GatewayResult<Vec<Team>> {
    Paginator::new(gateway, format!("orgs/{}/teams", org), page_size)
        .collect_all()
        .await
}

/// Resolve a team name to exactly one team of the organization
///
/// The server is expected to keep team names unique per organization; two
/// matches mean inconsistent state and are refused rather than guessed.
pub async fn resolve_team(
    gateway: &dyn Gateway,
    org: &str,
    name: &str,
    page_size: usize,
) -> AdminResult<Team> {
    let mut matches: Vec<Team> = org_teams(gateway, org, page_size)
        .await?
        .into_iter()
        .filter(|t| t.name == name)
        .collect();

    match matches.len() {
        0 => Err(AdminError::TeamNotFound {
            org: org.to_string(),
            team: name.to_string(),
        }),
        1 => Ok(matches.remove(0)),
        count => Err(AdminError::AmbiguousTeam {
            org: org.to_string(),
            team: name.to_string(),
            count,
        }),
    }
}

/// Logins of the members of a team, in server order
pub async fn team_member_logins(
    gateway: &dyn Gateway,
    team_id: u64,
    page_size: usize,
) -> GatewayResult<Vec<String>> {
    let members: Vec<User> = Paginator::new(gateway, format!("teams/{}/members", team_id), page_size)
        .collect_all()
        .await?;
    Ok(members.iter().map(|m| m.login().to_string()).collect())
}

/// Whether an account with this username exists
///
/// Any status other than 200 or 404 is logged and treated as "absent"; the
/// subsequent create call then reports the real problem.
pub async fn user_exists(gateway: &dyn Gateway, username: &str) -> GatewayResult<bool> {
    let response = gateway.get(&format!("users/{}", username), &[]).await?;
    match response.status {
        200 => Ok(true),
        404 => Ok(false),
        status => {
            warn!(username, status, "user lookup returned unexpected status");
            Ok(false)
        }
    }
}

/// The account the token belongs to
pub async fn whoami(gateway: &dyn Gateway) -> GatewayResult<User> {
    gateway.get("user", &[]).await?.expect_json("user", 200)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::testing::RecordingGateway;
    use crate::gateway::Method;
    use serde_json::json;

    #[tokio::test]
    async fn test_ensure_org_exists() {
        let gateway = RecordingGateway::new().on(Method::Get, "orgs/acme", 200, json!({"id": 1}));

        assert!(ensure_org_exists(&gateway, "acme").await.is_ok());
        assert!(matches!(
            ensure_org_exists(&gateway, "nope").await,
            Err(AdminError::OrganizationNotFound(org)) if org == "nope"
        ));
    }

    #[tokio::test]
    async fn test_resolve_team_exact_match() {
        let gateway = RecordingGateway::new().on_list(
            "orgs/acme/teams",
            json!([
                {"id": 1, "name": "Owners"},
                {"id": 2, "name": "Group A"},
                {"id": 3, "name": "Group AB"}
            ]),
        );

        let team = resolve_team(&gateway, "acme", "Group A", 30).await.unwrap();
        assert_eq!(team.id, 2);
    }

    #[tokio::test]
    async fn test_resolve_team_ambiguous_and_missing() {
        let gateway = RecordingGateway::new().on_list(
            "orgs/acme/teams",
            json!([{"id": 2, "name": "Group A"}, {"id": 9, "name": "Group A"}]),
        );

        assert!(matches!(
            resolve_team(&gateway, "acme", "Group A", 30).await,
            Err(AdminError::AmbiguousTeam { count: 2, .. })
        ));
        assert!(matches!(
            resolve_team(&gateway, "acme", "Group Z", 30).await,
            Err(AdminError::TeamNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_user_exists_statuses() {
        let gateway = RecordingGateway::new()
            .on(Method::Get, "users/alice", 200, json!({"id": 5, "login": "alice"}))
            .on(Method::Get, "users/flaky", 500, json!(null));

        assert!(user_exists(&gateway, "alice").await.unwrap());
        assert!(!user_exists(&gateway, "bob").await.unwrap());
        assert!(!user_exists(&gateway, "flaky").await.unwrap());
    }

    #[tokio::test]
    async fn test_team_member_logins() {
        let gateway = RecordingGateway::new().on_list(
            "teams/7/members",
            json!([{"id": 1, "login": "alice"}, {"id": 2, "username": "bob"}]),
        );

        let logins = team_member_logins(&gateway, 7, 30).await.unwrap();
        assert_eq!(logins, vec!["alice", "bob"]);
    }
}
