//! Cascading deletion of users, teams and organizations
//!
//! Dependent resources are removed before the resource they depend on: a
//! user's repositories and organization memberships go before the account,
//! an organization's repositories before the organization. Every delete is
//! attempted regardless of how earlier deletes in the same cascade went.
//! There is no transaction between listing and deleting; concurrent changes
//! by another operator are not detected.

use tracing::{info, instrument};

use crate::error::AdminResult;
use crate::gateway::{is_deleted, Gateway};
use crate::lookup::{ensure_org_exists, org_teams, resolve_team, team_member_logins, whoami};
use crate::outcome::{Outcome, OutcomeLog};
use crate::paginate::Paginator;
use crate::types::{Organization, Repository, User};

/// Result of [`Decommissioner::delete_team_and_members`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TeamTeardown {
    /// Dry run: the sorted logins that would be deleted
    Planned { team: String, members: Vec<String> },
    /// The members and the team were deleted
    Executed(OutcomeLog),
}

pub struct Decommissioner<'a> {
    gateway: &'a dyn Gateway,
    page_size: usize,
}

impl<'a> Decommissioner<'a> {
    pub fn new(gateway: &'a dyn Gateway, page_size: usize) -> Self {
        Self { gateway, page_size }
    }

    /// Delete a user's owned repositories, leave all its organizations, then
    /// delete the account
    #[instrument(skip(self))]
    pub async fn delete_user(&self, username: &str) -> AdminResult<OutcomeLog> {
        let mut log = OutcomeLog::new();

        let repos: Vec<Repository> =
            Paginator::new(self.gateway, format!("users/{}/repos", username), self.page_size)
                .collect_all()
                .await?;
        for repo in repos.iter().filter(|r| r.is_owned_by(username)) {
            self.delete_repo(username, &repo.name, &mut log).await?;
        }

        let orgs: Vec<Organization> =
            Paginator::new(self.gateway, format!("users/{}/orgs", username), self.page_size)
                .collect_all()
                .await?;
        for org in &orgs {
            let response = self
                .gateway
                .delete(&format!("orgs/{}/members/{}", org.login(), username))
                .await?;
            if is_deleted(response.status) {
                log.record(Outcome::MemberRemoved {
                    username: username.to_string(),
                    org: org.login().to_string(),
                });
            } else {
                log.record(Outcome::MemberRemovalFailed {
                    username: username.to_string(),
                    org: org.login().to_string(),
                    status: response.status,
                });
            }
        }

        let response = self.gateway.delete(&format!("admin/users/{}", username)).await?;
        if is_deleted(response.status) {
            log.record(Outcome::UserDeleted {
                username: username.to_string(),
            });
        } else {
            log.record(Outcome::UserDeletionFailed {
                username: username.to_string(),
                status: response.status,
            });
        }
        Ok(log)
    }

    /// Delete every account, optionally sparing the one the token belongs to
    #[instrument(skip(self))]
    pub async fn delete_all_users(&self, keep_self: bool) -> AdminResult<OutcomeLog> {
        let keep = if keep_self {
            Some(whoami(self.gateway).await?)
        } else {
            None
        };

        let users: Vec<User> = Paginator::new(self.gateway, "admin/users", self.page_size)
            .collect_all()
            .await?;

        let mut log = OutcomeLog::new();
        for user in &users {
            if keep.as_ref().is_some_and(|k| k.same_account(user)) {
                info!(login = user.login(), "keeping authenticated user");
                continue;
            }
            log.extend(self.delete_user(user.login()).await?);
        }
        Ok(log)
    }

    /// Delete an organization's own repositories, then the organization
    #[instrument(skip(self))]
    pub async fn delete_organization(&self, org: &str) -> AdminResult<OutcomeLog> {
        ensure_org_exists(self.gateway, org).await?;

        let mut log = OutcomeLog::new();
        let repos: Vec<Repository> = Paginator::new(self.gateway, format!("orgs/{}/repos", org), self.page_size)
            .collect_all()
            .await?;
        for repo in repos.iter().filter(|r| r.is_owned_by(org)) {
            self.delete_repo(org, &repo.name, &mut log).await?;
        }

        let response = self.gateway.delete(&format!("orgs/{}", org)).await?;
        if is_deleted(response.status) {
            log.record(Outcome::OrgDeleted { org: org.to_string() });
        } else {
            log.record(Outcome::OrgDeletionFailed {
                org: org.to_string(),
                status: response.status,
            });
        }
        Ok(log)
    }

    /// Delete all teams of an organization
    ///
    /// The `Owners` team is kept unless `keep_owner_team` is false.
    #[instrument(skip(self))]
    pub async fn delete_all_teams(&self, org: &str, keep_owner_team: bool) -> AdminResult<OutcomeLog> {
        ensure_org_exists(self.gateway, org).await?;

        let mut log = OutcomeLog::new();
        for team in org_teams(self.gateway, org, self.page_size).await? {
            if team.is_owners() && keep_owner_team {
                continue;
            }
            self.delete_team(&team.name, team.id, &mut log).await?;
        }
        Ok(log)
    }

    /// Delete every member account of a team, then the team itself
    ///
    /// The team name must match exactly one team. With `dry_run` nothing is
    /// deleted and the member logins are returned sorted.
    #[instrument(skip(self))]
    pub async fn delete_team_and_members(
        &self,
        org: &str,
        team: &str,
        dry_run: bool,
    ) -> AdminResult<TeamTeardown> {
        let resolved = resolve_team(self.gateway, org, team, self.page_size).await?;
        let mut members = team_member_logins(self.gateway, resolved.id, self.page_size).await?;

        if dry_run {
            members.sort();
            return Ok(TeamTeardown::Planned {
                team: resolved.name,
                members,
            });
        }

        let mut log = OutcomeLog::new();
        for login in &members {
            log.extend(self.delete_user(login).await?);
        }
        self.delete_team(&resolved.name, resolved.id, &mut log).await?;
        Ok(TeamTeardown::Executed(log))
    }

    async fn delete_repo(&self, owner: &str, repo: &str, log: &mut OutcomeLog) -> AdminResult<()> {
        let response = self.gateway.delete(&format!("repos/{}/{}", owner, repo)).await?;
        if is_deleted(response.status) {
            log.record(Outcome::RepoDeleted {
                owner: owner.to_string(),
                repo: repo.to_string(),
            });
        } else {
            log.record(Outcome::RepoDeletionFailed {
                owner: owner.to_string(),
                repo: repo.to_string(),
                status: response.status,
            });
        }
        Ok(())
    }

    async fn delete_team(&self, name: &str, id: u64, log: &mut OutcomeLog) -> AdminResult<()> {
        let response = self.gateway.delete(&format!("teams/{}", id)).await?;
        if is_deleted(response.status) {
            log.record(Outcome::TeamDeleted {
                team: name.to_string(),
                id,
            });
        } else {
            log.record(Outcome::TeamDeletionFailed {
                team: name.to_string(),
                id,
                status: response.status,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AdminError;
    use crate::gateway::testing::RecordingGateway;
    use crate::gateway::Method;
    use serde_json::json;

    fn alice() -> RecordingGateway {
        RecordingGateway::new()
            .on_list(
                "users/alice/repos",
                json!([
                    {"id": 1, "name": "homework", "owner": {"login": "alice"}},
                    {"id": 2, "name": "shared", "owner": {"login": "acme"}},
                    {"id": 3, "name": "notes", "owner": {"login": "alice"}}
                ]),
            )
            .on_list("users/alice/orgs", json!([{"id": 9, "username": "acme"}]))
    }

    #[tokio::test]
    async fn test_delete_user_cascades_in_order() {
        let gateway = alice()
            // a failing repo delete must not stop the cascade
            .on(Method::Delete, "repos/alice/homework", 500, json!(null))
            .on(Method::Delete, "repos/alice/notes", 204, json!(null))
            .on(Method::Delete, "orgs/acme/members/alice", 204, json!(null))
            .on(Method::Delete, "admin/users/alice", 204, json!(null));

        let log = Decommissioner::new(&gateway, 30).delete_user("alice").await.unwrap();

        let deletes: Vec<String> = gateway.mutations().into_iter().map(|c| c.endpoint).collect();
        assert_eq!(
            deletes,
            vec![
                "repos/alice/homework",
                "repos/alice/notes",
                "orgs/acme/members/alice",
                "admin/users/alice"
            ]
        );
        assert_eq!(log.failures().count(), 1);
        assert_eq!(
            log.entries().last(),
            Some(&Outcome::UserDeleted {
                username: "alice".into()
            })
        );
    }

    #[tokio::test]
    async fn test_delete_user_attempts_account_even_if_everything_fails() {
        let gateway = alice();

        let log = Decommissioner::new(&gateway, 30).delete_user("alice").await.unwrap();

        assert_eq!(log.len(), 4);
        assert_eq!(log.failures().count(), 4);
        assert!(gateway.mutations().last().unwrap().is(Method::Delete, "admin/users/alice"));
    }

    #[tokio::test]
    async fn test_delete_all_users_keeps_self() {
        let gateway = RecordingGateway::new()
            .on(Method::Get, "user", 200, json!({"id": 1, "login": "root"}))
            .on_list(
                "admin/users",
                json!([
                    {"id": 1, "login": "root"},
                    {"id": 2, "login": "alice"},
                    // same login, different account
                    {"id": 3, "login": "root"}
                ]),
            );

        Decommissioner::new(&gateway, 30).delete_all_users(true).await.unwrap();

        assert_eq!(gateway.count(Method::Delete, "admin/users/alice"), 1);
        assert_eq!(gateway.count(Method::Delete, "admin/users/root"), 1);
    }

    #[tokio::test]
    async fn test_delete_all_users_without_keep_skips_whoami() {
        let gateway = RecordingGateway::new().on_list("admin/users", json!([{"id": 1, "login": "root"}]));

        Decommissioner::new(&gateway, 30).delete_all_users(false).await.unwrap();

        assert_eq!(gateway.count(Method::Get, "user"), 0);
        assert_eq!(gateway.count(Method::Delete, "admin/users/root"), 1);
    }

    #[tokio::test]
    async fn test_delete_organization_only_owned_repos() {
        let gateway = RecordingGateway::new()
            .on(Method::Get, "orgs/acme", 200, json!({"id": 9}))
            .on_list(
                "orgs/acme/repos",
                json!([
                    {"id": 1, "name": "course", "owner": {"login": "acme"}},
                    {"id": 2, "name": "mirror", "owner": {"login": "other"}}
                ]),
            )
            .on(Method::Delete, "repos/acme/course", 204, json!(null))
            .on(Method::Delete, "orgs/acme", 204, json!(null));

        let log = Decommissioner::new(&gateway, 30)
            .delete_organization("acme")
            .await
            .unwrap();

        assert!(!log.has_failures());
        assert_eq!(gateway.mutations().len(), 2);
        assert!(gateway.mutations()[1].is(Method::Delete, "orgs/acme"));
    }

    #[tokio::test]
    async fn test_delete_missing_organization() {
        let gateway = RecordingGateway::new();
        let result = Decommissioner::new(&gateway, 30).delete_organization("ghost").await;

        assert!(matches!(result, Err(AdminError::OrganizationNotFound(_))));
        assert!(gateway.mutations().is_empty());
    }

    fn org_with_teams() -> RecordingGateway {
        RecordingGateway::new()
            .on(Method::Get, "orgs/acme", 200, json!({"id": 9}))
            .on_list(
                "orgs/acme/teams",
                json!([
                    {"id": 1, "name": "Owners"},
                    {"id": 2, "name": "Group A"},
                    {"id": 3, "name": "Group B"}
                ]),
            )
            .on(Method::Delete, "teams/1", 204, json!(null))
            .on(Method::Delete, "teams/2", 204, json!(null))
            .on(Method::Delete, "teams/3", 204, json!(null))
    }

    #[tokio::test]
    async fn test_delete_all_teams_keeps_owners() {
        let gateway = org_with_teams();

        let log = Decommissioner::new(&gateway, 30)
            .delete_all_teams("acme", true)
            .await
            .unwrap();

        assert_eq!(log.len(), 2);
        assert_eq!(gateway.count(Method::Delete, "teams/1"), 0);
    }

    #[tokio::test]
    async fn test_delete_all_teams_including_owners() {
        let gateway = org_with_teams();

        Decommissioner::new(&gateway, 30)
            .delete_all_teams("acme", false)
            .await
            .unwrap();

        assert_eq!(gateway.count(Method::Delete, "teams/1"), 1);
        assert_eq!(gateway.mutations().len(), 3);
    }

    #[tokio::test]
    async fn test_ambiguous_team_deletes_nothing() {
        let gateway = RecordingGateway::new().on_list(
            "orgs/acme/teams",
            json!([{"id": 2, "name": "Group A"}, {"id": 5, "name": "Group A"}]),
        );

        let result = Decommissioner::new(&gateway, 30)
            .delete_team_and_members("acme", "Group A", false)
            .await;

        assert!(matches!(result, Err(AdminError::AmbiguousTeam { count: 2, .. })));
        assert!(gateway.mutations().is_empty());
    }

    #[tokio::test]
    async fn test_dry_run_lists_sorted_members_without_mutating() {
        let gateway = RecordingGateway::new()
            .on_list("orgs/acme/teams", json!([{"id": 2, "name": "Group A"}]))
            .on_list(
                "teams/2/members",
                json!([{"id": 7, "login": "zoe"}, {"id": 8, "login": "adam"}]),
            );

        let teardown = Decommissioner::new(&gateway, 30)
            .delete_team_and_members("acme", "Group A", true)
            .await
            .unwrap();

        assert_eq!(
            teardown,
            TeamTeardown::Planned {
                team: "Group A".into(),
                members: vec!["adam".into(), "zoe".into()]
            }
        );
        assert!(gateway.mutations().is_empty());
    }

    #[tokio::test]
    async fn test_team_teardown_deletes_members_then_team() {
        let gateway = RecordingGateway::new()
            .on_list("orgs/acme/teams", json!([{"id": 2, "name": "Group A"}]))
            .on_list("teams/2/members", json!([{"id": 7, "login": "zoe"}]))
            .on(Method::Delete, "admin/users/zoe", 204, json!(null))
            .on(Method::Delete, "teams/2", 204, json!(null));

        let teardown = Decommissioner::new(&gateway, 30)
            .delete_team_and_members("acme", "Group A", false)
            .await
            .unwrap();

        let TeamTeardown::Executed(log) = teardown else {
            panic!("expected an executed teardown");
        };
        assert!(!log.has_failures());
        let mutations = gateway.mutations();
        assert!(mutations[0].is(Method::Delete, "admin/users/zoe"));
        assert!(mutations[1].is(Method::Delete, "teams/2"));
    }
}
