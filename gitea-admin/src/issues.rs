//! One issue per team member

use chrono::NaiveDate;
use tracing::instrument;

use crate::error::AdminResult;
use crate::gateway::{payload, Gateway};
use crate::lookup::{resolve_team, team_member_logins};
use crate::outcome::{Outcome, OutcomeLog};
use crate::types::{CreateIssueOption, Issue};

/// Issue template sent to every member
#[derive(Debug, Clone)]
pub struct IssueTemplate {
    pub title: String,
    pub body: String,
    pub due: Option<NaiveDate>,
}

/// Due dates are midnight UTC of the given day
pub fn format_due_date(due: NaiveDate) -> String {
    due.format("%Y-%m-%dT00:00:00Z").to_string()
}

pub struct IssueBroadcaster<'a> {
    gateway: &'a dyn Gateway,
    page_size: usize,
}

impl<'a> IssueBroadcaster<'a> {
    pub fn new(gateway: &'a dyn Gateway, page_size: usize) -> Self {
        Self { gateway, page_size }
    }

    /// Create an issue in `owner/repo` for each member of `team`, assigned
    /// to that member
    #[instrument(skip(self, template), fields(title = %template.title))]
    pub async fn create_issues(
        &self,
        owner: &str,
        repo: &str,
        team: &str,
        template: &IssueTemplate,
    ) -> AdminResult<OutcomeLog> {
        let resolved = resolve_team(self.gateway, owner, team, self.page_size).await?;
        let members = team_member_logins(self.gateway, resolved.id, self.page_size).await?;

        let endpoint = format!("repos/{}/{}/issues", owner, repo);
        let mut log = OutcomeLog::new();
        for member in members {
            let option = CreateIssueOption {
                title: template.title.clone(),
                body: template.body.clone(),
                assignees: vec![member.clone()],
                due_date: template.due.map(format_due_date),
            };

            let response = self.gateway.post(&endpoint, &payload(&option)?).await?;
            if response.status == 201 {
                let issue: Issue = response.json(&endpoint)?;
                log.record(Outcome::IssueCreated {
                    username: member,
                    number: issue.number,
                    url: issue.html_url,
                });
            } else {
                log.record(Outcome::IssueCreationFailed {
                    username: member,
                    status: response.status,
                });
            }
        }
        Ok(log)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::testing::RecordingGateway;
    use crate::gateway::Method;
    use serde_json::json;

    fn gateway() -> RecordingGateway {
        RecordingGateway::new()
            .on_list("orgs/acme/teams", json!([{"id": 4, "name": "Group A"}]))
            .on_list(
                "teams/4/members",
                json!([{"id": 1, "login": "alice"}, {"id": 2, "login": "bob"}]),
            )
    }

    #[tokio::test]
    async fn test_one_issue_per_member() {
        let gateway = gateway()
            .on(
                Method::Post,
                "repos/acme/exercise/issues",
                201,
                json!({"number": 11, "html_url": "https://git.example.org/acme/exercise/issues/11"}),
            )
            .on(Method::Post, "repos/acme/exercise/issues", 422, json!({"message": "no such assignee"}));

        let template = IssueTemplate {
            title: "Submit exercise 1".into(),
            body: "Please fork and open a pull request.".into(),
            due: NaiveDate::from_ymd_opt(2024, 5, 31),
        };

        let log = IssueBroadcaster::new(&gateway, 30)
            .create_issues("acme", "exercise", "Group A", &template)
            .await
            .unwrap();

        assert_eq!(
            log.entries(),
            &[
                Outcome::IssueCreated {
                    username: "alice".into(),
                    number: 11,
                    url: "https://git.example.org/acme/exercise/issues/11".into()
                },
                Outcome::IssueCreationFailed {
                    username: "bob".into(),
                    status: 422
                }
            ]
        );

        let body = gateway.mutations()[0].body.clone().unwrap();
        assert_eq!(body["assignees"], json!(["alice"]));
        assert_eq!(body["due_date"], "2024-05-31T00:00:00Z");
    }

    #[tokio::test]
    async fn test_due_date_is_optional() {
        let gateway = gateway().on(Method::Post, "repos/acme/exercise/issues", 201, json!({"number": 1}));

        let template = IssueTemplate {
            title: "t".into(),
            body: "b".into(),
            due: None,
        };
        IssueBroadcaster::new(&gateway, 30)
            .create_issues("acme", "exercise", "Group A", &template)
            .await
            .unwrap();

        let body = gateway.mutations()[0].body.clone().unwrap();
        assert!(body.get("due_date").is_none());
    }
}
