//! Team compliance reports
//!
//! A report joins the members of one team against the forks of, or the pull
//! requests to, a repository. Every member appears exactly once, either with
//! the activity found for them or as missing. Activity by non-members is
//! ignored. When a member authored several items, the one listed last by
//! the server wins.

use std::collections::HashMap;
use std::fmt::Write as _;

use chrono::DateTime;
use chrono_tz::Tz;
use tracing::{debug, instrument};

use crate::error::AdminResult;
use crate::gateway::Gateway;
use crate::lookup::{resolve_team, team_member_logins};
use crate::paginate::Paginator;
use crate::types::{PullRequest, Repository};

/// Timestamp layout used in fork reports
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Kind of activity a report looks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    Fork,
    PullRequest,
}

impl ActivityKind {
    fn plural(self) -> &'static str {
        match self {
            ActivityKind::Fork => "forks",
            ActivityKind::PullRequest => "pull requests",
        }
    }
}

/// A matched activity item
#[derive(Debug, Clone)]
pub enum Activity {
    Fork(Repository),
    PullRequest(PullRequest),
}

impl Activity {
    pub fn html_url(&self) -> &str {
        match self {
            Activity::Fork(fork) => &fork.html_url,
            Activity::PullRequest(pr) => &pr.html_url,
        }
    }
}

/// Whether a member has the activity the report looks for
#[derive(Debug, Clone)]
pub enum Compliance {
    Matched(Activity),
    Missing,
}

/// One row per team member
#[derive(Debug, Clone)]
pub struct MemberCompliance {
    pub username: String,
    pub compliance: Compliance,
}

impl MemberCompliance {
    pub fn is_compliant(&self) -> bool {
        matches!(self.compliance, Compliance::Matched(_))
    }
}

/// Compliance of a team for one repository
#[derive(Debug, Clone)]
pub struct ComplianceReport {
    pub team: String,
    pub kind: ActivityKind,
    /// In team member order
    pub members: Vec<MemberCompliance>,
}

impl ComplianceReport {
    fn build(team: String, kind: ActivityKind, members: Vec<String>, mut matched: HashMap<String, Activity>) -> Self {
        let members = members
            .into_iter()
            .map(|username| {
                let compliance = match matched.remove(&username) {
                    Some(activity) => Compliance::Matched(activity),
                    None => Compliance::Missing,
                };
                MemberCompliance { username, compliance }
            })
            .collect();

        Self { team, kind, members }
    }

    pub fn compliant(&self) -> impl Iterator<Item = &MemberCompliance> {
        self.members.iter().filter(|m| m.is_compliant())
    }

    pub fn missing(&self) -> impl Iterator<Item = &MemberCompliance> {
        self.members.iter().filter(|m| !m.is_compliant())
    }

    pub fn is_complete(&self) -> bool {
        self.missing().next().is_none()
    }

    /// Render the report as a plain-text table followed by a summary
    pub fn render(&self, tz: Tz) -> String {
        let mut out = String::new();

        match self.kind {
            ActivityKind::Fork => {
                let _ = writeln!(out, "{:30} {:17} fork", "username", "updated");
                let _ = writeln!(out, "{:30} {:17} ----", "--------", "-------");
            }
            ActivityKind::PullRequest => {
                let _ = writeln!(out, "{:30} {:10} pull request", "username", "state");
                let _ = writeln!(out, "{:30} {:10} ------------", "--------", "-----");
            }
        }

        for member in self.compliant() {
            if let Compliance::Matched(activity) = &member.compliance {
                let column = match activity {
                    Activity::Fork(fork) => format!(
                        "{:17}",
                        fork.updated_at
                            .as_deref()
                            .map(|raw| local_timestamp(raw, tz))
                            .unwrap_or_default()
                    ),
                    Activity::PullRequest(pr) => {
                        format!("{:10}", pr.state.as_deref().unwrap_or("[unknown]"))
                    }
                };
                let _ = writeln!(out, "{:30} {} {}", member.username, column, activity.html_url());
            }
        }

        for member in self.missing() {
            match self.kind {
                ActivityKind::Fork => {
                    let _ = writeln!(out, "{:30} {:17} -", member.username, "never");
                }
                ActivityKind::PullRequest => {
                    let _ = writeln!(out, "{:30} MISSING", member.username);
                }
            }
        }

        let ok = self.compliant().count();
        let missing = self.missing().count();
        let _ = writeln!(out, "\nSummary:");
        let _ = writeln!(out, "{:2} {} OK", ok, self.kind.plural());
        let _ = writeln!(out, "{:2} {} MISSING", missing, self.kind.plural());
        if missing == 0 {
            let _ = writeln!(out, "The members of {} made their homework!", self.team);
        } else {
            let _ = writeln!(out, "The members of {} have unfinished business!", self.team);
        }
        out
    }
}

/// Convert an RFC 3339 timestamp to `tz`; unparseable input is shown as is
pub fn local_timestamp(raw: &str, tz: Tz) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => dt.with_timezone(&tz).format(TIMESTAMP_FORMAT).to_string(),
        Err(_) => raw.to_string(),
    }
}

/// Index items by author; a later item replaces an earlier one
fn by_author<T>(items: Vec<T>, author: impl Fn(&T) -> &str) -> HashMap<String, T> {
    let mut map = HashMap::with_capacity(items.len());
    for item in items {
        map.insert(author(&item).to_string(), item);
    }
    map
}

pub struct ComplianceReporter<'a> {
    gateway: &'a dyn Gateway,
    page_size: usize,
}

impl<'a> ComplianceReporter<'a> {
    pub fn new(gateway: &'a dyn Gateway, page_size: usize) -> Self {
        Self { gateway, page_size }
    }

    async fn members(&self, org: &str, team: &str) -> AdminResult<(String, Vec<String>)> {
        let resolved = resolve_team(self.gateway, org, team, self.page_size).await?;
        let members = team_member_logins(self.gateway, resolved.id, self.page_size).await?;
        Ok((resolved.name, members))
    }

    /// Which members of `team` forked `org/repo`
    #[instrument(skip(self))]
    pub async fn report_forks(&self, org: &str, repo: &str, team: &str) -> AdminResult<ComplianceReport> {
        let (team, members) = self.members(org, team).await?;

        let forks: Vec<Repository> =
            Paginator::new(self.gateway, format!("repos/{}/{}/forks", org, repo), self.page_size)
                .collect_all()
                .await?;
        debug!(forks = forks.len(), "collected forks");

        let matched = by_author(forks, |f| f.owner.login.as_str())
            .into_iter()
            .map(|(login, fork)| (login, Activity::Fork(fork)))
            .collect();

        Ok(ComplianceReport::build(team, ActivityKind::Fork, members, matched))
    }

    /// Which members of `team` opened a pull request against `org/repo`
    #[instrument(skip(self))]
    pub async fn report_pull_requests(
        &self,
        org: &str,
        repo: &str,
        team: &str,
    ) -> AdminResult<ComplianceReport> {
        let (team, members) = self.members(org, team).await?;

        let pulls: Vec<PullRequest> =
            Paginator::new(self.gateway, format!("repos/{}/{}/pulls", org, repo), self.page_size)
                .with_query("state", "all")
                .with_query("sort", "recentupdate")
                .collect_all()
                .await?;
        debug!(pulls = pulls.len(), "collected pull requests");

        // Latest per author first, then restricted to the queried base repo.
        let matched = by_author(pulls, |p| p.user.login.as_str())
            .into_iter()
            .filter(|(_, pr)| pr.base_repo_name() == Some(repo))
            .map(|(login, pr)| (login, Activity::PullRequest(pr)))
            .collect();

        Ok(ComplianceReport::build(team, ActivityKind::PullRequest, members, matched))
    }
}
