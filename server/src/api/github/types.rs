use chrono::{DateTime, Utc};
use itertools::Itertools;
use serde::Deserialize;
use shared::{
    calendar, AggregateStats, ContributionDay, ContributionHistory, ContributionSeries,
    RankMetrics, StreakAnalyzer, StreakStats, TrophyMetrics,
};

#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlError {
    pub message: String,
    #[serde(rename = "type")]
    pub error_type: Option<String>,
}

impl GraphQlError {
    pub fn is_not_found(&self) -> bool {
        self.error_type.as_deref() == Some("NOT_FOUND")
    }
}

#[derive(Debug, Deserialize)]
pub struct UserQuery<T> {
    pub user: Option<T>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Countable {
    pub total_count: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionYears {
    #[serde(default)]
    pub contribution_years: Vec<i32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserNode {
    pub login: String,
    pub name: Option<String>,
    pub avatar_url: String,
    pub bio: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub website_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub followers: Countable,
    pub public_gists: Countable,
    pub merged_prs: Countable,
    pub repositories: Countable,
    pub contributions_collection: ContributionYears,
}

impl UserNode {
    pub fn is_profile_complete(&self) -> bool {
        [&self.bio, &self.website_url, &self.location, &self.company]
            .iter()
            .all(|field| field.as_deref().is_some_and(|value| !value.trim().is_empty()))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next_page: bool,
    pub end_cursor: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Language {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryNode {
    pub name: String,
    pub stargazer_count: u64,
    pub fork_count: u64,
    pub primary_language: Option<Language>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryConnection {
    pub page_info: PageInfo,
    #[serde(default)]
    pub nodes: Vec<RepositoryNode>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RepositoriesNode {
    pub repositories: RepositoryConnection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Week {
    pub contribution_days: Vec<ContributionDay>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContributionCalendar {
    pub weeks: Vec<Week>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionsCollection {
    #[serde(flatten)]
    pub stats: AggregateStats,
    pub contribution_calendar: ContributionCalendar,
}

impl From<ContributionsCollection> for ContributionHistory {
    fn from(collection: ContributionsCollection) -> Self {
        let series = ContributionSeries::from_weeks(
            collection
                .contribution_calendar
                .weeks
                .into_iter()
                .map(|week| week.contribution_days),
        );
        ContributionHistory::new(series, collection.stats)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionsNode {
    pub contributions_collection: ContributionsCollection,
}

/// Everything the dashboard knows about one account, merged from all queries.
#[derive(Debug, Clone)]
pub struct ProfileData {
    pub user: UserNode,
    pub repositories: Vec<RepositoryNode>,
    pub contributions: ContributionHistory,
}

impl ProfileData {
    pub fn total_stars(&self) -> u64 {
        self.repositories.iter().map(|r| r.stargazer_count).sum()
    }

    pub fn total_forks(&self) -> u64 {
        self.repositories.iter().map(|r| r.fork_count).sum()
    }

    /// Primary languages by number of repositories, most used first.
    pub fn language_counts(&self) -> Vec<(String, usize)> {
        self.repositories
            .iter()
            .filter_map(|repo| repo.primary_language.as_ref())
            .map(|language| language.name.clone())
            .counts()
            .into_iter()
            .sorted_by(|(a_name, a), (b_name, b)| b.cmp(a).then_with(|| a_name.cmp(b_name)))
            .collect()
    }

    pub fn account_age_years(&self, now: DateTime<Utc>) -> f64 {
        calendar::account_age_years(self.user.created_at, now)
    }

    pub fn trophy_metrics(&self, now: DateTime<Utc>) -> TrophyMetrics {
        TrophyMetrics {
            all_time_commits: self.contributions.stats.total_commit_contributions,
            total_stars: self.total_stars(),
            followers: self.user.followers.total_count,
            merged_prs: self.user.merged_prs.total_count,
            languages: self.language_counts().len() as u64,
            account_age_years: self.account_age_years(now),
            public_gists: self.user.public_gists.total_count,
            profile_complete: self.user.is_profile_complete(),
        }
    }

    pub fn rank_metrics(&self, now: DateTime<Utc>) -> RankMetrics {
        let stats = &self.contributions.stats;
        RankMetrics {
            total_stars: self.total_stars(),
            total_forks: self.total_forks(),
            followers: self.user.followers.total_count,
            public_repos: self.user.repositories.total_count,
            account_age_years: self.account_age_years(now),
            commits: stats.total_commit_contributions,
            merged_prs: self.user.merged_prs.total_count,
            issues: stats.total_issue_contributions,
            reviews: stats.total_pull_request_review_contributions,
        }
    }

    pub fn streaks(&self, analyzer: &StreakAnalyzer) -> StreakStats {
        analyzer.analyze(
            self.contributions.contribution_days.days(),
            &self.contributions.stats,
        )
    }
}
