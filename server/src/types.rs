use chrono::{DateTime, NaiveDate, Utc};
use itertools::Itertools;
use rocket::FromFormField;
use serde::{Deserialize, Serialize};
use shared::{
    CdfPercentile, ContributionDay, PercentileRank, RankMetrics, RankStrategy, StreakStats,
    Trophy, TrophyEngine, WeightedLogScale, WeightedRank,
};
use utoipa::ToSchema;

use crate::api::github::{ProfileData, RepositoryNode};

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub login: String,
    pub name: Option<String>,
    pub avatar_url: String,
    pub bio: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub website_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub followers: u64,
    pub public_repos: u64,
    pub public_gists: u64,
    pub total_stars: u64,
    pub total_forks: u64,
    pub merged_prs: u64,
    pub account_age_years: f64,
}

impl ProfileResponse {
    pub fn new(profile: &ProfileData, now: DateTime<Utc>) -> Self {
        let user = &profile.user;
        Self {
            login: user.login.clone(),
            name: user.name.clone(),
            avatar_url: user.avatar_url.clone(),
            bio: user.bio.clone(),
            company: user.company.clone(),
            location: user.location.clone(),
            website_url: user.website_url.clone(),
            created_at: user.created_at,
            followers: user.followers.total_count,
            public_repos: user.repositories.total_count,
            public_gists: user.public_gists.total_count,
            total_stars: profile.total_stars(),
            total_forks: profile.total_forks(),
            merged_prs: user.merged_prs.total_count,
            account_age_years: profile.account_age_years(now),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ContributionDayResponse {
    pub date: NaiveDate,
    pub count: u32,
    /// Heatmap bucket in `0..=4`.
    pub level: u8,
}

impl From<&ContributionDay> for ContributionDayResponse {
    fn from(day: &ContributionDay) -> Self {
        Self {
            date: day.date,
            count: day.count,
            level: day.level(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct LanguageShare {
    pub name: String,
    pub repositories: usize,
    /// Share of repositories with a detected language, in percent.
    pub percentage: f64,
}

impl LanguageShare {
    pub fn from_counts(counts: Vec<(String, usize)>) -> Vec<Self> {
        let total: usize = counts.iter().map(|(_, count)| count).sum();
        counts
            .into_iter()
            .map(|(name, repositories)| Self {
                name,
                repositories,
                percentage: if total == 0 {
                    0.0
                } else {
                    repositories as f64 * 100.0 / total as f64
                },
            })
            .collect()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryResponse {
    pub name: String,
    pub stargazer_count: u64,
    pub fork_count: u64,
    pub language: Option<String>,
}

impl From<&RepositoryNode> for RepositoryResponse {
    fn from(repository: &RepositoryNode) -> Self {
        Self {
            name: repository.name.clone(),
            stargazer_count: repository.stargazer_count,
            fork_count: repository.fork_count,
            language: repository
                .primary_language
                .as_ref()
                .map(|language| language.name.clone()),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DataResponse {
    pub profile: ProfileResponse,
    /// Most starred first.
    pub repositories: Vec<RepositoryResponse>,
    pub languages: Vec<LanguageShare>,
    pub contributions: Vec<ContributionDayResponse>,
    #[schema(value_type = Object)]
    pub streaks: StreakStats,
    #[schema(value_type = Vec<Object>)]
    pub trophies: Vec<Trophy>,
    pub ranks: RanksResponse,
}

/// Both rank strategies evaluated on the same metrics.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct RanksResponse {
    #[schema(value_type = Object)]
    pub weighted: WeightedRank,
    #[schema(value_type = Object)]
    pub percentile: PercentileRank,
}

impl DataResponse {
    pub fn new(profile: &ProfileData, streaks: StreakStats, now: DateTime<Utc>) -> Self {
        let metrics = profile.rank_metrics(now);

        Self {
            profile: ProfileResponse::new(profile, now),
            repositories: profile
                .repositories
                .iter()
                .map(RepositoryResponse::from)
                .sorted_by(|a, b| b.stargazer_count.cmp(&a.stargazer_count))
                .collect(),
            languages: LanguageShare::from_counts(profile.language_counts()),
            contributions: profile
                .contributions
                .contribution_days
                .days()
                .iter()
                .map(Into::into)
                .collect(),
            streaks,
            trophies: TrophyEngine::default().evaluate(&profile.trophy_metrics(now)),
            ranks: RanksResponse {
                weighted: WeightedLogScale::default().rank(&metrics),
                percentile: CdfPercentile::default().rank(&metrics),
            },
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BadgesResponse {
    pub username: String,
    #[schema(value_type = Vec<Object>)]
    pub trophies: Vec<Trophy>,
}

/// Rank strategy selected with the `strategy` query parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, FromFormField, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RankKind {
    #[default]
    Weighted,
    Percentile,
}

impl RankKind {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Weighted => WeightedLogScale::NAME,
            Self::Percentile => CdfPercentile::NAME,
        }
    }

    pub fn evaluate(self, metrics: &RankMetrics) -> RankResult {
        match self {
            Self::Weighted => RankResult::Weighted(WeightedLogScale::default().rank(metrics)),
            Self::Percentile => RankResult::Percentile(CdfPercentile::default().rank(metrics)),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(untagged)]
pub enum RankResult {
    Weighted(WeightedRank),
    Percentile(PercentileRank),
}

#[derive(Clone, Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RankResponse {
    pub username: String,
    pub strategy: String,
    #[schema(value_type = Object)]
    pub rank: RankResult,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StreaksResponse {
    pub username: String,
    #[schema(value_type = Object)]
    pub streaks: StreakStats,
}
