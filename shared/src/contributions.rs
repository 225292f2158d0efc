use std::ops::Add;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Contributions recorded on exactly one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionDay {
    pub date: NaiveDate,
    #[serde(alias = "contributionCount")]
    pub count: u32,
}

impl ContributionDay {
    pub const fn new(date: NaiveDate, count: u32) -> Self {
        Self { date, count }
    }

    /// Heatmap intensity bucket in `0..=4`.
    pub const fn level(&self) -> u8 {
        match self.count {
            0 => 0,
            1..=2 => 1,
            3..=5 => 2,
            6..=10 => 3,
            _ => 4,
        }
    }
}

fn zero_if_null<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u64>::deserialize(deserializer)?.unwrap_or_default())
}

/// All-time contribution counters. Missing or null fields read as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AggregateStats {
    #[serde(deserialize_with = "zero_if_null")]
    pub total_commit_contributions: u64,
    #[serde(deserialize_with = "zero_if_null")]
    pub total_pull_request_review_contributions: u64,
    #[serde(deserialize_with = "zero_if_null")]
    pub total_issue_contributions: u64,
    #[serde(deserialize_with = "zero_if_null")]
    pub total_repository_contributions: u64,
    #[serde(deserialize_with = "zero_if_null")]
    pub restricted_contributions_count: u64,
}

impl AggregateStats {
    pub fn total(&self) -> u64 {
        self.total_commit_contributions
            + self.total_pull_request_review_contributions
            + self.total_issue_contributions
            + self.total_repository_contributions
            + self.restricted_contributions_count
    }
}

impl Add for AggregateStats {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            total_commit_contributions: self.total_commit_contributions
                + other.total_commit_contributions,
            total_pull_request_review_contributions: self.total_pull_request_review_contributions
                + other.total_pull_request_review_contributions,
            total_issue_contributions: self.total_issue_contributions
                + other.total_issue_contributions,
            total_repository_contributions: self.total_repository_contributions
                + other.total_repository_contributions,
            restricted_contributions_count: self.restricted_contributions_count
                + other.restricted_contributions_count,
        }
    }
}

/// Daily contribution activity ordered by date, at most one entry per day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContributionSeries {
    days: Vec<ContributionDay>,
}

impl ContributionSeries {
    pub fn new(mut days: Vec<ContributionDay>) -> Self {
        days.sort_by_key(|day| day.date);
        days.dedup_by_key(|day| day.date);
        Self { days }
    }

    /// Flattens the calendar-week layout (a list of weeks, each holding up to
    /// seven days) into a single series.
    pub fn from_weeks<W>(weeks: impl IntoIterator<Item = W>) -> Self
    where
        W: IntoIterator<Item = ContributionDay>,
    {
        Self::new(weeks.into_iter().flatten().collect())
    }

    pub fn days(&self) -> &[ContributionDay] {
        &self.days
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn into_inner(self) -> Vec<ContributionDay> {
        self.days
    }
}

/// A contribution window as fetched from upstream: the daily series together
/// with the counters accumulated over the same window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionHistory {
    pub contribution_days: ContributionSeries,
    pub stats: AggregateStats,
}

impl ContributionHistory {
    pub fn new(contribution_days: ContributionSeries, stats: AggregateStats) -> Self {
        Self {
            contribution_days,
            stats,
        }
    }

    /// Combines two windows: counters are summed, days are concatenated and
    /// re-sorted. When both windows report the same date the entry of `self`
    /// is kept.
    pub fn merge(self, other: Self) -> Self {
        let mut days = self.contribution_days.into_inner();
        days.extend(other.contribution_days.into_inner());
        Self {
            contribution_days: ContributionSeries::new(days),
            stats: self.stats + other.stats,
        }
    }
}

impl FromIterator<ContributionHistory> for ContributionHistory {
    fn from_iter<I: IntoIterator<Item = ContributionHistory>>(iter: I) -> Self {
        iter.into_iter()
            .reduce(ContributionHistory::merge)
            .unwrap_or_default()
    }
}
