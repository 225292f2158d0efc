use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter};

/// Everything either strategy may read. Each strategy only looks at its own
/// fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankMetrics {
    pub total_stars: u64,
    pub total_forks: u64,
    pub followers: u64,
    pub public_repos: u64,
    pub account_age_years: f64,
    pub commits: u64,
    pub merged_prs: u64,
    pub issues: u64,
    pub reviews: u64,
}

/// Grades an account from its metrics. [`WeightedLogScale`] sums log-scaled
/// metrics onto an 11-step scale, [`CdfPercentile`] estimates a percentile
/// onto a 14-step scale. The two scales never share grades.
pub trait RankStrategy {
    type Output: Serialize;

    const NAME: &'static str;

    fn rank(&self, metrics: &RankMetrics) -> Self::Output;
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr, EnumIter,
)]
pub enum WeightedGrade {
    S,
    #[serde(rename = "A+")]
    #[strum(serialize = "A+")]
    APlus,
    A,
    #[serde(rename = "A-")]
    #[strum(serialize = "A-")]
    AMinus,
    #[serde(rename = "B+")]
    #[strum(serialize = "B+")]
    BPlus,
    B,
    #[serde(rename = "B-")]
    #[strum(serialize = "B-")]
    BMinus,
    #[serde(rename = "C+")]
    #[strum(serialize = "C+")]
    CPlus,
    C,
    #[serde(rename = "C-")]
    #[strum(serialize = "C-")]
    CMinus,
    D,
}

/// Inclusive lower bounds of the total score, best grade first.
pub const WEIGHTED_GRADES: &[(f64, WeightedGrade)] = &[
    (85.0, WeightedGrade::S),
    (75.0, WeightedGrade::APlus),
    (65.0, WeightedGrade::A),
    (55.0, WeightedGrade::AMinus),
    (45.0, WeightedGrade::BPlus),
    (38.0, WeightedGrade::B),
    (30.0, WeightedGrade::BMinus),
    (22.0, WeightedGrade::CPlus),
    (15.0, WeightedGrade::C),
    (8.0, WeightedGrade::CMinus),
];

impl WeightedGrade {
    pub fn from_score(score: f64) -> Self {
        WEIGHTED_GRADES
            .iter()
            .find(|(threshold, _)| score >= *threshold)
            .map(|(_, grade)| *grade)
            .unwrap_or(Self::D)
    }

    pub const fn color(self) -> &'static str {
        match self {
            Self::S => "#FFD700",
            Self::APlus => "#C0C0C0",
            Self::A => "#CD7F32",
            Self::AMinus => "#98FB98",
            Self::BPlus => "#87CEEB",
            Self::B => "#DDA0DD",
            Self::BMinus => "#F0E68C",
            Self::CPlus => "#D3D3D3",
            Self::C => "#A9A9A9",
            Self::CMinus => "#808080",
            Self::D => "#696969",
        }
    }
}

/// `min(cap, log10(value + 1) * multiplier)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogComponent {
    pub multiplier: f64,
    pub cap: f64,
}

impl LogComponent {
    pub fn score(&self, value: u64) -> f64 {
        ((value as f64 + 1.0).log10() * self.multiplier).min(self.cap)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedLogScale {
    pub followers: LogComponent,
    pub repos: LogComponent,
    pub stars: LogComponent,
    pub forks: LogComponent,
    pub age_per_year: f64,
    pub age_cap: f64,
}

pub const WEIGHTED_LOG_SCALE: WeightedLogScale = WeightedLogScale {
    followers: LogComponent {
        multiplier: 10.0,
        cap: 30.0,
    },
    repos: LogComponent {
        multiplier: 7.0,
        cap: 15.0,
    },
    stars: LogComponent {
        multiplier: 8.0,
        cap: 30.0,
    },
    forks: LogComponent {
        multiplier: 6.0,
        cap: 15.0,
    },
    age_per_year: 1.5,
    age_cap: 10.0,
};

impl Default for WeightedLogScale {
    fn default() -> Self {
        WEIGHTED_LOG_SCALE
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightedBreakdown {
    pub followers: u32,
    pub repos: u32,
    pub stars: u32,
    pub forks: u32,
    pub account_age: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightedRank {
    pub grade: WeightedGrade,
    pub score: u32,
    pub breakdown: WeightedBreakdown,
}

fn round(value: f64) -> u32 {
    value.max(0.0).round() as u32
}

impl WeightedLogScale {
    pub fn age_score(&self, years: f64) -> f64 {
        (years.max(0.0) * self.age_per_year).min(self.age_cap)
    }
}

impl RankStrategy for WeightedLogScale {
    type Output = WeightedRank;

    const NAME: &'static str = "weighted";

    fn rank(&self, metrics: &RankMetrics) -> WeightedRank {
        let followers = self.followers.score(metrics.followers);
        let repos = self.repos.score(metrics.public_repos);
        let stars = self.stars.score(metrics.total_stars);
        let forks = self.forks.score(metrics.total_forks);
        let account_age = self.age_score(metrics.account_age_years);
        let total = followers + repos + stars + forks + account_age;

        WeightedRank {
            grade: WeightedGrade::from_score(total),
            score: round(total),
            breakdown: WeightedBreakdown {
                followers: round(followers),
                repos: round(repos),
                stars: round(stars),
                forks: round(forks),
                account_age: round(account_age),
            },
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr, EnumIter,
)]
pub enum PercentileGrade {
    S,
    #[serde(rename = "A+++")]
    #[strum(serialize = "A+++")]
    APlusPlusPlus,
    #[serde(rename = "A++")]
    #[strum(serialize = "A++")]
    APlusPlus,
    #[serde(rename = "A+")]
    #[strum(serialize = "A+")]
    APlus,
    A,
    #[serde(rename = "B+++")]
    #[strum(serialize = "B+++")]
    BPlusPlusPlus,
    #[serde(rename = "B++")]
    #[strum(serialize = "B++")]
    BPlusPlus,
    #[serde(rename = "B+")]
    #[strum(serialize = "B+")]
    BPlus,
    B,
    #[serde(rename = "C+++")]
    #[strum(serialize = "C+++")]
    CPlusPlusPlus,
    #[serde(rename = "C++")]
    #[strum(serialize = "C++")]
    CPlusPlus,
    #[serde(rename = "C+")]
    #[strum(serialize = "C+")]
    CPlus,
    C,
    D,
}

/// Inclusive upper bounds of the percentile, best grade first.
pub const PERCENTILE_GRADES: &[(f64, PercentileGrade)] = &[
    (1.0, PercentileGrade::S),
    (3.0, PercentileGrade::APlusPlusPlus),
    (7.0, PercentileGrade::APlusPlus),
    (12.0, PercentileGrade::APlus),
    (20.0, PercentileGrade::A),
    (28.0, PercentileGrade::BPlusPlusPlus),
    (36.0, PercentileGrade::BPlusPlus),
    (44.0, PercentileGrade::BPlus),
    (55.0, PercentileGrade::B),
    (65.0, PercentileGrade::CPlusPlusPlus),
    (75.0, PercentileGrade::CPlusPlus),
    (85.0, PercentileGrade::CPlus),
    (95.0, PercentileGrade::C),
];

impl PercentileGrade {
    pub fn from_percentile(percentile: f64) -> Self {
        PERCENTILE_GRADES
            .iter()
            .find(|(threshold, _)| percentile <= *threshold)
            .map(|(_, grade)| *grade)
            .unwrap_or(Self::D)
    }

    pub const fn color(self) -> &'static str {
        match self {
            Self::S => "#FFD700",
            Self::APlusPlusPlus | Self::APlusPlus => "#C0C0C0",
            Self::APlus | Self::A => "#CD7F32",
            Self::BPlusPlusPlus | Self::BPlusPlus => "#87CEEB",
            Self::BPlus | Self::B => "#DDA0DD",
            Self::CPlusPlusPlus | Self::CPlusPlus => "#D3D3D3",
            Self::CPlus | Self::C => "#A9A9A9",
            Self::D => "#696969",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cdf {
    /// `1 - 2^-x`, saturates quickly. Used for effort metrics.
    Exponential,
    /// `x / (1 + x)`. Used for popularity metrics.
    LogNormal,
}

impl Cdf {
    pub fn apply(self, x: f64) -> f64 {
        match self {
            Self::Exponential => 1.0 - 2f64.powf(-x),
            Self::LogNormal => x / (1.0 + x),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PercentileMetric {
    pub median: f64,
    pub weight: f64,
    pub cdf: Cdf,
}

impl PercentileMetric {
    pub fn weighted(&self, value: u64) -> f64 {
        self.weight * self.cdf.apply(value as f64 / self.median)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CdfPercentile {
    pub commits: PercentileMetric,
    pub merged_prs: PercentileMetric,
    pub issues: PercentileMetric,
    pub reviews: PercentileMetric,
    pub stars: PercentileMetric,
    pub followers: PercentileMetric,
}

pub const CDF_PERCENTILE: CdfPercentile = CdfPercentile {
    commits: PercentileMetric {
        median: 1000.0,
        weight: 2.0,
        cdf: Cdf::Exponential,
    },
    merged_prs: PercentileMetric {
        median: 50.0,
        weight: 3.0,
        cdf: Cdf::Exponential,
    },
    issues: PercentileMetric {
        median: 25.0,
        weight: 1.0,
        cdf: Cdf::Exponential,
    },
    reviews: PercentileMetric {
        median: 10.0,
        weight: 1.0,
        cdf: Cdf::Exponential,
    },
    stars: PercentileMetric {
        median: 50.0,
        weight: 4.0,
        cdf: Cdf::LogNormal,
    },
    followers: PercentileMetric {
        median: 20.0,
        weight: 1.0,
        cdf: Cdf::LogNormal,
    },
};

/// Keeps the best possible percentile away from a literal zero.
pub const MIN_PERCENTILE: f64 = 0.01;

impl Default for CdfPercentile {
    fn default() -> Self {
        CDF_PERCENTILE
    }
}

impl CdfPercentile {
    pub fn total_weight(&self) -> f64 {
        self.commits.weight
            + self.merged_prs.weight
            + self.issues.weight
            + self.reviews.weight
            + self.stars.weight
            + self.followers.weight
    }

    pub fn weighted_sum(&self, metrics: &RankMetrics) -> f64 {
        self.commits.weighted(metrics.commits)
            + self.merged_prs.weighted(metrics.merged_prs)
            + self.issues.weighted(metrics.issues)
            + self.reviews.weighted(metrics.reviews)
            + self.stars.weighted(metrics.total_stars)
            + self.followers.weighted(metrics.followers)
    }

    /// 0 is the top of the population, 100 the bottom.
    pub fn percentile(&self, metrics: &RankMetrics) -> f64 {
        let share = self.weighted_sum(metrics) / self.total_weight();
        ((1.0 - share) * 100.0).max(MIN_PERCENTILE)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PercentileBreakdown {
    pub stars: u64,
    pub commits: u64,
    pub prs: u64,
    pub issues: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentileRank {
    pub grade: PercentileGrade,
    pub percentile: f64,
    pub score: u32,
    pub breakdown: PercentileBreakdown,
}

impl RankStrategy for CdfPercentile {
    type Output = PercentileRank;

    const NAME: &'static str = "percentile";

    fn rank(&self, metrics: &RankMetrics) -> PercentileRank {
        let percentile = self.percentile(metrics);

        PercentileRank {
            grade: PercentileGrade::from_percentile(percentile),
            percentile,
            score: round(100.0 - percentile),
            breakdown: PercentileBreakdown {
                stars: metrics.total_stars,
                commits: metrics.commits,
                prs: metrics.merged_prs,
                issues: metrics.issues,
            },
        }
    }
}
