use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter};

#[allow(clippy::upper_case_acronyms)]
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    AsRefStr,
    EnumIter,
)]
pub enum TrophyTier {
    S,
    AAA,
    AA,
    A,
    B,
    C,
    #[serde(rename = "SECRET")]
    #[strum(serialize = "SECRET")]
    Secret,
}

impl TrophyTier {
    /// Sort key, 0 is the best tier. Secret trophies always come last.
    pub const fn rank(self) -> u8 {
        match self {
            Self::S => 0,
            Self::AAA => 1,
            Self::AA => 2,
            Self::A => 3,
            Self::B => 4,
            Self::C => 5,
            Self::Secret => 6,
        }
    }

    pub const fn color(self) -> &'static str {
        match self {
            Self::S => "#FFD700",
            Self::AAA => "#F5F5F5",
            Self::AA => "#FFA726",
            Self::A => "#00E676",
            Self::B => "#2979FF",
            Self::C => "#78909C",
            Self::Secret => "#FF00E4",
        }
    }

    /// Number of stars drawn on a trophy card.
    pub const fn stars(self) -> u8 {
        match self {
            Self::S | Self::Secret => 5,
            Self::AAA => 4,
            Self::AA => 3,
            Self::A => 2,
            Self::B | Self::C => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum TrophyCategory {
    Commits,
    Stars,
    Followers,
    #[strum(serialize = "prs")]
    MergedPrs,
    Languages,
    #[strum(serialize = "age")]
    AccountAge,
}

impl TrophyCategory {
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Commits => "⌨️",
            Self::Stars => "⭐",
            Self::Followers => "👥",
            Self::MergedPrs => "🚀",
            Self::Languages => "🌐",
            Self::AccountAge => "🏆",
        }
    }

    pub fn describe(self, threshold: f64) -> String {
        match self {
            Self::Commits => format!("{threshold}+ all-time commits"),
            Self::Stars => format!("Earned {threshold}+ total stars"),
            Self::Followers => format!("Gained {threshold}+ followers"),
            Self::MergedPrs => format!("{threshold}+ merged pull requests"),
            Self::Languages => format!("Used {threshold}+ languages"),
            Self::AccountAge => format!("Member for {threshold}+ years"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierStep {
    pub threshold: f64,
    pub tier: TrophyTier,
    pub name: &'static str,
}

const fn step(threshold: f64, tier: TrophyTier, name: &'static str) -> TierStep {
    TierStep {
        threshold,
        tier,
        name,
    }
}

/// Tier thresholds of one category, hardest first.
#[derive(Debug, Clone, Copy)]
pub struct TrophyLadder {
    pub category: TrophyCategory,
    pub steps: &'static [TierStep],
}

impl TrophyLadder {
    /// Awards the hardest step the value meets, or nothing.
    pub fn award(&self, value: f64) -> Option<Trophy> {
        let step = self.steps.iter().find(|step| value >= step.threshold)?;
        Some(Trophy {
            id: format!("{}-{}", self.category, step.tier),
            name: step.name.to_string(),
            description: self.category.describe(step.threshold),
            tier: step.tier,
            icon: self.category.icon().to_string(),
            progress: Some(value),
            max_progress: Some(step.threshold),
        })
    }
}

use TrophyTier::*;

pub const COMMIT_STEPS: &[TierStep] = &[
    step(10000.0, S, "GIT COMMANDER"),
    step(5000.0, AAA, "CODE MAESTRO"),
    step(1000.0, AA, "KEYBOARD NINJA"),
    step(500.0, A, "STEADY CODER"),
    step(100.0, B, "DEV IN MOTION"),
    step(10.0, C, "HELLO WORLD"),
];

pub const STAR_STEPS: &[TierStep] = &[
    step(10000.0, S, "CELESTIAL ARCHITECT"),
    step(5000.0, AAA, "SUPERNOVA"),
    step(1000.0, AA, "STELLAR COLLECTOR"),
    step(500.0, A, "SHOOTING STAR"),
    step(100.0, B, "STAR SEEKER"),
    step(10.0, C, "SPARK"),
];

pub const FOLLOWER_STEPS: &[TierStep] = &[
    step(1000.0, S, "TRIBE LEADER"),
    step(500.0, AAA, "TRENDSETTER"),
    step(250.0, AA, "DEV ICON"),
    step(100.0, A, "RECOGNIZED"),
    step(50.0, B, "NETWORK BUILDER"),
    step(10.0, C, "HELLO CROWD"),
];

pub const MERGED_PR_STEPS: &[TierStep] = &[
    step(500.0, S, "PULL REQUEST CHAMPION"),
    step(100.0, AAA, "REPO KEEPER"),
    step(50.0, AA, "CODE ALLY"),
    step(20.0, A, "TEAM PLAYER"),
    step(5.0, B, "ASSIST DEV"),
    step(1.0, C, "FIRST PR"),
];

pub const LANGUAGE_STEPS: &[TierStep] = &[
    step(15.0, S, "CODE POLYGLOT"),
    step(10.0, AAA, "LANGUAGE VIRTUOSO"),
    step(7.0, AA, "SYNTAX EXPLORER"),
    step(5.0, A, "VERSATILE CODER"),
    step(3.0, B, "APPRENTICE CODER"),
    step(1.0, C, "FIRST SYNTAX"),
];

pub const ACCOUNT_AGE_STEPS: &[TierStep] = &[
    step(10.0, S, "PLATFORM VETERAN"),
    step(7.0, AAA, "TIME KEEPER"),
    step(5.0, AA, "SEASONED DEV"),
    step(3.0, A, "ACTIVE CONTRIBUTOR"),
    step(1.0, B, "COMMITTED DEV"),
    step(0.5, C, "FRESH REPO"),
];

/// Evaluation order of the tiered categories.
pub const LADDERS: &[TrophyLadder] = &[
    TrophyLadder {
        category: TrophyCategory::Commits,
        steps: COMMIT_STEPS,
    },
    TrophyLadder {
        category: TrophyCategory::Stars,
        steps: STAR_STEPS,
    },
    TrophyLadder {
        category: TrophyCategory::Followers,
        steps: FOLLOWER_STEPS,
    },
    TrophyLadder {
        category: TrophyCategory::MergedPrs,
        steps: MERGED_PR_STEPS,
    },
    TrophyLadder {
        category: TrophyCategory::Languages,
        steps: LANGUAGE_STEPS,
    },
    TrophyLadder {
        category: TrophyCategory::AccountAge,
        steps: ACCOUNT_AGE_STEPS,
    },
];

/// One-off unlock outside of the tier ladders.
#[derive(Debug, Clone, Copy)]
pub struct SecretTrophy {
    pub id: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    pub unlocked: fn(&TrophyMetrics) -> bool,
    pub describe: fn(&TrophyMetrics) -> String,
}

impl SecretTrophy {
    fn award(&self, metrics: &TrophyMetrics) -> Option<Trophy> {
        (self.unlocked)(metrics).then(|| Trophy {
            id: self.id.to_string(),
            name: self.name.to_string(),
            description: (self.describe)(metrics),
            tier: TrophyTier::Secret,
            icon: self.icon.to_string(),
            progress: None,
            max_progress: None,
        })
    }
}

pub const GIST_MASTER_THRESHOLD: u64 = 100;

pub const SECRET_TROPHIES: &[SecretTrophy] = &[
    SecretTrophy {
        id: "gist-master",
        name: "GIST COLLECTOR",
        icon: "📝",
        unlocked: |metrics| metrics.public_gists >= GIST_MASTER_THRESHOLD,
        describe: |metrics| format!("{} public gists created", metrics.public_gists),
    },
    SecretTrophy {
        id: "complete-profile",
        name: "PROFILE COMPLETE",
        icon: "✨",
        unlocked: |metrics| metrics.profile_complete,
        describe: |_| "Filled out all profile information".to_string(),
    },
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrophyMetrics {
    pub all_time_commits: u64,
    pub total_stars: u64,
    pub followers: u64,
    pub merged_prs: u64,
    pub languages: u64,
    pub account_age_years: f64,
    pub public_gists: u64,
    /// Bio, website, location and company are all filled in.
    pub profile_complete: bool,
}

impl TrophyMetrics {
    pub fn metric(&self, category: TrophyCategory) -> f64 {
        match category {
            TrophyCategory::Commits => self.all_time_commits as f64,
            TrophyCategory::Stars => self.total_stars as f64,
            TrophyCategory::Followers => self.followers as f64,
            TrophyCategory::MergedPrs => self.merged_prs as f64,
            TrophyCategory::Languages => self.languages as f64,
            TrophyCategory::AccountAge => self.account_age_years.max(0.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trophy {
    pub id: String,
    pub name: String,
    pub description: String,
    pub tier: TrophyTier,
    pub icon: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_progress: Option<f64>,
}

#[derive(Debug, Clone, Copy)]
pub struct TrophyEngine {
    ladders: &'static [TrophyLadder],
    secrets: &'static [SecretTrophy],
}

impl Default for TrophyEngine {
    fn default() -> Self {
        Self::new(LADDERS, SECRET_TROPHIES)
    }
}

impl TrophyEngine {
    pub const fn new(
        ladders: &'static [TrophyLadder],
        secrets: &'static [SecretTrophy],
    ) -> Self {
        Self { ladders, secrets }
    }

    /// One trophy per category that crossed a threshold, then every unlocked
    /// secret, ordered by tier. Equal tiers keep the evaluation order.
    pub fn evaluate(&self, metrics: &TrophyMetrics) -> Vec<Trophy> {
        let mut trophies: Vec<Trophy> = self
            .ladders
            .iter()
            .filter_map(|ladder| ladder.award(metrics.metric(ladder.category)))
            .chain(self.secrets.iter().filter_map(|secret| secret.award(metrics)))
            .collect();

        trophies.sort_by_key(|trophy| trophy.tier.rank());
        trophies
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    fn evaluate(metrics: TrophyMetrics) -> Vec<Trophy> {
        TrophyEngine::default().evaluate(&metrics)
    }

    fn ids(trophies: &[Trophy]) -> Vec<&str> {
        trophies.iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn no_metrics_no_trophies() {
        assert!(evaluate(TrophyMetrics::default()).is_empty());
    }

    #[test]
    fn one_trophy_per_category() {
        let trophies = evaluate(TrophyMetrics {
            all_time_commits: 1500,
            total_stars: 50,
            ..Default::default()
        });

        assert_eq!(ids(&trophies), vec!["commits-AA", "stars-C"]);

        let commits = &trophies[0];
        assert_eq!(commits.tier, TrophyTier::AA);
        assert_eq!(commits.name, "KEYBOARD NINJA");
        assert_eq!(commits.description, "1000+ all-time commits");
        assert_eq!(commits.progress, Some(1500.0));
        assert_eq!(commits.max_progress, Some(1000.0));

        assert_eq!(trophies[1].description, "Earned 10+ total stars");
    }

    #[test]
    fn thresholds_are_inclusive() {
        let trophies = evaluate(TrophyMetrics {
            followers: 1000,
            merged_prs: 1,
            languages: 14,
            ..Default::default()
        });

        assert_eq!(
            ids(&trophies),
            vec!["followers-S", "languages-AAA", "prs-C"]
        );
    }

    #[test]
    fn fractional_account_age() {
        let trophies = evaluate(TrophyMetrics {
            account_age_years: 0.5,
            ..Default::default()
        });
        assert_eq!(ids(&trophies), vec!["age-C"]);
        assert_eq!(trophies[0].description, "Member for 0.5+ years");

        let trophies = evaluate(TrophyMetrics {
            account_age_years: 0.49,
            ..Default::default()
        });
        assert!(trophies.is_empty());
    }

    #[test]
    fn gist_master_is_secret() {
        let trophies = evaluate(TrophyMetrics {
            public_gists: 150,
            ..Default::default()
        });

        assert_eq!(trophies.len(), 1);
        assert_eq!(trophies[0].id, "gist-master");
        assert_eq!(trophies[0].tier, TrophyTier::Secret);
        assert_eq!(trophies[0].description, "150 public gists created");
        assert_eq!(trophies[0].progress, None);
    }

    #[test]
    fn secrets_coexist_and_sort_last() {
        let trophies = evaluate(TrophyMetrics {
            public_gists: 100,
            profile_complete: true,
            total_stars: 20000,
            languages: 3,
            ..Default::default()
        });

        assert_eq!(
            ids(&trophies),
            vec!["stars-S", "languages-B", "gist-master", "complete-profile"]
        );
    }

    #[test]
    fn equal_tiers_keep_category_order() {
        let trophies = evaluate(TrophyMetrics {
            all_time_commits: 120,
            total_stars: 150,
            followers: 60,
            merged_prs: 6,
            languages: 4,
            account_age_years: 1.2,
            ..Default::default()
        });

        assert!(trophies.iter().all(|t| t.tier == TrophyTier::B));
        assert_eq!(
            ids(&trophies),
            vec![
                "commits-B",
                "stars-B",
                "followers-B",
                "prs-B",
                "languages-B",
                "age-B"
            ]
        );
    }

    #[test]
    fn ladders_are_hardest_first() {
        for ladder in LADDERS {
            assert_eq!(ladder.steps.len(), 6, "{}", ladder.category);
            assert!(ladder
                .steps
                .windows(2)
                .all(|pair| pair[0].threshold > pair[1].threshold
                    && pair[0].tier < pair[1].tier));
        }
    }

    #[test]
    fn tier_labels_and_ranks() {
        let labels: Vec<String> = TrophyTier::iter().map(|t| t.to_string()).collect();
        assert_eq!(labels, vec!["S", "AAA", "AA", "A", "B", "C", "SECRET"]);

        let ranks: Vec<u8> = TrophyTier::iter().map(TrophyTier::rank).collect();
        assert_eq!(ranks, vec![0, 1, 2, 3, 4, 5, 6]);

        assert_eq!(
            serde_json::to_string(&TrophyTier::Secret).unwrap(),
            "\"SECRET\""
        );
    }
}
