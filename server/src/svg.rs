use num_format::{Locale, ToFormattedString};
use shared::{
    PercentileRank, StreakRun, StreakStats, Trophy, WeightedRank, CDF_PERCENTILE,
    WEIGHTED_LOG_SCALE,
};

use crate::types::RankResult;

const RANK_TEMPLATE: &str = include_str!("../public/templates/rank.svg");
const RANK_ROW_TEMPLATE: &str = include_str!("../public/templates/rank_row.svg");
const TROPHIES_TEMPLATE: &str = include_str!("../public/templates/trophies.svg");
const TROPHY_CARD_TEMPLATE: &str = include_str!("../public/templates/trophy_card.svg");
const STREAKS_TEMPLATE: &str = include_str!("../public/templates/streaks.svg");

const TROPHIES_PER_ROW: usize = 5;
const TROPHY_WIDTH: usize = 220;
const TROPHY_HEIGHT: usize = 280;
const TROPHY_PADDING: usize = 40;
const STAR_SPACING: f64 = 16.1;
const STREAK_COLOR: &str = "#fb8c00";

/// Escapes text for use inside SVG markup and attribute values.
pub fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// One labelled bar of the rank card, `fraction` is clamped to `0..=1`.
#[derive(Debug, Clone, PartialEq)]
pub struct RankRow {
    pub label: &'static str,
    pub value: String,
    pub fraction: f64,
}

impl RankRow {
    fn new(label: &'static str, value: impl ToString, fraction: f64) -> Self {
        Self {
            label,
            value: value.to_string(),
            fraction: if fraction.is_finite() {
                fraction.clamp(0.0, 1.0)
            } else {
                0.0
            },
        }
    }
}

/// Strategy-independent view of a rank, as drawn on the card.
#[derive(Debug, Clone, PartialEq)]
pub struct RankCard {
    pub grade: String,
    pub color: &'static str,
    pub score_label: &'static str,
    pub score: String,
    pub score_fraction: f64,
    pub rows: Vec<RankRow>,
}

impl From<&WeightedRank> for RankCard {
    fn from(rank: &WeightedRank) -> Self {
        let scale = WEIGHTED_LOG_SCALE;
        let breakdown = rank.breakdown;
        let row = |label, value: u32, cap: f64| RankRow::new(label, value, value as f64 / cap);

        Self {
            grade: rank.grade.to_string(),
            color: rank.grade.color(),
            score_label: "OVERALL SCORE",
            score: rank.score.to_string(),
            score_fraction: rank.score.min(100) as f64 / 100.0,
            rows: vec![
                row("FOLLOWERS", breakdown.followers, scale.followers.cap),
                row("REPOS", breakdown.repos, scale.repos.cap),
                row("STARS", breakdown.stars, scale.stars.cap),
                row("FORKS", breakdown.forks, scale.forks.cap),
                row("ACCOUNT AGE", breakdown.account_age, scale.age_cap),
            ],
        }
    }
}

impl From<&PercentileRank> for RankCard {
    fn from(rank: &PercentileRank) -> Self {
        let cdf = CDF_PERCENTILE;
        let breakdown = rank.breakdown;
        // A value at twice the median fills the bar.
        let row = |label, value: u64, median: f64| {
            RankRow::new(
                label,
                value.to_formatted_string(&Locale::en),
                value as f64 / (2.0 * median),
            )
        };

        Self {
            grade: rank.grade.to_string(),
            color: rank.grade.color(),
            score_label: "TOP PERCENTILE",
            score: format!("{:.1}%", rank.percentile),
            score_fraction: rank.score.min(100) as f64 / 100.0,
            rows: vec![
                row("STARS", breakdown.stars, cdf.stars.median),
                row("COMMITS", breakdown.commits, cdf.commits.median),
                row("PULL REQUESTS", breakdown.prs, cdf.merged_prs.median),
                row("ISSUES", breakdown.issues, cdf.issues.median),
            ],
        }
    }
}

impl From<&RankResult> for RankCard {
    fn from(rank: &RankResult) -> Self {
        match rank {
            RankResult::Weighted(rank) => rank.into(),
            RankResult::Percentile(rank) => rank.into(),
        }
    }
}

pub fn generate_rank_svg(username: &str, card: &RankCard) -> String {
    let rows: String = card
        .rows
        .iter()
        .enumerate()
        .map(|(index, row)| {
            RANK_ROW_TEMPLATE
                .replace("{y}", &(80 + index * 40).to_string())
                .replace("{label}", row.label)
                .replace("{value}", &escape(&row.value))
                .replace("{width}", &format!("{:.1}", row.fraction * 400.0))
                .replace("{delay}", &format!("{:.1}", 0.4 + index as f64 * 0.1))
                .replace("{color}", card.color)
        })
        .collect();

    let grade_size = if card.grade.chars().count() > 2 {
        "42px"
    } else {
        "60px"
    };

    RANK_TEMPLATE
        .replace("{rows}", &rows)
        .replace("{grade-size}", grade_size)
        .replace("{color}", card.color)
        .replace("{grade}", &escape(&card.grade))
        .replace("{score-label}", card.score_label)
        .replace("{score-width}", &format!("{:.1}", card.score_fraction * 200.0))
        .replace("{score}", &escape(&card.score))
        .replace("{username}", &escape(username))
}

/// Path data for `count` stars centered on a trophy card.
fn star_path(count: u8) -> String {
    let count = count as f64;
    let start_x = 110.0 - ((count - 1.0) * STAR_SPACING) / 2.0;

    (0..count as usize)
        .map(|i| {
            let x = start_x + 8.5 + i as f64 * STAR_SPACING;
            format!(
                "M{x:.2} 47.07c.07-.35-.21-.77-.56-.77l-3.99-.56-1.82-3.64a.55.55 0 0 0-.28-.28c-.35-.21-.77-.07-.98.28l-1.75 3.64-3.99.56q-.315 0-.42.21c-.28.28-.28.7 0 .98l2.87 2.8-.7 3.99c0 .14 0 .28.07.42.21.35.63.49.98.28l3.57-1.89 3.57 1.89c.07.07.21.07.35.07.35-.07.63-.42.56-.84l-.7-3.99 2.87-2.8c.28-.07.35-.21.35-.35"
            )
        })
        .collect()
}

pub fn generate_trophies_svg(username: &str, trophies: &[Trophy]) -> String {
    let rows = trophies.len().div_ceil(TROPHIES_PER_ROW);
    let width = TROPHY_WIDTH * TROPHIES_PER_ROW + TROPHY_PADDING * 2;
    let height = rows * (TROPHY_HEIGHT + 20) + TROPHY_PADDING * 2 + 40;
    let username = escape(username);

    let cards: String = trophies
        .iter()
        .enumerate()
        .map(|(index, trophy)| {
            let column = index % TROPHIES_PER_ROW;
            let row = index / TROPHIES_PER_ROW;
            let x = TROPHY_PADDING + column * TROPHY_WIDTH;
            let y = TROPHY_PADDING + 40 + row * (TROPHY_HEIGHT + 20);

            let name = trophy.name.to_uppercase();
            let (title, subtitle) = name.split_once(' ').unwrap_or((name.as_str(), ""));

            TROPHY_CARD_TEMPLATE
                .replace("{x}", &x.to_string())
                .replace("{y}", &y.to_string())
                .replace("{color}", trophy.tier.color())
                .replace("{stars}", &star_path(trophy.tier.stars()))
                .replace("{title}", &escape(title))
                .replace("{subtitle}", &escape(subtitle))
                .replace("{description}", &escape(&trophy.description))
                .replace("{username}", &username)
        })
        .collect();

    TROPHIES_TEMPLATE
        .replace("{width}", &width.to_string())
        .replace("{height}", &height.to_string())
        .replace("{cards}", &cards)
}

fn streak_range(run: &StreakRun) -> String {
    match (run.from, run.to) {
        (Some(from), Some(to)) => format!(
            "{} - {}",
            from.format("%b %-d, %Y"),
            to.format("%b %-d, %Y")
        ),
        _ => "No active streak".to_string(),
    }
}

pub fn generate_streaks_svg(username: &str, streaks: &StreakStats) -> String {
    let current_days = streaks.current_streak.days.to_string();
    let current_days_x = 32 + current_days.len() * 45;

    STREAKS_TEMPLATE
        .replace("{color}", STREAK_COLOR)
        .replace("{current-days-x}", &current_days_x.to_string())
        .replace("{current-days}", &current_days)
        .replace("{current-range}", &streak_range(&streaks.current_streak))
        .replace(
            "{total}",
            &streaks.total_contributions.to_formatted_string(&Locale::en),
        )
        .replace(
            "{longest-days}",
            &streaks.longest_streak.days.to_formatted_string(&Locale::en),
        )
        .replace(
            "{longest-range}",
            &format!(
                "Peak performance: {}",
                streak_range(&streaks.longest_streak)
            ),
        )
        .replace("{username}", &escape(username))
}

#[cfg(test)]
mod tests {
    use shared::{
        CdfPercentile, RankMetrics, RankStrategy, TrophyEngine, TrophyMetrics, TrophyTier,
        WeightedLogScale,
    };

    use super::*;

    fn metrics() -> RankMetrics {
        RankMetrics {
            total_stars: 1200,
            total_forks: 300,
            followers: 150,
            public_repos: 40,
            account_age_years: 8.0,
            commits: 2500,
            merged_prs: 80,
            issues: 40,
            reviews: 10,
        }
    }

    #[test]
    fn escape_handles_markup() {
        assert_eq!(
            escape(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &apos;Jerry&apos;&lt;/a&gt;"
        );
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn rank_svg_has_no_placeholders_left() {
        let weighted = WeightedLogScale::default().rank(&metrics());
        let svg = generate_rank_svg("octo<cat>", &RankCard::from(&weighted));

        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("@octo&lt;cat&gt;"));
        assert!(svg.contains(weighted.grade.color()));
        assert!(svg.contains("ACCOUNT AGE"));
        for placeholder in ["{rows}", "{grade}", "{score}", "{color}", "{username}"] {
            assert!(!svg.contains(placeholder), "{placeholder}");
        }
    }

    #[test]
    fn username_is_not_treated_as_template() {
        let weighted = WeightedLogScale::default().rank(&metrics());
        let svg = generate_rank_svg("{score}", &RankCard::from(&weighted));
        assert!(svg.contains("@{score}<"));

        let svg = generate_streaks_svg("{total}", &StreakStats::default());
        assert!(svg.contains("@{total}<"));

        let trophies = TrophyEngine::default().evaluate(&TrophyMetrics {
            total_stars: 20000,
            ..Default::default()
        });
        let svg = generate_trophies_svg("{description}", &trophies);
        assert!(svg.contains("@{description}<"));
    }

    #[test]
    fn percentile_card_shows_percentile() {
        let percentile = CdfPercentile::default().rank(&metrics());
        let card = RankCard::from(&percentile);

        assert_eq!(card.rows.len(), 4);
        assert_eq!(card.rows[0].value, "1,200");
        assert!(card.score.ends_with('%'));
        assert!(card.rows.iter().all(|row| (0.0..=1.0).contains(&row.fraction)));

        let svg = generate_rank_svg("octocat", &card);
        assert!(svg.contains("TOP PERCENTILE"));
        assert!(svg.contains(&escape(&percentile.grade.to_string())));
    }

    #[test]
    fn weighted_bars_are_scaled_by_caps() {
        let card = RankCard::from(&WeightedLogScale::default().rank(&RankMetrics {
            followers: 1_000_000,
            ..Default::default()
        }));

        assert_eq!(card.rows[0].label, "FOLLOWERS");
        assert_eq!(card.rows[0].fraction, 1.0);
        assert_eq!(card.rows[4].fraction, 0.0);
    }

    #[test]
    fn trophies_are_laid_out_in_rows_of_five() {
        let trophies = TrophyEngine::default().evaluate(&TrophyMetrics {
            all_time_commits: 20000,
            total_stars: 20000,
            followers: 2000,
            merged_prs: 600,
            languages: 20,
            account_age_years: 12.0,
            profile_complete: true,
            ..Default::default()
        });
        assert_eq!(trophies.len(), 7);

        let svg = generate_trophies_svg("octocat", &trophies);
        assert!(svg.contains(r#"width="1180""#));
        assert!(svg.contains(r#"height="720""#));
        assert!(svg.contains("GIT"));
        assert!(svg.contains("COMMANDER"));
        assert!(svg.contains(TrophyTier::Secret.color()));
        assert_eq!(svg.matches("translate(33, 0)").count(), 7);
    }

    #[test]
    fn no_trophies_renders_empty_canvas() {
        let svg = generate_trophies_svg("octocat", &[]);

        assert!(svg.contains(r#"height="120""#));
        assert!(!svg.contains("{cards}"));
    }

    #[test]
    fn star_count_follows_tier() {
        assert_eq!(star_path(5).matches('M').count(), 5);
        assert_eq!(star_path(1).matches('M').count(), 1);
        assert!(star_path(1).starts_with("M118.50 47.07"));
    }

    #[test]
    fn streaks_svg_formats_numbers_and_ranges() {
        let streaks = StreakStats {
            total_contributions: 12345,
            current_streak: StreakRun::new(
                3,
                "2024-01-02".parse().unwrap(),
                "2024-01-04".parse().unwrap(),
            ),
            longest_streak: StreakRun::new(
                10,
                "2023-05-01".parse().unwrap(),
                "2023-05-10".parse().unwrap(),
            ),
        };
        let svg = generate_streaks_svg("octocat", &streaks);

        assert!(svg.contains("12,345"));
        assert!(svg.contains("Jan 2, 2024 - Jan 4, 2024"));
        assert!(svg.contains("Peak performance: May 1, 2023 - May 10, 2023"));
        assert!(svg.contains(r#"x="77""#));
        assert!(!svg.contains("{total}"));
    }

    #[test]
    fn empty_streaks_render() {
        let svg = generate_streaks_svg("octocat", &StreakStats::default());

        assert!(svg.contains("No active streak"));
        assert!(svg.contains(">0<"));
    }
}
