use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{calendar, AggregateStats, ContributionDay};

/// A streak stays current when the latest active day is today or yesterday,
/// which covers days not yet reported upstream.
pub const GRACE_PERIOD_DAYS: i64 = 1;

/// An unbroken run of active days. `from`/`to` are `None` for an empty run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StreakRun {
    pub days: u32,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl StreakRun {
    pub const fn new(days: u32, from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            days,
            from: Some(from),
            to: Some(to),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakStats {
    pub total_contributions: u64,
    pub current_streak: StreakRun,
    pub longest_streak: StreakRun,
}

#[derive(Debug, Clone, Copy)]
pub struct StreakAnalyzer {
    today: NaiveDate,
}

impl Default for StreakAnalyzer {
    fn default() -> Self {
        Self::new(calendar::today_utc())
    }
}

impl StreakAnalyzer {
    pub const fn new(today: NaiveDate) -> Self {
        Self { today }
    }

    pub const fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn analyze(&self, days: &[ContributionDay], stats: &AggregateStats) -> StreakStats {
        if days.is_empty() {
            return StreakStats::default();
        }

        let mut sorted = days.to_vec();
        sorted.sort_by_key(|day| day.date);

        StreakStats {
            // The daily series can be a partial window, the counters are all-time.
            total_contributions: stats.total(),
            current_streak: current_run(&sorted, self.today),
            longest_streak: longest_run(&sorted),
        }
    }
}

fn longest_run(days: &[ContributionDay]) -> StreakRun {
    let mut best = StreakRun::default();
    let mut run = 0;
    let mut run_start = None;

    for day in days {
        if day.count == 0 {
            run = 0;
            run_start = None;
            continue;
        }

        run += 1;
        let start = *run_start.get_or_insert(day.date);
        if run > best.days {
            best = StreakRun::new(run, start, day.date);
        }
    }

    best
}

fn current_run(days: &[ContributionDay], today: NaiveDate) -> StreakRun {
    let Some(latest) = days.iter().rposition(|day| day.count > 0) else {
        return StreakRun::default();
    };

    if calendar::days_between(today, days[latest].date) > GRACE_PERIOD_DAYS {
        return StreakRun::default();
    }

    let length = days[..=latest]
        .iter()
        .rev()
        .take_while(|day| day.count > 0)
        .count();

    StreakRun::new(
        length as u32,
        days[latest + 1 - length].date,
        days[latest].date,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(value: &str) -> NaiveDate {
        value.parse().unwrap()
    }

    fn day(value: &str, count: u32) -> ContributionDay {
        ContributionDay::new(date(value), count)
    }

    fn analyze_at(today: &str, days: &[ContributionDay]) -> StreakStats {
        StreakAnalyzer::new(date(today)).analyze(days, &AggregateStats::default())
    }

    fn sample() -> Vec<ContributionDay> {
        vec![
            day("2024-01-01", 1),
            day("2024-01-02", 1),
            day("2024-01-03", 0),
            day("2024-01-04", 1),
        ]
    }

    #[test]
    fn empty_series_is_all_zero() {
        let stats = AggregateStats {
            total_commit_contributions: 42,
            ..Default::default()
        };
        let result = StreakAnalyzer::new(date("2024-01-04")).analyze(&[], &stats);

        assert_eq!(result, StreakStats::default());
        assert_eq!(result.current_streak.from, None);
        assert_eq!(result.longest_streak.to, None);
    }

    #[test]
    fn longest_and_current_streaks() {
        let result = analyze_at("2024-01-04", &sample());

        assert_eq!(
            result.longest_streak,
            StreakRun::new(2, date("2024-01-01"), date("2024-01-02"))
        );
        assert_eq!(
            result.current_streak,
            StreakRun::new(1, date("2024-01-04"), date("2024-01-04"))
        );
    }

    #[test]
    fn total_comes_from_aggregate_counters() {
        let stats = AggregateStats {
            total_commit_contributions: 100,
            total_pull_request_review_contributions: 1,
            total_issue_contributions: 2,
            total_repository_contributions: 3,
            restricted_contributions_count: 4,
        };
        let result = StreakAnalyzer::new(date("2024-01-04")).analyze(&sample(), &stats);

        assert_eq!(result.total_contributions, 110);
    }

    #[test]
    fn only_zero_days() {
        let days = vec![day("2024-01-01", 0), day("2024-01-02", 0)];
        let result = analyze_at("2024-01-02", &days);

        assert_eq!(result.longest_streak, StreakRun::default());
        assert_eq!(result.current_streak, StreakRun::default());
    }

    #[test]
    fn single_active_day() {
        let days = vec![day("2024-01-01", 0), day("2024-01-02", 5)];
        let result = analyze_at("2024-01-02", &days);

        let expected = StreakRun::new(1, date("2024-01-02"), date("2024-01-02"));
        assert_eq!(result.longest_streak, expected);
        assert_eq!(result.current_streak, expected);
    }

    #[test]
    fn yesterday_keeps_streak_alive() {
        let days = vec![
            day("2024-01-01", 3),
            day("2024-01-02", 2),
            day("2024-01-03", 0),
        ];
        let result = analyze_at("2024-01-03", &days);

        assert_eq!(
            result.current_streak,
            StreakRun::new(2, date("2024-01-01"), date("2024-01-02"))
        );
    }

    #[test]
    fn two_day_gap_breaks_current_streak() {
        let days = vec![day("2024-01-01", 3), day("2024-01-02", 2)];
        let result = analyze_at("2024-01-04", &days);

        assert_eq!(result.current_streak, StreakRun::default());
        assert_eq!(result.longest_streak.days, 2);
    }

    #[test]
    fn longest_keeps_first_of_equal_runs() {
        let days = vec![
            day("2024-01-01", 1),
            day("2024-01-02", 1),
            day("2024-01-03", 0),
            day("2024-01-04", 1),
            day("2024-01-05", 1),
        ];
        let result = analyze_at("2024-01-05", &days);

        assert_eq!(
            result.longest_streak,
            StreakRun::new(2, date("2024-01-01"), date("2024-01-02"))
        );
        assert_eq!(
            result.current_streak,
            StreakRun::new(2, date("2024-01-04"), date("2024-01-05"))
        );
    }

    #[test]
    fn unsorted_input_matches_sorted_input() {
        let mut shuffled = sample();
        shuffled.reverse();
        shuffled.swap(0, 2);

        assert_eq!(
            analyze_at("2024-01-04", &shuffled),
            analyze_at("2024-01-04", &sample())
        );
    }

    #[test]
    fn longest_is_never_shorter_than_current() {
        let patterns: [&[u32]; 5] = [
            &[1, 1, 1, 1],
            &[0, 1, 1, 0, 1],
            &[1, 0, 0, 1, 1, 1],
            &[3, 3, 0, 2],
            &[0, 0, 0, 7],
        ];
        let start = date("2024-03-01");

        for counts in patterns {
            let days: Vec<_> = counts
                .iter()
                .enumerate()
                .map(|(offset, count)| {
                    ContributionDay::new(start + chrono::Days::new(offset as u64), *count)
                })
                .collect();
            let today = days.last().unwrap().date;
            let result = StreakAnalyzer::new(today).analyze(&days, &AggregateStats::default());

            assert!(
                result.longest_streak.days >= result.current_streak.days,
                "{counts:?}"
            );
        }
    }
}
