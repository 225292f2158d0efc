use chrono::{DateTime, Datelike, NaiveDate, Utc};

pub const SECONDS_IN_DAY: f64 = 24.0 * 60.0 * 60.0;
pub const DAYS_IN_YEAR: f64 = 365.0;

/// Current calendar date in UTC. Every "today" in the crate is a UTC date.
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

pub fn current_year() -> i32 {
    Utc::now().year()
}

/// Whole calendar days between two dates, regardless of order.
pub fn days_between(a: NaiveDate, b: NaiveDate) -> i64 {
    (a - b).num_days().abs()
}

/// Account age in 365-day years. Creation dates in the future count as zero.
pub fn account_age_years(created_at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let seconds = (now - created_at).num_seconds().max(0) as f64;
    seconds / (DAYS_IN_YEAR * SECONDS_IN_DAY)
}

/// First and last second of a calendar year, used as a contribution window.
pub fn year_bounds(year: i32) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let start = NaiveDate::from_ymd_opt(year, 1, 1)?
        .and_hms_opt(0, 0, 0)?
        .and_utc();
    let end = NaiveDate::from_ymd_opt(year, 12, 31)?
        .and_hms_opt(23, 59, 59)?
        .and_utc();
    Some((start, end))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn days_between_is_symmetric() {
        let a: NaiveDate = "2024-03-01".parse().unwrap();
        let b: NaiveDate = "2024-02-28".parse().unwrap();

        assert_eq!(days_between(a, b), 2);
        assert_eq!(days_between(b, a), 2);
        assert_eq!(days_between(a, a), 0);
    }

    #[test]
    fn account_age_uses_365_day_years() {
        let created = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let now = created + chrono::Duration::days(730);

        assert!((account_age_years(created, now) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn future_creation_is_zero_age() {
        let now = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let created = now + chrono::Duration::days(3);

        assert_eq!(account_age_years(created, now), 0.0);
    }

    #[test]
    fn year_bounds_cover_whole_year() {
        let (start, end) = year_bounds(2024).unwrap();

        assert_eq!(start.to_rfc3339(), "2024-01-01T00:00:00+00:00");
        assert_eq!(end.to_rfc3339(), "2024-12-31T23:59:59+00:00");
    }
}
