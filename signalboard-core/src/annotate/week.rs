//! Weekly bucket keys for one-marker-per-week cadences.

use chrono::{Datelike, Duration, NaiveDate};

/// Monday of the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// Sortable bucket key: the week start formatted as `%Y-%W`.
///
/// Every day of one Monday-to-Sunday week maps to the same key, including
/// weeks that straddle New Year (the key follows the Monday's year).
pub fn week_key(date: NaiveDate) -> String {
    week_start(date).format("%Y-%W").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn week_start_is_monday() {
        // 2024-03-06 is a Wednesday.
        assert_eq!(week_start(d(2024, 3, 6)), d(2024, 3, 4));
        assert_eq!(week_start(d(2024, 3, 4)), d(2024, 3, 4));
        assert_eq!(week_start(d(2024, 3, 10)), d(2024, 3, 4));
    }

    #[test]
    fn same_week_same_key() {
        let monday = week_key(d(2024, 3, 4));
        for day in 5..=10 {
            assert_eq!(week_key(d(2024, 3, day)), monday);
        }
        assert_ne!(week_key(d(2024, 3, 11)), monday);
    }

    #[test]
    fn new_year_week_keeps_monday_year() {
        // Monday 2024-12-30 through Sunday 2025-01-05.
        let key = week_key(d(2024, 12, 30));
        assert_eq!(week_key(d(2025, 1, 1)), key);
        assert_eq!(week_key(d(2025, 1, 5)), key);
        assert!(key.starts_with("2024-"));
    }

    #[test]
    fn key_format() {
        assert_eq!(week_key(d(2024, 1, 8)), "2024-02");
    }
}
