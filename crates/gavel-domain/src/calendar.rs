//! Calendar-derived facts: day of week, Hong Kong general holidays, and
//! time-of-day buckets
//!
//! The holiday flag is computed from a fixed table of gazetted Hong Kong
//! general holidays covering 2019-2026 (the years the sampled judgments span).
//! Dates outside the table report `false`.

use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Day of the week as extracted facts use it: 1 = Monday .. 7 = Sunday.
pub fn day_of_week(date: NaiveDate) -> u8 {
    date.weekday().number_from_monday() as u8
}

/// Whether the date is a gazetted Hong Kong general holiday.
pub fn is_hk_public_holiday(date: NaiveDate) -> bool {
    HK_GENERAL_HOLIDAYS
        .binary_search(&(date.year(), date.month(), date.day()))
        .is_ok()
}

/// Coarse time-of-day bucket derived from the hour of an offence time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    /// 06:00 - 11:59
    Morning,
    /// 12:00 - 17:59
    Afternoon,
    /// 18:00 - 22:59
    Evening,
    /// 23:00 - 05:59
    Night,
}

/// Bucket an offence time into a [`TimeOfDay`].
pub fn time_of_day(time: NaiveTime) -> TimeOfDay {
    match time.hour() {
        6..=11 => TimeOfDay::Morning,
        12..=17 => TimeOfDay::Afternoon,
        18..=22 => TimeOfDay::Evening,
        _ => TimeOfDay::Night,
    }
}

impl Default for TimeOfDay {
    fn default() -> Self {
        TimeOfDay::Night
    }
}

// Gazetted general holidays (year, month, day), sorted for binary search.
// Substituted holidays (original falling on a Sunday) appear as the
// substituted weekday, matching the gazette.
const HK_GENERAL_HOLIDAYS: &[(i32, u32, u32)] = &[
    (2019, 1, 1),
    (2019, 2, 5),
    (2019, 2, 6),
    (2019, 2, 7),
    (2019, 4, 5),
    (2019, 4, 19),
    (2019, 4, 20),
    (2019, 4, 22),
    (2019, 5, 1),
    (2019, 5, 13),
    (2019, 6, 7),
    (2019, 7, 1),
    (2019, 9, 14),
    (2019, 10, 1),
    (2019, 10, 7),
    (2019, 12, 25),
    (2019, 12, 26),
    (2020, 1, 1),
    (2020, 1, 25),
    (2020, 1, 27),
    (2020, 1, 28),
    (2020, 4, 4),
    (2020, 4, 10),
    (2020, 4, 11),
    (2020, 4, 13),
    (2020, 4, 30),
    (2020, 5, 1),
    (2020, 6, 25),
    (2020, 7, 1),
    (2020, 10, 1),
    (2020, 10, 2),
    (2020, 10, 26),
    (2020, 12, 25),
    (2020, 12, 26),
    (2021, 1, 1),
    (2021, 2, 12),
    (2021, 2, 13),
    (2021, 2, 15),
    (2021, 4, 2),
    (2021, 4, 3),
    (2021, 4, 5),
    (2021, 4, 6),
    (2021, 5, 1),
    (2021, 5, 19),
    (2021, 6, 14),
    (2021, 7, 1),
    (2021, 9, 22),
    (2021, 10, 1),
    (2021, 10, 14),
    (2021, 12, 25),
    (2021, 12, 27),
    (2022, 1, 1),
    (2022, 2, 1),
    (2022, 2, 2),
    (2022, 2, 3),
    (2022, 4, 5),
    (2022, 4, 15),
    (2022, 4, 16),
    (2022, 4, 18),
    (2022, 5, 2),
    (2022, 5, 9),
    (2022, 6, 3),
    (2022, 7, 1),
    (2022, 9, 12),
    (2022, 10, 1),
    (2022, 10, 4),
    (2022, 12, 26),
    (2022, 12, 27),
    (2023, 1, 2),
    (2023, 1, 23),
    (2023, 1, 24),
    (2023, 1, 25),
    (2023, 4, 5),
    (2023, 4, 7),
    (2023, 4, 8),
    (2023, 4, 10),
    (2023, 5, 1),
    (2023, 5, 26),
    (2023, 6, 22),
    (2023, 7, 1),
    (2023, 9, 30),
    (2023, 10, 2),
    (2023, 10, 23),
    (2023, 12, 25),
    (2023, 12, 26),
    (2024, 1, 1),
    (2024, 2, 10),
    (2024, 2, 12),
    (2024, 2, 13),
    (2024, 3, 29),
    (2024, 3, 30),
    (2024, 4, 1),
    (2024, 4, 4),
    (2024, 5, 1),
    (2024, 5, 15),
    (2024, 6, 10),
    (2024, 7, 1),
    (2024, 9, 18),
    (2024, 10, 1),
    (2024, 10, 11),
    (2024, 12, 25),
    (2024, 12, 26),
    (2025, 1, 1),
    (2025, 1, 29),
    (2025, 1, 30),
    (2025, 1, 31),
    (2025, 4, 4),
    (2025, 4, 18),
    (2025, 4, 19),
    (2025, 4, 21),
    (2025, 5, 1),
    (2025, 5, 5),
    (2025, 5, 31),
    (2025, 7, 1),
    (2025, 10, 1),
    (2025, 10, 7),
    (2025, 10, 29),
    (2025, 12, 25),
    (2025, 12, 26),
    (2026, 1, 1),
    (2026, 2, 17),
    (2026, 2, 18),
    (2026, 2, 19),
    (2026, 4, 3),
    (2026, 4, 4),
    (2026, 4, 6),
    (2026, 4, 7),
    (2026, 5, 1),
    (2026, 5, 25),
    (2026, 6, 19),
    (2026, 7, 1),
    (2026, 9, 26),
    (2026, 10, 1),
    (2026, 10, 19),
    (2026, 12, 25),
    (2026, 12, 26),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_of_week_monday_is_one() {
        // 2024-07-01 was a Monday
        let date = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
        assert_eq!(day_of_week(date), 1);
        // 2024-07-07 was a Sunday
        let date = NaiveDate::from_ymd_opt(2024, 7, 7).unwrap();
        assert_eq!(day_of_week(date), 7);
    }

    #[test]
    fn test_holiday_table_sorted() {
        // binary_search requires strict ordering
        for pair in HK_GENERAL_HOLIDAYS.windows(2) {
            assert!(pair[0] < pair[1], "table out of order at {:?}", pair);
        }
    }

    #[test]
    fn test_known_holidays() {
        assert!(is_hk_public_holiday(
            NaiveDate::from_ymd_opt(2024, 7, 1).unwrap()
        ));
        assert!(is_hk_public_holiday(
            NaiveDate::from_ymd_opt(2023, 12, 25).unwrap()
        ));
        assert!(!is_hk_public_holiday(
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
        ));
        // Outside table coverage: conservatively false
        assert!(!is_hk_public_holiday(
            NaiveDate::from_ymd_opt(2010, 7, 1).unwrap()
        ));
    }

    #[test]
    fn test_time_of_day_buckets() {
        let t = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap();
        assert_eq!(time_of_day(t(6, 0)), TimeOfDay::Morning);
        assert_eq!(time_of_day(t(11, 59)), TimeOfDay::Morning);
        assert_eq!(time_of_day(t(12, 0)), TimeOfDay::Afternoon);
        assert_eq!(time_of_day(t(17, 59)), TimeOfDay::Afternoon);
        assert_eq!(time_of_day(t(18, 0)), TimeOfDay::Evening);
        assert_eq!(time_of_day(t(22, 59)), TimeOfDay::Evening);
        assert_eq!(time_of_day(t(23, 0)), TimeOfDay::Night);
        assert_eq!(time_of_day(t(3, 30)), TimeOfDay::Night);
    }
}
