use std::{fmt, ops::RangeInclusive};

use chrono::{Datelike as _, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("Invalid date argument ({value})")]
pub struct InvalidDate {
    pub value: String,
}

/// Years that keep the `YYYY-MM-DD` text form. Dates are compared as text
/// in the database, and chrono writes a sign in front of anything outside
/// this range
pub const YEARS: RangeInclusive<i32> = 1..=9999;

/// Inclusive window of calendar days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Resolve optional bounds into a concrete window
    ///
    /// A missing end is `today`, a missing start is the Monday of the week
    /// containing the end. `start > end` is allowed and matches nothing
    pub fn resolve(
        start: Option<&str>,
        end: Option<&str>,
        today: NaiveDate,
    ) -> Result<Self, InvalidDate> {
        let end = match present(end) {
            Some(value) => parse_date_arg(value)?,
            None => today,
        };
        let start = match present(start) {
            Some(value) => parse_date_arg(value)?,
            None => week_start(end),
        };
        Ok(Self { start, end })
    }

    /// Every day of the given month, `None` if the month doesn't exist
    pub fn month(year: i32, month: u32) -> Option<Self> {
        if !YEARS.contains(&year) {
            return None;
        }
        let start = NaiveDate::from_ymd_opt(year, month, 1)?;
        let end = start
            .checked_add_months(chrono::Months::new(1))?
            .checked_sub_days(Days::new(1))?;
        Some(Self { start, end })
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Monday of the week containing `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date.checked_sub_days(Days::new(date.weekday().num_days_from_monday() as u64))
        .unwrap_or(NaiveDate::MIN)
}

/// Parse a `YYYY-MM-DD` argument
///
/// Only the first three `-` separated components are read. Each may carry
/// surrounding whitespace
pub fn parse_date_arg(value: &str) -> Result<NaiveDate, InvalidDate> {
    fn inner(value: &str) -> Option<NaiveDate> {
        let mut parts = value.split('-').map(str::trim);
        let year = parts.next()?.parse::<i32>().ok()?;
        let month = parts.next()?.parse::<u32>().ok()?;
        let day = parts.next()?.parse::<u32>().ok()?;
        if !YEARS.contains(&year) {
            return None;
        }
        NaiveDate::from_ymd_opt(year, month, day)
    }

    inner(value).ok_or_else(|| InvalidDate {
        value: value.to_string(),
    })
}

#[cfg(test)]
mod test {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_defaults_to_current_week() {
        // Thursday
        let today = date(2024, 3, 14);
        let range = DateRange::resolve(None, None, today).unwrap();
        assert_eq!(range, DateRange::new(date(2024, 3, 11), today));

        // Resolving twice with the same day gives the same window
        assert_eq!(DateRange::resolve(None, None, today).unwrap(), range);
    }

    #[test]
    fn test_monday_is_its_own_week_start() {
        let monday = date(2024, 3, 11);
        let range = DateRange::resolve(None, None, monday).unwrap();
        assert_eq!(range.start, monday);
        assert_eq!(range.end, monday);
    }

    #[test]
    fn test_start_defaults_relative_to_given_end() {
        let today = date(2024, 3, 14);
        // Sunday
        let range = DateRange::resolve(None, Some("2024-01-07"), today).unwrap();
        assert_eq!(range, DateRange::new(date(2024, 1, 1), date(2024, 1, 7)));

        let range = DateRange::resolve(Some(""), Some("2024-01-07"), today).unwrap();
        assert_eq!(range.start, date(2024, 1, 1));
    }

    #[test]
    fn test_explicit_bounds() {
        let today = date(2024, 3, 14);
        let range = DateRange::resolve(Some("2023-12-01"), Some("2024-02-29"), today).unwrap();
        assert_eq!(range, DateRange::new(date(2023, 12, 1), date(2024, 2, 29)));
        assert!(range.contains(date(2024, 1, 15)));
        assert!(!range.contains(date(2024, 3, 1)));
    }

    #[test]
    fn test_inverted_range_is_accepted() {
        let today = date(2024, 3, 14);
        let range = DateRange::resolve(Some("2024-03-20"), Some("2024-03-10"), today).unwrap();
        assert!(range.is_empty());
    }

    #[test]
    fn test_lenient_parsing() {
        assert_eq!(parse_date_arg("2024- 3 -07").unwrap(), date(2024, 3, 7));
        assert_eq!(parse_date_arg("2024-03-07-extra").unwrap(), date(2024, 3, 7));
    }

    #[test]
    fn test_invalid_dates() {
        for value in ["2024-13-01", "2023-02-29", "2024-03", "yesterday", " ", "2024-aa-01"] {
            let err = parse_date_arg(value).unwrap_err();
            assert_eq!(err.value, value);
        }

        let today = date(2024, 3, 14);
        assert!(DateRange::resolve(Some("nope"), None, today).is_err());
        assert!(DateRange::resolve(None, Some("2024-02-30"), today).is_err());
    }

    #[test]
    fn test_years_outside_four_digits() {
        for value in ["10000-01-01", "0000-01-01", "0-06-01"] {
            assert_eq!(parse_date_arg(value).unwrap_err().value, value);
        }
        assert_eq!(parse_date_arg("9999-12-31").unwrap(), date(9999, 12, 31));
        assert_eq!(parse_date_arg("0001-01-01").unwrap(), date(1, 1, 1));

        let today = date(2024, 3, 14);
        assert!(DateRange::resolve(Some("2024-01-01"), Some("10000-01-01"), today).is_err());
    }

    #[test]
    fn test_month_window() {
        assert_eq!(
            DateRange::month(2024, 2),
            Some(DateRange::new(date(2024, 2, 1), date(2024, 2, 29)))
        );
        assert_eq!(
            DateRange::month(2023, 12),
            Some(DateRange::new(date(2023, 12, 1), date(2023, 12, 31)))
        );
        assert_eq!(DateRange::month(2024, 13), None);
        assert_eq!(DateRange::month(2024, 0), None);
        assert_eq!(DateRange::month(10000, 1), None);
        assert_eq!(DateRange::month(0, 1), None);
        assert_eq!(
            DateRange::month(9999, 12),
            Some(DateRange::new(date(9999, 12, 1), date(9999, 12, 31)))
        );
    }
}
