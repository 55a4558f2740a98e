//! Calendar month, normalized to its first day

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Local, Months, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::DomainError;

static MONTH_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})-(\d{2})(?:-(\d{2}))?$").unwrap());

/// A calendar month, always stored as day 1 of that month
///
/// Serializes as `YYYY-MM-01` and accepts `YYYY-MM` or `YYYY-MM-DD` on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month(NaiveDate);

impl Month {
    /// Truncate a date to its month
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date.with_day(1).unwrap_or(date))
    }

    /// The month containing today's local date
    pub fn current() -> Self {
        Self::from_date(Local::now().date_naive())
    }

    /// Parse `YYYY-MM` or `YYYY-MM-DD`, discarding the day
    pub fn parse(input: &str) -> Result<Self, DomainError> {
        let input = input.trim();
        let invalid = || {
            DomainError::validation(format!(
                "Invalid month format '{}'. Use 'YYYY-MM' or 'YYYY-MM-DD'.",
                input
            ))
        };

        let captures = MONTH_PATTERN.captures(input).ok_or_else(invalid)?;
        let year: i32 = captures[1].parse().map_err(|_| invalid())?;
        let month: u32 = captures[2].parse().map_err(|_| invalid())?;

        if let Some(day) = captures.get(3) {
            let day: u32 = day.as_str().parse().map_err(|_| invalid())?;
            NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)?;
        }

        NaiveDate::from_ymd_opt(year, month, 1)
            .map(Self)
            .ok_or_else(invalid)
    }

    /// Parse an optional month, defaulting to the current one
    pub fn parse_or_current(input: Option<&str>) -> Result<Self, DomainError> {
        match input.map(str::trim).filter(|s| !s.is_empty()) {
            Some(value) => Self::parse(value),
            None => Ok(Self::current()),
        }
    }

    pub fn first_day(&self) -> NaiveDate {
        self.0
    }

    /// Day 1 of the following month; the exclusive end of this month
    pub fn next_month_start(&self) -> NaiveDate {
        self.0
            .checked_add_months(Months::new(1))
            .unwrap_or(NaiveDate::MAX)
    }

    /// Whether a date falls in `[first_day, next_month_start)`
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.first_day() && date < self.next_month_start()
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for Month {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<NaiveDate> for Month {
    fn from(date: NaiveDate) -> Self {
        Self::from_date(date)
    }
}

impl Serialize for Month {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.format("%Y-%m-%d").to_string())
    }
}

impl<'de> Deserialize<'de> for Month {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(|e| serde::de::Error::custom(e.message()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_year_month_and_full_date_normalize_to_same_month() {
        let short = Month::parse("2024-03").unwrap();
        let long = Month::parse("2024-03-15").unwrap();

        assert_eq!(short, long);
        assert_eq!(short.first_day(), date(2024, 3, 1));
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let month = Month::from_date(date(2024, 3, 1));
        assert_eq!(Month::from_date(month.first_day()), month);
        assert_eq!(Month::parse(&month.first_day().to_string()).unwrap(), month);
    }

    #[test]
    fn test_from_date_truncates_day() {
        assert_eq!(Month::from_date(date(2023, 11, 30)).first_day(), date(2023, 11, 1));
    }

    #[test]
    fn test_invalid_formats_are_rejected() {
        for input in ["2024/03", "March 2024", "2024-13", "2024-02-30", "24-03", ""] {
            let err = Month::parse(input).unwrap_err();
            assert!(matches!(err, DomainError::Validation { .. }), "{input}");
            assert!(err.message().contains("'YYYY-MM' or 'YYYY-MM-DD'"));
        }
    }

    #[test]
    fn test_next_month_start_rolls_over_december() {
        let december = Month::parse("2023-12").unwrap();
        assert_eq!(december.next_month_start(), date(2024, 1, 1));
        assert!(december.contains(date(2023, 12, 31)));
        assert!(!december.contains(date(2024, 1, 1)));
    }

    #[test]
    fn test_display_and_serde() {
        let month = Month::parse("2024-03-09").unwrap();

        assert_eq!(month.to_string(), "2024-03");
        assert_eq!(serde_json::to_string(&month).unwrap(), "\"2024-03-01\"");
        assert_eq!(serde_json::from_str::<Month>("\"2024-03\"").unwrap(), month);
        assert!(serde_json::from_str::<Month>("\"03-2024\"").is_err());
    }

    #[test]
    fn test_parse_or_current_defaults_blank_input() {
        assert_eq!(Month::parse_or_current(None).unwrap(), Month::current());
        assert_eq!(Month::parse_or_current(Some("  ")).unwrap(), Month::current());
        assert_eq!(
            Month::parse_or_current(Some("2022-01")).unwrap(),
            Month::parse("2022-01").unwrap()
        );
    }
}
