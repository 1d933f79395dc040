//! Payroll period model.
//!
//! A payroll period is a calendar month. Novelties belong to a period when
//! their calendar date falls inside that month.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::error::{EngineError, EngineResult};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// A (month, year) pair identifying one payroll run.
///
/// # Example
///
/// ```
/// use payroll_engine::models::PayrollPeriod;
/// use chrono::NaiveDate;
///
/// let period = PayrollPeriod::new(3, 2025).unwrap();
///
/// assert!(period.contains(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()));
/// assert!(period.contains(NaiveDate::from_ymd_opt(2025, 3, 31).unwrap()));
/// assert!(!period.contains(NaiveDate::from_ymd_opt(2025, 2, 28).unwrap()));
/// assert!(!period.contains(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()));
/// assert_eq!(period.to_string(), "March 2025");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PayrollPeriod {
    first_day: NaiveDate,
}

impl PayrollPeriod {
    /// Creates a period, rejecting months outside 1-12 and years chrono
    /// cannot represent.
    pub fn new(month: u32, year: i32) -> EngineResult<Self> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(|first_day| Self { first_day })
            .ok_or(EngineError::InvalidPeriod { month, year })
    }

    /// Returns the period a date falls in.
    pub fn of(date: NaiveDate) -> Self {
        Self {
            first_day: date.with_day(1).unwrap_or(date),
        }
    }

    /// Returns the month, 1-indexed.
    pub fn month(&self) -> u32 {
        self.first_day.month()
    }

    /// Returns the year.
    pub fn year(&self) -> i32 {
        self.first_day.year()
    }

    /// Returns the first calendar day of the period.
    pub fn first_day(&self) -> NaiveDate {
        self.first_day
    }

    /// Returns true if the date falls in this calendar month and year.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }

    /// Returns the English name of the month.
    pub fn month_name(&self) -> &'static str {
        MONTH_NAMES[self.first_day.month0() as usize]
    }
}

impl fmt::Display for PayrollPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.month_name(), self.year())
    }
}

impl Serialize for PayrollPeriod {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("PayrollPeriod", 2)?;
        state.serialize_field("month", &self.month())?;
        state.serialize_field("year", &self.year())?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_new_accepts_every_calendar_month() {
        for month in 1..=12 {
            let period = PayrollPeriod::new(month, 2025).unwrap();
            assert_eq!(period.month(), month);
            assert_eq!(period.year(), 2025);
        }
    }

    #[test]
    fn test_new_rejects_month_zero_and_thirteen() {
        for month in [0, 13] {
            match PayrollPeriod::new(month, 2025) {
                Err(EngineError::InvalidPeriod { month: m, year }) => {
                    assert_eq!(m, month);
                    assert_eq!(year, 2025);
                }
                other => panic!("Expected InvalidPeriod error, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_contains_month_boundaries() {
        let period = PayrollPeriod::new(3, 2025).unwrap();

        assert!(!period.contains(date(2025, 2, 28)));
        assert!(period.contains(date(2025, 3, 1)));
        assert!(period.contains(date(2025, 3, 31)));
        assert!(!period.contains(date(2025, 4, 1)));
    }

    #[test]
    fn test_contains_requires_matching_year() {
        let period = PayrollPeriod::new(3, 2025).unwrap();
        assert!(!period.contains(date(2026, 3, 10)));
    }

    #[test]
    fn test_leap_day_belongs_to_february() {
        let period = PayrollPeriod::new(2, 2024).unwrap();
        assert!(period.contains(date(2024, 2, 29)));
    }

    #[test]
    fn test_of_returns_enclosing_period() {
        let period = PayrollPeriod::of(date(2025, 12, 31));
        assert_eq!(period, PayrollPeriod::new(12, 2025).unwrap());
        assert_eq!(period.first_day(), date(2025, 12, 1));
    }

    #[test]
    fn test_serialize_as_month_and_year() {
        let period = PayrollPeriod::new(7, 2025).unwrap();
        let value = serde_json::to_value(period).unwrap();
        assert_eq!(value, serde_json::json!({"month": 7, "year": 2025}));
    }

    #[test]
    fn test_display_uses_month_name() {
        let period = PayrollPeriod::new(12, 2024).unwrap();
        assert_eq!(period.to_string(), "December 2024");
    }
}
