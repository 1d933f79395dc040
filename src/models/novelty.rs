//! Payroll novelty model.
//!
//! A novelty is a single adjustment event (a bonus, a loan instalment, an
//! absence...) tied to one employee and one calendar date.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

use super::MAX_AMOUNT;

/// Which side of the payroll a novelty lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoveltyCategory {
    /// Adds to total earnings.
    Earning,
    /// Adds to novelty deductions.
    Deduction,
}

/// The kind of adjustment a novelty records.
///
/// The sign of a novelty is implied by its type, never by its amount.
/// Types outside the known set decode to [`NoveltyType::Unknown`], which
/// belongs to no category.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NoveltyType {
    /// One-off bonus.
    Bonus,
    /// Overtime pay.
    Overtime,
    /// Sales commission.
    Commission,
    /// Generic deduction.
    Deduction,
    /// Unpaid absence.
    Absence,
    /// Loan repayment.
    Loan,
    /// A type this engine does not recognise, kept verbatim.
    Unknown(String),
}

impl NoveltyType {
    /// Returns the category this type belongs to, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use payroll_engine::models::{NoveltyCategory, NoveltyType};
    ///
    /// assert_eq!(NoveltyType::Loan.category(), Some(NoveltyCategory::Deduction));
    /// assert_eq!(NoveltyType::Unknown("gift".into()).category(), None);
    /// ```
    pub fn category(&self) -> Option<NoveltyCategory> {
        match self {
            NoveltyType::Bonus | NoveltyType::Overtime | NoveltyType::Commission => {
                Some(NoveltyCategory::Earning)
            }
            NoveltyType::Deduction | NoveltyType::Absence | NoveltyType::Loan => {
                Some(NoveltyCategory::Deduction)
            }
            NoveltyType::Unknown(_) => None,
        }
    }

    /// Returns the wire name of the type.
    pub fn as_str(&self) -> &str {
        match self {
            NoveltyType::Bonus => "bonus",
            NoveltyType::Overtime => "overtime",
            NoveltyType::Commission => "commission",
            NoveltyType::Deduction => "deduction",
            NoveltyType::Absence => "absence",
            NoveltyType::Loan => "loan",
            NoveltyType::Unknown(raw) => raw,
        }
    }
}

impl From<String> for NoveltyType {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "bonus" => NoveltyType::Bonus,
            "overtime" => NoveltyType::Overtime,
            "commission" => NoveltyType::Commission,
            "deduction" => NoveltyType::Deduction,
            "absence" => NoveltyType::Absence,
            "loan" => NoveltyType::Loan,
            _ => NoveltyType::Unknown(raw),
        }
    }
}

impl From<NoveltyType> for String {
    fn from(novelty_type: NoveltyType) -> Self {
        match novelty_type {
            NoveltyType::Unknown(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for NoveltyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single payroll adjustment for one employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollNovelty {
    /// Unique identifier for the novelty.
    pub id: String,
    /// The employee this novelty belongs to.
    pub employee_id: String,
    /// The kind of adjustment.
    pub novelty_type: NoveltyType,
    /// The non-negative amount of the adjustment.
    pub amount: Decimal,
    /// The calendar date that places the novelty in a payroll period.
    #[serde(deserialize_with = "calendar_date::deserialize")]
    pub date: NaiveDate,
    /// Free text shown on payslips.
    #[serde(default)]
    pub description: String,
}

impl PayrollNovelty {
    /// Checks the fields the novelty store requires before accepting a record.
    pub fn validate(&self) -> EngineResult<()> {
        let fail = |message: &str| EngineError::InvalidNovelty {
            novelty_id: self.id.clone(),
            message: message.to_string(),
        };

        if self.employee_id.trim().is_empty() {
            return Err(fail("employee_id is required"));
        }
        if self.amount.is_sign_negative() {
            return Err(fail("amount cannot be negative"));
        }
        if self.amount > MAX_AMOUNT {
            return Err(fail(&format!("amount cannot exceed {}", MAX_AMOUNT)));
        }
        if let NoveltyType::Unknown(raw) = &self.novelty_type {
            return Err(fail(&format!("unknown novelty type '{}'", raw)));
        }

        Ok(())
    }
}

/// Calendar-date decoding for novelty dates.
///
/// Dates are naive calendar dates. Full RFC 3339 timestamps are accepted
/// and reduced to their UTC calendar date; no local timezone is applied.
mod calendar_date {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, de::Error};

    pub fn parse(raw: &str) -> Option<NaiveDate> {
        let raw = raw.trim();
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .or_else(|| {
                DateTime::parse_from_rfc3339(raw)
                    .ok()
                    .map(|dt| dt.with_timezone(&Utc).date_naive())
            })
            .or_else(|| {
                NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
                    .ok()
                    .map(|dt| dt.date())
            })
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| D::Error::custom(format!("invalid novelty date: {}", raw)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn novelty_json(novelty_type: &str, date: &str) -> String {
        format!(
            r#"{{
                "id": "nov_001",
                "employee_id": "emp_001",
                "novelty_type": "{}",
                "amount": "100000",
                "date": "{}",
                "description": "Quarterly target"
            }}"#,
            novelty_type, date
        )
    }

    #[test]
    fn test_deserialize_bonus_novelty() {
        let novelty: PayrollNovelty =
            serde_json::from_str(&novelty_json("bonus", "2025-03-15")).unwrap();

        assert_eq!(novelty.novelty_type, NoveltyType::Bonus);
        assert_eq!(novelty.amount, Decimal::from(100_000));
        assert_eq!(novelty.date, NaiveDate::from_ymd_opt(2025, 3, 15).unwrap());
        assert_eq!(novelty.description, "Quarterly target");
    }

    #[test]
    fn test_unknown_type_is_kept_verbatim() {
        let novelty: PayrollNovelty =
            serde_json::from_str(&novelty_json("gift_card", "2025-03-15")).unwrap();

        assert_eq!(
            novelty.novelty_type,
            NoveltyType::Unknown("gift_card".to_string())
        );
        assert_eq!(novelty.novelty_type.category(), None);

        let value = serde_json::to_value(&novelty).unwrap();
        assert_eq!(value["novelty_type"], "gift_card");
    }

    #[test]
    fn test_category_partition() {
        for earning in [NoveltyType::Bonus, NoveltyType::Overtime, NoveltyType::Commission] {
            assert_eq!(earning.category(), Some(NoveltyCategory::Earning));
        }
        for deduction in [NoveltyType::Deduction, NoveltyType::Absence, NoveltyType::Loan] {
            assert_eq!(deduction.category(), Some(NoveltyCategory::Deduction));
        }
    }

    #[test]
    fn test_timestamp_date_uses_utc_calendar_date() {
        let novelty: PayrollNovelty =
            serde_json::from_str(&novelty_json("bonus", "2025-03-31T22:30:00-05:00")).unwrap();

        // 22:30 at UTC-5 is 03:30 on April 1st in UTC.
        assert_eq!(novelty.date, NaiveDate::from_ymd_opt(2025, 4, 1).unwrap());
    }

    #[test]
    fn test_naive_timestamp_keeps_its_date() {
        let novelty: PayrollNovelty =
            serde_json::from_str(&novelty_json("loan", "2025-03-31T23:59:59")).unwrap();

        assert_eq!(novelty.date, NaiveDate::from_ymd_opt(2025, 3, 31).unwrap());
    }

    #[test]
    fn test_invalid_date_is_rejected() {
        let result: Result<PayrollNovelty, _> =
            serde_json::from_str(&novelty_json("bonus", "31/03/2025"));
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_rejects_negative_amount() {
        let mut novelty: PayrollNovelty =
            serde_json::from_str(&novelty_json("bonus", "2025-03-15")).unwrap();
        novelty.amount = Decimal::from(-5);

        match novelty.validate() {
            Err(EngineError::InvalidNovelty { novelty_id, message }) => {
                assert_eq!(novelty_id, "nov_001");
                assert_eq!(message, "amount cannot be negative");
            }
            other => panic!("Expected InvalidNovelty error, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_amount_above_limit() {
        let mut novelty: PayrollNovelty =
            serde_json::from_str(&novelty_json("bonus", "2025-03-15")).unwrap();
        novelty.amount = Decimal::MAX;

        assert!(matches!(
            novelty.validate(),
            Err(EngineError::InvalidNovelty { .. })
        ));

        novelty.amount = MAX_AMOUNT;
        assert!(novelty.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_unknown_type() {
        let novelty: PayrollNovelty =
            serde_json::from_str(&novelty_json("gift_card", "2025-03-15")).unwrap();
        assert!(novelty.validate().is_err());
    }
}
