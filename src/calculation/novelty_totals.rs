//! Novelty aggregation by category.
//!
//! Sums the selected novelties into the payroll's earning and deduction
//! lines. Novelties of an unknown type are left out of every sum; they are
//! logged and reported as audit warnings instead of failing the payroll.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::warn;

use crate::models::{AuditStep, AuditWarning, NoveltyType, PayrollNovelty};

/// Warning code for novelties whose type is not recognised.
pub const UNKNOWN_NOVELTY_TYPE: &str = "UNKNOWN_NOVELTY_TYPE";

/// Per-category sums of a set of novelties.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NoveltyTotals {
    /// Sum of `bonus` novelties.
    pub bonuses: Decimal,
    /// Sum of `overtime` novelties.
    pub overtime: Decimal,
    /// Sum of `commission` novelties.
    pub commissions: Decimal,
    /// Sum of `deduction`, `absence` and `loan` novelties.
    pub deductions: Decimal,
}

impl NoveltyTotals {
    /// Returns the sum of every earning category.
    pub fn earnings(&self) -> Decimal {
        self.bonuses + self.overtime + self.commissions
    }
}

/// The result of aggregating novelties, including audit output.
#[derive(Debug, Clone)]
pub struct NoveltyAggregationResult {
    /// The per-category sums.
    pub totals: NoveltyTotals,
    /// One warning per novelty that was left out.
    pub warnings: Vec<AuditWarning>,
    /// The audit step recording the aggregation.
    pub audit_step: AuditStep,
}

/// Sums novelties into their categories.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::aggregate_novelties;
/// use payroll_engine::models::{NoveltyType, PayrollNovelty};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let loan = PayrollNovelty {
///     id: "nov_001".to_string(),
///     employee_id: "emp_001".to_string(),
///     novelty_type: NoveltyType::Loan,
///     amount: Decimal::from(75_000),
///     date: NaiveDate::from_ymd_opt(2025, 3, 5).unwrap(),
///     description: "Laptop loan".to_string(),
/// };
///
/// let result = aggregate_novelties(&[&loan], 3);
/// assert_eq!(result.totals.deductions, Decimal::from(75_000));
/// assert_eq!(result.totals.earnings(), Decimal::ZERO);
/// ```
pub fn aggregate_novelties(
    novelties: &[&PayrollNovelty],
    step_number: u32,
) -> NoveltyAggregationResult {
    let mut totals = NoveltyTotals::default();
    let mut warnings = Vec::new();
    let mut ignored = Vec::new();

    for novelty in novelties {
        match &novelty.novelty_type {
            NoveltyType::Bonus => totals.bonuses += novelty.amount,
            NoveltyType::Overtime => totals.overtime += novelty.amount,
            NoveltyType::Commission => totals.commissions += novelty.amount,
            NoveltyType::Deduction | NoveltyType::Absence | NoveltyType::Loan => {
                totals.deductions += novelty.amount
            }
            NoveltyType::Unknown(raw) => {
                warn!(
                    novelty_id = %novelty.id,
                    employee_id = %novelty.employee_id,
                    novelty_type = %raw,
                    "Ignoring novelty of unknown type"
                );
                warnings.push(AuditWarning {
                    code: UNKNOWN_NOVELTY_TYPE.to_string(),
                    message: format!(
                        "Novelty '{}' has unknown type '{}' and was not counted",
                        novelty.id, raw
                    ),
                    severity: "medium".to_string(),
                });
                ignored.push(novelty.id.as_str());
            }
        }
    }

    let audit_step = AuditStep {
        step_number,
        rule_id: "novelty_aggregation".to_string(),
        rule_name: "Novelty Aggregation".to_string(),
        input: serde_json::json!({ "novelty_count": novelties.len() }),
        output: serde_json::json!({
            "bonuses": totals.bonuses.to_string(),
            "overtime": totals.overtime.to_string(),
            "commissions": totals.commissions.to_string(),
            "deductions": totals.deductions.to_string(),
            "ignored": ignored
        }),
        reasoning: format!(
            "Earnings novelties {} (bonuses {}, overtime {}, commissions {}); deduction novelties {}",
            totals.earnings(),
            totals.bonuses,
            totals.overtime,
            totals.commissions,
            totals.deductions
        ),
    };

    NoveltyAggregationResult {
        totals,
        warnings,
        audit_step,
    }
}
