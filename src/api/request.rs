//! Request types for the payroll engine API.
//!
//! This module defines the JSON bodies and query strings the endpoints
//! accept.

use serde::{Deserialize, Serialize};

use crate::error::EngineResult;
use crate::models::{Employee, PayrollNovelty, PayrollPeriod};

/// Request body for the `/calculate` endpoint.
///
/// The employee uses the flat store record; `novelties` may include records
/// of other periods, which are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationRequest {
    /// The employee to calculate.
    pub employee: Employee,
    /// Novelties recorded for the employee.
    #[serde(default)]
    pub novelties: Vec<PayrollNovelty>,
    /// Period month, 1 to 12.
    pub month: u32,
    /// Period year.
    pub year: i32,
}

impl CalculationRequest {
    /// Returns the requested period.
    pub fn period(&self) -> EngineResult<PayrollPeriod> {
        PayrollPeriod::new(self.month, self.year)
    }
}

/// Request body for the `/payrolls/run` endpoint.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RunRequest {
    /// Period month, 1 to 12.
    pub month: u32,
    /// Period year.
    pub year: i32,
}

impl RunRequest {
    /// Returns the requested period.
    pub fn period(&self) -> EngineResult<PayrollPeriod> {
        PayrollPeriod::new(self.month, self.year)
    }
}

/// `?month=&year=` query string.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PeriodQuery {
    /// Period month, 1 to 12.
    pub month: u32,
    /// Period year.
    pub year: i32,
}

impl PeriodQuery {
    /// Returns the requested period.
    pub fn period(&self) -> EngineResult<PayrollPeriod> {
        PayrollPeriod::new(self.month, self.year)
    }
}

/// Query string of the payslip endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayslipQuery {
    /// Period month, 1 to 12.
    pub month: u32,
    /// Period year.
    pub year: i32,
    /// `html` for a printable document; JSON otherwise.
    #[serde(default)]
    pub format: Option<String>,
}

impl PayslipQuery {
    /// Returns the requested period.
    pub fn period(&self) -> EngineResult<PayrollPeriod> {
        PayrollPeriod::new(self.month, self.year)
    }

    /// Returns true if an HTML document was requested.
    pub fn wants_html(&self) -> bool {
        self.format
            .as_deref()
            .is_some_and(|f| f.eq_ignore_ascii_case("html"))
    }
}

/// Query string of the session endpoint.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SessionQuery {
    /// Skip the cached answer.
    #[serde(default)]
    pub refresh: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Compensation, NoveltyType};
    use rust_decimal::Decimal;

    #[test]
    fn test_deserialize_calculation_request() {
        let json = r#"{
            "employee": {
                "id": "emp_001",
                "identification": "1020304050",
                "first_name": "Laura",
                "last_name": "Gomez",
                "contract_type": "monthly",
                "base_salary": "2000000"
            },
            "novelties": [
                {
                    "id": "nov_001",
                    "employee_id": "emp_001",
                    "novelty_type": "bonus",
                    "amount": "100000",
                    "date": "2025-03-05"
                }
            ],
            "month": 3,
            "year": 2025
        }"#;

        let request: CalculationRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.employee.id, "emp_001");
        assert_eq!(
            request.employee.compensation,
            Compensation::Monthly {
                base_salary: Decimal::from(2_000_000)
            }
        );
        assert_eq!(request.novelties[0].novelty_type, NoveltyType::Bonus);
        assert_eq!(request.period().unwrap().month(), 3);
    }

    #[test]
    fn test_novelties_default_to_empty() {
        let json = r#"{"employee": {"id": "emp_001"}, "month": 1, "year": 2025}"#;

        let request: CalculationRequest = serde_json::from_str(json).unwrap();
        assert!(request.novelties.is_empty());
    }

    #[test]
    fn test_period_query_rejects_month_13() {
        let query = PeriodQuery {
            month: 13,
            year: 2025,
        };
        assert!(query.period().is_err());
    }

    #[test]
    fn test_payslip_query_format() {
        let html = PayslipQuery {
            month: 3,
            year: 2025,
            format: Some("HTML".to_string()),
        };
        let json = PayslipQuery {
            month: 3,
            year: 2025,
            format: None,
        };

        assert!(html.wants_html());
        assert!(!json.wants_html());
    }
}
