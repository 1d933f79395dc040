//! Employee model and compensation terms.
//!
//! Employees travel between the stores and the HTTP API as a flat
//! [`EmployeeRecord`], where `contract_type` decides which of the
//! compensation fields is authoritative. Decoding normalises that record
//! into [`Employee`], whose [`Compensation`] is a tagged union, so the
//! calculator never has to ignore one field depending on another.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{EngineError, EngineResult};

/// Maximum number of days a daily worker can be paid for in one month.
pub const MAX_WORKING_DAYS: u32 = 31;

/// Largest salary, daily rate or novelty amount the engine accepts
/// (10^15).
///
/// Base times [`MAX_WORKING_DAYS`], its contributions and any realistic
/// number of novelty sums stay far below [`Decimal::MAX`] under this bound.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xA4C6_8000, 0x0003_8D7E, 0, false, 0);

/// The kind of compensation contract an employee is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractType {
    /// A fixed salary per month.
    Monthly,
    /// A rate per day worked.
    Daily,
}

impl ContractType {
    /// Returns the wire name of the contract type.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContractType::Monthly => "monthly",
            ContractType::Daily => "daily",
        }
    }
}

impl FromStr for ContractType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "monthly" => Ok(ContractType::Monthly),
            "daily" => Ok(ContractType::Daily),
            other => Err(format!("unknown contract type: {}", other)),
        }
    }
}

impl fmt::Display for ContractType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether an employee takes part in payroll runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeStatus {
    /// Included in payroll runs.
    #[default]
    Active,
    /// Kept on record but skipped by payroll runs.
    Inactive,
}

/// The compensation terms of an employee.
///
/// Exactly one variant is authoritative for any employee, so a monthly
/// salary and a daily rate can never both contribute to the same payroll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Compensation {
    /// A fixed monthly salary.
    Monthly {
        /// The salary paid for a full month.
        base_salary: Decimal,
    },
    /// A daily rate multiplied by the days worked in the period.
    Daily {
        /// The amount paid per day worked.
        daily_rate: Decimal,
        /// Days worked in the target period.
        working_days: u32,
    },
}

impl Compensation {
    /// Returns the contract type this compensation belongs to.
    pub fn contract_type(&self) -> ContractType {
        match self {
            Compensation::Monthly { .. } => ContractType::Monthly,
            Compensation::Daily { .. } => ContractType::Daily,
        }
    }
}

/// The flat employee record exchanged with stores and API clients.
///
/// Every compensation field is optional here; [`Employee`] is the
/// normalised form used by the rest of the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    /// Unique identifier for the employee.
    pub id: String,
    /// National identification number, shown on payslips.
    #[serde(default)]
    pub identification: String,
    /// Given name.
    #[serde(default)]
    pub first_name: String,
    /// Family name.
    #[serde(default)]
    pub last_name: String,
    /// Contact email.
    #[serde(default)]
    pub email: String,
    /// Job title.
    #[serde(default)]
    pub position: String,
    /// Department name; empty when unassigned.
    #[serde(default)]
    pub department: String,
    /// `"monthly"` or `"daily"`; anything else is treated as monthly.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_type: Option<String>,
    /// Monthly salary, authoritative for monthly contracts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_salary: Option<Decimal>,
    /// Daily rate, authoritative for daily contracts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily_rate: Option<Decimal>,
    /// Days worked in the current period, for daily contracts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_days: Option<u32>,
    /// The date the employee was hired.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hire_date: Option<NaiveDate>,
    /// Whether the employee is active.
    #[serde(default)]
    pub status: EmployeeStatus,
}

/// An employee known to the payroll engine.
///
/// Serializes to and from the flat [`EmployeeRecord`] shape.
///
/// # Examples
///
/// ```
/// use payroll_engine::models::{Compensation, Employee};
/// use rust_decimal::Decimal;
///
/// let json = r#"{"id": "emp_001", "contract_type": "daily", "daily_rate": "50000", "working_days": 20}"#;
/// let employee: Employee = serde_json::from_str(json).unwrap();
/// assert_eq!(
///     employee.compensation,
///     Compensation::Daily { daily_rate: Decimal::from(50_000), working_days: 20 }
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "EmployeeRecord", into = "EmployeeRecord")]
pub struct Employee {
    /// Unique identifier for the employee.
    pub id: String,
    /// National identification number.
    pub identification: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact email.
    pub email: String,
    /// Job title.
    pub position: String,
    /// Department name; empty when unassigned.
    pub department: String,
    /// The date the employee was hired.
    pub hire_date: Option<NaiveDate>,
    /// Whether the employee is active.
    pub status: EmployeeStatus,
    /// The authoritative compensation terms.
    pub compensation: Compensation,
}

impl Employee {
    /// Creates an active monthly employee with empty descriptive fields.
    pub fn monthly(id: impl Into<String>, base_salary: Decimal) -> Self {
        Self::with_compensation(id, Compensation::Monthly { base_salary })
    }

    /// Creates an active daily employee with empty descriptive fields.
    pub fn daily(id: impl Into<String>, daily_rate: Decimal, working_days: u32) -> Self {
        Self::with_compensation(
            id,
            Compensation::Daily {
                daily_rate,
                working_days,
            },
        )
    }

    fn with_compensation(id: impl Into<String>, compensation: Compensation) -> Self {
        Employee {
            id: id.into(),
            identification: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            position: String::new(),
            department: String::new(),
            hire_date: None,
            status: EmployeeStatus::Active,
            compensation,
        }
    }

    /// Returns the first and last name joined by a space.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Returns true if the employee takes part in payroll runs.
    pub fn is_active(&self) -> bool {
        self.status == EmployeeStatus::Active
    }

    /// Checks the fields the employee store requires before accepting a record.
    pub fn validate(&self) -> EngineResult<()> {
        let required = [
            ("id", &self.id),
            ("identification", &self.identification),
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(invalid(field, "is required"));
            }
        }

        match &self.compensation {
            Compensation::Monthly { base_salary } => {
                if base_salary.is_sign_negative() {
                    return Err(invalid("base_salary", "cannot be negative"));
                }
                if *base_salary > MAX_AMOUNT {
                    return Err(invalid("base_salary", &format!("cannot exceed {}", MAX_AMOUNT)));
                }
            }
            Compensation::Daily {
                daily_rate,
                working_days,
            } => {
                if daily_rate.is_sign_negative() {
                    return Err(invalid("daily_rate", "cannot be negative"));
                }
                if *daily_rate > MAX_AMOUNT {
                    return Err(invalid("daily_rate", &format!("cannot exceed {}", MAX_AMOUNT)));
                }
                if *working_days > MAX_WORKING_DAYS {
                    return Err(invalid(
                        "working_days",
                        &format!("cannot exceed {}", MAX_WORKING_DAYS),
                    ));
                }
            }
        }

        Ok(())
    }
}

fn invalid(field: &str, message: &str) -> EngineError {
    EngineError::InvalidEmployee {
        field: field.to_string(),
        message: message.to_string(),
    }
}

impl From<EmployeeRecord> for Employee {
    fn from(record: EmployeeRecord) -> Self {
        let contract_type = match record.contract_type.as_deref() {
            None => ContractType::Monthly,
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                warn!(
                    employee_id = %record.id,
                    contract_type = %raw,
                    "Unrecognised contract type, treating as monthly"
                );
                ContractType::Monthly
            }),
        };

        let compensation = match contract_type {
            ContractType::Monthly => Compensation::Monthly {
                base_salary: record.base_salary.unwrap_or(Decimal::ZERO),
            },
            ContractType::Daily => Compensation::Daily {
                daily_rate: record.daily_rate.unwrap_or(Decimal::ZERO),
                working_days: record.working_days.unwrap_or(0),
            },
        };

        Employee {
            id: record.id,
            identification: record.identification,
            first_name: record.first_name,
            last_name: record.last_name,
            email: record.email,
            position: record.position,
            department: record.department,
            hire_date: record.hire_date,
            status: record.status,
            compensation,
        }
    }
}

impl From<Employee> for EmployeeRecord {
    fn from(employee: Employee) -> Self {
        let (base_salary, daily_rate, working_days) = match employee.compensation {
            Compensation::Monthly { base_salary } => (Some(base_salary), None, None),
            Compensation::Daily {
                daily_rate,
                working_days,
            } => (None, Some(daily_rate), Some(working_days)),
        };

        EmployeeRecord {
            contract_type: Some(employee.compensation.contract_type().to_string()),
            id: employee.id,
            identification: employee.identification,
            first_name: employee.first_name,
            last_name: employee.last_name,
            email: employee.email,
            position: employee.position,
            department: employee.department,
            base_salary,
            daily_rate,
            working_days,
            hire_date: employee.hire_date,
            status: employee.status,
        }
    }
}
