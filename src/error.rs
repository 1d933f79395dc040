//! Error types for the payroll engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every error condition the engine, its stores, and its exporters can
//! produce. The calculator itself is infallible on validated input; these
//! errors come from validation, configuration, batch runs, storage and export.

use thiserror::Error;

/// The main error type for the payroll engine.
///
/// # Example
///
/// ```
/// use payroll_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/engine.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/engine.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// An employee record failed validation.
    #[error("Invalid employee field '{field}': {message}")]
    InvalidEmployee {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// A novelty record failed validation.
    #[error("Invalid novelty '{novelty_id}': {message}")]
    InvalidNovelty {
        /// The ID of the invalid novelty.
        novelty_id: String,
        /// A description of what made the novelty invalid.
        message: String,
    },

    /// A payroll period was outside the calendar.
    #[error("Invalid payroll period {month}/{year}: month must be between 1 and 12")]
    InvalidPeriod {
        /// The requested month.
        month: u32,
        /// The requested year.
        year: i32,
    },

    /// No employee exists with the given ID.
    #[error("Employee not found: {employee_id}")]
    EmployeeNotFound {
        /// The ID that was looked up.
        employee_id: String,
    },

    /// No payroll has been processed for the employee in the period.
    #[error("Payroll not found: {payroll_id}")]
    PayrollNotFound {
        /// The composite payroll key that was looked up.
        payroll_id: String,
    },

    /// A payroll run was requested but no employee is active.
    #[error("No active employees to process for {month}/{year}")]
    NoActiveEmployees {
        /// The period month.
        month: u32,
        /// The period year.
        year: i32,
    },

    /// A batch calculation task did not complete.
    #[error("Payroll calculation failed: {message}")]
    Calculation {
        /// A description of the failure.
        message: String,
    },

    /// A store rejected a read or write.
    #[error("Storage error: {message}")]
    Storage {
        /// A description of the storage failure.
        message: String,
    },

    /// A report could not be exported.
    #[error("Export failed: {message}")]
    Export {
        /// A description of the export failure.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

impl From<csv::Error> for EngineError {
    fn from(error: csv::Error) -> Self {
        EngineError::Export {
            message: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = EngineError::ConfigParseError {
            path: "/config/engine.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/engine.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_invalid_employee_displays_field_and_message() {
        let error = EngineError::InvalidEmployee {
            field: "working_days".to_string(),
            message: "cannot exceed 31".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid employee field 'working_days': cannot exceed 31"
        );
    }

    #[test]
    fn test_invalid_period_displays_month_and_year() {
        let error = EngineError::InvalidPeriod {
            month: 13,
            year: 2025,
        };
        assert_eq!(
            error.to_string(),
            "Invalid payroll period 13/2025: month must be between 1 and 12"
        );
    }

    #[test]
    fn test_no_active_employees_displays_period() {
        let error = EngineError::NoActiveEmployees {
            month: 3,
            year: 2025,
        };
        assert_eq!(error.to_string(), "No active employees to process for 3/2025");
    }

    #[test]
    fn test_payroll_not_found_displays_key() {
        let error = EngineError::PayrollNotFound {
            payroll_id: "emp_001-3-2025".to_string(),
        };
        assert_eq!(error.to_string(), "Payroll not found: emp_001-3-2025");
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_storage_error() -> EngineResult<()> {
            Err(EngineError::Storage {
                message: "duplicate key".to_string(),
            })
        }

        fn propagates_error() -> EngineResult<()> {
            returns_storage_error()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
