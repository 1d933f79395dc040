//! Core data models for the payroll engine.
//!
//! This module contains all the domain models used throughout the engine.

mod employee;
mod novelty;
mod payroll;
mod period;

pub use employee::{
    Compensation, ContractType, Employee, EmployeeRecord, EmployeeStatus, MAX_AMOUNT,
    MAX_WORKING_DAYS,
};
pub use novelty::{NoveltyCategory, NoveltyType, PayrollNovelty};
pub use payroll::{AuditStep, AuditTrace, AuditWarning, Payroll, PayrollCalculation};
pub use period::PayrollPeriod;
