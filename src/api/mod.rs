//! HTTP API module for the payroll engine.
//!
//! This module provides the REST API endpoints for calculating single
//! payrolls, running whole periods, and fetching payslips and reports.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{CalculationRequest, PayslipQuery, PeriodQuery, RunRequest, SessionQuery};
pub use response::{ApiError, ApiErrorResponse, DeleteResponse, SessionResponse};
pub use state::AppState;
