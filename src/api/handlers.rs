//! HTTP request handlers for the payroll engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::calculate_payroll_with_trace;
use crate::error::{EngineError, EngineResult};
use crate::models::{NoveltyType, Payroll, PayrollCalculation};
use crate::payslip::Payslip;
use crate::report::PeriodReport;
use crate::store::{EmployeeFilter, EmployeeStore, NoveltyStore, PayrollStore};

use super::request::{CalculationRequest, PayslipQuery, PeriodQuery, RunRequest, SessionQuery};
use super::response::{ApiError, ApiErrorResponse, DeleteResponse, SessionResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/calculate", post(calculate_handler))
        .route("/employees", get(employees_handler))
        .route("/payrolls", get(list_payrolls_handler).delete(delete_payrolls_handler))
        .route("/payrolls/run", post(run_handler))
        .route("/payrolls/:employee_id/payslip", get(payslip_handler))
        .route("/reports", get(report_handler))
        .route("/reports/csv", get(report_csv_handler))
        .route("/session", get(session_handler))
        .with_state(state)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (status, [(header::CONTENT_TYPE, "application/json")], Json(body)).into_response()
}

fn engine_error(correlation_id: Uuid, err: EngineError) -> Response {
    warn!(correlation_id = %correlation_id, error = %err, "Request failed");
    ApiErrorResponse::from(err).into_response()
}

fn json_rejection(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // Get the body text which contains the detailed error from serde
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    ApiErrorResponse::bad_request(error).into_response()
}

fn query_rejection(correlation_id: Uuid, rejection: QueryRejection) -> Response {
    let body_text = rejection.body_text();
    warn!(
        correlation_id = %correlation_id,
        error = %body_text,
        "Query string error"
    );
    ApiErrorResponse::bad_request(ApiError::invalid_query(body_text)).into_response()
}

/// Handler for POST /calculate endpoint.
///
/// Calculates one employee's payroll without storing it and returns the
/// payroll together with its audit trace.
async fn calculate_handler(
    State(state): State<AppState>,
    payload: Result<Json<CalculationRequest>, JsonRejection>,
) -> Response {
    // Generate correlation ID for request tracking
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing calculation request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return json_rejection(correlation_id, rejection),
    };

    let start_time = Instant::now();
    match perform_calculation(&state, &request) {
        Ok(result) => {
            info!(
                correlation_id = %correlation_id,
                employee_id = %request.employee.id,
                novelties = request.novelties.len(),
                net_salary = %result.payroll.net_salary,
                duration_us = start_time.elapsed().as_micros() as u64,
                "Calculation completed successfully"
            );
            json_response(StatusCode::OK, result)
        }
        Err(err) => engine_error(correlation_id, err),
    }
}

fn perform_calculation(
    state: &AppState,
    request: &CalculationRequest,
) -> EngineResult<PayrollCalculation> {
    let period = request.period()?;
    request.employee.validate()?;
    for novelty in &request.novelties {
        // Unknown types surface as audit warnings instead.
        if !matches!(novelty.novelty_type, NoveltyType::Unknown(_)) {
            novelty.validate()?;
        }
    }

    Ok(calculate_payroll_with_trace(
        &request.employee,
        &request.novelties,
        period,
        &state.config().calculation,
    ))
}

/// Handler for GET /employees endpoint.
///
/// Lists active employees, optionally narrowed by `department` and `search`.
async fn employees_handler(
    State(state): State<AppState>,
    query: Result<Query<EmployeeFilter>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let filter = match query {
        Ok(Query(filter)) => filter,
        Err(rejection) => return query_rejection(correlation_id, rejection),
    };

    match state.store().active_employees(&filter).await {
        Ok(employees) => json_response(StatusCode::OK, employees),
        Err(err) => engine_error(correlation_id, err),
    }
}

/// Handler for POST /payrolls/run endpoint.
///
/// Runs the payroll of every active employee for a period, replacing any
/// payrolls previously stored for it.
async fn run_handler(
    State(state): State<AppState>,
    payload: Result<Json<RunRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return json_rejection(correlation_id, rejection),
    };
    info!(
        correlation_id = %correlation_id,
        month = request.month,
        year = request.year,
        "Processing payroll run request"
    );

    let period = match request.period() {
        Ok(period) => period,
        Err(err) => return engine_error(correlation_id, err),
    };

    match state.runner().run(period).await {
        Ok(summary) => {
            info!(
                correlation_id = %correlation_id,
                run_id = %summary.run_id,
                stored = summary.payrolls.len(),
                failed = summary.errors.len(),
                "Payroll run completed"
            );
            json_response(StatusCode::OK, summary)
        }
        Err(err) => engine_error(correlation_id, err),
    }
}

/// Handler for GET /payrolls endpoint.
async fn list_payrolls_handler(
    State(state): State<AppState>,
    query: Result<Query<PeriodQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let period = match query.map(|Query(q)| q) {
        Ok(q) => match q.period() {
            Ok(period) => period,
            Err(err) => return engine_error(correlation_id, err),
        },
        Err(rejection) => return query_rejection(correlation_id, rejection),
    };

    match state.store().by_period(period).await {
        Ok(payrolls) => json_response(StatusCode::OK, payrolls),
        Err(err) => engine_error(correlation_id, err),
    }
}

/// Handler for DELETE /payrolls endpoint.
async fn delete_payrolls_handler(
    State(state): State<AppState>,
    query: Result<Query<PeriodQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let period = match query.map(|Query(q)| q) {
        Ok(q) => match q.period() {
            Ok(period) => period,
            Err(err) => return engine_error(correlation_id, err),
        },
        Err(rejection) => return query_rejection(correlation_id, rejection),
    };

    match state.runner().clear(period).await {
        Ok(deleted) => {
            info!(correlation_id = %correlation_id, period = %period, deleted, "Period deleted");
            json_response(StatusCode::OK, DeleteResponse { deleted })
        }
        Err(err) => engine_error(correlation_id, err),
    }
}

/// Handler for GET /payrolls/:employee_id/payslip endpoint.
///
/// Returns the payslip as JSON, or as an HTML attachment with
/// `format=html`.
async fn payslip_handler(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
    query: Result<Query<PayslipQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let query = match query {
        Ok(Query(q)) => q,
        Err(rejection) => return query_rejection(correlation_id, rejection),
    };

    let payslip = match build_payslip(&state, &employee_id, &query).await {
        Ok(payslip) => payslip,
        Err(err) => return engine_error(correlation_id, err),
    };
    info!(
        correlation_id = %correlation_id,
        employee_id = %employee_id,
        period = %payslip.period,
        "Payslip generated"
    );

    if query.wants_html() {
        (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/html; charset=utf-8".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", payslip.filename()),
                ),
            ],
            payslip.render_html(),
        )
            .into_response()
    } else {
        json_response(StatusCode::OK, payslip)
    }
}

async fn build_payslip(
    state: &AppState,
    employee_id: &str,
    query: &PayslipQuery,
) -> EngineResult<Payslip> {
    let period = query.period()?;
    let store = state.store();

    let employee = store.get_employee(employee_id).await?;
    let payroll = store.get_payroll(&Payroll::key(employee_id, period)).await?;
    let novelties = store.list_novelties().await?;

    Payslip::build(&payroll, &employee, &novelties, &state.config().company_name)
}

async fn build_report(state: &AppState, query: &PeriodQuery) -> EngineResult<PeriodReport> {
    let period = query.period()?;
    let employees = state.store().list_employees().await?;
    let payrolls = state.store().by_period(period).await?;
    Ok(PeriodReport::build(period, &employees, &payrolls))
}

/// Handler for GET /reports endpoint.
async fn report_handler(
    State(state): State<AppState>,
    query: Result<Query<PeriodQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let query = match query {
        Ok(Query(q)) => q,
        Err(rejection) => return query_rejection(correlation_id, rejection),
    };

    match build_report(&state, &query).await {
        Ok(report) => json_response(StatusCode::OK, report),
        Err(err) => engine_error(correlation_id, err),
    }
}

/// Handler for GET /reports/csv endpoint.
async fn report_csv_handler(
    State(state): State<AppState>,
    query: Result<Query<PeriodQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let query = match query {
        Ok(Query(q)) => q,
        Err(rejection) => return query_rejection(correlation_id, rejection),
    };

    let exported = build_report(&state, &query)
        .await
        .and_then(|report| Ok((report.csv_filename(), report.to_csv_string()?)));

    match exported {
        Ok((filename, csv)) => {
            info!(correlation_id = %correlation_id, filename = %filename, "Report exported");
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{}\"", filename),
                    ),
                ],
                csv,
            )
                .into_response()
        }
        Err(err) => engine_error(correlation_id, err),
    }
}

/// Handler for GET /session endpoint.
async fn session_handler(
    State(state): State<AppState>,
    query: Option<Query<SessionQuery>>,
) -> Response {
    let refresh = query.map(|Query(q)| q.refresh).unwrap_or_default();
    let user = state.session().current(refresh).await;
    json_response(StatusCode::OK, SessionResponse::from(user))
}
