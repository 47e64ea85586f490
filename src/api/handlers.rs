//! HTTP request handlers for the attendance API.
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
    routing::{delete, get, post, put},
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::attendance::{attendance_history, dashboard};
use crate::error::EngineError;
use crate::models::NewWorker;

use super::context::RequestContext;
use super::request::{
    AttendanceRequest, DateQuery, MonthQuery, RegisterWorkerRequest, ScheduleRequest,
    StartTimeRequest,
};
use super::response::{ApiError, ApiErrorResponse, CheckInResponse, CheckOutResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/attendance/check-in", post(check_in_handler))
        .route("/attendance/check-out", post(check_out_handler))
        .route("/workers/:id/pay", get(pay_handler))
        .route("/workers/:id/schedules", get(worker_schedules_handler))
        .route("/manager/dashboard", get(dashboard_handler))
        .route("/manager/attendance", get(attendance_history_handler))
        .route(
            "/manager/workers",
            get(list_workers_handler).post(register_worker_handler),
        )
        .route("/manager/workers/:id", delete(remove_worker_handler))
        .route("/manager/workers/:id/start-time", put(update_start_time_handler))
        .route(
            "/manager/schedules",
            get(schedules_on_date_handler).post(register_schedules_handler),
        )
        .with_state(state)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn bad_request(error: ApiError) -> Response {
    json_response(StatusCode::BAD_REQUEST, error)
}

fn engine_error_response(correlation_id: Uuid, err: EngineError) -> Response {
    warn!(
        correlation_id = %correlation_id,
        error = %err,
        kind = ?err.kind(),
        retryable = err.is_retryable(),
        "Request failed"
    );
    let api_error: ApiErrorResponse = err.into();
    json_response(api_error.status, api_error.error)
}

fn json_rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
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
    bad_request(error)
}

fn query_rejection_response(correlation_id: Uuid, rejection: QueryRejection) -> Response {
    let body_text = rejection.body_text();
    warn!(
        correlation_id = %correlation_id,
        error = %body_text,
        "Query string error"
    );
    bad_request(ApiError::validation_error(body_text))
}

/// Handler for POST /attendance/check-in.
async fn check_in_handler(
    State(state): State<AppState>,
    context: RequestContext,
    payload: Result<Json<AttendanceRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, role = ?context.role, "Processing check-in request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return json_rejection_response(correlation_id, rejection),
    };

    match state.guard().check_in(&request.worker_id).await {
        Ok(outcome) => {
            info!(
                correlation_id = %correlation_id,
                worker_id = %outcome.worker_id,
                is_late = outcome.is_late,
                "Check-in recorded"
            );
            json_response(StatusCode::OK, CheckInResponse::from(outcome))
        }
        Err(err) => engine_error_response(correlation_id, err),
    }
}

/// Handler for POST /attendance/check-out.
async fn check_out_handler(
    State(state): State<AppState>,
    context: RequestContext,
    payload: Result<Json<AttendanceRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, role = ?context.role, "Processing check-out request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return json_rejection_response(correlation_id, rejection),
    };

    match state.guard().check_out(&request.worker_id).await {
        Ok(outcome) => {
            info!(
                correlation_id = %correlation_id,
                worker_id = %outcome.worker_id,
                hours = ?outcome.interval.worked_hours(),
                "Check-out recorded"
            );
            json_response(StatusCode::OK, CheckOutResponse::from(outcome))
        }
        Err(err) => engine_error_response(correlation_id, err),
    }
}

/// Handler for GET /workers/:id/pay.
///
/// Computes the monthly pay summary on demand.
async fn pay_handler(
    State(state): State<AppState>,
    context: RequestContext,
    Path(worker_id): Path<String>,
    query: Result<Query<MonthQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(
        correlation_id = %correlation_id,
        role = ?context.role,
        worker_id = %worker_id,
        "Processing pay request"
    );

    let MonthQuery { year, month } = match query {
        Ok(Query(q)) => q,
        Err(rejection) => return query_rejection_response(correlation_id, rejection),
    };

    let start_time = Instant::now();
    match state.payroll().compute_monthly_pay(&worker_id, year, month).await {
        Ok(summary) => {
            info!(
                correlation_id = %correlation_id,
                worker_id = %worker_id,
                final_salary = summary.final_salary,
                duration_us = start_time.elapsed().as_micros(),
                "Pay calculation completed successfully"
            );
            json_response(StatusCode::OK, summary)
        }
        Err(err) => engine_error_response(correlation_id, err),
    }
}

/// Handler for GET /workers/:id/schedules.
async fn worker_schedules_handler(
    State(state): State<AppState>,
    context: RequestContext,
    Path(worker_id): Path<String>,
    query: Result<Query<MonthQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(
        correlation_id = %correlation_id,
        role = ?context.role,
        worker_id = %worker_id,
        "Processing schedule request"
    );

    let MonthQuery { year, month } = match query {
        Ok(Query(q)) => q,
        Err(rejection) => return query_rejection_response(correlation_id, rejection),
    };

    match state.store().schedules_for_month(&worker_id, year, month) {
        Ok(schedules) => json_response(StatusCode::OK, schedules),
        Err(err) => engine_error_response(correlation_id, err),
    }
}

/// Handler for GET /manager/dashboard.
async fn dashboard_handler(
    State(state): State<AppState>,
    context: RequestContext,
    query: Result<Query<DateQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    if let Err(err) = context.require_manager() {
        return engine_error_response(correlation_id, err);
    }

    let date = match query {
        Ok(Query(q)) => q.date.unwrap_or_else(|| state.clock().now().date()),
        Err(rejection) => return query_rejection_response(correlation_id, rejection),
    };
    info!(correlation_id = %correlation_id, date = %date, "Building dashboard");

    match dashboard(state.store(), date).await {
        Ok(view) => json_response(StatusCode::OK, view),
        Err(err) => engine_error_response(correlation_id, err),
    }
}

/// Handler for GET /manager/workers.
async fn list_workers_handler(State(state): State<AppState>, context: RequestContext) -> Response {
    let correlation_id = Uuid::new_v4();
    if let Err(err) = context.require_manager() {
        return engine_error_response(correlation_id, err);
    }

    json_response(StatusCode::OK, state.store().workers())
}

/// Handler for POST /manager/workers.
async fn register_worker_handler(
    State(state): State<AppState>,
    context: RequestContext,
    payload: Result<Json<RegisterWorkerRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    if let Err(err) = context.require_manager() {
        return engine_error_response(correlation_id, err);
    }

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return json_rejection_response(correlation_id, rejection),
    };

    let default_wage = state.config().service().default_hourly_wage;
    let result = NewWorker::try_from(request)
        .and_then(|new_worker| state.store().register_worker(new_worker.into_worker(default_wage)));

    match result {
        Ok(worker) => {
            info!(
                correlation_id = %correlation_id,
                worker_id = %worker.id,
                hourly_wage = worker.hourly_wage,
                "Worker registered"
            );
            json_response(StatusCode::CREATED, worker)
        }
        Err(err) => engine_error_response(correlation_id, err),
    }
}

/// Handler for PUT /manager/workers/:id/start-time.
///
/// Later check-ins are judged against the new time; recorded sessions keep
/// their flag.
async fn update_start_time_handler(
    State(state): State<AppState>,
    context: RequestContext,
    Path(worker_id): Path<String>,
    payload: Result<Json<StartTimeRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    if let Err(err) = context.require_manager() {
        return engine_error_response(correlation_id, err);
    }

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return json_rejection_response(correlation_id, rejection),
    };

    match state
        .store()
        .set_scheduled_start_time(&worker_id, Some(request.scheduled_start_time))
        .await
    {
        Ok(worker) => {
            info!(
                correlation_id = %correlation_id,
                worker_id = %worker.id,
                "Start time updated"
            );
            json_response(StatusCode::OK, worker)
        }
        Err(err) => engine_error_response(correlation_id, err),
    }
}

/// Handler for DELETE /manager/workers/:id.
///
/// Removes the worker with all of their attendance and schedules.
async fn remove_worker_handler(
    State(state): State<AppState>,
    context: RequestContext,
    Path(worker_id): Path<String>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    if let Err(err) = context.require_manager() {
        return engine_error_response(correlation_id, err);
    }

    match state.store().remove_worker(&worker_id).await {
        Ok(worker) => {
            info!(
                correlation_id = %correlation_id,
                worker_id = %worker.id,
                "Worker deleted"
            );
            json_response(StatusCode::OK, worker)
        }
        Err(err) => engine_error_response(correlation_id, err),
    }
}

/// Handler for GET /manager/attendance.
async fn attendance_history_handler(State(state): State<AppState>, context: RequestContext) -> Response {
    let correlation_id = Uuid::new_v4();
    if let Err(err) = context.require_manager() {
        return engine_error_response(correlation_id, err);
    }

    match attendance_history(state.store()).await {
        Ok(records) => {
            info!(
                correlation_id = %correlation_id,
                records = records.len(),
                "Attendance history listed"
            );
            json_response(StatusCode::OK, records)
        }
        Err(err) => engine_error_response(correlation_id, err),
    }
}

/// Handler for POST /manager/schedules.
///
/// Creates one schedule entry per day of the inclusive date range.
async fn register_schedules_handler(
    State(state): State<AppState>,
    context: RequestContext,
    payload: Result<Json<ScheduleRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    if let Err(err) = context.require_manager() {
        return engine_error_response(correlation_id, err);
    }

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return json_rejection_response(correlation_id, rejection),
    };

    let worker_id = request.worker_id.trim().to_string();
    let result = request.into_schedules().and_then(|schedules| {
        state.store().add_schedules(&worker_id, &schedules)?;
        Ok(schedules)
    });

    match result {
        Ok(schedules) => {
            info!(
                correlation_id = %correlation_id,
                worker_id = %worker_id,
                days = schedules.len(),
                "Schedules registered"
            );
            json_response(StatusCode::CREATED, schedules)
        }
        Err(err) => engine_error_response(correlation_id, err),
    }
}

/// Handler for GET /manager/schedules.
async fn schedules_on_date_handler(
    State(state): State<AppState>,
    context: RequestContext,
    query: Result<Query<DateQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    if let Err(err) = context.require_manager() {
        return engine_error_response(correlation_id, err);
    }

    let date = match query {
        Ok(Query(q)) => q.date.unwrap_or_else(|| state.clock().now().date()),
        Err(rejection) => return query_rejection_response(correlation_id, rejection),
    };

    json_response(StatusCode::OK, state.store().schedules_on(date))
}
