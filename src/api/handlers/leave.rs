//! `/api/leave` handlers.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};

use crate::api::request::{
    ApproveQuery, EmployeeFilterQuery, RejectQuery, ReportQuery, YearQuery,
};
use crate::api::state::AppState;
use crate::calculation::{LeaveBalance, LeaveCalendar, LeaveReport};
use crate::models::LeaveStatus;
use crate::service::leave::{self, LeaveInput, LeaveView};

use super::{correlation_id, engine_failure, json_body, path_params, query_params, ApiResult};

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/leave", get(list_handler).post(create_handler))
        .route("/leave/pending", get(pending_handler))
        .route("/leave/status/:status", get(by_status_handler))
        .route("/leave/employee/:employee_id", get(by_employee_handler))
        .route("/leave/balance/:employee_id", get(balance_handler))
        .route("/leave/report", get(report_handler))
        .route("/leave/calendar/:year/:month", get(calendar_handler))
        .route("/leave/:id", get(get_handler).delete(delete_handler))
        .route("/leave/:id/approve", put(approve_handler))
        .route("/leave/:id/reject", put(reject_handler))
}

async fn create_handler(
    State(state): State<AppState>,
    payload: Result<Json<LeaveInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<LeaveView>)> {
    let correlation_id = correlation_id("create_leave");
    let input = json_body(correlation_id, payload)?;
    let view = leave::create_leave(state.store(), input)
        .await
        .map_err(engine_failure(correlation_id))?;
    Ok((StatusCode::CREATED, Json(view)))
}

async fn list_handler(State(state): State<AppState>) -> Json<Vec<LeaveView>> {
    correlation_id("list_leave");
    Json(leave::list_leave(state.store()).await)
}

async fn pending_handler(State(state): State<AppState>) -> Json<Vec<LeaveView>> {
    correlation_id("pending_leave");
    Json(leave::pending_leave(state.store()).await)
}

async fn by_status_handler(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<Vec<LeaveView>>> {
    let correlation_id = correlation_id("leave_by_status");
    let status: LeaveStatus = path_params(correlation_id, path)?
        .parse()
        .map_err(engine_failure(correlation_id))?;
    Ok(Json(leave::leave_by_status(state.store(), status).await))
}

async fn by_employee_handler(
    State(state): State<AppState>,
    path: Result<Path<u64>, PathRejection>,
) -> ApiResult<Json<Vec<LeaveView>>> {
    let correlation_id = correlation_id("leave_by_employee");
    let employee_id = path_params(correlation_id, path)?;
    leave::leave_by_employee(state.store(), employee_id)
        .await
        .map(Json)
        .map_err(engine_failure(correlation_id))
}

async fn balance_handler(
    State(state): State<AppState>,
    path: Result<Path<u64>, PathRejection>,
    query: Result<Query<YearQuery>, QueryRejection>,
) -> ApiResult<Json<LeaveBalance>> {
    let correlation_id = correlation_id("leave_balance");
    let employee_id = path_params(correlation_id, path)?;
    let YearQuery { year } = query_params(correlation_id, query)?;
    leave::leave_balance(state.store(), employee_id, year, state.config().allowances())
        .await
        .map(Json)
        .map_err(engine_failure(correlation_id))
}

async fn report_handler(
    State(state): State<AppState>,
    query: Result<Query<ReportQuery>, QueryRejection>,
) -> ApiResult<Json<LeaveReport>> {
    let correlation_id = correlation_id("leave_report");
    let params = query_params(correlation_id, query)?;
    leave::leave_report(
        state.store(),
        params.start_date,
        params.end_date,
        params.employee_id,
    )
    .await
    .map(Json)
    .map_err(engine_failure(correlation_id))
}

async fn calendar_handler(
    State(state): State<AppState>,
    path: Result<Path<(i32, u32)>, PathRejection>,
    query: Result<Query<EmployeeFilterQuery>, QueryRejection>,
) -> ApiResult<Json<LeaveCalendar>> {
    let correlation_id = correlation_id("leave_calendar");
    let (year, month) = path_params(correlation_id, path)?;
    let EmployeeFilterQuery { employee_id } = query_params(correlation_id, query)?;
    leave::leave_calendar(state.store(), year, month, employee_id)
        .await
        .map(Json)
        .map_err(engine_failure(correlation_id))
}

async fn get_handler(
    State(state): State<AppState>,
    path: Result<Path<u64>, PathRejection>,
) -> ApiResult<Json<LeaveView>> {
    let correlation_id = correlation_id("get_leave");
    let id = path_params(correlation_id, path)?;
    leave::get_leave(state.store(), id)
        .await
        .map(Json)
        .map_err(engine_failure(correlation_id))
}

async fn approve_handler(
    State(state): State<AppState>,
    path: Result<Path<u64>, PathRejection>,
    query: Result<Query<ApproveQuery>, QueryRejection>,
) -> ApiResult<Json<LeaveView>> {
    let correlation_id = correlation_id("approve_leave");
    let id = path_params(correlation_id, path)?;
    let ApproveQuery { approved_by } = query_params(correlation_id, query)?;
    leave::approve_leave(state.store(), id, approved_by)
        .await
        .map(Json)
        .map_err(engine_failure(correlation_id))
}

async fn reject_handler(
    State(state): State<AppState>,
    path: Result<Path<u64>, PathRejection>,
    query: Result<Query<RejectQuery>, QueryRejection>,
) -> ApiResult<Json<LeaveView>> {
    let correlation_id = correlation_id("reject_leave");
    let id = path_params(correlation_id, path)?;
    let RejectQuery { comments } = query_params(correlation_id, query)?;
    leave::reject_leave(state.store(), id, comments)
        .await
        .map(Json)
        .map_err(engine_failure(correlation_id))
}

async fn delete_handler(
    State(state): State<AppState>,
    path: Result<Path<u64>, PathRejection>,
) -> ApiResult<StatusCode> {
    let correlation_id = correlation_id("delete_leave");
    let id = path_params(correlation_id, path)?;
    leave::delete_leave(state.store(), id)
        .await
        .map_err(engine_failure(correlation_id))?;
    Ok(StatusCode::NO_CONTENT)
}
