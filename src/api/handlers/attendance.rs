//! `/api/attendance` handlers.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use crate::api::request::{
    DateRangeQuery, EmployeeFilterQuery, MonthQuery, OptionalMonthQuery, ReportQuery,
};
use crate::api::state::AppState;
use crate::calculation::{AttendanceCalendar, AttendanceReport, MonthlyAttendanceSummary};
use crate::service::attendance::{
    self, AttendanceInput, AttendanceUpdate, AttendanceView, CheckInInput,
    EmployeeAttendanceOverview,
};

use super::{correlation_id, engine_failure, json_body, path_params, query_params, ApiResult};

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/attendance", get(list_handler).post(create_handler))
        .route("/attendance/range", get(range_handler))
        .route("/attendance/employee/:employee_id", get(by_employee_handler))
        .route("/attendance/check-in", post(check_in_handler))
        .route("/attendance/:id/check-out", post(check_out_handler))
        .route("/attendance/summary/:employee_id", get(summary_handler))
        .route("/attendance/monthly-summary", get(monthly_summary_handler))
        .route("/attendance/report", get(report_handler))
        .route("/attendance/calendar/:year/:month", get(calendar_handler))
        .route(
            "/attendance/:id",
            get(get_handler).put(update_handler).delete(delete_handler),
        )
}

async fn create_handler(
    State(state): State<AppState>,
    payload: Result<Json<AttendanceInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<AttendanceView>)> {
    let correlation_id = correlation_id("create_attendance");
    let input = json_body(correlation_id, payload)?;
    let view = attendance::create_attendance(state.store(), input)
        .await
        .map_err(engine_failure(correlation_id))?;
    Ok((StatusCode::CREATED, Json(view)))
}

async fn list_handler(State(state): State<AppState>) -> Json<Vec<AttendanceView>> {
    correlation_id("list_attendance");
    Json(attendance::list_attendance(state.store()).await)
}

async fn range_handler(
    State(state): State<AppState>,
    query: Result<Query<DateRangeQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<AttendanceView>>> {
    let correlation_id = correlation_id("attendance_in_range");
    let DateRangeQuery {
        start_date,
        end_date,
    } = query_params(correlation_id, query)?;
    attendance::attendance_in_range(state.store(), start_date, end_date)
        .await
        .map(Json)
        .map_err(engine_failure(correlation_id))
}

async fn by_employee_handler(
    State(state): State<AppState>,
    path: Result<Path<u64>, PathRejection>,
) -> ApiResult<Json<Vec<AttendanceView>>> {
    let correlation_id = correlation_id("attendance_by_employee");
    let employee_id = path_params(correlation_id, path)?;
    attendance::attendance_by_employee(state.store(), employee_id)
        .await
        .map(Json)
        .map_err(engine_failure(correlation_id))
}

async fn check_in_handler(
    State(state): State<AppState>,
    payload: Result<Json<CheckInInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<AttendanceView>)> {
    let correlation_id = correlation_id("check_in");
    let CheckInInput { employee_id } = json_body(correlation_id, payload)?;
    let view = attendance::check_in(state.store(), employee_id)
        .await
        .map_err(engine_failure(correlation_id))?;
    Ok((StatusCode::CREATED, Json(view)))
}

async fn check_out_handler(
    State(state): State<AppState>,
    path: Result<Path<u64>, PathRejection>,
) -> ApiResult<Json<AttendanceView>> {
    let correlation_id = correlation_id("check_out");
    let id = path_params(correlation_id, path)?;
    attendance::check_out(state.store(), id)
        .await
        .map(Json)
        .map_err(engine_failure(correlation_id))
}

async fn summary_handler(
    State(state): State<AppState>,
    path: Result<Path<u64>, PathRejection>,
    query: Result<Query<OptionalMonthQuery>, QueryRejection>,
) -> ApiResult<Json<EmployeeAttendanceOverview>> {
    let correlation_id = correlation_id("attendance_summary");
    let employee_id = path_params(correlation_id, path)?;
    let OptionalMonthQuery { month } = query_params(correlation_id, query)?;
    attendance::attendance_summary(state.store(), employee_id, month)
        .await
        .map(Json)
        .map_err(engine_failure(correlation_id))
}

async fn monthly_summary_handler(
    State(state): State<AppState>,
    query: Result<Query<MonthQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<MonthlyAttendanceSummary>>> {
    let correlation_id = correlation_id("monthly_attendance_summary");
    let MonthQuery { month } = query_params(correlation_id, query)?;
    attendance::monthly_summary(state.store(), &month)
        .await
        .map(Json)
        .map_err(engine_failure(correlation_id))
}

async fn report_handler(
    State(state): State<AppState>,
    query: Result<Query<ReportQuery>, QueryRejection>,
) -> ApiResult<Json<AttendanceReport>> {
    let correlation_id = correlation_id("attendance_report");
    let params = query_params(correlation_id, query)?;
    attendance::attendance_report(
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
) -> ApiResult<Json<AttendanceCalendar>> {
    let correlation_id = correlation_id("attendance_calendar");
    let (year, month) = path_params(correlation_id, path)?;
    let EmployeeFilterQuery { employee_id } = query_params(correlation_id, query)?;
    attendance::attendance_calendar(state.store(), year, month, employee_id)
        .await
        .map(Json)
        .map_err(engine_failure(correlation_id))
}

async fn get_handler(
    State(state): State<AppState>,
    path: Result<Path<u64>, PathRejection>,
) -> ApiResult<Json<AttendanceView>> {
    let correlation_id = correlation_id("get_attendance");
    let id = path_params(correlation_id, path)?;
    attendance::get_attendance(state.store(), id)
        .await
        .map(Json)
        .map_err(engine_failure(correlation_id))
}

async fn update_handler(
    State(state): State<AppState>,
    path: Result<Path<u64>, PathRejection>,
    payload: Result<Json<AttendanceUpdate>, JsonRejection>,
) -> ApiResult<Json<AttendanceView>> {
    let correlation_id = correlation_id("update_attendance");
    let id = path_params(correlation_id, path)?;
    let update = json_body(correlation_id, payload)?;
    attendance::update_attendance(state.store(), id, update)
        .await
        .map(Json)
        .map_err(engine_failure(correlation_id))
}

async fn delete_handler(
    State(state): State<AppState>,
    path: Result<Path<u64>, PathRejection>,
) -> ApiResult<StatusCode> {
    let correlation_id = correlation_id("delete_attendance");
    let id = path_params(correlation_id, path)?;
    attendance::delete_attendance(state.store(), id)
        .await
        .map_err(engine_failure(correlation_id))?;
    Ok(StatusCode::NO_CONTENT)
}
