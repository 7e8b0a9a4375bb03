//! `/api/payroll` handlers.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};

use crate::api::request::{PaymentQuery, PeriodQuery};
use crate::api::state::AppState;
use crate::models::PayrollStatus;
use crate::service::payroll::{self, PayrollInput, PayrollUpdate, PayrollView};

use super::{correlation_id, engine_failure, json_body, path_params, query_params, ApiResult};

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/payroll", get(list_handler).post(create_handler))
        .route("/payroll/period", get(by_period_handler))
        .route("/payroll/employee/:employee_id", get(by_employee_handler))
        .route("/payroll/status/:status", get(by_status_handler))
        .route(
            "/payroll/:id",
            get(get_handler).put(update_handler).delete(delete_handler),
        )
        .route("/payroll/:id/process", put(process_handler))
        .route("/payroll/:id/mark-paid", put(mark_paid_handler))
}

async fn create_handler(
    State(state): State<AppState>,
    payload: Result<Json<PayrollInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<PayrollView>)> {
    let correlation_id = correlation_id("create_payroll");
    let input = json_body(correlation_id, payload)?;
    let view = payroll::create_payroll(state.store(), input)
        .await
        .map_err(engine_failure(correlation_id))?;
    Ok((StatusCode::CREATED, Json(view)))
}

async fn list_handler(State(state): State<AppState>) -> Json<Vec<PayrollView>> {
    correlation_id("list_payroll");
    Json(payroll::list_payroll(state.store()).await)
}

async fn by_period_handler(
    State(state): State<AppState>,
    query: Result<Query<PeriodQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<PayrollView>>> {
    let correlation_id = correlation_id("payroll_by_period");
    let PeriodQuery { period } = query_params(correlation_id, query)?;
    Ok(Json(payroll::payroll_by_period(state.store(), period).await))
}

async fn by_employee_handler(
    State(state): State<AppState>,
    path: Result<Path<u64>, PathRejection>,
) -> ApiResult<Json<Vec<PayrollView>>> {
    let correlation_id = correlation_id("payroll_by_employee");
    let employee_id = path_params(correlation_id, path)?;
    payroll::payroll_by_employee(state.store(), employee_id)
        .await
        .map(Json)
        .map_err(engine_failure(correlation_id))
}

async fn by_status_handler(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<Vec<PayrollView>>> {
    let correlation_id = correlation_id("payroll_by_status");
    let status: PayrollStatus = path_params(correlation_id, path)?
        .parse()
        .map_err(engine_failure(correlation_id))?;
    Ok(Json(payroll::payroll_by_status(state.store(), status).await))
}

async fn get_handler(
    State(state): State<AppState>,
    path: Result<Path<u64>, PathRejection>,
) -> ApiResult<Json<PayrollView>> {
    let correlation_id = correlation_id("get_payroll");
    let id = path_params(correlation_id, path)?;
    payroll::get_payroll(state.store(), id)
        .await
        .map(Json)
        .map_err(engine_failure(correlation_id))
}

async fn update_handler(
    State(state): State<AppState>,
    path: Result<Path<u64>, PathRejection>,
    payload: Result<Json<PayrollUpdate>, JsonRejection>,
) -> ApiResult<Json<PayrollView>> {
    let correlation_id = correlation_id("update_payroll");
    let id = path_params(correlation_id, path)?;
    let update = json_body(correlation_id, payload)?;
    payroll::update_payroll(state.store(), id, update)
        .await
        .map(Json)
        .map_err(engine_failure(correlation_id))
}

async fn process_handler(
    State(state): State<AppState>,
    path: Result<Path<u64>, PathRejection>,
) -> ApiResult<Json<PayrollView>> {
    let correlation_id = correlation_id("process_payroll");
    let id = path_params(correlation_id, path)?;
    payroll::process(state.store(), id)
        .await
        .map(Json)
        .map_err(engine_failure(correlation_id))
}

async fn mark_paid_handler(
    State(state): State<AppState>,
    path: Result<Path<u64>, PathRejection>,
    query: Result<Query<PaymentQuery>, QueryRejection>,
) -> ApiResult<Json<PayrollView>> {
    let correlation_id = correlation_id("mark_payroll_paid");
    let id = path_params(correlation_id, path)?;
    let PaymentQuery { payment_date } = query_params(correlation_id, query)?;
    payroll::mark_as_paid(state.store(), id, payment_date)
        .await
        .map(Json)
        .map_err(engine_failure(correlation_id))
}

async fn delete_handler(
    State(state): State<AppState>,
    path: Result<Path<u64>, PathRejection>,
) -> ApiResult<StatusCode> {
    let correlation_id = correlation_id("delete_payroll");
    let id = path_params(correlation_id, path)?;
    payroll::delete_payroll(state.store(), id)
        .await
        .map_err(engine_failure(correlation_id))?;
    Ok(StatusCode::NO_CONTENT)
}
