//! `/api/employees` handlers.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::api::request::SearchQuery;
use crate::api::state::AppState;
use crate::service::employee::{self, EmployeeInput, EmployeeUpdate, EmployeeView};

use super::{correlation_id, engine_failure, json_body, path_params, query_params, ApiResult};

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/employees", get(list_handler).post(create_handler))
        .route("/employees/search", get(search_handler))
        .route("/employees/status/:status", get(by_status_handler))
        .route("/employees/department/:department_id", get(by_department_handler))
        .route(
            "/employees/:id",
            get(get_handler).put(update_handler).delete(delete_handler),
        )
}

async fn create_handler(
    State(state): State<AppState>,
    payload: Result<Json<EmployeeInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<EmployeeView>)> {
    let correlation_id = correlation_id("create_employee");
    let input = json_body(correlation_id, payload)?;
    let view = employee::create_employee(state.store(), input)
        .await
        .map_err(engine_failure(correlation_id))?;
    Ok((StatusCode::CREATED, Json(view)))
}

async fn list_handler(State(state): State<AppState>) -> Json<Vec<EmployeeView>> {
    correlation_id("list_employees");
    Json(employee::list_employees(state.store()).await)
}

async fn search_handler(
    State(state): State<AppState>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<EmployeeView>>> {
    let correlation_id = correlation_id("search_employees");
    let SearchQuery { q } = query_params(correlation_id, query)?;
    Ok(Json(employee::search_employees(state.store(), &q).await))
}

async fn by_status_handler(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<Vec<EmployeeView>>> {
    let correlation_id = correlation_id("employees_by_status");
    let status = path_params(correlation_id, path)?;
    Ok(Json(employee::employees_by_status(state.store(), &status).await))
}

async fn by_department_handler(
    State(state): State<AppState>,
    path: Result<Path<u64>, PathRejection>,
) -> ApiResult<Json<Vec<EmployeeView>>> {
    let correlation_id = correlation_id("employees_by_department");
    let department_id = path_params(correlation_id, path)?;
    Ok(Json(
        employee::employees_by_department(state.store(), department_id).await,
    ))
}

async fn get_handler(
    State(state): State<AppState>,
    path: Result<Path<u64>, PathRejection>,
) -> ApiResult<Json<EmployeeView>> {
    let correlation_id = correlation_id("get_employee");
    let id = path_params(correlation_id, path)?;
    employee::get_employee(state.store(), id)
        .await
        .map(Json)
        .map_err(engine_failure(correlation_id))
}

async fn update_handler(
    State(state): State<AppState>,
    path: Result<Path<u64>, PathRejection>,
    payload: Result<Json<EmployeeUpdate>, JsonRejection>,
) -> ApiResult<Json<EmployeeView>> {
    let correlation_id = correlation_id("update_employee");
    let id = path_params(correlation_id, path)?;
    let update = json_body(correlation_id, payload)?;
    employee::update_employee(state.store(), id, update)
        .await
        .map(Json)
        .map_err(engine_failure(correlation_id))
}

async fn delete_handler(
    State(state): State<AppState>,
    path: Result<Path<u64>, PathRejection>,
) -> ApiResult<StatusCode> {
    let correlation_id = correlation_id("delete_employee");
    let id = path_params(correlation_id, path)?;
    employee::delete_employee(state.store(), id)
        .await
        .map_err(engine_failure(correlation_id))?;
    Ok(StatusCode::NO_CONTENT)
}
