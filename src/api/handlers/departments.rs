//! `/api/departments` handlers.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::api::state::AppState;
use crate::service::department::{
    self, DepartmentInput, DepartmentStats, DepartmentUpdate, DepartmentView,
};

use super::{correlation_id, engine_failure, json_body, path_params, ApiResult};

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/departments", get(list_handler).post(create_handler))
        .route("/departments/stats", get(stats_handler))
        .route(
            "/departments/:id",
            get(get_handler).put(update_handler).delete(delete_handler),
        )
}

async fn create_handler(
    State(state): State<AppState>,
    payload: Result<Json<DepartmentInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<DepartmentView>)> {
    let correlation_id = correlation_id("create_department");
    let input = json_body(correlation_id, payload)?;
    let view = department::create_department(state.store(), input)
        .await
        .map_err(engine_failure(correlation_id))?;
    Ok((StatusCode::CREATED, Json(view)))
}

async fn list_handler(State(state): State<AppState>) -> Json<Vec<DepartmentView>> {
    correlation_id("list_departments");
    Json(department::list_departments(state.store()).await)
}

async fn stats_handler(State(state): State<AppState>) -> Json<DepartmentStats> {
    correlation_id("department_stats");
    Json(department::department_stats(state.store()).await)
}

async fn get_handler(
    State(state): State<AppState>,
    path: Result<Path<u64>, PathRejection>,
) -> ApiResult<Json<DepartmentView>> {
    let correlation_id = correlation_id("get_department");
    let id = path_params(correlation_id, path)?;
    department::get_department(state.store(), id)
        .await
        .map(Json)
        .map_err(engine_failure(correlation_id))
}

async fn update_handler(
    State(state): State<AppState>,
    path: Result<Path<u64>, PathRejection>,
    payload: Result<Json<DepartmentUpdate>, JsonRejection>,
) -> ApiResult<Json<DepartmentView>> {
    let correlation_id = correlation_id("update_department");
    let id = path_params(correlation_id, path)?;
    let update = json_body(correlation_id, payload)?;
    department::update_department(state.store(), id, update)
        .await
        .map(Json)
        .map_err(engine_failure(correlation_id))
}

async fn delete_handler(
    State(state): State<AppState>,
    path: Result<Path<u64>, PathRejection>,
) -> ApiResult<StatusCode> {
    let correlation_id = correlation_id("delete_department");
    let id = path_params(correlation_id, path)?;
    department::delete_department(state.store(), id)
        .await
        .map_err(engine_failure(correlation_id))?;
    Ok(StatusCode::NO_CONTENT)
}
