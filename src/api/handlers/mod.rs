//! HTTP request handlers for the HR engine API.
//!
//! Every handler tags its request with a fresh correlation id, maps body,
//! path and query rejections to JSON errors, and converts domain failures
//! through [`ApiErrorResponse`].

mod attendance;
mod departments;
mod employees;
mod leave;
mod payroll;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query,
    },
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::EngineError;

use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

pub(crate) type ApiResult<T> = Result<T, ApiErrorResponse>;

/// Creates the API router with all endpoints.
///
/// Domain routes are mounted under `/api`; `/health` sits at the root.
pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .merge(employees::routes())
        .merge(departments::routes())
        .merge(leave::routes())
        .merge(attendance::routes())
        .merge(payroll::routes());

    Router::new()
        .route("/health", get(health_handler))
        .nest("/api", api)
        .with_state(state)
}

/// Body of `GET /health`.
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Generates and logs a correlation id for one request.
pub(crate) fn correlation_id(operation: &'static str) -> Uuid {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, operation, "Handling request");
    correlation_id
}

/// Logs a domain failure and converts it into an HTTP error.
pub(crate) fn engine_failure(correlation_id: Uuid) -> impl FnOnce(EngineError) -> ApiErrorResponse {
    move |error| {
        warn!(correlation_id = %correlation_id, error = %error, "Request failed");
        error.into()
    }
}

/// Unwraps a JSON body, mapping rejections to 400 responses.
pub(crate) fn json_body<T>(
    correlation_id: Uuid,
    payload: Result<Json<T>, JsonRejection>,
) -> ApiResult<T> {
    let rejection = match payload {
        Ok(Json(body)) => return Ok(body),
        Err(rejection) => rejection,
    };

    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // The body text carries serde's detailed message.
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
    Err(ApiErrorResponse::bad_request(error))
}

/// Unwraps query parameters, mapping rejections to 400 responses.
pub(crate) fn query_params<T>(
    correlation_id: Uuid,
    query: Result<Query<T>, QueryRejection>,
) -> ApiResult<T> {
    query.map(|Query(params)| params).map_err(|rejection| {
        let body_text = rejection.body_text();
        warn!(correlation_id = %correlation_id, error = %body_text, "Invalid query string");
        ApiErrorResponse::bad_request(ApiError::validation_error(body_text))
    })
}

/// Unwraps path parameters, mapping rejections to 400 responses.
pub(crate) fn path_params<T>(
    correlation_id: Uuid,
    path: Result<Path<T>, PathRejection>,
) -> ApiResult<T> {
    path.map(|Path(params)| params).map_err(|rejection| {
        let body_text = rejection.body_text();
        warn!(correlation_id = %correlation_id, error = %body_text, "Invalid path parameter");
        ApiErrorResponse::bad_request(ApiError::validation_error(body_text))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigLoader;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    fn create_test_router() -> Router {
        create_router(AppState::new(ConfigLoader::default()))
    }

    async fn read_json(response: axum::response::Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_health_reports_ok() {
        let response = create_test_router()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = read_json(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_malformed_json_returns_400() {
        let response = create_test_router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/departments")
                    .header("Content-Type", "application/json")
                    .body(Body::from("{ invalid json }"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ApiError = serde_json::from_value(read_json(response).await).unwrap();
        assert_eq!(error.code, "MALFORMED_JSON");
    }

    #[tokio::test]
    async fn test_missing_field_returns_validation_error() {
        let response = create_test_router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/employees")
                    .header("Content-Type", "application/json")
                    .body(Body::from(r#"{"first_name":"Ada"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ApiError = serde_json::from_value(read_json(response).await).unwrap();
        assert_eq!(error.code, "VALIDATION_ERROR");
        assert!(error.message.contains("missing field"));
    }

    #[tokio::test]
    async fn test_missing_content_type_is_rejected() {
        let response = create_test_router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/departments")
                    .body(Body::from(r#"{"name":"Ops"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ApiError = serde_json::from_value(read_json(response).await).unwrap();
        assert_eq!(error.code, "MISSING_CONTENT_TYPE");
    }

    #[tokio::test]
    async fn test_non_numeric_id_is_a_validation_error() {
        let response = create_test_router()
            .oneshot(
                Request::builder()
                    .uri("/api/employees/abc")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ApiError = serde_json::from_value(read_json(response).await).unwrap();
        assert_eq!(error.code, "VALIDATION_ERROR");
    }
}
