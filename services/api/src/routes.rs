use crate::infra::AppState;
use axum::extract::rejection::QueryRejection;
use axum::extract::{FromRequest, Query, Request};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Form, Json, Router};
use cvss_score::cvss::ScoreResult;
use cvss_score::error::AppError;
use serde::Deserialize;
use serde_json::json;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const VECTOR_FIELD: &str = "vector";

/// Vector supplied in a JSON body.
#[derive(Debug, Deserialize)]
pub(crate) struct CalculateRequest {
    #[serde(default)]
    pub(crate) vector: Option<String>,
}

/// Url-encoded key/value pairs. Repeated keys are kept; the first `vector` wins.
type EncodedPairs = Vec<(String, String)>;

fn first_vector(pairs: EncodedPairs) -> Option<String> {
    pairs
        .into_iter()
        .find(|(key, _)| key == VECTOR_FIELD)
        .map(|(_, value)| value)
}

pub(crate) fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route(
            "/calculate",
            get(calculate_from_query).post(calculate_from_body),
        )
        .layer(Extension(state))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// An unreadable query string counts as "no vector supplied".
pub(crate) async fn calculate_from_query(
    Extension(state): Extension<AppState>,
    query: Result<Query<EncodedPairs>, QueryRejection>,
) -> Result<Json<ScoreResult>, AppError> {
    let vector = query.ok().and_then(|Query(pairs)| first_vector(pairs));
    score_vector(&state, vector.as_deref())
}

pub(crate) async fn calculate_from_body(
    Extension(state): Extension<AppState>,
    request: Request,
) -> Result<Json<ScoreResult>, AppError> {
    let vector = read_body(request).await;
    score_vector(&state, vector.as_deref())
}

/// Unreadable or mistyped bodies count as "no vector supplied".
async fn read_body(request: Request) -> Option<String> {
    let is_form = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with(FORM_CONTENT_TYPE));

    if is_form {
        Form::<EncodedPairs>::from_request(request, &())
            .await
            .ok()
            .and_then(|Form(pairs)| first_vector(pairs))
    } else {
        Json::<CalculateRequest>::from_request(request, &())
            .await
            .ok()
            .and_then(|Json(payload)| payload.vector)
    }
}

fn score_vector(state: &AppState, vector: Option<&str>) -> Result<Json<ScoreResult>, AppError> {
    let result = state.calculator.compute_optional(vector)?;
    Ok(Json(result))
}
