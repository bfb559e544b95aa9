//! Axum Handlers for the REST API
//!
//! This module contains the logic for handling HTTP requests for resource
//! generation and search suggestions. It uses `utoipa` doc comments to
//! generate OpenAPI documentation.

use axum::{
    extract::{Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use learnpath_core::{orchestrator::GenerateRequest, suggest::suggest};
use std::sync::Arc;
use tracing::{Span, field, info, instrument};
use uuid::Uuid;

use crate::{
    models::{ErrorResponse, GenerateRequestPayload, SuggestParams},
    state::AppState,
};

/// Response header reporting which generation tier produced the resource.
pub const GENERATION_TIER_HEADER: &str = "x-generation-tier";
pub const REQUEST_ID_HEADER: &str = "x-request-id";

pub enum ApiError {
    BadRequest(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(ErrorResponse { message })).into_response()
            }
        }
    }
}

/// Generate a learning resource for a topic.
///
/// Always answers 200 for a valid request; the `x-generation-tier` header tells
/// whether the primary model, the fallback model or the static minimal resource
/// produced the body.
#[utoipa::path(
    post,
    path = "/api/generate",
    request_body = GenerateRequestPayload,
    responses(
        (status = 200, description = "Generated learning resource", body = serde_json::Value,
            headers(
                ("x-generation-tier" = String, description = "primary, fallback or minimal"),
                ("x-request-id" = String, description = "Identifier used in the service logs")
            )
        ),
        (status = 400, description = "Missing topic or malformed body", body = ErrorResponse)
    )
)]
#[instrument(name = "generate_request", skip_all, fields(request_id))]
pub async fn generate(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<GenerateRequestPayload>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let request = GenerateRequest::new(payload.topic.as_deref().unwrap_or_default(), payload.difficulty)
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let request_id = Uuid::new_v4();
    Span::current().record("request_id", field::display(request_id));
    info!(topic = %request.topic(), difficulty = %request.difficulty_label(), "Generating learning resource");

    let outcome = state.resources.generate(&request).await;
    info!(tier = %outcome.tier, "Learning resource ready");

    Ok((
        [
            (GENERATION_TIER_HEADER, outcome.tier.as_str().to_string()),
            (REQUEST_ID_HEADER, request_id.to_string()),
        ],
        Json(outcome.resource),
    ))
}

/// Autocomplete suggestions for a partial topic.
///
/// Passes the upstream payload through unchanged. When the upstream service
/// keeps failing the answer is `[q, []]`.
#[utoipa::path(
    get,
    path = "/api/suggest",
    params(SuggestParams),
    responses(
        (status = 200, description = "Autocomplete payload: [query, [suggestions...]]", body = serde_json::Value),
        (status = 400, description = "Missing query", body = ErrorResponse)
    )
)]
pub async fn suggest_topics(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SuggestParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let query = params
        .q
        .filter(|q| !q.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("Query parameter is required".to_string()))?;

    let value = suggest(state.suggestions.as_ref(), &state.suggest_policy, &query).await;
    Ok(Json(value))
}

/// Liveness check.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = String))
)]
pub async fn health() -> &'static str {
    "ok"
}
