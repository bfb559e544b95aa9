//! Axum Router Configuration
//!
//! This module defines the complete HTTP routing for the application,
//! including the REST API and the OpenAPI documentation.

use crate::{
    handlers,
    models::{ErrorResponse, GenerateRequestPayload},
    state::AppState,
};

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::generate,
        handlers::suggest_topics,
        handlers::health,
    ),
    components(
        schemas(GenerateRequestPayload, ErrorResponse)
    ),
    tags(
        (name = "Learning Path API", description = "Learning resource generation and topic suggestions")
    )
)]
pub struct ApiDoc;

/// Creates the main Axum router for the application.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    // Group all routes that require AppState into their own router.
    let api_router = Router::new()
        .route("/api/generate", post(handlers::generate))
        .route("/api/suggest", get(handlers::suggest_topics))
        .route("/health", get(handlers::health))
        .with_state(app_state);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(api_router)
}
