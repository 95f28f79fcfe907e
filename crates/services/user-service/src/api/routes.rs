//! Route configuration.

use axum::{
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    Json, Router,
};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::ApiResponse;

use crate::api::handlers::{health_routes, user_routes};
use crate::api::openapi::ApiDoc;
use crate::api::state::AppState;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    let request_timeout = state.request_timeout;

    Router::new()
        .merge(health_routes())
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(user_routes())
        .layer(TimeoutLayer::new(request_timeout))
        .layer(middleware::map_response(timeout_envelope))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// `TimeoutLayer` answers with an empty 408; give it the standard envelope.
async fn timeout_envelope(response: Response) -> Response {
    if response.status() != StatusCode::REQUEST_TIMEOUT {
        return response;
    }

    tracing::warn!("Request timed out");
    (
        StatusCode::REQUEST_TIMEOUT,
        Json(ApiResponse::failure(
            "request timed out",
            Some("request timed out".to_string()),
        )),
    )
        .into_response()
}
