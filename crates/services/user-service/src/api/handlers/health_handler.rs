//! Health check handlers.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::api::state::AppState;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub services: ServiceStatus,
}

/// Individual service status.
#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceStatus {
    pub database: ServiceHealth,
}

/// Service health with optional error message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceHealth {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Create health routes.
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

/// Health check endpoint - verifies database connectivity.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service healthy", body = HealthResponse),
        (status = 503, description = "Database unreachable", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Response {
    let database = match &state.database {
        Some(db) => match db.ping().await {
            Ok(()) => ServiceHealth {
                status: "healthy".to_string(),
                error: None,
            },
            Err(e) => {
                tracing::warn!(error = %e, "Database health check failed");
                ServiceHealth {
                    status: "unhealthy".to_string(),
                    error: Some(e.to_string()),
                }
            }
        },
        None => ServiceHealth {
            status: "in-memory".to_string(),
            error: None,
        },
    };

    let all_healthy = database.error.is_none();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        services: ServiceStatus { database },
    };

    if all_healthy {
        (StatusCode::OK, Json(response)).into_response()
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, Json(response)).into_response()
    }
}
