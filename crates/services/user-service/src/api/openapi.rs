//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::api::handlers::health_handler::{HealthResponse, ServiceHealth, ServiceStatus};
use domain::{CreateRequest, UserResponse};

/// API documentation struct.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::handlers::user_handler::register,
        crate::api::handlers::user_handler::list_users,
        crate::api::handlers::user_handler::get_user_by_email,
        crate::api::handlers::user_handler::get_user_by_id,
        crate::api::handlers::health_handler::health_check,
    ),
    components(
        schemas(
            CreateRequest,
            UserResponse,
            HealthResponse,
            ServiceStatus,
            ServiceHealth,
        )
    ),
    tags(
        (name = "Users", description = "User registration and lookup"),
        (name = "Health", description = "Liveness and storage connectivity"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_user_paths() {
        let doc = ApiDoc::openapi();

        for path in [
            "/users/signup",
            "/users/",
            "/users/email/{email}",
            "/users/uuid/{uuid}",
            "/health",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
