//! User handlers.

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Router,
};
use uuid::Uuid;
use validator::ValidateEmail;

use common::{AppError, ErrorReply, Reply, ReplyExt};
use domain::{CreateRequest, UserResponse};

use crate::api::extractors::JsonBody;
use crate::api::state::AppState;

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/signup", post(register))
        .route("/users", get(list_users))
        .route("/users/", get(list_users))
        .route("/users/email/:email", get(get_user_by_email))
        .route("/users/uuid/:uuid", get(get_user_by_id))
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/users/signup",
    tag = "Users",
    request_body = CreateRequest,
    responses(
        (status = 201, description = "User created"),
        (status = 400, description = "Validation failed or username/email already taken"),
        (status = 500, description = "Storage failure")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CreateRequest>,
) -> Result<Reply<()>, ErrorReply> {
    state
        .user_service
        .register_user(payload)
        .await
        .or_reply("failed to add user")?;

    Ok(Reply::created("user created succesfully"))
}

/// List all users
#[utoipa::path(
    get,
    path = "/users/",
    tag = "Users",
    responses(
        (status = 200, description = "All users, possibly empty", body = Vec<UserResponse>),
        (status = 500, description = "Storage failure")
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Reply<Vec<UserResponse>>, ErrorReply> {
    let users = state
        .user_service
        .get_users()
        .await
        .or_reply("cannot get users")?;

    Ok(Reply::ok(
        "get users succesfully",
        users.into_iter().map(UserResponse::from).collect(),
    ))
}

/// Get user by email
#[utoipa::path(
    get,
    path = "/users/email/{email}",
    tag = "Users",
    params(
        ("email" = String, Path, description = "Exact email address")
    ),
    responses(
        (status = 200, description = "User profile", body = UserResponse),
        (status = 400, description = "Malformed email"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user_by_email(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Reply<UserResponse>, ErrorReply> {
    if email.trim().is_empty() || !email.validate_email() {
        return Err(ErrorReply::with_message(
            AppError::invalid_argument(format!("invalid email: {}", email)),
            "invalid request",
        ));
    }

    let user = state
        .user_service
        .get_user_by_email(&email)
        .await
        .or_reply("cannot get user")?;

    Ok(Reply::ok("user get succesfully", UserResponse::from(user)))
}

/// Get user by ID
#[utoipa::path(
    get,
    path = "/users/uuid/{uuid}",
    tag = "Users",
    params(
        ("uuid" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User profile", body = UserResponse),
        (status = 400, description = "Malformed user ID"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user_by_id(
    State(state): State<AppState>,
    Path(uuid): Path<String>,
) -> Result<Reply<UserResponse>, ErrorReply> {
    let id = Uuid::parse_str(&uuid).map_err(|_| {
        ErrorReply::with_message(
            AppError::invalid_argument(format!("invalid user id: {}", uuid)),
            "invalid user id",
        )
    })?;

    let user = state
        .user_service
        .get_user_by_id(id)
        .await
        .or_reply("cannot get user")?;

    Ok(Reply::ok("user get succesfully", UserResponse::from(user)))
}
