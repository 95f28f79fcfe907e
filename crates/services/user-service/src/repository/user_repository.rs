//! User repository contract and its PostgreSQL implementation.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, SqlErr,
};
use uuid::Uuid;

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use crate::infra::migrations::{EMAIL_INDEX, USERNAME_INDEX};
use common::{AppError, AppResult, ErrorCode, OptionExt};
use domain::{DomainError, User};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Upper bound on a single repository call, measured from its start.
pub const REPOSITORY_TIMEOUT: Duration = Duration::from_secs(10);

/// User repository trait for dependency injection.
///
/// Lookups report a missing row as `NotFound`. `add_user` reports a taken
/// username or email as `InvalidArgument` carrying a [`DomainError::Duplicate`].
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Assign a fresh identity to `user` and persist it
    async fn add_user(&self, user: User) -> AppResult<User>;

    /// All stored users, in storage order
    async fn get_users(&self) -> AppResult<Vec<User>>;

    async fn get_user_by_id(&self, id: Uuid) -> AppResult<User>;

    async fn get_user_by_email(&self, email: &str) -> AppResult<User>;
}

/// Concrete implementation of UserRepository backed by SeaORM
pub struct UserStore {
    db: DatabaseConnection,
    timeout: Duration,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            timeout: REPOSITORY_TIMEOUT,
        }
    }

    /// Override the per-call timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn bounded<T, F>(&self, operation: &'static str, fut: F) -> AppResult<T>
    where
        F: Future<Output = AppResult<T>>,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result,
            Err(elapsed) => {
                tracing::error!(operation, timeout = ?self.timeout, "Repository call timed out");
                Err(AppError::wrap(
                    elapsed,
                    ErrorCode::Unknown,
                    "database operation timed out",
                ))
            }
        }
    }
}

/// Column guarded by the unique index named in a violation message.
fn duplicate_field(detail: &str) -> Option<&'static str> {
    if detail.contains(USERNAME_INDEX) {
        Some("username")
    } else if detail.contains(EMAIL_INDEX) {
        Some("email")
    } else {
        None
    }
}

/// Translate an insert failure, naming the column a unique index rejected.
fn insert_error(err: DbErr, user: &User) -> AppError {
    let field = match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => duplicate_field(&detail),
        _ => None,
    };

    let duplicate = match field {
        Some("username") => DomainError::duplicate("username", user.username.as_str()),
        Some(_) => DomainError::duplicate("email", user.email.as_str()),
        None => return AppError::from(err),
    };

    tracing::warn!(%duplicate, "Rejected duplicate registration");
    AppError::from(duplicate)
}

#[async_trait]
impl UserRepository for UserStore {
    async fn add_user(&self, mut user: User) -> AppResult<User> {
        let id = user.assign_new_id();
        tracing::debug!(%id, username = %user.username, "Inserting user");

        self.bounded("add_user", async {
            let active_model = ActiveModel::from(user.clone());
            let model = active_model
                .insert(&self.db)
                .await
                .map_err(|e| insert_error(e, &user))?;

            Ok(User::from(model))
        })
        .await
    }

    async fn get_users(&self) -> AppResult<Vec<User>> {
        tracing::debug!("Listing users");

        self.bounded("get_users", async {
            let models = UserEntity::find()
                .all(&self.db)
                .await
                .map_err(AppError::from)?;

            Ok(models.into_iter().map(User::from).collect())
        })
        .await
    }

    async fn get_user_by_id(&self, id: Uuid) -> AppResult<User> {
        tracing::debug!(%id, "Fetching user by id");

        self.bounded("get_user_by_id", async {
            UserEntity::find_by_id(id)
                .one(&self.db)
                .await
                .map_err(AppError::from)?
                .map(User::from)
                .ok_or_not_found(format!("user with id {} not found", id))
        })
        .await
    }

    async fn get_user_by_email(&self, email: &str) -> AppResult<User> {
        tracing::debug!(email, "Fetching user by email");

        self.bounded("get_user_by_email", async {
            UserEntity::find()
                .filter(user::Column::Email.eq(email))
                .one(&self.db)
                .await
                .map_err(AppError::from)?
                .map(User::from)
                .ok_or_not_found(format!("user with email {} not found", email))
        })
        .await
    }
}
