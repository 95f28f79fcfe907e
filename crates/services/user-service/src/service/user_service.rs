//! User service - Handles user-related business logic.
//!
//! Registration validates, builds the domain user and hands it to the
//! repository. Repository errors pass through unchanged.

use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use common::{AppError, AppResult, ErrorCode};
use domain::{format_validation_errors, CreateRequest, DomainError, User};

use crate::repository::{UserRepository, UserStore};

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Validate and persist a new user. Returns the stored user with its
    /// assigned identity.
    async fn register_user(&self, request: CreateRequest) -> AppResult<User>;

    async fn get_users(&self) -> AppResult<Vec<User>>;

    async fn get_user_by_id(&self, id: Uuid) -> AppResult<User>;

    async fn get_user_by_email(&self, email: &str) -> AppResult<User>;
}

/// Concrete implementation of UserService using repository.
pub struct UserManager {
    repo: Arc<dyn UserRepository>,
}

impl UserManager {
    /// Create new user service instance with repository
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    pub fn builder() -> UserManagerBuilder {
        UserManagerBuilder::default()
    }
}

/// Step-wise construction of a [`UserManager`].
#[derive(Default)]
pub struct UserManagerBuilder {
    repo: Option<Arc<dyn UserRepository>>,
}

impl UserManagerBuilder {
    pub fn with_repository(mut self, repo: Arc<dyn UserRepository>) -> Self {
        self.repo = Some(repo);
        self
    }

    /// Use the PostgreSQL-backed store on `db`.
    pub fn with_store(self, db: DatabaseConnection) -> Self {
        self.with_repository(Arc::new(UserStore::new(db)))
    }

    pub fn build(self) -> AppResult<UserManager> {
        let repo = self
            .repo
            .ok_or_else(|| AppError::unknown("user manager requires a repository"))?;
        Ok(UserManager::new(repo))
    }
}

#[async_trait]
impl UserService for UserManager {
    async fn register_user(&self, request: CreateRequest) -> AppResult<User> {
        if let Err(errors) = request.validate() {
            let cause = DomainError::validation(format_validation_errors(&errors));
            tracing::debug!(%cause, "Rejected registration");
            return Err(AppError::wrap(
                cause,
                ErrorCode::InvalidArgument,
                "invalid user request",
            ));
        }

        let user = request.into_user()?;
        let created = self.repo.add_user(user).await?;

        tracing::info!(user_id = %created.id, username = %created.username, "User registered");
        Ok(created)
    }

    async fn get_users(&self) -> AppResult<Vec<User>> {
        self.repo.get_users().await
    }

    async fn get_user_by_id(&self, id: Uuid) -> AppResult<User> {
        self.repo.get_user_by_id(id).await
    }

    async fn get_user_by_email(&self, email: &str) -> AppResult<User> {
        self.repo.get_user_by_email(email).await
    }
}

#[cfg(test)]
mod tests {
    use domain::Gender;

    use super::*;
    use crate::repository::MockUserRepository;

    fn valid_request() -> CreateRequest {
        CreateRequest {
            email: "john@example.com".to_string(),
            username: "johndoe1".to_string(),
            name: "John Doe".to_string(),
            password: "Passw0rd!".to_string(),
            gender: Gender::Male,
            age: 25,
            date_of_birth: "1998-01-01".to_string(),
        }
    }

    #[test]
    fn test_builder_requires_repository() {
        let err = UserManager::builder().build().err().unwrap();
        assert_eq!(err.code(), ErrorCode::Unknown);
    }

    #[tokio::test]
    async fn test_invalid_request_never_reaches_storage() {
        let mut mock = MockUserRepository::new();
        mock.expect_add_user().never();

        let service = UserManager::builder()
            .with_repository(Arc::new(mock))
            .build()
            .unwrap();

        let request = CreateRequest {
            age: 31,
            gender: Gender::Undefined,
            ..valid_request()
        };
        let err = service.register_user(request).await.unwrap_err();

        assert_eq!(err.code(), ErrorCode::InvalidArgument);
        assert_eq!(err.message(), "invalid user request");
        let cause = err.cause().unwrap().downcast_ref::<DomainError>().unwrap();
        assert!(matches!(cause, DomainError::Validation(msg) if msg.starts_with("age: ")));
        assert!(err.to_string().contains("gender: "));
    }

    #[tokio::test]
    async fn test_register_hashes_password() {
        let mut mock = MockUserRepository::new();
        mock.expect_add_user()
            .withf(|user| !user.has_identity() && user.password().verify("Passw0rd!"))
            .times(1)
            .returning(|mut user| {
                user.assign_new_id();
                Ok(user)
            });

        let service = UserManager::new(Arc::new(mock));
        let created = service.register_user(valid_request()).await.unwrap();

        assert!(created.has_identity());
        assert_ne!(created.password_hash, "Passw0rd!");
    }

    #[tokio::test]
    async fn test_repository_error_passes_through() {
        let mut mock = MockUserRepository::new();
        mock.expect_add_user().returning(|user| {
            Err(AppError::from(DomainError::duplicate(
                "username",
                user.username,
            )))
        });

        let service = UserManager::new(Arc::new(mock));
        let err = service.register_user(valid_request()).await.unwrap_err();

        assert_eq!(err.code(), ErrorCode::InvalidArgument);
        assert_eq!(err.to_string(), "User with username johndoe1 already exists.");
    }

    #[tokio::test]
    async fn test_get_user_by_email_delegates() {
        let mut mock = MockUserRepository::new();
        mock.expect_get_user_by_email()
            .withf(|email| email == "nobody@example.com")
            .times(1)
            .returning(|email| {
                Err(AppError::not_found(format!(
                    "user with email {} not found",
                    email
                )))
            });

        let service = UserManager::new(Arc::new(mock));
        let err = service
            .get_user_by_email("nobody@example.com")
            .await
            .unwrap_err();

        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
