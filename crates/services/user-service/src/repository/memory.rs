//! In-memory user repository.
//!
//! Same contract as [`UserStore`](super::UserStore): unique usernames and
//! emails, `NotFound` for missing rows. Used by tests and by
//! `serve --in-memory`.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use common::{AppError, AppResult, OptionExt};
use domain::{DomainError, User};

use super::UserRepository;

#[derive(Clone, Default)]
pub struct InMemoryUserStore {
    users: Arc<RwLock<Vec<User>>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserStore {
    async fn add_user(&self, mut user: User) -> AppResult<User> {
        let mut users = self.users.write().await;

        if users.iter().any(|u| u.username == user.username) {
            return Err(AppError::from(DomainError::duplicate(
                "username",
                user.username,
            )));
        }
        if users.iter().any(|u| u.email == user.email) {
            return Err(AppError::from(DomainError::duplicate("email", user.email)));
        }

        let id = user.assign_new_id();
        users.push(user.clone());

        tracing::info!(user_id = %id, username = %user.username, "Created user");
        Ok(user)
    }

    async fn get_users(&self) -> AppResult<Vec<User>> {
        Ok(self.users.read().await.clone())
    }

    async fn get_user_by_id(&self, id: Uuid) -> AppResult<User> {
        let users = self.users.read().await;
        users
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or_not_found(format!("user with id {} not found", id))
    }

    async fn get_user_by_email(&self, email: &str) -> AppResult<User> {
        let users = self.users.read().await;
        users
            .iter()
            .find(|u| u.email == email)
            .cloned()
            .ok_or_not_found(format!("user with email {} not found", email))
    }
}
