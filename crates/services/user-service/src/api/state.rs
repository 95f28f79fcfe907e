//! Application state for dependency injection.

use std::sync::Arc;
use std::time::Duration;

use crate::infra::Database;
use crate::service::UserService;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserService>,
    /// Absent when serving from the in-memory store
    pub database: Option<Database>,
    pub request_timeout: Duration,
}

impl AppState {
    /// Create new app state.
    pub fn new(user_service: Arc<dyn UserService>) -> Self {
        Self {
            user_service,
            database: None,
            request_timeout: Duration::from_secs(10),
        }
    }

    pub fn with_database(mut self, database: Database) -> Self {
        self.database = Some(database);
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}
