//! Repository layer for data access.

pub mod entities;
mod memory;
mod user_repository;

pub use memory::InMemoryUserStore;
pub use user_repository::{UserRepository, UserStore, REPOSITORY_TIMEOUT};

#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
