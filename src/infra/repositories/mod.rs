//! Repository layer - Data access abstraction
//!
//! The service only ever sees the `UserRepository` trait; `UserStore`
//! is the SeaORM-backed implementation.

pub mod entities;
mod user_repository;

pub use user_repository::{UserRepository, UserStore};

// Export mock for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
