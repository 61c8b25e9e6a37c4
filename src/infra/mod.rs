//! Infrastructure layer - External systems integration
//!
//! Database connection, migrations and the SeaORM-backed user store.

pub mod db;
pub mod repositories;

pub use db::{Database, Migrator};
pub use repositories::{UserRepository, UserStore};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::MockUserRepository;
