//! Domain layer - Core business entities and logic
//!
//! The user entity, its client-facing projection, and the password
//! hashing abstraction the service depends on.

pub mod password;
pub mod user;

pub use password::{Argon2Hasher, PasswordHasher};
pub use user::{User, UserResponse};

#[cfg(any(test, feature = "test-utils"))]
pub use password::MockPasswordHasher;
