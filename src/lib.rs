//! userbase - user management over a service/repository layering.
//!
//! The user service guarantees that passwords reach the store only as
//! Argon2 hashes, and that updates only touch users that exist.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: User entity and password hashing
//! - **services**: User use cases
//! - **infra**: Database, migrations and the user store
//! - **api**: HTTP handlers and routes
//! - **types**: Shared response helpers
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Argon2Hasher, PasswordHasher, User, UserResponse};
pub use errors::{AppError, AppResult};
