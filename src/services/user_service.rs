//! User service - Handles user-related business logic.
//!
//! Owns the credential invariant: every password handed to the store has
//! already been hashed, and updates only proceed against an existing user.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{PasswordHasher, User, UserResponse};
use crate::errors::AppResult;
use crate::infra::UserRepository;

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// List all active users
    async fn list_users(&self) -> AppResult<Vec<User>>;

    /// Get active user by ID
    async fn get_user(&self, id: Uuid) -> AppResult<User>;

    /// Get active user by email
    async fn get_user_by_email(&self, email: &str) -> AppResult<User>;

    /// Hash the plaintext password and persist the user
    async fn create_user(&self, user: User) -> AppResult<UserResponse>;

    /// Check the user exists, hash the new password, then persist
    async fn update_user(&self, user: User, id: Uuid) -> AppResult<UserResponse>;

    /// Delete user by ID
    async fn delete_user(&self, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of UserService over a repository and a hasher.
pub struct UserManager {
    repo: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl UserManager {
    /// Create new user service instance
    pub fn new(repo: Arc<dyn UserRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { repo, hasher }
    }
}

#[async_trait]
impl UserService for UserManager {
    async fn list_users(&self) -> AppResult<Vec<User>> {
        self.repo.list().await
    }

    async fn get_user(&self, id: Uuid) -> AppResult<User> {
        self.repo.find_by_id(id).await
    }

    async fn get_user_by_email(&self, email: &str) -> AppResult<User> {
        self.repo.find_by_email(email).await
    }

    async fn create_user(&self, mut user: User) -> AppResult<UserResponse> {
        user.password = self.hasher.hash(&user.password)?;
        self.repo.create(user).await
    }

    /// The existence check and the write are separate store calls, so two
    /// concurrent updates of the same id can both pass the check; the last
    /// write wins. Closing that window is the store's job.
    async fn update_user(&self, mut user: User, id: Uuid) -> AppResult<UserResponse> {
        if let Err(e) = self.repo.find_by_id(id).await {
            tracing::debug!(%id, "update rejected, existence check failed: {}", e);
            return Err(e);
        }

        user.password = self.hasher.hash(&user.password)?;
        self.repo.update(user, id).await
    }

    async fn delete_user(&self, id: Uuid) -> AppResult<()> {
        self.repo.delete(id).await
    }
}
