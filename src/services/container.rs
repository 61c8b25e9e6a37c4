//! Service Container - Builds the service graph from infrastructure handles.
//!
//! SOLID (DIP): Consumers see service traits, never the concrete wiring.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use super::{UserManager, UserService};
use crate::config::Config;
use crate::domain::Argon2Hasher;
use crate::errors::AppResult;
use crate::infra::UserStore;

/// Service container trait for dependency injection.
pub trait ServiceContainer: Send + Sync {
    /// Get user service
    fn users(&self) -> Arc<dyn UserService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    user_service: Arc<dyn UserService>,
}

impl Services {
    /// Wire the SeaORM store and the configured Argon2 hasher into the user service.
    ///
    /// # Errors
    /// Fails if the configured hashing parameters are invalid.
    pub fn from_connection(db: Arc<DatabaseConnection>, config: &Config) -> AppResult<Self> {
        let store = Arc::new(UserStore::new(db));
        let hasher = Arc::new(Argon2Hasher::from_config(config)?);
        let user_service = Arc::new(UserManager::new(store, hasher));

        Ok(Self { user_service })
    }
}

impl ServiceContainer for Services {
    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }
}
