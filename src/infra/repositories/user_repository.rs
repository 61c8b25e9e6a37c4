//! User repository implementation with soft delete support.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue::{NotSet, Set, Unchanged}, ColumnTrait,
    DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, SqlErr,
};
use std::sync::Arc;
use uuid::Uuid;

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use crate::domain::{User, UserResponse};
use crate::errors::{AppError, AppResult, OptionExt};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User store contract consumed by the user service.
///
/// Soft-deleted records are invisible to every operation. Lookups report
/// absence as `AppError::NotFound` rather than `Ok(None)`.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// List all active users, oldest first
    async fn list(&self) -> AppResult<Vec<User>>;

    /// Find active user by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<User>;

    /// Find active user by exact email
    async fn find_by_email(&self, email: &str) -> AppResult<User>;

    /// Persist a new user. `user.password` must already be a hash.
    async fn create(&self, user: User) -> AppResult<UserResponse>;

    /// Overwrite name, email and password of the active user `id`.
    /// `user.password` must already be a hash; `user.id` is ignored.
    async fn update(&self, user: User, id: Uuid) -> AppResult<UserResponse>;

    /// Soft delete user by ID (sets deleted_at timestamp)
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

/// SeaORM implementation of UserRepository
pub struct UserStore {
    db: Arc<DatabaseConnection>,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn list(&self) -> AppResult<Vec<User>> {
        let models = UserEntity::find()
            .filter(user::Column::DeletedAt.is_null())
            .order_by_asc(user::Column::CreatedAt)
            .all(&*self.db)
            .await?;

        Ok(models.into_iter().map(User::from).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<User> {
        UserEntity::find_by_id(id)
            .filter(user::Column::DeletedAt.is_null())
            .one(&*self.db)
            .await?
            .map(User::from)
            .ok_or_not_found()
    }

    async fn find_by_email(&self, email: &str) -> AppResult<User> {
        UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .filter(user::Column::DeletedAt.is_null())
            .one(&*self.db)
            .await?
            .map(User::from)
            .ok_or_not_found()
    }

    async fn create(&self, user: User) -> AppResult<UserResponse> {
        let active_model = ActiveModel {
            id: Set(user.id),
            name: Set(user.name),
            email: Set(user.email),
            password: Set(user.password),
            created_at: Set(user.created_at),
            updated_at: Set(user.updated_at),
            deleted_at: Set(None),
        };

        let model = active_model.insert(&*self.db).await.map_err(map_write_err)?;
        Ok(User::from(model).into())
    }

    async fn update(&self, user: User, id: Uuid) -> AppResult<UserResponse> {
        let active_model = ActiveModel {
            id: Unchanged(id),
            name: Set(user.name),
            email: Set(user.email),
            password: Set(user.password),
            created_at: NotSet,
            updated_at: Set(Utc::now()),
            deleted_at: NotSet,
        };

        // Conditional on the row still being active; a concurrent delete
        // surfaces as NotFound instead of resurrecting the record.
        let model = UserEntity::update(active_model)
            .filter(user::Column::DeletedAt.is_null())
            .exec(&*self.db)
            .await
            .map_err(map_write_err)?;

        Ok(User::from(model).into())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let now = Utc::now();
        let result = UserEntity::update_many()
            .col_expr(user::Column::DeletedAt, Expr::value(now))
            .col_expr(user::Column::UpdatedAt, Expr::value(now))
            .filter(user::Column::Id.eq(id))
            .filter(user::Column::DeletedAt.is_null())
            .exec(&*self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }
}

/// Translate write failures the client can act on; everything else stays opaque.
fn map_write_err(err: DbErr) -> AppError {
    if matches!(err, DbErr::RecordNotUpdated) {
        return AppError::NotFound;
    }
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::conflict("Email"),
        _ => AppError::from(err),
    }
}
