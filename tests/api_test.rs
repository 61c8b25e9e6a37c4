//! Integration tests for API endpoints.
//!
//! The router runs against the real user service and Argon2 hasher, with an
//! in-memory store standing in for Postgres.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use userbase::api::{create_router, AppState};
use userbase::domain::{Argon2Hasher, PasswordHasher, User, UserResponse};
use userbase::errors::{AppError, AppResult};
use userbase::infra::{Database, UserRepository};
use userbase::services::UserManager;

// =============================================================================
// In-memory store
// =============================================================================

#[derive(Default)]
struct InMemoryUsers {
    rows: Mutex<HashMap<Uuid, User>>,
}

impl InMemoryUsers {
    fn stored_password(&self, email: &str) -> Option<String> {
        self.rows
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email == email)
            .map(|u| u.password.clone())
    }
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn list(&self) -> AppResult<Vec<User>> {
        let mut users: Vec<User> = self.rows.lock().unwrap().values().cloned().collect();
        users.sort_by_key(|u| u.created_at);
        Ok(users)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<User> {
        self.rows
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or(AppError::NotFound)
    }

    async fn find_by_email(&self, email: &str) -> AppResult<User> {
        self.rows
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email == email)
            .cloned()
            .ok_or(AppError::NotFound)
    }

    async fn create(&self, user: User) -> AppResult<UserResponse> {
        let mut rows = self.rows.lock().unwrap();
        if rows.values().any(|u| u.email == user.email) {
            return Err(AppError::conflict("Email"));
        }
        rows.insert(user.id, user.clone());
        Ok(user.into())
    }

    async fn update(&self, user: User, id: Uuid) -> AppResult<UserResponse> {
        let mut rows = self.rows.lock().unwrap();
        if rows.values().any(|u| u.id != id && u.email == user.email) {
            return Err(AppError::conflict("Email"));
        }
        let existing = rows.get_mut(&id).ok_or(AppError::NotFound)?;
        existing.name = user.name;
        existing.email = user.email;
        existing.password = user.password;
        existing.updated_at = user.updated_at;
        Ok(existing.clone().into())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.rows
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or(AppError::NotFound)
    }
}

// =============================================================================
// Test Helpers
// =============================================================================

fn hasher() -> Argon2Hasher {
    Argon2Hasher::new(1024, 1, 1).unwrap()
}

fn app_with(store: Arc<InMemoryUsers>, db: MockDatabase) -> Router {
    let service = Arc::new(UserManager::new(store, Arc::new(hasher())));
    let database = Arc::new(Database::from_connection(db.into_connection()));
    create_router(AppState::new(service, database))
}

fn app(store: Arc<InMemoryUsers>) -> Router {
    app_with(store, MockDatabase::new(DatabaseBackend::Postgres))
}

async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, json)
}

async fn create_alice(store: &Arc<InMemoryUsers>) -> Uuid {
    let (status, body) = send(
        app(store.clone()),
        "POST",
        "/users",
        Some(json!({"name": "Alice", "email": "alice@example.com", "password": "secret-pass"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().parse().unwrap()
}

// =============================================================================
// Create
// =============================================================================

#[tokio::test]
async fn test_create_user_stores_hash_and_hides_password() {
    let store = Arc::new(InMemoryUsers::default());

    let (status, body) = send(
        app(store.clone()),
        "POST",
        "/users",
        Some(json!({"name": "Alice", "email": "a@x.com", "password": "secret-pass"})),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["email"], "a@x.com");
    assert!(body.get("password").is_none());

    let stored = store.stored_password("a@x.com").unwrap();
    assert_ne!(stored, "secret-pass");
    assert!(hasher().verify("secret-pass", &stored));
}

#[tokio::test]
async fn test_create_user_rejects_invalid_payload() {
    let store = Arc::new(InMemoryUsers::default());

    let (status, body) = send(
        app(store.clone()),
        "POST",
        "/users",
        Some(json!({"name": "Alice", "email": "not-an-email", "password": "short"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert!(store.rows.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_create_duplicate_email_conflicts() {
    let store = Arc::new(InMemoryUsers::default());
    create_alice(&store).await;

    let (status, body) = send(
        app(store.clone()),
        "POST",
        "/users",
        Some(json!({"name": "Other", "email": "alice@example.com", "password": "another-pass"})),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CONFLICT");
}

// =============================================================================
// Read
// =============================================================================

#[tokio::test]
async fn test_get_user_by_id_and_email() {
    let store = Arc::new(InMemoryUsers::default());
    let id = create_alice(&store).await;

    let (status, body) = send(app(store.clone()), "GET", &format!("/users/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Alice");
    assert!(body.get("password").is_none());

    let (status, body) = send(
        app(store.clone()),
        "GET",
        "/users/email/alice@example.com",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id.to_string());
}

#[tokio::test]
async fn test_get_unknown_user_is_not_found() {
    let store = Arc::new(InMemoryUsers::default());

    let (status, body) = send(
        app(store),
        "GET",
        &format!("/users/{}", Uuid::new_v4()),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_malformed_id_is_bad_request() {
    let store = Arc::new(InMemoryUsers::default());

    let (status, _) = send(app(store), "GET", "/users/not-a-uuid", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_users() {
    let store = Arc::new(InMemoryUsers::default());
    create_alice(&store).await;

    let (status, body) = send(app(store), "GET", "/users", None).await;

    assert_eq!(status, StatusCode::OK);
    let users = body.as_array().unwrap();
    assert_eq!(users.len(), 1);
    assert!(users[0].get("password").is_none());
}

// =============================================================================
// Update
// =============================================================================

#[tokio::test]
async fn test_update_existing_user_rehashes_password() {
    let store = Arc::new(InMemoryUsers::default());
    let id = create_alice(&store).await;

    let (status, body) = send(
        app(store.clone()),
        "PUT",
        &format!("/users/{}", id),
        Some(json!({"name": "Alicia", "email": "alicia@example.com", "password": "rotated-pass"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id.to_string());
    assert_eq!(body["name"], "Alicia");

    let stored = store.stored_password("alicia@example.com").unwrap();
    assert_ne!(stored, "rotated-pass");
    assert!(hasher().verify("rotated-pass", &stored));
    assert!(!hasher().verify("secret-pass", &stored));
}

#[tokio::test]
async fn test_update_to_taken_email_conflicts() {
    let store = Arc::new(InMemoryUsers::default());
    create_alice(&store).await;

    let (status, body) = send(
        app(store.clone()),
        "POST",
        "/users",
        Some(json!({"name": "Bob", "email": "bob@example.com", "password": "bob-password"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let bob = body["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        app(store.clone()),
        "PUT",
        &format!("/users/{}", bob),
        Some(json!({"name": "Bob", "email": "alice@example.com", "password": "bob-password"})),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CONFLICT");
    assert!(store.stored_password("bob@example.com").is_some());
}

#[tokio::test]
async fn test_update_unknown_user_is_not_found() {
    let store = Arc::new(InMemoryUsers::default());

    let (status, body) = send(
        app(store.clone()),
        "PUT",
        &format!("/users/{}", Uuid::new_v4()),
        Some(json!({"name": "Ghost", "email": "ghost@example.com", "password": "boo-boo-boo"})),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
    assert!(store.rows.lock().unwrap().is_empty());
}

// =============================================================================
// Delete
// =============================================================================

#[tokio::test]
async fn test_delete_then_get_is_not_found() {
    let store = Arc::new(InMemoryUsers::default());
    let id = create_alice(&store).await;

    let (status, _) = send(app(store.clone()), "DELETE", &format!("/users/{}", id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(app(store.clone()), "GET", &format!("/users/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(app(store), "DELETE", &format!("/users/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_reports_database_ok() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).append_exec_results([MockExecResult {
        last_insert_id: 0,
        rows_affected: 1,
    }]);

    let (status, body) = send(
        app_with(Arc::new(InMemoryUsers::default()), db),
        "GET",
        "/health",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}
