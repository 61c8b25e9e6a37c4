//! API layer - HTTP handlers and routing
//!
//! Thin axum adapters that decode requests, call the user service,
//! and project results into `UserResponse`.

pub mod extractors;
pub mod handlers;
pub mod openapi;
pub mod routes;
pub mod state;

pub use openapi::ApiDoc;
pub use routes::create_router;
pub use state::AppState;
