//! UMApp Server - a local stand-in for the remote users origin.
//!
//! Serves a jsonplaceholder-shaped `users` resource. Creates, updates and
//! deletes are answered as if they succeeded but nothing is ever stored, which
//! is exactly the contract the engine's overlay is built around.

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod seed;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use umapp_engine::UserRecord;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The users served by the resource, fixed at startup
    pub users: Arc<Vec<UserRecord>>,
}

impl AppState {
    pub fn new(users: Vec<UserRecord>) -> Self {
        Self {
            users: Arc::new(users),
        }
    }
}

/// Build the application router.
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .merge(routes::create_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
