//! Service index and liveness.

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::AppState;

/// What `/` and `/health` report about the served resource.
#[derive(Serialize)]
pub struct ServiceInfo {
    pub status: &'static str,
    pub version: &'static str,
    /// Number of users the `users` resource starts with
    pub users: usize,
    pub resources: &'static [&'static str],
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(service_info))
        .route("/health", get(service_info))
}

async fn service_info(State(state): State<AppState>) -> Json<ServiceInfo> {
    Json(ServiceInfo {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        users: state.users.len(),
        resources: &["/users", "/users/{id}"],
    })
}
