//! HTTP route definitions.

mod index;
mod users;

use crate::AppState;
use axum::Router;

/// Create all application routes.
pub fn create_routes() -> Router<AppState> {
    Router::new().merge(index::routes()).merge(users::routes())
}
