//! Users resource routes.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use umapp_engine::{UserFields, UserId, UserRecord};

use crate::error::{AppError, Result};
use crate::handlers::{handle_create, handle_delete, handle_get, handle_list, handle_update};
use crate::AppState;

/// Create users routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_handler).post(create_handler))
        .route(
            "/users/{id}",
            get(get_handler).put(update_handler).delete(delete_handler),
        )
}

fn fields_from(body: std::result::Result<Json<UserFields>, JsonRejection>) -> Result<UserFields> {
    body.map(|Json(fields)| fields)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

/// GET /users
async fn list_handler(State(state): State<AppState>) -> Json<Vec<UserRecord>> {
    Json(handle_list(&state.users))
}

/// GET /users/{id}
async fn get_handler(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
) -> Result<Json<UserRecord>> {
    Ok(Json(handle_get(&state.users, id)?))
}

/// POST /users
async fn create_handler(
    State(state): State<AppState>,
    body: std::result::Result<Json<UserFields>, JsonRejection>,
) -> Result<(StatusCode, Json<UserRecord>)> {
    let fields = fields_from(body)?;
    Ok((StatusCode::CREATED, Json(handle_create(&state.users, fields))))
}

/// PUT /users/{id}
async fn update_handler(
    Path(id): Path<UserId>,
    body: std::result::Result<Json<UserFields>, JsonRejection>,
) -> Result<Json<UserRecord>> {
    let fields = fields_from(body)?;
    Ok(Json(handle_update(id, fields)))
}

/// DELETE /users/{id}
async fn delete_handler(Path(id): Path<UserId>) -> Json<Value> {
    handle_delete(id);
    Json(json!({}))
}
