//! Users handlers - a jsonplaceholder-shaped resource that never keeps writes.

use crate::error::{AppError, Result};
use umapp_engine::{UserFields, UserId, UserRecord};

/// All seeded users.
pub fn handle_list(users: &[UserRecord]) -> Vec<UserRecord> {
    users.to_vec()
}

/// A single seeded user.
pub fn handle_get(users: &[UserRecord], id: UserId) -> Result<UserRecord> {
    users
        .iter()
        .find(|u| u.id == id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("user {id}")))
}

/// Echo a created user with the id the resource would have assigned.
///
/// The seed is not changed, so every create gets the same id.
pub fn handle_create(users: &[UserRecord], fields: UserFields) -> UserRecord {
    let id = users.len() as UserId + 1;
    tracing::debug!(id, name = %fields.name, "Simulated create");
    UserRecord::from_fields(id, fields)
}

/// Echo an updated user under the path id.
pub fn handle_update(id: UserId, fields: UserFields) -> UserRecord {
    tracing::debug!(id, "Simulated update");
    UserRecord::from_fields(id, fields)
}

/// Accept a delete without doing anything.
pub fn handle_delete(id: UserId) {
    tracing::debug!(id, "Simulated delete");
}
