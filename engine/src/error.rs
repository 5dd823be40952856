//! Error types for the user store.

use crate::UserId;
use thiserror::Error;

/// All errors a store operation can report.
///
/// Remote failures are collapsed into one variant per operation. Whether the
/// request timed out, never connected or came back non-2xx is logged at the
/// operation boundary and not surfaced to callers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    // Remote errors
    #[error("failed to fetch users")]
    Fetch,

    #[error("failed to create user")]
    Create,

    #[error("failed to update user")]
    Update,

    #[error("failed to delete user")]
    Delete,

    // Lookup errors
    #[error("user not found: {0}")]
    NotFound(UserId),

    // Validation errors
    #[error("field must not be empty: {0}")]
    EmptyField(&'static str),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, Error>;
