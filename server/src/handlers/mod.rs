//! Request handlers for the users resource.

mod users;

pub use users::*;
