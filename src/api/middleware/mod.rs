//! API middleware.

mod auth;

pub use auth::{auth_guard, CurrentUser};
