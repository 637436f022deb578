//! Infrastructure layer - External systems integration
//!
//! Handles the external-collaborator concerns:
//! - Database connection and migrations
//! - The credential store adapter (repository)

pub mod db;
pub mod repositories;

pub use db::{Database, Migrator};
pub use repositories::{NewUser, UserRepository, UserStore};
