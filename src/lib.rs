//! Auth API - credential management and session token service.
//!
//! Registers user accounts, verifies login credentials, and issues and
//! validates bearer tokens for subsequent requests.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Account entity and password value object
//! - **services**: Auth orchestration and token issue/verification
//! - **infra**: Database connection and the credential store adapter
//! - **api**: HTTP handlers, access guard middleware, and routes
//! - **types**: Shared response types
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Password, User, UserResponse, UserRole};
pub use errors::{AppError, AppResult};
