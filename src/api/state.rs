//! Application state - Dependency injection container.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::{Database, UserStore};
use crate::services::{AuthService, Authenticator, TokenIssuer};

/// Shared application state. Cheap to clone; services are stateless
/// and safe for concurrent use.
#[derive(Clone)]
pub struct AppState {
    /// Authentication service (also the guard's verification capability)
    pub auth_service: Arc<dyn AuthService>,
}

impl AppState {
    /// Wire up production services from a database connection and config.
    pub fn from_config(database: Arc<Database>, config: &Config) -> Self {
        let users = Arc::new(UserStore::new(database.get_connection()));
        let tokens = TokenIssuer::from_config(config);

        Self {
            auth_service: Arc::new(Authenticator::new(users, tokens)),
        }
    }

    /// Build state from an already-constructed service (for tests).
    pub fn new(auth_service: Arc<dyn AuthService>) -> Self {
        Self { auth_service }
    }
}
