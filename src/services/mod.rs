//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion.

mod auth_service;
pub mod token;

pub use auth_service::{AuthResponse, AuthService, Authenticator};
pub use token::{Claims, TokenIssuer};
