//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::auth_handler;
use crate::domain::{UserResponse, UserRole};
use crate::services::AuthResponse;
use crate::types::MessageResponse;

/// OpenAPI documentation for the auth API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Auth API",
        version = "0.1.0",
        description = "Credential management and session token service",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        auth_handler::create,
        auth_handler::register,
        auth_handler::login,
        auth_handler::check_token,
        auth_handler::list_users,
        auth_handler::get_user,
        auth_handler::update_user,
        auth_handler::remove_user,
    ),
    components(
        schemas(
            UserRole,
            UserResponse,
            AuthResponse,
            MessageResponse,
            auth_handler::RegisterRequest,
            auth_handler::LoginRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, login, and session checks"),
        (name = "Accounts", description = "Account lookup operations")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Session token obtained from /auth/login"))
                        .build(),
                ),
            );
        }
    }
}
