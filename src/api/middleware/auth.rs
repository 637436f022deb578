//! Access guard middleware.
//!
//! Extracts a bearer token from the Authorization header, verifies it,
//! and attaches the authenticated identity to the request. Every
//! failure path (no header, wrong scheme, invalid/expired/tampered
//! token) rejects identically before any handler runs.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::api::AppState;
use crate::config::BEARER_TOKEN_PREFIX;
use crate::errors::AppError;

/// Verified subject extracted from a valid session token.
/// Created per-request by the guard and dropped at request end.
#[derive(Clone, Copy, Debug)]
pub struct CurrentUser {
    pub id: Uuid,
}

/// Access guard middleware.
pub async fn auth_guard(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::Unauthenticated)?;

    let token = auth_header
        .strip_prefix(BEARER_TOKEN_PREFIX)
        .ok_or(AppError::Unauthenticated)?;

    let claims = state.auth_service.verify_token(token)?;

    request
        .extensions_mut()
        .insert(CurrentUser { id: claims.sub });

    Ok(next.run(request).await)
}
