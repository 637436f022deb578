//! Authentication and account handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{auth_guard, CurrentUser};
use crate::api::AppState;
use crate::domain::UserResponse;
use crate::errors::AppResult;
use crate::services::AuthResponse;
use crate::types::MessageResponse;

/// Account creation / registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    /// Account email address
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "user@example.com")]
    pub email: String,
    /// Account password (minimum 6 characters)
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    #[schema(example = "SecurePass123!", min_length = 6)]
    pub password: String,
    /// Display name
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "John Doe")]
    pub name: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    /// Account email address
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "user@example.com")]
    pub email: String,
    /// Account password
    #[schema(example = "SecurePass123!")]
    pub password: String,
}

/// Create the /auth routes. Listing and check-token sit behind the
/// access guard; everything else is public.
pub fn auth_routes(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/", post(create))
        .route("/register", post(register))
        .route("/login", post(login))
        .route(
            "/:id",
            get(get_user).put(update_user).delete(remove_user),
        );

    let guarded = Router::new()
        .route("/", get(list_users))
        .route("/check-token", get(check_token))
        .route_layer(middleware::from_fn_with_state(state, auth_guard));

    public.merge(guarded)
}

/// Create an account without issuing a token
#[utoipa::path(
    post,
    path = "/auth",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn create(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let user = state
        .auth_service
        .create(payload.email, payload.password, payload.name)
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// Register an account and receive a session token
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account registered", body = AuthResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    let response = state
        .auth_service
        .register(payload.email, payload.password, payload.name)
        .await?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// Login with email and password
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let response = state
        .auth_service
        .login(payload.email, payload.password)
        .await?;

    Ok(Json(response))
}

/// Confirm the current session and refresh its token
#[utoipa::path(
    get,
    path = "/auth/check-token",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Session is live", body = AuthResponse),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn check_token(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<AuthResponse>> {
    let response = state.auth_service.check_token(current_user.id).await?;

    Ok(Json(response))
}

/// List all accounts (without secret material)
#[utoipa::path(
    get,
    path = "/auth",
    tag = "Accounts",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All accounts", body = [UserResponse]),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<Vec<UserResponse>>> {
    let users = state.auth_service.find_all().await?;

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Fetch one account by id
#[utoipa::path(
    get,
    path = "/auth/{id}",
    tag = "Accounts",
    params(("id" = Uuid, Path, description = "Account identifier")),
    responses(
        (status = 200, description = "Account found", body = UserResponse),
        (status = 404, description = "No such account")
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<UserResponse>> {
    let user = state.auth_service.find_by_id(id).await?;

    Ok(Json(UserResponse::from(user)))
}

/// Update an account. Not yet specified; placeholder route.
#[utoipa::path(
    put,
    path = "/auth/{id}",
    tag = "Accounts",
    params(("id" = Uuid, Path, description = "Account identifier")),
    responses((status = 501, description = "Not implemented"))
)]
pub async fn update_user(Path(id): Path<Uuid>) -> (StatusCode, Json<MessageResponse>) {
    (
        StatusCode::NOT_IMPLEMENTED,
        Json(MessageResponse::new(format!(
            "Updating account {} is not implemented",
            id
        ))),
    )
}

/// Remove an account. Not yet specified; placeholder route.
#[utoipa::path(
    delete,
    path = "/auth/{id}",
    tag = "Accounts",
    params(("id" = Uuid, Path, description = "Account identifier")),
    responses((status = 501, description = "Not implemented"))
)]
pub async fn remove_user(Path(id): Path<Uuid>) -> (StatusCode, Json<MessageResponse>) {
    (
        StatusCode::NOT_IMPLEMENTED,
        Json(MessageResponse::new(format!(
            "Removing account {} is not implemented",
            id
        ))),
    )
}
