//! End-to-end tests for the auth API.
//!
//! These drive the real router, service, and token issuer over an
//! in-memory credential store, so no database is required.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use auth_api::config::Config;
use auth_api::domain::User;
use auth_api::errors::{AppError, AppResult};
use auth_api::infra::repositories::{NewUser, UserRepository};
use auth_api::services::{Authenticator, TokenIssuer};
use auth_api::AppState;

const TEST_SECRET: &str = "test-secret-key-for-testing-only-32chars";

/// In-memory credential store with the same uniqueness contract as the
/// real one.
#[derive(Default)]
struct InMemoryUsers {
    users: Mutex<Vec<User>>,
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn insert(&self, new_user: NewUser) -> AppResult<User> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == new_user.email) {
            return Err(AppError::already_exists(new_user.email));
        }

        let user = User::new(
            Uuid::new_v4(),
            new_user.email,
            new_user.password_hash,
            new_user.name,
        );
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        Ok(self.users.lock().unwrap().clone())
    }
}

fn test_app() -> (Router, Arc<InMemoryUsers>) {
    let users = Arc::new(InMemoryUsers::default());
    let tokens = TokenIssuer::from_config(&Config::with_secret(TEST_SECRET, 2));
    let state = AppState::new(Arc::new(Authenticator::new(users.clone(), tokens)));

    (auth_api::api::create_router(state), users)
}

async fn send_json(app: &Router, method: &str, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, value)
}

async fn send_get(app: &Router, uri: &str, bearer: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    let response = app
        .clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, value)
}

fn register_body() -> Value {
    json!({"email": "a@x.com", "password": "secret", "name": "Ann"})
}

#[tokio::test]
async fn register_then_case_insensitive_login_resolves_same_subject() {
    let (app, _) = test_app();

    let (status, body) = send_json(&app, "POST", "/auth/register", register_body()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["email"], "a@x.com");
    assert!(body["user"].get("password").is_none());
    assert!(body["user"].get("password_hash").is_none());
    let registered_id = body["user"]["id"].as_str().unwrap().to_string();
    assert!(!body["token"].as_str().unwrap().is_empty());

    // Uppercased email logs into the same account
    let (status, body) = send_json(
        &app,
        "POST",
        "/auth/login",
        json!({"email": "A@X.com", "password": "secret"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["id"], registered_id.as_str());

    // The login token verifies back to the registration subject
    let issuer = TokenIssuer::from_config(&Config::with_secret(TEST_SECRET, 2));
    let claims = issuer.verify(body["token"].as_str().unwrap()).unwrap();
    assert_eq!(claims.sub.to_string(), registered_id);
}

#[tokio::test]
async fn duplicate_registration_conflicts_and_keeps_one_account() {
    let (app, users) = test_app();

    let (status, _) = send_json(&app, "POST", "/auth/register", register_body()).await;
    assert_eq!(status, StatusCode::CREATED);

    // Same account, different casing: still the same normalized email
    let (status, body) = send_json(
        &app,
        "POST",
        "/auth/register",
        json!({"email": "A@X.com", "password": "other-secret", "name": "Ann"}),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "ALREADY_EXISTS");

    let stored = users.list().await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].email, "a@x.com");
}

#[tokio::test]
async fn login_failures_are_byte_for_byte_identical() {
    let (app, _) = test_app();
    send_json(&app, "POST", "/auth/register", register_body()).await;

    let (wrong_password_status, wrong_password_body) = send_json(
        &app,
        "POST",
        "/auth/login",
        json!({"email": "a@x.com", "password": "not-the-password"}),
    )
    .await;
    let (unknown_email_status, unknown_email_body) = send_json(
        &app,
        "POST",
        "/auth/login",
        json!({"email": "nobody@x.com", "password": "secret"}),
    )
    .await;

    assert_eq!(wrong_password_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email_status, StatusCode::UNAUTHORIZED);
    // Distinguishing the two causes would be an enumeration oracle
    assert_eq!(wrong_password_body, unknown_email_body);
}

#[tokio::test]
async fn guard_rejects_missing_tampered_and_expired_tokens_identically() {
    let (app, _) = test_app();
    let (_, registered) = send_json(&app, "POST", "/auth/register", register_body()).await;
    let good_token = registered["token"].as_str().unwrap();

    // Expired token signed with the real secret
    #[derive(serde::Serialize)]
    struct StaleClaims {
        sub: Uuid,
        exp: i64,
        iat: i64,
    }
    let now = chrono::Utc::now().timestamp();
    let expired = jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &StaleClaims {
            sub: Uuid::new_v4(),
            exp: now - 7200,
            iat: now - 14400,
        },
        &jsonwebtoken::EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .unwrap();

    let mut tampered = good_token.to_string();
    tampered.push('x');

    let (missing_status, missing_body) = send_get(&app, "/auth", None).await;
    let (tampered_status, tampered_body) = send_get(&app, "/auth", Some(&tampered)).await;
    let (expired_status, expired_body) = send_get(&app, "/auth", Some(&expired)).await;

    assert_eq!(missing_status, StatusCode::UNAUTHORIZED);
    assert_eq!(tampered_status, StatusCode::UNAUTHORIZED);
    assert_eq!(expired_status, StatusCode::UNAUTHORIZED);
    assert_eq!(missing_body, tampered_body);
    assert_eq!(missing_body, expired_body);
}

#[tokio::test]
async fn check_token_confirms_live_session() {
    let (app, _) = test_app();
    let (_, registered) = send_json(&app, "POST", "/auth/register", register_body()).await;
    let token = registered["token"].as_str().unwrap();

    let (status, body) = send_get(&app, "/auth/check-token", Some(token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["id"], registered["user"]["id"]);
    assert!(!body["token"].as_str().unwrap().is_empty());

    let (status, _) = send_get(&app, "/auth/check-token", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn guarded_listing_returns_accounts_without_secrets() {
    let (app, _) = test_app();
    let (_, registered) = send_json(&app, "POST", "/auth/register", register_body()).await;
    let token = registered["token"].as_str().unwrap();

    let (status, body) = send_get(&app, "/auth", Some(token)).await;
    assert_eq!(status, StatusCode::OK);

    let accounts = body.as_array().unwrap();
    assert_eq!(accounts.len(), 1);
    assert_eq!(accounts[0]["email"], "a@x.com");
    assert!(accounts[0].get("password_hash").is_none());
    // No hash material anywhere in the rendered body
    assert!(!body.to_string().contains("$argon2"));
}

#[tokio::test]
async fn lookup_by_id_is_public_and_404s_when_absent() {
    let (app, _) = test_app();
    let (_, registered) = send_json(&app, "POST", "/auth/register", register_body()).await;
    let id = registered["user"]["id"].as_str().unwrap();

    let (status, body) = send_get(&app, &format!("/auth/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "a@x.com");

    let (status, body) = send_get(&app, &format!("/auth/{}", Uuid::new_v4()), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn raw_create_returns_account_without_token() {
    let (app, _) = test_app();

    let (status, body) = send_json(&app, "POST", "/auth", register_body()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["email"], "a@x.com");
    assert!(body.get("token").is_none());
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
async fn update_and_remove_are_placeholders() {
    let (app, _) = test_app();
    let id = Uuid::new_v4();

    let (status, _) = send_json(&app, "PUT", &format!("/auth/{}", id), json!({"name": "x"})).await;
    assert_eq!(status, StatusCode::NOT_IMPLEMENTED);

    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/auth/{}", id))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);
}

#[tokio::test]
async fn malformed_registration_is_rejected_with_validation_error() {
    let (app, _) = test_app();

    // Bad email format
    let (status, body) = send_json(
        &app,
        "POST",
        "/auth/register",
        json!({"email": "not-an-email", "password": "secret", "name": "Ann"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    // Password below minimum length
    let (status, _) = send_json(
        &app,
        "POST",
        "/auth/register",
        json!({"email": "a@x.com", "password": "tiny", "name": "Ann"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Missing field entirely
    let (status, _) = send_json(
        &app,
        "POST",
        "/auth/register",
        json!({"email": "a@x.com", "password": "secret"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
