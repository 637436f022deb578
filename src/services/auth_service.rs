//! Authentication service - orchestrates registration, login, and
//! token-check flows.
//!
//! Holds no durable state of its own; accounts live behind the
//! [`UserRepository`] boundary and sessions live entirely inside the
//! signed token, so the service is safe to share across concurrent
//! requests.

use async_trait::async_trait;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{Password, User, UserResponse};
use crate::errors::{AppError, AppResult};
use crate::infra::repositories::{NewUser, UserRepository};
use crate::services::token::{Claims, TokenIssuer};

/// A syntactically valid Argon2id hash that matches no password.
/// Login verifies against it when the email is unknown so response
/// timing does not reveal whether an account exists.
const DUMMY_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$gZiV/M1gPc22ElAH/Jh1Hw$CWOrkoo7oJBQ/iyh7uJ0LO2aLEfrHwTWllSAxT0zRno";

/// Response returned by register, login, and check-token: the account
/// without secret material, plus a fresh session token.
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub user: UserResponse,
    /// Signed session token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Create an account without issuing a token (raw create).
    async fn create(&self, email: String, password: String, name: String) -> AppResult<User>;

    /// Full registration: create the account and issue a session token.
    async fn register(&self, email: String, password: String, name: String)
        -> AppResult<AuthResponse>;

    /// Verify credentials and issue a session token.
    async fn login(&self, email: String, password: String) -> AppResult<AuthResponse>;

    /// Confirm a verified session is still live: re-fetch the account
    /// and reissue a token. Idempotent, no side effects.
    async fn check_token(&self, subject: Uuid) -> AppResult<AuthResponse>;

    /// Fetch one account by id.
    async fn find_by_id(&self, id: Uuid) -> AppResult<User>;

    /// List all accounts (administrative).
    async fn find_all(&self) -> AppResult<Vec<User>>;

    /// Verify a session token and extract its claims. Stateless
    /// capability used by the access guard.
    fn verify_token(&self, token: &str) -> AppResult<Claims>;
}

/// Concrete implementation over a credential store and a token issuer.
pub struct Authenticator<R: UserRepository> {
    users: std::sync::Arc<R>,
    tokens: TokenIssuer,
}

impl<R: UserRepository> Authenticator<R> {
    pub fn new(users: std::sync::Arc<R>, tokens: TokenIssuer) -> Self {
        Self { users, tokens }
    }

    /// Translate store failures at the service boundary. Duplicate-key
    /// outcomes keep their meaning; everything else becomes opaque so
    /// driver internals never leak to the caller.
    fn store_error(err: AppError) -> AppError {
        match err {
            AppError::AlreadyExists(_) => err,
            other => {
                tracing::error!("Account store failure: {:?}", other);
                AppError::internal("account store failure")
            }
        }
    }
}

#[async_trait]
impl<R: UserRepository> AuthService for Authenticator<R> {
    async fn create(&self, email: String, password: String, name: String) -> AppResult<User> {
        let email = email.to_lowercase();
        let password_hash = Password::new(&password)?.into_string();

        self.users
            .insert(NewUser {
                email,
                password_hash,
                name,
            })
            .await
            .map_err(Self::store_error)
    }

    async fn register(
        &self,
        email: String,
        password: String,
        name: String,
    ) -> AppResult<AuthResponse> {
        let user = self.create(email, password, name).await?;
        let token = self.tokens.issue(user.id)?;

        Ok(AuthResponse {
            user: UserResponse::from(user),
            token,
        })
    }

    async fn login(&self, email: String, password: String) -> AppResult<AuthResponse> {
        let email = email.to_lowercase();
        let lookup = self.users.find_by_email(&email).await.map_err(Self::store_error)?;

        // Verify against a dummy hash when the account is unknown so the
        // two failure paths take comparable time.
        let stored = match &lookup {
            Some(user) => Password::from_hash(user.password_hash.clone()),
            None => Password::from_hash(DUMMY_HASH.to_string()),
        };
        let password_valid = stored.verify(&password);

        // Single undifferentiated failure for unknown email and wrong
        // password alike.
        let Some(user) = lookup else {
            return Err(AppError::InvalidCredentials);
        };
        if !password_valid {
            return Err(AppError::InvalidCredentials);
        }

        let token = self.tokens.issue(user.id)?;
        Ok(AuthResponse {
            user: UserResponse::from(user),
            token,
        })
    }

    async fn check_token(&self, subject: Uuid) -> AppResult<AuthResponse> {
        // The guard has already verified the token; an account that has
        // since disappeared means the session is no longer valid.
        let user = self
            .users
            .find_by_id(subject)
            .await
            .map_err(Self::store_error)?
            .ok_or(AppError::Unauthenticated)?;

        let token = self.tokens.issue(user.id)?;
        Ok(AuthResponse {
            user: UserResponse::from(user),
            token,
        })
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<User> {
        self.users
            .find_by_id(id)
            .await
            .map_err(Self::store_error)?
            .ok_or(AppError::NotFound)
    }

    async fn find_all(&self) -> AppResult<Vec<User>> {
        self.users.list().await.map_err(Self::store_error)
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        self.tokens.verify(token)
    }
}
