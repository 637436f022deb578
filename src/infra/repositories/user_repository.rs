//! Credential store adapter.
//!
//! `UserRepository` is the boundary to the external user-record store:
//! uniqueness-constrained insert plus lookups. `UserStore` is the
//! SeaORM/Postgres implementation.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, SqlErr,
};
use uuid::Uuid;

use super::entities::user::{ActiveModel, Column, Entity as UserEntity};
use crate::config::ROLE_USER;
use crate::domain::User;
use crate::errors::{AppError, AppResult};

/// Data required to insert a new account. The password arrives here
/// already hashed; the plaintext never crosses this boundary.
#[derive(Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub name: String,
}

impl std::fmt::Debug for NewUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUser")
            .field("email", &self.email)
            .field("password_hash", &"[REDACTED]")
            .field("name", &self.name)
            .finish()
    }
}

/// User-record store boundary.
///
/// Emails are expected to be normalized (lowercased) before reaching
/// this layer; lookups are exact matches.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account. Fails with `AlreadyExists` when the email
    /// is already taken (unique constraint).
    async fn insert(&self, new_user: NewUser) -> AppResult<User>;

    /// Look up an account by its normalized email.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Look up an account by id.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// List all accounts (administrative; no pagination contract).
    async fn list(&self) -> AppResult<Vec<User>>;
}

/// SeaORM-backed implementation of [`UserRepository`].
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn insert(&self, new_user: NewUser) -> AppResult<User> {
        let now = chrono::Utc::now();
        let email = new_user.email.clone();

        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(new_user.email),
            password_hash: Set(new_user.password_hash),
            name: Set(new_user.name),
            role: Set(ROLE_USER.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&self.db).await.map_err(|e| {
            // The unique index on email is the store-level uniqueness
            // guarantee; everything else stays a driver error.
            match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => AppError::already_exists(email),
                _ => AppError::from(e),
            }
        })?;

        Ok(User::from(model))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(Column::Email.eq(email))
            .one(&self.db)
            .await?;

        Ok(result.map(User::from))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let result = UserEntity::find_by_id(id).one(&self.db).await?;

        Ok(result.map(User::from))
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        let models = UserEntity::find().all(&self.db).await?;

        Ok(models.into_iter().map(User::from).collect())
    }
}
