//! Session token issue and verification.
//!
//! Tokens are stateless HS256 JWTs carrying the subject id and an
//! expiration claim. The signing key is built once from configuration
//! and is read-only afterwards, so it is safe to share across requests
//! without synchronization.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Config;
use crate::errors::{AppError, AppResult};

/// Token claims payload
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject account identifier
    pub sub: Uuid,
    /// Expiration (unix seconds)
    pub exp: i64,
    /// Issued-at (unix seconds)
    pub iat: i64,
}

/// Issues and verifies session tokens with a process-wide secret.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl TokenIssuer {
    /// Build the issuer from application configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret_bytes()),
            ttl: Duration::hours(config.token_ttl_hours),
        }
    }

    /// Issue a signed token for the given subject, expiring after the
    /// configured window.
    pub fn issue(&self, subject: Uuid) -> AppResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject,
            exp: (now + self.ttl).timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Token signing failed: {}", e)))
    }

    /// Verify signature and expiration, returning the claims.
    ///
    /// Fails closed: structural, signature, and expiration failures are
    /// all reported as the same `Unauthenticated` error so callers
    /// cannot distinguish them.
    pub fn verify(&self, token: &str) -> AppResult<Claims> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|_| AppError::Unauthenticated)
    }

    #[cfg(test)]
    pub(crate) fn with_ttl(config: &Config, ttl: Duration) -> Self {
        Self {
            ttl,
            ..Self::from_config(config)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issuer() -> TokenIssuer {
        let config = Config::with_secret("test-secret-key-for-testing-only-32chars", 2);
        TokenIssuer::from_config(&config)
    }

    #[test]
    fn issue_then_verify_returns_subject() {
        let issuer = issuer();
        let subject = Uuid::new_v4();

        let token = issuer.issue(subject).unwrap();
        let claims = issuer.verify(&token).unwrap();

        assert_eq!(claims.sub, subject);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn expired_token_is_rejected() {
        let config = Config::with_secret("test-secret-key-for-testing-only-32chars", 2);
        // Expiration far enough in the past to clear default leeway
        let issuer = TokenIssuer::with_ttl(&config, Duration::hours(-2));

        let token = issuer.issue(Uuid::new_v4()).unwrap();
        let err = issuer.verify(&token).unwrap_err();
        assert!(matches!(err, AppError::Unauthenticated));
    }

    #[test]
    fn tampered_token_is_rejected() {
        let issuer = issuer();
        let token = issuer.issue(Uuid::new_v4()).unwrap();

        // Flip a character in the signature segment
        let mut tampered = token.clone();
        let last = tampered.pop().unwrap();
        tampered.push(if last == 'a' { 'b' } else { 'a' });

        assert!(matches!(
            issuer.verify(&tampered).unwrap_err(),
            AppError::Unauthenticated
        ));
    }

    #[test]
    fn wrong_key_is_rejected() {
        let issuer = issuer();
        let other = TokenIssuer::from_config(&Config::with_secret(
            "another-secret-key-for-testing-32chars!!",
            2,
        ));

        let token = other.issue(Uuid::new_v4()).unwrap();
        assert!(matches!(
            issuer.verify(&token).unwrap_err(),
            AppError::Unauthenticated
        ));
    }

    #[test]
    fn structural_garbage_is_rejected_identically() {
        let issuer = issuer();

        for garbage in ["", "not-a-token", "a.b", "a.b.c.d"] {
            let err = issuer.verify(garbage).unwrap_err();
            // Same class for every failure shape
            assert!(matches!(err, AppError::Unauthenticated));
        }
    }
}
