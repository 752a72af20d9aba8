//! JWT validation for tool and API authentication.
//!
//! The validator only verifies credentials; it never mints them for callers
//! (the issuer lives upstream). Verification is a pure function of the
//! token, the shared secret, and the current time: no store access happens
//! before a credential is accepted.
//!
//! All failure modes (missing, malformed, bad signature, expired) are
//! reported identically so nothing about the token is leaked to callers
//! outside the trust boundary.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::tools::ToolError;

/// JWT claims carried by a bearer credential.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (owner id, UUID string).
    pub sub: String,
    /// Issued at (Unix timestamp).
    pub iat: i64,
    /// Expiration time (Unix timestamp).
    pub exp: i64,
}

/// Verifies bearer credentials against a shared HS256 secret.
#[derive(Clone)]
pub struct TokenValidator {
    secret: String,
}

impl TokenValidator {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Verify a credential and extract the subject id.
    ///
    /// Accepts the raw token or one with a `Bearer ` prefix. Every failure
    /// mode produces the same error.
    pub fn verify(&self, credential: &str) -> Result<Uuid, ToolError> {
        let token = credential.strip_prefix("Bearer ").unwrap_or(credential);
        if token.is_empty() {
            return Err(ToolError::authentication());
        }

        let key = DecodingKey::from_secret(self.secret.as_bytes());
        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims = std::collections::HashSet::from(["exp".to_string()]);

        let data = decode::<Claims>(token, &key, &validation)
            .map_err(|_| ToolError::authentication())?;

        Uuid::parse_str(&data.claims.sub).map_err(|_| ToolError::authentication())
    }

    /// Mint a token for the given subject, valid for `ttl_secs`.
    ///
    /// Used by tests and local tooling; production credentials come from
    /// the upstream issuer.
    pub fn issue(&self, subject: Uuid, ttl_secs: i64) -> Result<String, ToolError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: subject.to_string(),
            iat: now,
            exp: now + ttl_secs,
        };

        let key = EncodingKey::from_secret(self.secret.as_bytes());
        encode(&Header::new(Algorithm::HS256), &claims, &key)
            .map_err(|e| ToolError::Database(e.to_string()))
    }
}
