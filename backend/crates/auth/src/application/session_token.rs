//! Session Token Codec
//!
//! Signed, self-contained session tokens:
//! `base64url(claims_json) "." base64url(HMAC-SHA256(secret, base64url(claims_json)))`.
//! Nothing is stored server-side; validity is signature plus expiry.

use std::sync::Arc;

use chrono::Utc;
use platform::crypto;
use thiserror::Error;

use crate::application::config::SessionSecret;
use crate::domain::entity::session::SessionClaims;
use crate::domain::entity::user::User;

/// Why a token was rejected. Only ever logged; callers see "no session".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionTokenError {
    #[error("Token is not two dot-separated segments")]
    Malformed,

    #[error("Token segment is not base64url")]
    Encoding,

    #[error("Token signature mismatch")]
    BadSignature,

    #[error("Token claims are invalid")]
    InvalidClaims,

    #[error("Token expired")]
    Expired,
}

/// Issues and validates session tokens with a single process-wide secret
///
/// Cheap to clone; the secret is shared.
#[derive(Debug, Clone)]
pub struct SessionCodec {
    secret: Arc<SessionSecret>,
}

impl SessionCodec {
    pub fn new(secret: SessionSecret) -> Self {
        Self {
            secret: Arc::new(secret),
        }
    }

    /// Sign claims for `user`, valid for `ttl_secs` from now
    pub fn issue(&self, user: &User, ttl_secs: i64) -> (String, SessionClaims) {
        let claims = SessionClaims::for_user(user, Utc::now().timestamp(), ttl_secs);
        (self.encode(&claims), claims)
    }

    pub fn encode(&self, claims: &SessionClaims) -> String {
        // Serializing plain strings and integers cannot fail
        let json = serde_json::to_vec(claims).unwrap_or_default();
        let payload = crypto::to_base64url(&json);
        let signature = crypto::hmac_sha256(self.secret.as_bytes(), payload.as_bytes());
        format!("{}.{}", payload, crypto::to_base64url(&signature))
    }

    /// Validate a token at time `now` (unix seconds)
    pub fn decode(&self, token: &str, now: i64) -> Result<SessionClaims, SessionTokenError> {
        let (payload, signature) = token.split_once('.').ok_or(SessionTokenError::Malformed)?;
        if payload.is_empty() || signature.contains('.') {
            return Err(SessionTokenError::Malformed);
        }

        let signature = crypto::from_base64url(signature).map_err(|_| SessionTokenError::Encoding)?;

        // Constant-time comparison
        if !crypto::verify_hmac_sha256(self.secret.as_bytes(), payload.as_bytes(), &signature) {
            return Err(SessionTokenError::BadSignature);
        }

        let json = crypto::from_base64url(payload).map_err(|_| SessionTokenError::Encoding)?;
        let claims: SessionClaims =
            serde_json::from_slice(&json).map_err(|_| SessionTokenError::InvalidClaims)?;

        if claims.is_expired_at(now) {
            return Err(SessionTokenError::Expired);
        }

        Ok(claims)
    }

    /// Any failure resolves to "no session"
    pub fn resolve(&self, token: Option<&str>) -> Option<SessionClaims> {
        let token = token?;
        match self.decode(token, Utc::now().timestamp()) {
            Ok(claims) => Some(claims),
            Err(e) => {
                tracing::debug!(reason = %e, "Session token rejected");
                None
            }
        }
    }
}
