//! Session Extractors
//!
//! Per-handler session checks for routes the request gate does not cover.

use std::sync::Arc;

use axum::extract::{FromRef, FromRequestParts};
use axum::http::HeaderMap;
use axum::http::request::Parts;

use crate::application::session_token::SessionCodec;
use crate::domain::entity::session::SessionClaims;
use crate::error::AuthError;

/// Reads the session credential (cookie, then bearer header) and validates it
#[derive(Debug, Clone)]
pub struct SessionReader {
    codec: SessionCodec,
    cookie_name: Arc<str>,
}

impl SessionReader {
    pub fn new(codec: SessionCodec, cookie_name: impl Into<Arc<str>>) -> Self {
        Self {
            codec,
            cookie_name: cookie_name.into(),
        }
    }

    pub fn read(&self, headers: &HeaderMap) -> Option<SessionClaims> {
        let token = platform::cookie::extract_session_credential(headers, &self.cookie_name);
        self.codec.resolve(token.as_deref())
    }

    pub fn codec(&self) -> &SessionCodec {
        &self.codec
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }
}

/// Any valid session; 401 otherwise
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub SessionClaims);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    SessionReader: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // Already resolved by the request gate
        if let Some(claims) = parts.extensions.get::<SessionClaims>() {
            return Ok(Self(claims.clone()));
        }

        SessionReader::from_ref(state)
            .read(&parts.headers)
            .map(Self)
            .ok_or(AuthError::Unauthenticated)
    }
}

/// Valid admin session; 401 without a session, 403 for other roles
#[derive(Debug, Clone)]
pub struct AdminUser(pub SessionClaims);

impl<S> FromRequestParts<S> for AdminUser
where
    SessionReader: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthenticatedUser(claims) = AuthenticatedUser::from_request_parts(parts, state).await?;

        if !claims.is_admin() {
            tracing::warn!(user_id = %claims.sub, role = %claims.role, "Admin route refused");
            return Err(AuthError::Forbidden);
        }

        Ok(Self(claims))
    }
}
