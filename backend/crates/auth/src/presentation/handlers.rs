//! HTTP Handlers

use axum::Json;
use axum::extract::{FromRef, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use std::sync::Arc;

use platform::cookie::{delete_cookie_header, set_cookie_header};
use platform::password::{ClearTextPassword, CredentialHasher};

use crate::application::config::AuthConfig;
use crate::application::{
    RequestGate, SessionCodec, SignInInput, SignInUseCase, SignUpInput, SignUpUseCase,
};
use crate::domain::repository::UserRepository;
use crate::error::AuthResult;
use crate::presentation::dto::{
    LoginRequest, RegisterRequest, SessionResponse, UserProfile, VerifyPasswordRequest,
    VerifyPasswordResponse,
};
use crate::presentation::extract::{AdminUser, AuthenticatedUser, SessionReader};
use crate::presentation::middleware::GateState;

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
    pub hasher: CredentialHasher,
    pub session: SessionReader,
}

impl<R> AuthAppState<R>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    /// Fails if the configured work factor is unusable
    pub fn new(repo: R, config: AuthConfig) -> AuthResult<Self> {
        let hasher = CredentialHasher::new(config.work_factor, config.password_pepper.clone())?;
        let codec = SessionCodec::new(config.session_secret.clone());
        let session = SessionReader::new(codec, config.session_cookie_name.as_str());

        Ok(Self {
            repo: Arc::new(repo),
            config: Arc::new(config),
            hasher,
            session,
        })
    }

    /// Gate middleware state sharing this state's signing key and cookie name
    pub fn gate_state(&self) -> GateState {
        GateState::new(
            RequestGate::new(self.config.routes.clone(), self.session.codec().clone()),
            self.session.cookie_name(),
        )
    }
}

impl<R> FromRef<AuthAppState<R>> for SessionReader
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    fn from_ref(state: &AuthAppState<R>) -> Self {
        state.session.clone()
    }
}

// ============================================================================
// Register
// ============================================================================

/// POST /api/auth/register
pub async fn register<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<RegisterRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let use_case = SignUpUseCase::new(state.repo.clone(), state.hasher.clone());

    let input = SignUpInput {
        name: req.name,
        email: req.email,
        password: req.password,
    };

    let user = use_case.execute(input).await?;

    Ok((StatusCode::CREATED, Json(UserProfile::from(&user))))
}

// ============================================================================
// Login
// ============================================================================

/// POST /api/auth/login
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<LoginRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let use_case = SignInUseCase::new(
        state.repo.clone(),
        state.hasher.clone(),
        state.session.codec().clone(),
        state.config.session_ttl_secs(),
    );

    let input = SignInInput {
        email: req.email,
        password: req.password,
    };

    let output = use_case.execute(input).await?;

    let cookie = set_cookie_header(&state.config.cookie_config(), &output.session_token);

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(UserProfile::from(&output.user)),
    ))
}

// ============================================================================
// Logout
// ============================================================================

/// POST /api/auth/logout
///
/// Tokens are stateless; logging out only clears the cookie.
pub async fn logout<R>(State(state): State<AuthAppState<R>>) -> impl IntoResponse
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let cookie = delete_cookie_header(&state.config.cookie_config());

    (StatusCode::NO_CONTENT, [(header::SET_COOKIE, cookie)])
}

// ============================================================================
// Session
// ============================================================================

/// GET /api/auth/session
pub async fn session(AuthenticatedUser(claims): AuthenticatedUser) -> Json<SessionResponse> {
    Json(SessionResponse::from(claims))
}

// ============================================================================
// Verify Password (admin only)
// ============================================================================

/// POST /api/auth/verify-password
pub async fn verify_password<R>(
    State(state): State<AuthAppState<R>>,
    AdminUser(admin): AdminUser,
    Json(req): Json<VerifyPasswordRequest>,
) -> Json<VerifyPasswordResponse>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let is_valid = match ClearTextPassword::new(req.password) {
        Ok(password) => state.hasher.verify_blocking(password, req.hashed_password).await,
        Err(_) => false,
    };

    tracing::info!(user_id = %admin.sub, is_valid, "Admin verified a password digest");

    Json(VerifyPasswordResponse { is_valid })
}
