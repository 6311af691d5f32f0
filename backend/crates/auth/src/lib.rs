//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Route classification, gate decision, entities, repository traits
//! - `application/` - Use cases, session tokens, configuration
//! - `infra/` - PostgreSQL and in-memory repositories
//! - `presentation/` - Gate middleware, HTTP handlers, extractors, DTOs, router
//!
//! ## Features
//! - Request gate: allow or redirect every page request by session and role
//! - Registration and email/password sign in
//! - Stateless HMAC-signed session tokens in an HttpOnly cookie
//! - Two roles (Admin, Student); admin areas and admin-only API routes
//!
//! ## Security Model
//! - Fail-closed: unlisted paths require a session, invalid tokens count as none
//! - Passwords hashed with Argon2id; outdated digests upgraded on login
//! - Unknown email and wrong password are indistinguishable

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::config::AuthConfig;
pub use error::{AuthError, AuthResult};
pub use infra::{memory::InMemoryUserRepository, postgres::PgUserRepository};
pub use presentation::middleware::request_gate;
pub use presentation::router::auth_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}
