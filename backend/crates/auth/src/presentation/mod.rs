//! Presentation Layer
//!
//! HTTP handlers, DTOs, extractors, router, and middleware.

pub mod dto;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use extract::{AdminUser, AuthenticatedUser, SessionReader};
pub use handlers::AuthAppState;
pub use middleware::{GateState, request_gate};
pub use router::auth_router;
