//! Domain Layer
//!
//! Entities, value objects, route classification, the gate decision and
//! repository traits. Nothing here performs I/O.

pub mod entity;
pub mod gate;
pub mod repository;
pub mod route;
pub mod value_object;

// Re-exports
pub use entity::{session::SessionClaims, user::User};
pub use gate::GateDecision;
pub use repository::UserRepository;
pub use route::{RouteClass, RouteTable};
