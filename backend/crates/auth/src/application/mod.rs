//! Application Layer
//!
//! Use cases and application services.

pub mod config;
pub mod request_gate;
pub mod seed_admin;
pub mod session_token;
pub mod sign_in;
pub mod sign_up;

// Re-exports
pub use config::{AdminSeed, AuthConfig, ConfigError, SessionSecret};
pub use request_gate::RequestGate;
pub use seed_admin::{SeedAdminUseCase, SeedOutcome};
pub use session_token::{SessionCodec, SessionTokenError};
pub use sign_in::{SignInInput, SignInOutput, SignInUseCase};
pub use sign_up::{SignUpInput, SignUpUseCase};
