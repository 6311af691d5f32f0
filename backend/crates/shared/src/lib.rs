//! Shared Kernel
//!
//! Vocabulary shared by every crate in the workspace:
//! - Unified error type ([`error::app_error::AppError`]) and its HTTP classification
//! - Typed identifiers for domain entities
//!
//! Only things whose meaning is identical across crates belong here.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
