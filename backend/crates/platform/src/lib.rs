//! Platform Crate - Technical Infrastructure
//!
//! Shared technical foundations with no knowledge of users or routes:
//! - Cryptographic utilities (HMAC-SHA256, Base64, secure randomness)
//! - Credential hashing boundary (Argon2id, PHC strings)
//! - Cookie and bearer-token extraction

pub mod cookie;
pub mod crypto;
pub mod password;
