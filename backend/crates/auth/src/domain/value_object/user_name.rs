//! User Name Value Object
//!
//! Display name shown on the account. Not an identifier: logins use [`super::email::Email`].
//!
//! ## Invariants
//! - Leading/trailing whitespace is trimmed
//! - Length: 3 to 100 characters after trimming
//! - No control characters

use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Minimum length for a display name (in characters)
pub const USER_NAME_MIN_LENGTH: usize = 3;

/// Maximum length for a display name (in characters)
pub const USER_NAME_MAX_LENGTH: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserName(String);

impl UserName {
    pub fn new(name: impl AsRef<str>) -> AppResult<Self> {
        let name = name.as_ref().trim();
        let len = name.chars().count();

        if len < USER_NAME_MIN_LENGTH {
            return Err(AppError::bad_request(format!(
                "Name must be at least {} characters",
                USER_NAME_MIN_LENGTH
            )));
        }

        if len > USER_NAME_MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "Name must be at most {} characters",
                USER_NAME_MAX_LENGTH
            )));
        }

        if name.chars().any(char::is_control) {
            return Err(AppError::bad_request("Name contains invalid characters"));
        }

        Ok(Self(name.to_string()))
    }

    pub fn from_db(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        assert_eq!(UserName::new("Ana").unwrap().as_str(), "Ana");
        assert_eq!(UserName::new("  José Silva ").unwrap().as_str(), "José Silva");
    }

    #[test]
    fn test_too_short() {
        let err = UserName::new("Al").unwrap_err();
        assert_eq!(err.message(), "Name must be at least 3 characters");
        assert!(UserName::new("   ab   ").is_err());
    }

    #[test]
    fn test_too_long() {
        assert!(UserName::new("a".repeat(USER_NAME_MAX_LENGTH)).is_ok());
        assert!(UserName::new("a".repeat(USER_NAME_MAX_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_control_characters() {
        assert!(UserName::new("Ana\u{0}Maria").is_err());
        assert!(UserName::new("Ana\nMaria").is_err());
    }
}
