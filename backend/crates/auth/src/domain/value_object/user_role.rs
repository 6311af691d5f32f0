use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed set of account roles
///
/// Unknown codes are rejected rather than mapped to a default, so a typo in
/// stored data or a forged claim can never grant access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Admin,
    #[default]
    Student,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown user role: {0}")]
pub struct UnknownRole(pub String);

impl UserRole {
    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            UserRole::Admin => "ADMIN",
            UserRole::Student => "STUDENT",
        }
    }

    #[inline]
    pub const fn is_admin(&self) -> bool {
        match self {
            UserRole::Admin => true,
            UserRole::Student => false,
        }
    }

    pub fn from_code(code: &str) -> Result<Self, UnknownRole> {
        match code {
            "ADMIN" => Ok(UserRole::Admin),
            "STUDENT" => Ok(UserRole::Student),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

impl FromStr for UserRole {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_role_from_code() {
        assert_eq!(UserRole::from_code("ADMIN"), Ok(UserRole::Admin));
        assert_eq!(UserRole::from_code("STUDENT"), Ok(UserRole::Student));
    }

    #[test]
    fn test_unknown_codes_are_rejected() {
        assert!(UserRole::from_code("admin").is_err());
        assert!(UserRole::from_code("ADMIN ").is_err());
        assert!(UserRole::from_code("SUPER_ADMIN").is_err());
        assert!(UserRole::from_code("").is_err());
    }

    #[test]
    fn test_user_role_display() {
        assert_eq!(UserRole::Admin.to_string(), "ADMIN");
        assert_eq!(UserRole::Student.to_string(), "STUDENT");
    }

    #[test]
    fn test_only_admin_is_admin() {
        assert!(UserRole::Admin.is_admin());
        assert!(!UserRole::Student.is_admin());
        assert_eq!(UserRole::default(), UserRole::Student);
    }

    #[test]
    fn test_serde_codes() {
        assert_eq!(serde_json::to_string(&UserRole::Admin).unwrap(), "\"ADMIN\"");
        assert_eq!(
            serde_json::from_str::<UserRole>("\"STUDENT\"").unwrap(),
            UserRole::Student
        );
        assert!(serde_json::from_str::<UserRole>("\"Admin\"").is_err());
    }
}
