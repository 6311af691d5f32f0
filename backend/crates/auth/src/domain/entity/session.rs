//! Session Claims
//!
//! Payload of a signed session token. Read-only for everything but the
//! token codec that issues it.

use serde::{Deserialize, Serialize};

use crate::domain::entity::user::User;
use crate::domain::value_object::user_role::UserRole;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// User ID
    pub sub: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Expiry (unix seconds)
    pub exp: i64,
}

impl SessionClaims {
    pub fn for_user(user: &User, issued_at: i64, ttl_secs: i64) -> Self {
        Self {
            sub: user.id.to_string(),
            name: user.name.to_string(),
            email: user.email.to_string(),
            role: user.role,
            iat: issued_at,
            exp: issued_at.saturating_add(ttl_secs),
        }
    }

    /// Expired at `now` (the expiry second itself is already expired)
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.exp <= now
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(exp: i64) -> SessionClaims {
        SessionClaims {
            sub: "u1".to_string(),
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            role: UserRole::Student,
            iat: 0,
            exp,
        }
    }

    #[test]
    fn test_expiry_boundary() {
        assert!(!claims(100).is_expired_at(99));
        assert!(claims(100).is_expired_at(100));
        assert!(claims(100).is_expired_at(101));
    }

    #[test]
    fn test_unknown_role_claim_does_not_parse() {
        let json = r#"{"sub":"u1","name":"A","email":"a@b.co","role":"ROOT","iat":0,"exp":1}"#;
        assert!(serde_json::from_str::<SessionClaims>(json).is_err());
    }

    #[test]
    fn test_missing_role_claim_does_not_parse() {
        let json = r#"{"sub":"u1","name":"A","email":"a@b.co","iat":0,"exp":1}"#;
        assert!(serde_json::from_str::<SessionClaims>(json).is_err());
    }
}
