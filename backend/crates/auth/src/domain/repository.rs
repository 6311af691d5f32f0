//! Repository Traits
//!
//! Persistence boundary. Each call is atomic on its own; nothing in the
//! auth flows composes calls into a transaction.

use kernel::id::UserId;
use platform::password::HashedPassword;

use crate::domain::entity::user::User;
use crate::domain::value_object::email::Email;
use crate::error::AuthResult;

/// Single-field update on an existing user
#[derive(Debug, Clone)]
pub enum UserField {
    PasswordHash(HashedPassword),
}

#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Insert a new user; a taken email is [`crate::error::AuthError::EmailTaken`]
    async fn create(&self, user: &User) -> AuthResult<()>;

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>>;

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool>;

    /// Whether at least one admin account exists
    async fn exists_admin(&self) -> AuthResult<bool>;

    /// Update one field; a missing user is [`crate::error::AuthError::UserNotFound`]
    async fn update_field(&self, user_id: &UserId, field: UserField) -> AuthResult<()>;
}
