//! Sign Up Use Case
//!
//! Creates a new student account.

use std::sync::Arc;

use platform::password::{ClearTextPassword, CredentialError, CredentialHasher, MAX_SECRET_LENGTH};

use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{email::Email, user_name::UserName, user_role::UserRole};
use crate::error::{AuthError, AuthResult};

/// Minimum password length accepted at registration
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Sign up input
pub struct SignUpInput {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Sign up use case
pub struct SignUpUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    hasher: CredentialHasher,
}

impl<U> SignUpUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, hasher: CredentialHasher) -> Self {
        Self { user_repo, hasher }
    }

    /// Fields are checked in order (name, email, password); the first
    /// violation is reported.
    pub async fn execute(&self, input: SignUpInput) -> AuthResult<User> {
        let name = UserName::new(&input.name)?;
        let email = Email::new(input.email)?;

        let password = ClearTextPassword::new(input.password).map_err(|e| match e {
            CredentialError::InvalidInput("secret is too long") => {
                AuthError::Validation(password_too_long())
            }
            _ => AuthError::Validation(password_too_short()),
        })?;
        if password.char_count() < MIN_PASSWORD_LENGTH {
            return Err(AuthError::Validation(password_too_short()));
        }

        if self.user_repo.exists_by_email(&email).await? {
            return Err(AuthError::EmailTaken);
        }

        let password_hash = self.hasher.hash_blocking(password).await?;

        let user = User::new(name, email, password_hash, UserRole::Student);

        // A concurrent registration can still win the race; the store
        // reports it as EmailTaken.
        self.user_repo.create(&user).await?;

        tracing::info!(
            user_id = %user.id,
            role = %user.role,
            "User signed up"
        );

        Ok(user)
    }
}

fn password_too_short() -> String {
    format!("Password must be at least {MIN_PASSWORD_LENGTH} characters")
}

fn password_too_long() -> String {
    format!("Password must be at most {MAX_SECRET_LENGTH} characters")
}
