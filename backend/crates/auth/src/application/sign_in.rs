//! Sign In Use Case
//!
//! Authenticates a user by email and password and issues a session token.

use std::sync::Arc;

use platform::password::{ClearTextPassword, CredentialError, CredentialHasher, HashedPassword};

use crate::application::session_token::SessionCodec;
use crate::domain::entity::session::SessionClaims;
use crate::domain::entity::user::User;
use crate::domain::repository::{UserField, UserRepository};
use crate::domain::value_object::email::Email;
use crate::error::{AuthError, AuthResult};

/// Sign in input
pub struct SignInInput {
    pub email: String,
    pub password: String,
}

/// Sign in output
#[derive(Debug)]
pub struct SignInOutput {
    pub user: User,
    /// Signed token for the session cookie
    pub session_token: String,
    pub claims: SessionClaims,
}

/// Sign in use case
pub struct SignInUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    hasher: CredentialHasher,
    codec: SessionCodec,
    session_ttl_secs: i64,
}

impl<U> SignInUseCase<U>
where
    U: UserRepository,
{
    pub fn new(
        user_repo: Arc<U>,
        hasher: CredentialHasher,
        codec: SessionCodec,
        session_ttl_secs: i64,
    ) -> Self {
        Self {
            user_repo,
            hasher,
            codec,
            session_ttl_secs,
        }
    }

    /// Unknown email and wrong password fail identically, in message and in effort
    pub async fn execute(&self, input: SignInInput) -> AuthResult<SignInOutput> {
        let password =
            ClearTextPassword::new(input.password).map_err(|_| AuthError::InvalidCredentials)?;

        let user = match Email::new(input.email) {
            Ok(email) => self.user_repo.find_by_email(&email).await?,
            Err(_) => None,
        };

        let Some(user) = user else {
            self.hasher.verify_dummy_blocking(password).await;
            return Err(AuthError::InvalidCredentials);
        };

        let (valid, rehashed) = self.verify_and_rehash(password, &user).await?;

        if !valid {
            return Err(AuthError::InvalidCredentials);
        }

        if let Some(hash) = rehashed {
            // The old digest still verifies; a failed upgrade is retried next login
            match self
                .user_repo
                .update_field(&user.id, UserField::PasswordHash(hash))
                .await
            {
                Ok(()) => tracing::info!(user_id = %user.id, "Password digest upgraded"),
                Err(e) => tracing::warn!(user_id = %user.id, error = %e, "Password digest upgrade failed"),
            }
        }

        let (session_token, claims) = self.codec.issue(&user, self.session_ttl_secs);

        tracing::info!(
            user_id = %user.id,
            role = %user.role,
            expires_at = claims.exp,
            "User signed in"
        );

        Ok(SignInOutput {
            user,
            session_token,
            claims,
        })
    }

    /// Verify, and re-hash with the current work factor when the stored digest is outdated
    async fn verify_and_rehash(
        &self,
        password: ClearTextPassword,
        user: &User,
    ) -> AuthResult<(bool, Option<HashedPassword>)> {
        let hasher = self.hasher.clone();
        let digest = user.password_hash.as_phc_string().to_string();

        let outcome = tokio::task::spawn_blocking(move || {
            if !hasher.verify(&password, &digest) {
                return (false, None);
            }
            if !hasher.needs_rehash(&digest) {
                return (true, None);
            }
            match hasher.hash(&password) {
                Ok(hash) => (true, Some(hash)),
                Err(e) => {
                    tracing::warn!(error = %e, "Password re-hash failed");
                    (true, None)
                }
            }
        })
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Password verification task failed");
            AuthError::Credential(CredentialError::WorkerUnavailable)
        })?;

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::config::SessionSecret;
    use crate::domain::value_object::{user_name::UserName, user_role::UserRole};
    use crate::infra::memory::InMemoryUserRepository;
    use platform::password::WorkFactor;

    struct Fixture {
        use_case: SignInUseCase<InMemoryUserRepository>,
        repo: Arc<InMemoryUserRepository>,
        hasher: CredentialHasher,
        codec: SessionCodec,
    }

    fn fixture() -> Fixture {
        let repo = Arc::new(InMemoryUserRepository::new());
        let hasher = CredentialHasher::new(WorkFactor::development(), None).unwrap();
        let codec = SessionCodec::new(SessionSecret::new(vec![3; 32]).unwrap());
        Fixture {
            use_case: SignInUseCase::new(repo.clone(), hasher.clone(), codec.clone(), 3600),
            repo,
            hasher,
            codec,
        }
    }

    async fn seed(fx: &Fixture, hasher: &CredentialHasher, email: &str, password: &str, role: UserRole) -> User {
        let hash = hasher
            .hash(&ClearTextPassword::new(password.to_string()).unwrap())
            .unwrap();
        let user = User::new(
            UserName::new("Ana Souza").unwrap(),
            Email::new(email).unwrap(),
            hash,
            role,
        );
        fx.repo.create(&user).await.unwrap();
        user
    }

    fn input(email: &str, password: &str) -> SignInInput {
        SignInInput {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_sign_in_issues_token() {
        let fx = fixture();
        let user = seed(&fx, &fx.hasher, "admin@example.com", "admin123", UserRole::Admin).await;

        let output = fx
            .use_case
            .execute(input("Admin@Example.com", "admin123"))
            .await
            .unwrap();

        assert_eq!(output.user.id, user.id);
        assert_eq!(output.claims.role, UserRole::Admin);
        assert_eq!(output.claims.exp - output.claims.iat, 3600);
        assert_eq!(fx.codec.resolve(Some(&output.session_token)), Some(output.claims));
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_email_look_the_same() {
        let fx = fixture();
        seed(&fx, &fx.hasher, "ana@example.com", "segredo1", UserRole::Student).await;

        let wrong = fx.use_case.execute(input("ana@example.com", "wrong")).await.unwrap_err();
        let unknown = fx.use_case.execute(input("bob@example.com", "segredo1")).await.unwrap_err();
        let malformed = fx.use_case.execute(input("not-an-email", "segredo1")).await.unwrap_err();

        for err in [wrong, unknown, malformed] {
            assert!(matches!(err, AuthError::InvalidCredentials));
            assert_eq!(err.to_string(), "Invalid credentials");
        }
    }

    #[tokio::test]
    async fn test_empty_password_is_invalid_credentials() {
        let fx = fixture();
        seed(&fx, &fx.hasher, "ana@example.com", "segredo1", UserRole::Student).await;

        let err = fx.use_case.execute(input("ana@example.com", "")).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_outdated_digest_is_upgraded() {
        let fx = fixture();
        let old_hasher = CredentialHasher::new(
            WorkFactor {
                memory_kib: 128,
                iterations: 1,
                parallelism: 1,
            },
            None,
        )
        .unwrap();
        let user = seed(&fx, &old_hasher, "ana@example.com", "segredo1", UserRole::Student).await;
        assert!(fx.hasher.needs_rehash(user.password_hash.as_phc_string()));

        fx.use_case
            .execute(input("ana@example.com", "segredo1"))
            .await
            .unwrap();

        let stored = fx.repo.find_by_id(&user.id).await.unwrap().unwrap();
        assert!(!fx.hasher.needs_rehash(stored.password_hash.as_phc_string()));
        assert!(fx.hasher.verify(
            &ClearTextPassword::new("segredo1".to_string()).unwrap(),
            stored.password_hash.as_phc_string()
        ));
    }
}
