//! Seed Admin Use Case
//!
//! Ensures an admin account exists at startup.

use std::sync::Arc;

use platform::password::{ClearTextPassword, CredentialHasher};

use crate::application::config::AdminSeed;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{email::Email, user_name::UserName, user_role::UserRole};
use crate::error::AuthResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// New admin account created
    Created,
    /// A non-admin account already holds the seed email; left unchanged
    Conflict,
    /// Some admin already exists; nothing changed
    AlreadyPresent,
}

pub struct SeedAdminUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    hasher: CredentialHasher,
}

impl<U> SeedAdminUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, hasher: CredentialHasher) -> Self {
        Self { user_repo, hasher }
    }

    /// Existing accounts are never modified
    pub async fn execute(&self, seed: &AdminSeed) -> AuthResult<SeedOutcome> {
        if self.user_repo.exists_admin().await? {
            return Ok(SeedOutcome::AlreadyPresent);
        }

        let email = Email::new(seed.email.as_str())?;

        if let Some(existing) = self.user_repo.find_by_email(&email).await? {
            tracing::warn!(
                user_id = %existing.id,
                "Admin seed email belongs to an existing non-admin account, seed skipped"
            );
            return Ok(SeedOutcome::Conflict);
        }

        let name = UserName::new(&seed.name)?;
        let password = ClearTextPassword::new(seed.password.to_string())?;
        let password_hash = self.hasher.hash_blocking(password).await?;

        let admin = User::new(name, email, password_hash, UserRole::Admin);
        self.user_repo.create(&admin).await?;

        tracing::info!(user_id = %admin.id, "Admin account created");

        Ok(SeedOutcome::Created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::memory::InMemoryUserRepository;
    use platform::password::WorkFactor;
    use zeroize::Zeroizing;

    fn seed() -> AdminSeed {
        AdminSeed {
            name: "Administrator".to_string(),
            email: "admin@example.com".to_string(),
            password: Zeroizing::new("admin123".to_string()),
        }
    }

    fn use_case() -> (SeedAdminUseCase<InMemoryUserRepository>, Arc<InMemoryUserRepository>, CredentialHasher) {
        let repo = Arc::new(InMemoryUserRepository::new());
        let hasher = CredentialHasher::new(WorkFactor::development(), None).unwrap();
        (SeedAdminUseCase::new(repo.clone(), hasher.clone()), repo, hasher)
    }

    #[tokio::test]
    async fn test_creates_admin_once() {
        let (use_case, repo, hasher) = use_case();

        assert_eq!(use_case.execute(&seed()).await.unwrap(), SeedOutcome::Created);
        assert_eq!(use_case.execute(&seed()).await.unwrap(), SeedOutcome::AlreadyPresent);
        assert_eq!(repo.len().await, 1);

        let admin = repo
            .find_by_email(&Email::new("admin@example.com").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(admin.role, UserRole::Admin);

        let digest = admin.password_hash.as_phc_string();
        assert!(hasher.verify(&ClearTextPassword::new("admin123".to_string()).unwrap(), digest));
        assert!(!hasher.verify(&ClearTextPassword::new("wrong".to_string()).unwrap(), digest));
    }

    #[tokio::test]
    async fn test_existing_account_with_seed_email_is_left_alone() {
        let (use_case, repo, hasher) = use_case();
        let hash = hasher
            .hash(&ClearTextPassword::new("attacker1".to_string()).unwrap())
            .unwrap();
        let student = User::new(
            UserName::new("Ana Souza").unwrap(),
            Email::new("admin@example.com").unwrap(),
            hash,
            UserRole::Student,
        );
        repo.create(&student).await.unwrap();

        assert_eq!(use_case.execute(&seed()).await.unwrap(), SeedOutcome::Conflict);
        assert!(!repo.exists_admin().await.unwrap());
        assert_eq!(repo.len().await, 1);

        let unchanged = repo.find_by_id(&student.id).await.unwrap().unwrap();
        assert_eq!(unchanged.role, UserRole::Student);
        assert_eq!(
            unchanged.password_hash.as_phc_string(),
            student.password_hash.as_phc_string()
        );
    }
}
