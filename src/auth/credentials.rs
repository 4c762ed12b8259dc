use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

use crate::auth::AuthError;
use crate::database::repository::AppUserRepository;

/// Login body. Never persisted, never logged.
#[derive(Clone, Deserialize)]
pub struct AccountCredentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for AccountCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountCredentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// What the login check needs to know about a stored account
#[derive(Debug, Clone)]
pub struct CredentialRecord {
    pub username: String,
    pub password_hash: String,
    pub role: String,
}

#[async_trait]
pub trait CredentialLoader: Send + Sync {
    /// Look up an account by its exact (case-sensitive) username.
    /// Fails with `AuthError::UserNotFound` when there is none.
    async fn load_credential_record(&self, username: &str) -> Result<CredentialRecord, AuthError>;
}

/// Credential loader backed by the `app_user` repository
pub struct RepositoryCredentialLoader {
    users: Arc<dyn AppUserRepository>,
}

impl RepositoryCredentialLoader {
    pub fn new(users: Arc<dyn AppUserRepository>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl CredentialLoader for RepositoryCredentialLoader {
    async fn load_credential_record(&self, username: &str) -> Result<CredentialRecord, AuthError> {
        let user = self
            .users
            .find_by_username(username)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        Ok(CredentialRecord {
            username: user.username,
            password_hash: user.password,
            role: user.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::MemoryStore;
    use crate::database::models::NewAppUser;

    #[tokio::test]
    async fn loads_hash_and_role() {
        let store = Arc::new(MemoryStore::new());
        AppUserRepository::save(store.as_ref(), NewAppUser::new("admin", "$argon2id$hash", "ADMIN"))
            .await
            .unwrap();

        let loader = RepositoryCredentialLoader::new(store);
        let record = loader.load_credential_record("admin").await.unwrap();
        assert_eq!(record.username, "admin");
        assert_eq!(record.password_hash, "$argon2id$hash");
        assert_eq!(record.role, "ADMIN");
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let loader = RepositoryCredentialLoader::new(Arc::new(MemoryStore::new()));
        assert!(matches!(
            loader.load_credential_record("ghost").await,
            Err(AuthError::UserNotFound)
        ));
    }

    #[test]
    fn debug_hides_password() {
        let creds = AccountCredentials {
            username: "user".to_string(),
            password: "hunter2".to_string(),
        };
        assert!(!format!("{:?}", creds).contains("hunter2"));
    }
}
