use std::sync::Arc;
use tracing::{info, warn};

use crate::auth::credentials::{AccountCredentials, CredentialLoader};
use crate::auth::jwt::TokenService;
use crate::auth::password::{verify_against_dummy, verify_password};
use crate::auth::AuthError;

/// Exchanges username and password for a signed token
#[derive(Clone)]
pub struct AuthService {
    loader: Arc<dyn CredentialLoader>,
    tokens: Arc<TokenService>,
}

impl AuthService {
    pub fn new(loader: Arc<dyn CredentialLoader>, tokens: Arc<TokenService>) -> Self {
        Self { loader, tokens }
    }

    /// Verify the credentials and issue a token bound to the username.
    ///
    /// Unknown usernames and wrong passwords both come back as
    /// `AuthError::InvalidCredentials` after one hash verification each.
    pub async fn login(&self, credentials: &AccountCredentials) -> Result<String, AuthError> {
        let record = match self.loader.load_credential_record(&credentials.username).await {
            Ok(record) => record,
            Err(AuthError::UserNotFound) => {
                warn!("Login failed for '{}'", credentials.username);
                return Err(verify_against_dummy(&credentials.password));
            }
            Err(e) => return Err(e),
        };

        if let Err(e) = verify_password(&credentials.password, &record.password_hash) {
            warn!("Login failed for '{}'", credentials.username);
            return Err(e);
        }

        let token = self.tokens.issue(&record.username)?;
        info!("Login succeeded for '{}' ({})", record.username, record.role);
        Ok(token)
    }
}
