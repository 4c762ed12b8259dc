//! Application state shared across handlers.

use std::sync::Arc;

use crate::auth::{AuthService, RepositoryCredentialLoader, TokenService};
use crate::database::Stores;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    stores: Stores,
    tokens: Arc<TokenService>,
    auth: AuthService,
    require_auth: bool,
}

impl AppState {
    /// Wires the login service to the user repository of `stores`
    pub fn new(stores: Stores, tokens: TokenService, require_auth: bool) -> Self {
        let tokens = Arc::new(tokens);
        let loader = Arc::new(RepositoryCredentialLoader::new(stores.users.clone()));
        let auth = AuthService::new(loader, tokens.clone());

        Self {
            inner: Arc::new(AppStateInner {
                stores,
                tokens,
                auth,
                require_auth,
            }),
        }
    }

    pub fn stores(&self) -> &Stores {
        &self.inner.stores
    }

    pub fn tokens(&self) -> &TokenService {
        &self.inner.tokens
    }

    pub fn auth(&self) -> &AuthService {
        &self.inner.auth
    }

    /// Whether data routes demand a bearer token
    pub fn require_auth(&self) -> bool {
        self.inner.require_auth
    }
}
