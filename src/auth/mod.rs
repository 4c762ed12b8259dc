//! Login and bearer-token handling.
//!
//! `POST /login` runs [`AuthService::login`]: the [`CredentialLoader`] fetches the
//! stored hash for the username, [`password::verify_password`] checks it, and the
//! [`TokenService`] signs a token for the subject. Later requests present that
//! token and [`TokenService::extract_username`] turns it back into a username.

pub mod credentials;
pub mod error;
pub mod jwt;
pub mod password;
pub mod service;

pub use credentials::{AccountCredentials, CredentialLoader, CredentialRecord, RepositoryCredentialLoader};
pub use error::AuthError;
pub use jwt::{Claims, KeySource, SigningKey, TokenError, TokenService, BEARER_PREFIX};
pub use service::AuthService;
