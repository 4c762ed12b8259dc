//! Authentication error types.

use thiserror::Error;

use crate::auth::jwt::TokenError;
use crate::database::DatabaseError;

#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown username or wrong password. The two cases are deliberately
    /// indistinguishable to the caller.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// No account with that username. Only the credential loader returns this;
    /// `AuthService` folds it into `InvalidCredentials`.
    #[error("user not found")]
    UserNotFound,

    #[error("password hashing failed")]
    PasswordHash,

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("database error: {0}")]
    Database(#[from] DatabaseError),
}
