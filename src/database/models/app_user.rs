use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Login account. `password` always holds an argon2 PHC hash, never plaintext.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AppUser {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub role: String,
}

#[derive(Debug, Clone)]
pub struct NewAppUser {
    pub username: String,
    pub password_hash: String,
    pub role: String,
}

impl NewAppUser {
    pub fn new(
        username: impl Into<String>,
        password_hash: impl Into<String>,
        role: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password_hash: password_hash.into(),
            role: role.into(),
        }
    }
}
