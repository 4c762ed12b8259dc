use axum::http::{header::AUTHORIZATION, HeaderMap};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const BEARER_PREFIX: &str = "Bearer";

/// Token payload: subject plus issue and expiry instants (unix seconds)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("token has expired")]
    Expired,

    #[error("invalid token: {0}")]
    Invalid(String),

    #[error("malformed Authorization header: {0}")]
    MalformedHeader(&'static str),

    #[error("token encoding failed: {0}")]
    Encoding(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Invalid(e.to_string()),
        }
    }
}

/// Where the HMAC secret came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    /// Supplied through configuration; tokens survive restarts
    Configured,
    /// Random bytes drawn at startup; a restart invalidates every token
    Generated,
}

/// HS256 secret shared by issuance and validation.
/// Rotating it invalidates all outstanding tokens.
pub struct SigningKey {
    secret: Vec<u8>,
    source: KeySource,
}

impl SigningKey {
    const GENERATED_LEN: usize = 32;

    pub fn from_secret(secret: impl AsRef<[u8]>) -> Self {
        Self {
            secret: secret.as_ref().to_vec(),
            source: KeySource::Configured,
        }
    }

    pub fn generate() -> Self {
        let mut secret = vec![0u8; Self::GENERATED_LEN];
        rand::rng().fill(secret.as_mut_slice());
        Self {
            secret,
            source: KeySource::Generated,
        }
    }

    /// Configured secret when present, fresh random key otherwise
    pub fn from_config(secret: Option<&str>) -> Self {
        match secret {
            Some(s) if !s.is_empty() => Self::from_secret(s),
            _ => Self::generate(),
        }
    }

    pub fn source(&self) -> KeySource {
        self.source
    }
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKey")
            .field("source", &self.source)
            .field("len", &self.secret.len())
            .finish()
    }
}

/// Issues and validates signed, expiring bearer tokens.
/// Holds only read-only key material, so one instance is shared by all requests.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    pub fn new(key: &SigningKey, ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding: EncodingKey::from_secret(&key.secret),
            decoding: DecodingKey::from_secret(&key.secret),
            validation,
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Sign a token for `username` expiring one TTL from now
    pub fn issue(&self, username: &str) -> Result<String, TokenError> {
        self.issue_at(username, Utc::now())
    }

    /// Sign a token as if issued at `issued_at`
    pub fn issue_at(&self, username: &str, issued_at: DateTime<Utc>) -> Result<String, TokenError> {
        if self.ttl <= Duration::zero() {
            return Err(TokenError::Encoding(format!("non-positive ttl {}", self.ttl)));
        }
        let expires_at = issued_at
            .checked_add_signed(self.ttl)
            .ok_or_else(|| TokenError::Encoding(format!("ttl {} overflows expiry", self.ttl)))?;

        let claims = Claims {
            sub: username.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Encoding(e.to_string()))
    }

    /// Verify signature and expiry, returning the subject
    pub fn validate(&self, token: &str) -> Result<String, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation)?;
        Ok(data.claims.sub)
    }

    /// Username carried by the request's bearer token.
    ///
    /// `Ok(None)` when no Authorization header is present. A header that is
    /// present but unreadable, not bearer, badly signed or expired is an error.
    pub fn extract_username(&self, headers: &HeaderMap) -> Result<Option<String>, TokenError> {
        let Some(value) = headers.get(AUTHORIZATION) else {
            return Ok(None);
        };

        let value = value
            .to_str()
            .map_err(|_| TokenError::MalformedHeader("not visible ASCII"))?;

        // Scheme match is case-insensitive (RFC 7235) but the space is mandatory
        let token = value
            .split_once(' ')
            .filter(|(scheme, _)| scheme.eq_ignore_ascii_case(BEARER_PREFIX))
            .map(|(_, token)| token.trim())
            .ok_or(TokenError::MalformedHeader("expected Bearer scheme"))?;

        if token.is_empty() {
            return Err(TokenError::MalformedHeader("empty token"));
        }

        self.validate(token).map(Some)
    }
}
