use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated caller extracted from the bearer token
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub username: String,
}

/// Bearer-token middleware for data routes.
///
/// Rejects with 401 when the token is absent, malformed, badly signed or expired;
/// otherwise stores the `AuthUser` in request extensions.
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let username = state
        .tokens()
        .extract_username(request.headers())
        .map_err(|e| {
            tracing::debug!("Rejected bearer token: {}", e);
            ApiError::from(e)
        })?
        .ok_or_else(|| ApiError::unauthorized("Missing Authorization header"))?;

    request.extensions_mut().insert(AuthUser { username });

    Ok(next.run(request).await)
}
