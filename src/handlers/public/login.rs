// handlers/public/login.rs - POST /login handler

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};

use crate::auth::{AccountCredentials, BEARER_PREFIX};
use crate::error::ApiError;
use crate::state::AppState;

/// POST /login - Exchange username and password for a bearer token
///
/// Expected Input:
/// ```json
/// { "username": "user", "password": "user" }
/// ```
///
/// Success: `200 OK`, empty body, `Authorization: Bearer <jwt>` and
/// `Access-Control-Expose-Headers: Authorization`.
///
/// Failure: `401 Unauthorized` with the same message whether the username
/// exists or not, and no `Authorization` header. A missing or unreadable body
/// is `400 Bad Request`.
pub async fn login_post(
    State(state): State<AppState>,
    payload: Result<Json<AccountCredentials>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(credentials) = payload?;
    let token = state.auth().login(&credentials).await?;

    Ok((
        StatusCode::OK,
        [
            (header::AUTHORIZATION, format!("{} {}", BEARER_PREFIX, token)),
            (header::ACCESS_CONTROL_EXPOSE_HEADERS, "Authorization".to_string()),
        ],
    ))
}
