use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET / - Service banner
pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Car Database API",
            "version": version,
            "endpoints": {
                "login": "POST /login (public - token acquisition)",
                "cars": "GET|POST /cars, GET /cars/:id",
                "owners": "GET|POST /owners, GET|DELETE /owners/:id",
                "health": "GET /health (public)",
            }
        }
    }))
}

/// GET /health - Store liveness
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();
    let stores = state.stores();

    match stores.health_check().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "store": stores.kind.as_str()
                }
            })),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "database unavailable",
                    "data": {
                        "status": "degraded",
                        "timestamp": now,
                        "store": stores.kind.as_str()
                    }
                })),
            )
        }
    }
}
