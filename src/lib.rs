pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod state;

use axum::{
    http::header::AUTHORIZATION,
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub use state::AppState;

/// Full router: public routes, data routes (guarded when configured), global layers
pub fn app(state: AppState) -> Router {
    let data = if state.require_auth() {
        data_routes().route_layer(from_fn_with_state(
            state.clone(),
            middleware::jwt_auth_middleware,
        ))
    } else {
        data_routes()
    };

    Router::new()
        // Public
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/login", post(handlers::login_post))
        // Data
        .merge(data)
        // Global middleware
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Any origin may call the API; browsers may read the issued token header
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers([AUTHORIZATION])
}

fn data_routes() -> Router<AppState> {
    use handlers::protected::{cars, owners};

    Router::new()
        .route("/cars", get(cars::cars_get).post(cars::cars_post))
        .route("/cars/:id", get(cars::car_get))
        .route("/owners", get(owners::owners_get).post(owners::owners_post))
        .route(
            "/owners/:id",
            get(owners::owner_get).delete(owners::owner_delete),
        )
}
