// handlers/protected/cars.rs - /cars handlers

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;

use crate::database::models::{Car, NewCar};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct CarQuery {
    pub brand: Option<String>,
}

/// GET /cars[?brand=] - List every car, optionally only one brand
pub async fn cars_get(
    State(state): State<AppState>,
    Query(query): Query<CarQuery>,
    user: Option<Extension<AuthUser>>,
) -> ApiResult<Vec<Car>> {
    if let Some(Extension(user)) = user {
        tracing::debug!("Listing cars for '{}'", user.username);
    }

    let cars = state.stores().cars.as_ref();
    let cars = match query.brand.as_deref() {
        Some(brand) => cars.find_by_brand(brand).await?,
        None => cars.find_all().await?,
    };
    Ok(ApiResponse::success(cars))
}

/// GET /cars/:id
pub async fn car_get(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Car> {
    let car = state
        .stores()
        .cars
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Car {} not found", id)))?;
    Ok(ApiResponse::success(car))
}

/// POST /cars - Register a car, optionally assigned to an existing owner
pub async fn cars_post(
    State(state): State<AppState>,
    payload: Result<Json<NewCar>, JsonRejection>,
) -> ApiResult<Car> {
    let Json(car) = payload?;
    for (field, value) in [
        ("brand", &car.brand),
        ("model", &car.model),
        ("registrationNumber", &car.registration_number),
    ] {
        if value.trim().is_empty() {
            return Err(ApiError::bad_request(format!("'{}' must not be empty", field)));
        }
    }

    let car = state.stores().cars.save(car).await?;
    tracing::info!("Created car {} ({} {})", car.id, car.brand, car.model);
    Ok(ApiResponse::created(car))
}
