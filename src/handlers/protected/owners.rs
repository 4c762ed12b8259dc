// handlers/protected/owners.rs - /owners handlers

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};

use crate::database::models::{NewOwner, Owner, OwnerWithCars};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

/// GET /owners - Every owner with the cars it owns
pub async fn owners_get(State(state): State<AppState>) -> ApiResult<Vec<OwnerWithCars>> {
    let stores = state.stores();
    let owners = stores.owners.find_all().await?;
    let cars = stores.cars.find_all().await?;
    Ok(ApiResponse::success(OwnerWithCars::group(owners, cars)))
}

/// GET /owners/:id
pub async fn owner_get(
    State(state): State<AppState>,
    Path(owner_id): Path<i64>,
) -> ApiResult<OwnerWithCars> {
    let stores = state.stores();
    let owner = stores
        .owners
        .find_by_id(owner_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Owner {} not found", owner_id)))?;
    let cars = stores.cars.find_by_owner(owner_id).await?;
    Ok(ApiResponse::success(OwnerWithCars { owner, cars }))
}

/// POST /owners
pub async fn owners_post(
    State(state): State<AppState>,
    payload: Result<Json<NewOwner>, JsonRejection>,
) -> ApiResult<Owner> {
    let Json(owner) = payload?;
    if owner.firstname.trim().is_empty() || owner.lastname.trim().is_empty() {
        return Err(ApiError::bad_request("'firstname' and 'lastname' are required"));
    }

    let owner = state.stores().owners.save(owner).await?;
    tracing::info!("Created owner {} ({} {})", owner.owner_id, owner.firstname, owner.lastname);
    Ok(ApiResponse::created(owner))
}

/// DELETE /owners/:id - Remove the owner and, with it, all of its cars
pub async fn owner_delete(
    State(state): State<AppState>,
    Path(owner_id): Path<i64>,
    user: Option<Extension<AuthUser>>,
) -> ApiResult<()> {
    state.stores().owners.delete(owner_id).await?;

    match user {
        Some(Extension(user)) => {
            tracing::info!("Owner {} deleted by '{}'", owner_id, user.username)
        }
        None => tracing::info!("Owner {} deleted", owner_id),
    }
    Ok(ApiResponse::<()>::no_content())
}
