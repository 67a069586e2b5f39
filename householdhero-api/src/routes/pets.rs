/// Household pet endpoints (any member)
///
/// - `GET /v1/pets`, `POST /v1/pets`
/// - `GET|PUT|DELETE /v1/pets/:id`

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use householdhero_shared::{
    auth::access::HouseholdScope,
    models::pet::{CreatePet, Pet, UpdatePet},
};
use serde::Serialize;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize)]
pub struct ListPetsResponse {
    pub pets: Vec<Pet>,
}

fn not_found() -> ApiError {
    ApiError::NotFound("Pet not found".to_string())
}

pub async fn list_pets(
    State(state): State<AppState>,
    Extension(scope): Extension<HouseholdScope>,
) -> ApiResult<Json<ListPetsResponse>> {
    let pets = Pet::list_by_household(&state.db, scope.household_id()).await?;

    Ok(Json(ListPetsResponse { pets }))
}

pub async fn create_pet(
    State(state): State<AppState>,
    Extension(scope): Extension<HouseholdScope>,
    Json(req): Json<CreatePet>,
) -> ApiResult<(StatusCode, Json<Pet>)> {
    req.validate()?;

    let pet = Pet::create(&state.db, scope.household_id(), scope.user_id(), req).await?;

    Ok((StatusCode::CREATED, Json(pet)))
}

pub async fn get_pet(
    State(state): State<AppState>,
    Extension(scope): Extension<HouseholdScope>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Pet>> {
    let pet = Pet::find(&state.db, scope.household_id(), id)
        .await?
        .ok_or_else(not_found)?;

    Ok(Json(pet))
}

pub async fn update_pet(
    State(state): State<AppState>,
    Extension(scope): Extension<HouseholdScope>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdatePet>,
) -> ApiResult<Json<Pet>> {
    req.validate()?;

    let pet = Pet::update(&state.db, scope.household_id(), id, req)
        .await?
        .ok_or_else(not_found)?;

    Ok(Json(pet))
}

pub async fn delete_pet(
    State(state): State<AppState>,
    Extension(scope): Extension<HouseholdScope>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    if !Pet::delete(&state.db, scope.household_id(), id).await? {
        return Err(not_found());
    }

    Ok(StatusCode::NO_CONTENT)
}
