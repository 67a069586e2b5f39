/// Household vehicle endpoints (any member)
///
/// - `GET /v1/vehicles?service_due_within_days=` - List vehicles, optionally
///   only those due for service within the given number of days
/// - `POST /v1/vehicles`, `GET|PUT|DELETE /v1/vehicles/:id`

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use householdhero_shared::{
    auth::access::HouseholdScope,
    models::vehicle::{CreateVehicle, UpdateVehicle, Vehicle},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Default, Deserialize)]
pub struct VehicleQuery {
    pub service_due_within_days: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct ListVehiclesResponse {
    pub vehicles: Vec<Vehicle>,
}

fn not_found() -> ApiError {
    ApiError::NotFound("Vehicle not found".to_string())
}

pub async fn list_vehicles(
    State(state): State<AppState>,
    Extension(scope): Extension<HouseholdScope>,
    Query(query): Query<VehicleQuery>,
) -> ApiResult<Json<ListVehiclesResponse>> {
    let mut vehicles = Vehicle::list_by_household(&state.db, scope.household_id()).await?;

    if let Some(days) = query.service_due_within_days {
        let today = Utc::now().date_naive();
        vehicles.retain(|v| v.service_due_within(today, days));
    }

    Ok(Json(ListVehiclesResponse { vehicles }))
}

pub async fn create_vehicle(
    State(state): State<AppState>,
    Extension(scope): Extension<HouseholdScope>,
    Json(req): Json<CreateVehicle>,
) -> ApiResult<(StatusCode, Json<Vehicle>)> {
    req.validate()?;

    let vehicle = Vehicle::create(&state.db, scope.household_id(), scope.user_id(), req).await?;

    Ok((StatusCode::CREATED, Json(vehicle)))
}

pub async fn get_vehicle(
    State(state): State<AppState>,
    Extension(scope): Extension<HouseholdScope>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vehicle>> {
    let vehicle = Vehicle::find(&state.db, scope.household_id(), id)
        .await?
        .ok_or_else(not_found)?;

    Ok(Json(vehicle))
}

pub async fn update_vehicle(
    State(state): State<AppState>,
    Extension(scope): Extension<HouseholdScope>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateVehicle>,
) -> ApiResult<Json<Vehicle>> {
    req.validate()?;

    let vehicle = Vehicle::update(&state.db, scope.household_id(), id, req)
        .await?
        .ok_or_else(not_found)?;

    Ok(Json(vehicle))
}

pub async fn delete_vehicle(
    State(state): State<AppState>,
    Extension(scope): Extension<HouseholdScope>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    if !Vehicle::delete(&state.db, scope.household_id(), id).await? {
        return Err(not_found());
    }

    Ok(StatusCode::NO_CONTENT)
}
