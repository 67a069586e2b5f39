/// Household endpoints
///
/// # Endpoints
///
/// - `POST /v1/households` - Create a household; the caller becomes its admin
/// - `GET /v1/household` - The caller's household
/// - `GET /v1/household/members` - Members of the caller's household
/// - `PUT /v1/household` - Rename the household (admin)
///
/// Paths carry no household ID; the household is always the caller's own.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, http::StatusCode, Extension, Json};
use householdhero_shared::{
    auth::access::{HouseholdScope, Principal},
    models::{
        household::{CreateHousehold, Household},
        user::User,
    },
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Create or rename request
#[derive(Debug, Deserialize, Validate)]
pub struct HouseholdNameRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct CreateHouseholdResponse {
    pub household: Household,

    /// The creator, now an admin of the household
    pub admin: User,
}

#[derive(Debug, Serialize)]
pub struct MembersResponse {
    pub members: Vec<User>,
}

/// Creates a household with the caller as its first admin
///
/// # Errors
///
/// - `409 Conflict`: Caller already belongs to a household
pub async fn create_household(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(req): Json<HouseholdNameRequest>,
) -> ApiResult<(StatusCode, Json<CreateHouseholdResponse>)> {
    req.validate()?;

    if principal.household_id.is_some() {
        return Err(ApiError::Conflict("User already belongs to a household".to_string()));
    }

    let (household, admin) = Household::create_with_admin(
        &state.db,
        CreateHousehold {
            name: req.name.trim().to_string(),
            created_by: principal.user_id,
        },
    )
    .await?
    .ok_or_else(|| ApiError::Conflict("User already belongs to a household".to_string()))?;

    Ok((StatusCode::CREATED, Json(CreateHouseholdResponse { household, admin })))
}

pub async fn get_household(
    State(state): State<AppState>,
    Extension(scope): Extension<HouseholdScope>,
) -> ApiResult<Json<Household>> {
    let household = Household::find_by_id(&state.db, scope.household_id())
        .await?
        .ok_or_else(|| ApiError::NotFound("Household not found".to_string()))?;

    Ok(Json(household))
}

pub async fn list_members(
    State(state): State<AppState>,
    Extension(scope): Extension<HouseholdScope>,
) -> ApiResult<Json<MembersResponse>> {
    let members = User::list_by_household(&state.db, scope.household_id()).await?;

    Ok(Json(MembersResponse { members }))
}

pub async fn rename_household(
    State(state): State<AppState>,
    Extension(scope): Extension<HouseholdScope>,
    Json(req): Json<HouseholdNameRequest>,
) -> ApiResult<Json<Household>> {
    req.validate()?;

    let household = Household::rename(&state.db, scope.household_id(), req.name.trim())
        .await?
        .ok_or_else(|| ApiError::NotFound("Household not found".to_string()))?;

    tracing::info!(
        household_id = %household.id,
        user_id = %scope.user_id(),
        "Household renamed"
    );

    Ok(Json(household))
}
