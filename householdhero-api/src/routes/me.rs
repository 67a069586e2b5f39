/// The authenticated user's own account
///
/// - `GET /v1/me` - Current user, role and household (if any)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, Extension, Json};
use householdhero_shared::{
    auth::access::Principal,
    models::{household::Household, user::User},
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: User,

    /// None until the user creates or joins a household
    pub household: Option<Household>,
}

pub async fn get_me(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<Json<MeResponse>> {
    let user = User::find_by_id(&state.db, principal.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let household = match user.household_id {
        Some(id) => Household::find_by_id(&state.db, id).await?,
        None => None,
    };

    Ok(Json(MeResponse { user, household }))
}
