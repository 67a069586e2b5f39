/// Member administration endpoints (admin only)
///
/// # Endpoints
///
/// - `PUT /v1/admin/members/:user_id/role` - Change a member's role
/// - `PUT /v1/admin/users/:user_id/status` - Activate or suspend an account
///
/// Targets are looked up within the admin's own household; users of other
/// households are reported as not found.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use householdhero_shared::{
    auth::access::HouseholdScope,
    models::user::{MemberChange, Role, User, UserStatus},
};
use serde::Deserialize;
use uuid::Uuid;

fn member_not_found() -> ApiError {
    ApiError::NotFound("Member not found".to_string())
}

fn last_admin() -> ApiError {
    ApiError::Conflict("Household must keep at least one active admin".to_string())
}

#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: Role,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: UserStatus,
}

/// Changes a member's role
///
/// # Errors
///
/// - `404 Not Found`: No such member in the household
/// - `409 Conflict`: Would leave the household without an active admin
pub async fn update_member_role(
    State(state): State<AppState>,
    Extension(scope): Extension<HouseholdScope>,
    Path(user_id): Path<Uuid>,
    Json(req): Json<UpdateRoleRequest>,
) -> ApiResult<Json<User>> {
    let (previous, user) =
        match User::update_role(&state.db, scope.household_id(), user_id, req.role).await? {
            MemberChange::Updated { previous, user } => (previous, user),
            MemberChange::NotFound => return Err(member_not_found()),
            MemberChange::LastActiveAdmin => return Err(last_admin()),
        };

    tracing::info!(
        household_id = %scope.household_id(),
        actor_id = %scope.user_id(),
        user_id = %user.id,
        from = %previous.role,
        to = %user.role,
        "Member role changed"
    );

    Ok(Json(user))
}

/// Activates or suspends a member account
///
/// Suspended users are rejected by the authentication layer on their next
/// request.
///
/// # Errors
///
/// - `400 Bad Request`: Admins cannot suspend themselves
/// - `404 Not Found`: No such member in the household
/// - `409 Conflict`: Would leave the household without an active admin
pub async fn update_user_status(
    State(state): State<AppState>,
    Extension(scope): Extension<HouseholdScope>,
    Path(user_id): Path<Uuid>,
    Json(req): Json<UpdateStatusRequest>,
) -> ApiResult<Json<User>> {
    if user_id == scope.user_id() && req.status == UserStatus::Suspended {
        return Err(ApiError::BadRequest("You cannot suspend your own account".to_string()));
    }

    let user = match User::update_status(&state.db, scope.household_id(), user_id, req.status).await? {
        MemberChange::Updated { user, .. } => user,
        MemberChange::NotFound => return Err(member_not_found()),
        MemberChange::LastActiveAdmin => return Err(last_admin()),
    };

    tracing::info!(
        household_id = %scope.household_id(),
        actor_id = %scope.user_id(),
        user_id = %user.id,
        status = user.status.as_str(),
        "Member status changed"
    );

    Ok(Json(user))
}
