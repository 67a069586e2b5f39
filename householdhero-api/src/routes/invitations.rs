/// Household invitation endpoints
///
/// # Endpoints
///
/// - `POST /v1/household/invitations` - Issue an invitation code (admin, parent)
/// - `GET /v1/household/invitations` - List invitations (admin, parent)
/// - `DELETE /v1/household/invitations/:id` - Revoke an unused invitation (admin, parent)
/// - `POST /v1/invitations/accept` - Join a household with a code

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use householdhero_shared::{
    auth::{
        access::{HouseholdScope, Principal},
        invite_code,
    },
    models::{
        invitation::{CreateInvitation, Invitation},
        user::{Role, User},
    },
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct CreateInvitationRequest {
    /// Role granted on acceptance; defaults to member
    #[serde(default = "default_invited_role")]
    pub role: Role,
}

fn default_invited_role() -> Role {
    Role::Member
}

/// Issued invitation
#[derive(Debug, Serialize)]
pub struct CreateInvitationResponse {
    pub id: Uuid,

    /// The plaintext code (ONLY returned on creation)
    pub code: String,

    pub role: Role,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ListInvitationsResponse {
    pub invitations: Vec<Invitation>,
}

#[derive(Debug, Deserialize)]
pub struct AcceptInvitationRequest {
    pub code: String,
}

/// Issues an invitation to the caller's household
///
/// # Errors
///
/// - `422 Unprocessable Entity`: `admin` cannot be granted by invitation
pub async fn create_invitation(
    State(state): State<AppState>,
    Extension(scope): Extension<HouseholdScope>,
    Json(req): Json<CreateInvitationRequest>,
) -> ApiResult<(StatusCode, Json<CreateInvitationResponse>)> {
    let (invitation, code) = Invitation::create(
        &state.db,
        CreateInvitation {
            household_id: scope.household_id(),
            role: req.role,
            created_by: scope.user_id(),
            ttl: state.config.invitation_ttl(),
        },
    )
    .await?;

    tracing::info!(
        household_id = %scope.household_id(),
        invitation_id = %invitation.id,
        role = %invitation.role,
        "Invitation issued"
    );

    Ok((
        StatusCode::CREATED,
        Json(CreateInvitationResponse {
            id: invitation.id,
            code,
            role: invitation.role,
            expires_at: invitation.expires_at,
        }),
    ))
}

pub async fn list_invitations(
    State(state): State<AppState>,
    Extension(scope): Extension<HouseholdScope>,
) -> ApiResult<Json<ListInvitationsResponse>> {
    let invitations = Invitation::list_by_household(&state.db, scope.household_id()).await?;

    Ok(Json(ListInvitationsResponse { invitations }))
}

/// Revokes an invitation that has not been accepted yet
pub async fn revoke_invitation(
    State(state): State<AppState>,
    Extension(scope): Extension<HouseholdScope>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    if !Invitation::delete(&state.db, scope.household_id(), id).await? {
        return Err(ApiError::NotFound("Invitation not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Joins the household an invitation belongs to
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Malformed code
/// - `404 Not Found`: Unknown code
/// - `400 Bad Request`: Code expired
/// - `409 Conflict`: Code already used, or caller already in a household
pub async fn accept_invitation(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(req): Json<AcceptInvitationRequest>,
) -> ApiResult<Json<User>> {
    let code = req.code.trim();

    if !invite_code::validate_invite_code_format(code) {
        return Err(ApiError::invalid_field("code", "Invalid invitation code format"));
    }

    if principal.household_id.is_some() {
        return Err(ApiError::Conflict("User already belongs to a household".to_string()));
    }

    let user = Invitation::accept(&state.db, code, principal.user_id).await?;

    Ok(Json(user))
}
