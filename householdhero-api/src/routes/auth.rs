/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /v1/auth/register` - Register new user
/// - `POST /v1/auth/login` - Login and get tokens
/// - `POST /v1/auth/refresh` - Refresh access token
///
/// Tokens only carry the user ID. Household and role are loaded from the
/// database on every authenticated request.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, http::StatusCode, Json};
use householdhero_shared::{
    auth::{jwt, password},
    models::user::{CreateUser, User},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password (strength is checked separately)
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    #[validate(length(max = 100, message = "Name must be at most 100 characters"))]
    pub name: Option<String>,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    pub password: String,
}

/// Tokens issued on registration and login
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user_id: Uuid,

    /// None until the user creates or joins a household
    pub household_id: Option<Uuid>,

    /// Access token (24h)
    pub access_token: String,

    /// Refresh token (30d)
    pub refresh_token: String,
}

/// Refresh token request
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Refresh token response
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    /// New access token (24h)
    pub access_token: String,
}

fn issue_tokens(user: &User, secret: &str) -> ApiResult<AuthResponse> {
    let access_token = jwt::create_token(&jwt::Claims::new(user.id, jwt::TokenType::Access), secret)?;
    let refresh_token = jwt::create_token(&jwt::Claims::new(user.id, jwt::TokenType::Refresh), secret)?;

    Ok(AuthResponse {
        user_id: user.id,
        household_id: user.household_id,
        access_token,
        refresh_token,
    })
}

/// Register a new user
///
/// The account starts without a household. The user then either creates one
/// (`POST /v1/households`) or accepts an invitation
/// (`POST /v1/invitations/accept`).
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Validation failed or weak password
/// - `409 Conflict`: Email already exists
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    req.validate()?;

    password::validate_password_strength(&req.password)
        .map_err(|e| ApiError::invalid_field("password", &e))?;

    let password_hash = password::hash_password(&req.password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            email: req.email,
            password_hash,
            name: req.name,
        },
    )
    .await?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok((StatusCode::CREATED, Json(issue_tokens(&user, state.jwt_secret())?)))
}

/// Login endpoint
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Validation failed
/// - `401 Unauthorized`: Invalid credentials
/// - `403 Forbidden`: Account suspended
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    req.validate()?;

    let user = User::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".to_string()))?;

    if !password::verify_password(&req.password, &user.password_hash)? {
        return Err(ApiError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    if !user.is_active() {
        return Err(ApiError::Forbidden("Account is suspended".to_string()));
    }

    User::update_last_login(&state.db, user.id).await?;

    Ok(Json(issue_tokens(&user, state.jwt_secret())?))
}

/// Token refresh endpoint
///
/// Exchanges a refresh token for a new access token. The account must still
/// exist and be active.
///
/// # Errors
///
/// - `401 Unauthorized`: Invalid or expired refresh token, or unknown user
/// - `403 Forbidden`: Account suspended
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> ApiResult<Json<RefreshResponse>> {
    let claims = jwt::validate_refresh_token(&req.refresh_token, state.jwt_secret())?;

    let user = User::find_by_id(&state.db, claims.sub)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("User no longer exists".to_string()))?;

    if !user.is_active() {
        return Err(ApiError::Forbidden("Account is suspended".to_string()));
    }

    let access_token = jwt::refresh_access_token(&req.refresh_token, state.jwt_secret())?;

    Ok(Json(RefreshResponse { access_token }))
}
