/// Error handling for the API server
///
/// This module provides a unified error type that maps to HTTP responses.
/// All handlers return `Result<T, ApiError>`, which converts to the JSON body
/// `{ "error": <code>, "message": <text>, "details"?: [...] }`.
///
/// # Example
///
/// ```no_run
/// use householdhero_api::error::{ApiError, ApiResult};
/// use axum::Json;
/// use serde_json::{json, Value};
///
/// async fn handler(found: bool) -> ApiResult<Json<Value>> {
///     if !found {
///         return Err(ApiError::NotFound("Task not found".to_string()));
///     }
///     Ok(Json(json!({ "ok": true })))
/// }
/// ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use householdhero_shared::auth::{
    access::AccessError, jwt::JwtError, password::PasswordError,
};
use householdhero_shared::models::invitation::InvitationError;
use serde::{Deserialize, Serialize};
use sqlx::error::ErrorKind;
use std::fmt;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400)
    BadRequest(String),

    /// Unauthorized (401)
    Unauthorized(String),

    /// Forbidden (403)
    Forbidden(String),

    /// Principal has no household yet (403)
    NoHousehold(String),

    /// Principal's role may not perform the operation (403)
    ForbiddenRole(String),

    /// Not found (404)
    NotFound(String),

    /// Conflict (409) - e.g., duplicate email
    Conflict(String),

    /// Unprocessable entity (422) - validation errors
    ValidationError(Vec<ValidationErrorDetail>),

    /// Internal server error (500)
    InternalError(String),
}

/// Validation error detail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

impl ValidationErrorDetail {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code (e.g., "bad_request", "forbidden_role")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Optional validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationErrorDetail>>,
}

impl ApiError {
    /// Single-field validation failure
    pub fn invalid_field(field: &str, message: &str) -> Self {
        ApiError::ValidationError(vec![ValidationErrorDetail::new(field, message)])
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::NoHousehold(msg) => write!(f, "No household: {}", msg),
            ApiError::ForbiddenRole(msg) => write!(f, "Forbidden role: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::ValidationError(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg, None),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg, None),
            ApiError::NoHousehold(msg) => (StatusCode::FORBIDDEN, "no_household", msg, None),
            ApiError::ForbiddenRole(msg) => (StatusCode::FORBIDDEN, "forbidden_role", msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg, None),
            ApiError::ValidationError(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_error",
                "Request validation failed".to_string(),
                Some(errors),
            ),
            ApiError::InternalError(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

/// Convert sqlx errors to API errors
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(db_err) => match db_err.kind() {
                ErrorKind::UniqueViolation => {
                    if db_err.constraint().is_some_and(|c| c.contains("email")) {
                        ApiError::Conflict("Email already exists".to_string())
                    } else {
                        ApiError::Conflict("Resource already exists".to_string())
                    }
                }
                ErrorKind::CheckViolation => ApiError::BadRequest(format!(
                    "Constraint violation: {}",
                    db_err.constraint().unwrap_or("check")
                )),
                ErrorKind::ForeignKeyViolation => {
                    ApiError::BadRequest("Referenced resource does not exist".to_string())
                }
                _ => ApiError::InternalError(format!("Database error: {}", db_err)),
            },
            _ => ApiError::InternalError(format!("Database error: {}", err)),
        }
    }
}

/// Convert request validation failures to a 422 with per-field details
impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut details: Vec<ValidationErrorDetail> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| ValidationErrorDetail {
                    field: field.to_string(),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "Validation failed".to_string()),
                })
            })
            .collect();

        // field_errors() is a HashMap; keep the response stable
        details.sort_by(|a, b| a.field.cmp(&b.field));

        ApiError::ValidationError(details)
    }
}

/// Convert access decisions to API errors
impl From<AccessError> for ApiError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::NoHousehold => ApiError::NoHousehold(err.to_string()),
            AccessError::ForbiddenRole { .. } => ApiError::ForbiddenRole(err.to_string()),
        }
    }
}

/// Convert invitation errors to API errors
impl From<InvitationError> for ApiError {
    fn from(err: InvitationError) -> Self {
        match err {
            InvitationError::NotFound => ApiError::NotFound(err.to_string()),
            InvitationError::Expired => ApiError::BadRequest(err.to_string()),
            InvitationError::AlreadyAccepted | InvitationError::AlreadyMember => {
                ApiError::Conflict(err.to_string())
            }
            InvitationError::RoleNotInvitable(_) => ApiError::invalid_field("role", &err.to_string()),
            InvitationError::DatabaseError(db_err) => db_err.into(),
        }
    }
}

/// Convert password errors to API errors
impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::InternalError(format!("Password operation failed: {}", err))
    }
}

/// Convert JWT errors to API errors
impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Expired => ApiError::Unauthorized("Token expired".to_string()),
            JwtError::CreateError(msg) => ApiError::InternalError(format!("Token creation failed: {}", msg)),
            _ => ApiError::Unauthorized(format!("Invalid token: {}", err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use householdhero_shared::models::user::Role;

    async fn body_json(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_error_display() {
        let err = ApiError::BadRequest("Invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: Invalid input");

        let err = ApiError::NotFound("Task not found".to_string());
        assert_eq!(err.to_string(), "Not found: Task not found");
    }

    #[test]
    fn test_validation_error() {
        let errors = vec![
            ValidationErrorDetail::new("email", "Invalid email format"),
            ValidationErrorDetail::new("password", "Password too short"),
        ];

        let err = ApiError::ValidationError(errors);
        assert_eq!(err.to_string(), "Validation failed: 2 errors");
    }

    #[tokio::test]
    async fn test_access_errors_map_to_distinct_codes() {
        let (status, body) = body_json(AccessError::NoHousehold.into()).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "no_household");
        assert_eq!(body["message"], "must belong to a household to access this resource");
        assert!(body.get("details").is_none());

        let denied = AccessError::ForbiddenRole {
            operation: "POST /v1/finance/budgets".to_string(),
            role: Role::Member,
        };
        let (status, body) = body_json(denied.into()).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "forbidden_role");
        assert!(body["message"].as_str().unwrap().contains("POST /v1/finance/budgets"));
    }

    #[tokio::test]
    async fn test_internal_error_hides_details() {
        let (status, body) = body_json(ApiError::InternalError("connection reset".to_string())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "An internal error occurred");
    }

    #[tokio::test]
    async fn test_validation_details_serialized() {
        let (status, body) = body_json(ApiError::invalid_field("ends_at", "End must not precede start")).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["details"][0]["field"], "ends_at");
    }

    #[test]
    fn test_row_not_found_is_404() {
        assert!(matches!(ApiError::from(sqlx::Error::RowNotFound), ApiError::NotFound(_)));
    }

    #[test]
    fn test_invitation_error_mapping() {
        assert!(matches!(ApiError::from(InvitationError::NotFound), ApiError::NotFound(_)));
        assert!(matches!(ApiError::from(InvitationError::Expired), ApiError::BadRequest(_)));
        assert!(matches!(ApiError::from(InvitationError::AlreadyAccepted), ApiError::Conflict(_)));
        assert!(matches!(ApiError::from(InvitationError::AlreadyMember), ApiError::Conflict(_)));
        assert!(matches!(
            ApiError::from(InvitationError::RoleNotInvitable(Role::Admin)),
            ApiError::ValidationError(_)
        ));
    }

    #[test]
    fn test_jwt_error_mapping() {
        assert!(matches!(ApiError::from(JwtError::Expired), ApiError::Unauthorized(_)));
        assert!(matches!(
            ApiError::from(JwtError::WrongTokenType { expected: "access", actual: "refresh" }),
            ApiError::Unauthorized(_)
        ));
        assert!(matches!(
            ApiError::from(JwtError::CreateError("bad key".to_string())),
            ApiError::InternalError(_)
        ));
    }
}
