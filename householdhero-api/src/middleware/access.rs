/// Authentication and household access middleware
///
/// Two layers guard the authenticated API:
///
/// 1. [`authenticate`] validates the bearer token, loads the user record and
///    inserts a [`Principal`] into request extensions. Role and household are
///    always taken from the database, never from token claims, so role changes
///    take effect on the next request.
/// 2. [`enforce_access`], attached per route group through [`scoped`], runs the
///    membership and role checks for the group's [`Capability`] and inserts the
///    resulting [`HouseholdScope`]. On denial the handler is never invoked.
///
/// # Example
///
/// ```no_run
/// use axum::{routing::get, Extension, Router};
/// use householdhero_api::middleware::access::scoped;
/// use householdhero_shared::auth::access::{Capability, HouseholdScope};
///
/// async fn list_budgets(Extension(scope): Extension<HouseholdScope>) -> String {
///     scope.household_id().to_string()
/// }
///
/// let finance: Router = scoped(
///     Router::new().route("/budgets", get(list_budgets)),
///     Capability::Finance,
/// );
/// ```

use crate::{app::AppState, error::ApiError};
use axum::{
    extract::{MatchedPath, Request, State},
    http::header,
    middleware::{self, Next},
    response::Response,
    Router,
};
use householdhero_shared::{
    auth::{
        access::{authorize, Capability, Principal},
        jwt,
    },
    models::user::User,
};

/// Bearer-token authentication
///
/// # Errors
///
/// - `401` if the header is missing or the token is invalid, expired, or a
///   refresh token
/// - `401` if the user no longer exists
/// - `403` if the account is suspended
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing authorization header".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::Unauthorized("Expected Bearer token".to_string()))?;

    let claims = jwt::validate_access_token(token, state.jwt_secret())?;

    let user = User::find_by_id(&state.db, claims.sub)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("User no longer exists".to_string()))?;

    if !user.is_active() {
        tracing::warn!(user_id = %user.id, "Suspended user attempted access");
        return Err(ApiError::Forbidden("Account is suspended".to_string()));
    }

    req.extensions_mut().insert(Principal::from_user(&user));

    Ok(next.run(req).await)
}

/// Household access check for one capability
///
/// Expects a [`Principal`] in request extensions; requests without one are
/// rejected as unauthenticated.
pub async fn enforce_access(
    State(capability): State<Capability>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let principal = req
        .extensions()
        .get::<Principal>()
        .cloned()
        .ok_or_else(|| ApiError::Unauthorized("Authentication required".to_string()))?;

    let operation = operation_name(&req);

    let scope = match authorize(&principal, &operation, capability.requirement()) {
        Ok(scope) => scope,
        Err(err) => {
            tracing::warn!(
                user_id = %principal.user_id,
                role = %principal.role,
                capability = capability.as_str(),
                operation = %operation,
                reason = %err,
                "Access denied"
            );
            return Err(err.into());
        }
    };

    tracing::debug!(
        user_id = %scope.user_id(),
        household_id = %scope.household_id(),
        operation = %operation,
        "Access granted"
    );

    req.extensions_mut().insert(scope);

    Ok(next.run(req).await)
}

/// Attaches [`enforce_access`] for `capability` to every route of `router`
///
/// Uses `route_layer`, so unmatched paths still fall through to 404.
pub fn scoped<S>(router: Router<S>, capability: Capability) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.route_layer(middleware::from_fn_with_state(capability, enforce_access))
}

/// `METHOD /route/template`, e.g. `DELETE /v1/tasks/:id`
fn operation_name(req: &Request) -> String {
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());

    format!("{} {}", req.method(), path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Method;

    #[test]
    fn test_operation_name_falls_back_to_uri() {
        let req = Request::builder()
            .method(Method::DELETE)
            .uri("/v1/tasks/123")
            .body(Body::empty())
            .unwrap();

        assert_eq!(operation_name(&req), "DELETE /v1/tasks/123");
    }
}
