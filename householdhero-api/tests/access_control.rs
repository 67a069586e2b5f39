//! Router-level tests for the household access layer
//!
//! These drive real axum routers through `tower::Service::call` with a
//! principal injected as an extension, so no database is needed.

use axum::{
    body::Body,
    extract::Request,
    http::{Method, StatusCode},
    response::Response,
    routing::{get, post, put},
    Extension, Router,
};
use householdhero_api::middleware::access::scoped;
use householdhero_shared::{
    auth::access::{Capability, HouseholdScope, Principal},
    models::user::Role,
};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use tower::Service as _;
use uuid::Uuid;

async fn echo_scope(Extension(scope): Extension<HouseholdScope>) -> String {
    scope.household_id().to_string()
}

/// One route per capability, mirroring the production layout
fn probe_router(calls: Arc<AtomicUsize>) -> Router {
    let counted = move |scope: Extension<HouseholdScope>| {
        let calls = calls.clone();
        async move {
            calls.fetch_add(1, Ordering::SeqCst);
            echo_scope(scope).await
        }
    };

    Router::new()
        .merge(scoped(
            Router::new()
                .route("/v1/household", get(counted.clone()))
                .route("/v1/tasks", get(counted.clone())),
            Capability::HouseholdResources,
        ))
        .merge(scoped(
            Router::new().route("/v1/finance/budgets", post(counted.clone())),
            Capability::Finance,
        ))
        .merge(scoped(
            Router::new().route("/v1/employees", post(counted.clone())),
            Capability::StaffManagement,
        ))
        .merge(scoped(
            Router::new().route("/v1/household/invitations", post(counted.clone())),
            Capability::MemberManagement,
        ))
        .merge(scoped(
            Router::new()
                .route("/v1/household", put(counted.clone()))
                .route("/v1/admin/users/:user_id/status", put(counted)),
            Capability::SystemAdministration,
        ))
}

async fn send(router: Router, principal: Option<Principal>, method: Method, uri: &str) -> Response {
    let mut app = match principal {
        Some(principal) => router.layer(Extension(principal)),
        None => router,
    };

    app.call(
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

async fn json_body(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn text_body(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_member_without_household_gets_no_household() {
    let calls = Arc::new(AtomicUsize::new(0));
    let principal = Principal::new(Uuid::new_v4(), Role::Member, None);

    let response = send(probe_router(calls.clone()), Some(principal), Method::GET, "/v1/tasks").await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = json_body(response).await;
    assert_eq!(body["error"], "no_household");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_admin_without_household_is_denied_before_role_check() {
    let calls = Arc::new(AtomicUsize::new(0));
    let principal = Principal::new(Uuid::new_v4(), Role::Admin, None);

    let response = send(
        probe_router(calls.clone()),
        Some(principal),
        Method::PUT,
        &format!("/v1/admin/users/{}/status", Uuid::new_v4()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(json_body(response).await["error"], "no_household");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_member_reads_tasks_scoped_to_own_household() {
    let calls = Arc::new(AtomicUsize::new(0));
    let household_id = Uuid::new_v4();
    let principal = Principal::new(Uuid::new_v4(), Role::Member, Some(household_id));

    let response = send(probe_router(calls.clone()), Some(principal), Method::GET, "/v1/tasks").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(text_body(response).await, household_id.to_string());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_member_cannot_create_budget() {
    let calls = Arc::new(AtomicUsize::new(0));
    let principal = Principal::new(Uuid::new_v4(), Role::Member, Some(Uuid::new_v4()));

    let response = send(
        probe_router(calls.clone()),
        Some(principal),
        Method::POST,
        "/v1/finance/budgets",
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = json_body(response).await;
    assert_eq!(body["error"], "forbidden_role");
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("POST /v1/finance/budgets"));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_admin_can_create_employee() {
    let calls = Arc::new(AtomicUsize::new(0));
    let household_id = Uuid::new_v4();
    let principal = Principal::new(Uuid::new_v4(), Role::Admin, Some(household_id));

    let response = send(
        probe_router(calls.clone()),
        Some(principal),
        Method::POST,
        "/v1/employees",
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(text_body(response).await, household_id.to_string());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_staff_cannot_update_user_status() {
    let calls = Arc::new(AtomicUsize::new(0));
    let principal = Principal::new(Uuid::new_v4(), Role::Staff, Some(Uuid::new_v4()));

    let response = send(
        probe_router(calls.clone()),
        Some(principal),
        Method::PUT,
        &format!("/v1/admin/users/{}/status", Uuid::new_v4()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = json_body(response).await;
    assert_eq!(body["error"], "forbidden_role");
    // Operation names use the route template, not the concrete ID
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("/v1/admin/users/:user_id/status"));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_policy_matrix_over_http() {
    let household_id = Uuid::new_v4();
    let routes: [(Method, &str, Capability); 7] = [
        (Method::GET, "/v1/household", Capability::HouseholdResources),
        (Method::PUT, "/v1/household", Capability::SystemAdministration),
        (Method::GET, "/v1/tasks", Capability::HouseholdResources),
        (Method::POST, "/v1/finance/budgets", Capability::Finance),
        (Method::POST, "/v1/employees", Capability::StaffManagement),
        (Method::POST, "/v1/household/invitations", Capability::MemberManagement),
        (
            Method::PUT,
            "/v1/admin/users/00000000-0000-0000-0000-000000000000/status",
            Capability::SystemAdministration,
        ),
    ];

    for role in [Role::Admin, Role::Parent, Role::Member, Role::Staff] {
        for (method, uri, capability) in routes.iter() {
            let calls = Arc::new(AtomicUsize::new(0));
            let principal = Principal::new(Uuid::new_v4(), role, Some(household_id));

            let response = send(probe_router(calls.clone()), Some(principal), method.clone(), uri).await;

            let allowed = capability.requirement().permits(role);
            let expected = if allowed { StatusCode::OK } else { StatusCode::FORBIDDEN };
            assert_eq!(response.status(), expected, "{role} {method} {uri}");
            assert_eq!(calls.load(Ordering::SeqCst), usize::from(allowed), "{role} {method} {uri}");
        }
    }
}

#[tokio::test]
async fn test_household_read_and_rename_keep_separate_requirements() {
    let household_id = Uuid::new_v4();

    for role in [Role::Parent, Role::Member, Role::Staff] {
        let calls = Arc::new(AtomicUsize::new(0));
        let principal = Principal::new(Uuid::new_v4(), role, Some(household_id));

        let response = send(
            probe_router(calls.clone()),
            Some(principal.clone()),
            Method::GET,
            "/v1/household",
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK, "{role} GET");

        let response = send(probe_router(calls.clone()), Some(principal), Method::PUT, "/v1/household").await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN, "{role} PUT");
        let body = json_body(response).await;
        assert_eq!(body["error"], "forbidden_role");
        assert!(body["message"].as_str().unwrap().contains("PUT /v1/household"));

        assert_eq!(calls.load(Ordering::SeqCst), 1, "{role}");
    }

    let calls = Arc::new(AtomicUsize::new(0));
    let admin = Principal::new(Uuid::new_v4(), Role::Admin, Some(household_id));
    let response = send(probe_router(calls.clone()), Some(admin), Method::PUT, "/v1/household").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(text_body(response).await, household_id.to_string());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_missing_principal_is_unauthorized() {
    let calls = Arc::new(AtomicUsize::new(0));

    let response = send(probe_router(calls.clone()), None, Method::GET, "/v1/tasks").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(response).await["error"], "unauthorized");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_unmatched_path_is_not_found() {
    let calls = Arc::new(AtomicUsize::new(0));
    let principal = Principal::new(Uuid::new_v4(), Role::Admin, None);

    let response = send(probe_router(calls), Some(principal), Method::GET, "/v1/unknown").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
