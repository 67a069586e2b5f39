/// End-to-end household flows against a real database
///
/// Ignored by default; run with `cargo test -- --ignored` once
/// `DATABASE_URL` points at a disposable Postgres instance.

mod common;

use axum::http::StatusCode;
use common::TestContext;
use serde_json::json;

/// Creates a household for a fresh user and returns (admin token, household id)
async fn household_with_admin(ctx: &TestContext, name: &str) -> (String, String) {
    let (_, token) = ctx.create_user("admin").await.unwrap();

    let (status, body) = ctx
        .send("POST", "/v1/households", &token, Some(json!({ "name": name })))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["admin"]["role"], "admin");

    let household_id = body["household"]["id"].as_str().unwrap().to_string();
    (token, household_id)
}

/// Issues an invitation for `role` and has a fresh user accept it
async fn join_with_role(ctx: &TestContext, admin_token: &str, role: &str) -> (String, String) {
    let (status, invitation) = ctx
        .send(
            "POST",
            "/v1/household/invitations",
            admin_token,
            Some(json!({ "role": role })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{invitation}");

    let (user, token) = ctx.create_user(role).await.unwrap();
    let (status, joined) = ctx
        .send(
            "POST",
            "/v1/invitations/accept",
            &token,
            Some(json!({ "code": invitation["code"] })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{joined}");
    assert_eq!(joined["role"], role);

    (token, user.id.to_string())
}

#[tokio::test]
#[ignore]
async fn test_user_without_household_is_refused() {
    let ctx = TestContext::new().await.unwrap();
    let (_, token) = ctx.create_user("loner").await.unwrap();

    let (status, body) = ctx.send("GET", "/v1/tasks", &token, None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "no_household");

    let (status, body) = ctx.send("GET", "/v1/me", &token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["household"].is_null());
}

#[tokio::test]
#[ignore]
async fn test_roles_gate_sensitive_routes() {
    let ctx = TestContext::new().await.unwrap();
    let (admin_token, _) = household_with_admin(&ctx, "Gatekeepers").await;
    let (parent_token, _) = join_with_role(&ctx, &admin_token, "parent").await;
    let (member_token, member_id) = join_with_role(&ctx, &admin_token, "member").await;
    let (staff_token, _) = join_with_role(&ctx, &admin_token, "staff").await;

    let budget = json!({
        "name": "Groceries",
        "amount_cents": 50_000,
        "period_start": "2025-01-01",
        "period_end": "2025-01-31"
    });

    let (status, _) = ctx
        .send("POST", "/v1/finance/budgets", &parent_token, Some(budget.clone()))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = ctx
        .send("POST", "/v1/finance/budgets", &member_token, Some(budget))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "forbidden_role");

    let (status, _) = ctx.send("GET", "/v1/tasks", &staff_token, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = ctx.send("GET", "/v1/employees", &staff_token, None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let status_uri = format!("/v1/admin/users/{}/status", member_id);
    let suspend = json!({ "status": "suspended" });

    let (status, body) = ctx
        .send("PUT", &status_uri, &parent_token, Some(suspend.clone()))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "forbidden_role");

    let (status, _) = ctx.send("PUT", &status_uri, &admin_token, Some(suspend)).await;
    assert_eq!(status, StatusCode::OK);

    // Suspension takes effect on the next request with the same token
    let (status, _) = ctx.send("GET", "/v1/tasks", &member_token, None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore]
async fn test_households_are_isolated() {
    let ctx = TestContext::new().await.unwrap();
    let (first_token, _) = household_with_admin(&ctx, "First").await;
    let (second_token, _) = household_with_admin(&ctx, "Second").await;

    let (status, task) = ctx
        .send(
            "POST",
            "/v1/tasks",
            &second_token,
            Some(json!({ "title": "Water the plants" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{task}");
    let task_uri = format!("/v1/tasks/{}", task["id"].as_str().unwrap());

    let (status, _) = ctx.send("GET", &task_uri, &first_token, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = ctx.send("DELETE", &task_uri, &first_token, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = ctx.send("GET", "/v1/tasks", &first_token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tasks"], json!([]));

    let (status, _) = ctx.send("GET", &task_uri, &second_token, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
#[ignore]
async fn test_invitation_rules() {
    let ctx = TestContext::new().await.unwrap();
    let (admin_token, _) = household_with_admin(&ctx, "Inviters").await;

    let (status, _) = ctx
        .send(
            "POST",
            "/v1/household/invitations",
            &admin_token,
            Some(json!({ "role": "admin" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, invitation) = ctx
        .send("POST", "/v1/household/invitations", &admin_token, Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(invitation["role"], "member");
    let code = json!({ "code": invitation["code"] });

    let (_, first_token) = ctx.create_user("first").await.unwrap();
    let (status, _) = ctx
        .send("POST", "/v1/invitations/accept", &first_token, Some(code.clone()))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, second_token) = ctx.create_user("second").await.unwrap();
    let (status, _) = ctx
        .send("POST", "/v1/invitations/accept", &second_token, Some(code))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Joining a second household is refused
    let (_, other_token) = household_with_admin(&ctx, "Elsewhere").await;
    let (status, other) = ctx
        .send("POST", "/v1/household/invitations", &other_token, Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = ctx
        .send(
            "POST",
            "/v1/invitations/accept",
            &first_token,
            Some(json!({ "code": other["code"] })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore]
async fn test_last_admin_cannot_be_demoted() {
    let ctx = TestContext::new().await.unwrap();
    let (admin_token, _) = household_with_admin(&ctx, "Solo").await;

    let (_, me) = ctx.send("GET", "/v1/me", &admin_token, None).await;
    let uri = format!("/v1/admin/members/{}/role", me["user"]["id"].as_str().unwrap());

    let (status, _) = ctx
        .send("PUT", &uri, &admin_token, Some(json!({ "role": "parent" })))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore]
async fn test_concurrent_admin_demotions_keep_one_admin() {
    let ctx = TestContext::new().await.unwrap();
    let (first_token, household_id) = household_with_admin(&ctx, "Co-admins").await;
    let (second_token, second_id) = join_with_role(&ctx, &first_token, "parent").await;

    let (status, _) = ctx
        .send(
            "PUT",
            &format!("/v1/admin/members/{}/role", second_id),
            &first_token,
            Some(json!({ "role": "admin" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, me) = ctx.send("GET", "/v1/me", &first_token, None).await;
    let first_id = me["user"]["id"].as_str().unwrap().to_string();

    let demote = json!({ "role": "parent" });
    let first_uri = format!("/v1/admin/members/{}/role", second_id);
    let second_uri = format!("/v1/admin/members/{}/role", first_id);
    let ((first_status, _), (second_status, _)) = tokio::join!(
        ctx.send("PUT", &first_uri, &first_token, Some(demote.clone())),
        ctx.send("PUT", &second_uri, &second_token, Some(demote.clone())),
    );

    let succeeded = [first_status, second_status]
        .iter()
        .filter(|s| **s == StatusCode::OK)
        .count();
    assert_eq!(succeeded, 1, "{first_status} / {second_status}");

    let household_id = household_id.parse().unwrap();
    let admins = householdhero_shared::models::user::User::count_admins(&ctx.db, household_id)
        .await
        .unwrap();
    assert_eq!(admins, 1);
}

#[tokio::test]
#[ignore]
async fn test_only_admin_renames_household() {
    let ctx = TestContext::new().await.unwrap();
    let (admin_token, _) = household_with_admin(&ctx, "Before").await;
    let (parent_token, _) = join_with_role(&ctx, &admin_token, "parent").await;
    let (member_token, _) = join_with_role(&ctx, &admin_token, "member").await;

    let (status, body) = ctx.send("GET", "/v1/household", &member_token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Before");

    for token in [&member_token, &parent_token] {
        let (status, body) = ctx
            .send("PUT", "/v1/household", token, Some(json!({ "name": "Hijacked" })))
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "forbidden_role");
    }

    let (status, body) = ctx
        .send("PUT", "/v1/household", &admin_token, Some(json!({ "name": "After" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "After");
}
