/// Shared infrastructure for database-backed integration tests
///
/// Requires `DATABASE_URL` and `JWT_SECRET` in the environment (or `.env`).

use axum::body::Body;
use axum::http::{Request, StatusCode};
use householdhero_api::app::{build_router, AppState};
use householdhero_api::config::Config;
use householdhero_shared::auth::jwt::{create_token, Claims, TokenType};
use householdhero_shared::db::migrations;
use householdhero_shared::models::user::{CreateUser, User};
use serde_json::Value;
use sqlx::PgPool;
use tower::Service as _;
use uuid::Uuid;

pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
    pub config: Config,
}

impl TestContext {
    /// Connects, migrates and builds the full router
    pub async fn new() -> anyhow::Result<Self> {
        let config = Config::from_env()?;

        migrations::ensure_database_exists(&config.database.url).await?;
        let db = PgPool::connect(&config.database.url).await?;
        migrations::run_migrations(&db).await?;

        let status = migrations::get_migration_status(&db).await?;
        anyhow::ensure!(status.is_up_to_date, "migrations not applied: {:?}", status);

        let state = AppState::new(db.clone(), config.clone());
        let app = build_router(state);

        Ok(TestContext { db, app, config })
    }

    /// Inserts a user with no household and returns it with an access token
    pub async fn create_user(&self, label: &str) -> anyhow::Result<(User, String)> {
        let user = User::create(
            &self.db,
            CreateUser {
                email: format!("{}-{}@example.com", label, Uuid::new_v4()),
                password_hash: "test_hash".to_string(),
                name: Some(label.to_string()),
            },
        )
        .await?;

        let claims = Claims::new(user.id, TokenType::Access);
        let token = create_token(&claims, &self.config.jwt.secret)?;

        Ok((user, token))
    }

    /// Sends a request with a bearer token and optional JSON body
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        token: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("authorization", format!("Bearer {}", token));

        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().call(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        (status, json)
    }
}
