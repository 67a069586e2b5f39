/// Application state and router builder
///
/// This module defines the shared application state and builds the Axum
/// router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use householdhero_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = householdhero_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{
    config::Config,
    middleware::{
        access::{authenticate, scoped},
        security::SecurityHeadersLayer,
    },
};
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use householdhero_shared::auth::access::Capability;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                            public
/// └── /v1/
///     ├── /auth/{register,login,refresh} public
///     ├── /me, /households,              authenticated, no household required
///     │   /invitations/accept
///     ├── household resources            any household member
///     ├── /finance/*                     admin, parent
///     ├── /employees                     admin, parent
///     ├── /household/invitations         admin, parent
///     └── /admin/*, PUT /household       admin
/// ```
///
/// # Middleware Stack
///
/// Outermost first:
/// 1. Security headers
/// 2. CORS
/// 3. Request tracing
/// 4. Authentication (authenticated routes)
/// 5. Household access check (per capability group)
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);
    let production = state.config.api.production;

    Router::new()
        .route("/health", get(crate::routes::health::health_check))
        .nest("/v1", v1_routes(state.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(SecurityHeadersLayer::new(production))
        .with_state(state)
}

fn v1_routes(state: AppState) -> Router<AppState> {
    use crate::routes::{
        admin, auth, calendar, employees, finance, households, inventory, invitations, me, pets,
        recipes, tasks, vehicles,
    };

    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/refresh", post(auth::refresh));

    // Authenticated, but usable before the user has a household
    let account_routes = Router::new()
        .route("/me", get(me::get_me))
        .route("/households", post(households::create_household))
        .route("/invitations/accept", post(invitations::accept_invitation));

    let household_routes = scoped(
        Router::new()
            .route("/household", get(households::get_household))
            .route("/household/members", get(households::list_members))
            .route("/tasks", get(tasks::list_tasks).post(tasks::create_task))
            .route(
                "/tasks/:id",
                get(tasks::get_task).put(tasks::update_task).delete(tasks::delete_task),
            )
            .route("/inventory", get(inventory::list_items).post(inventory::create_item))
            .route(
                "/inventory/:id",
                get(inventory::get_item)
                    .put(inventory::update_item)
                    .delete(inventory::delete_item),
            )
            .route("/inventory/:id/adjust", post(inventory::adjust_item))
            .route(
                "/calendar/events",
                get(calendar::list_events).post(calendar::create_event),
            )
            .route(
                "/calendar/events/:id",
                get(calendar::get_event)
                    .put(calendar::update_event)
                    .delete(calendar::delete_event),
            )
            .route("/recipes", get(recipes::list_recipes).post(recipes::create_recipe))
            .route(
                "/recipes/:id",
                get(recipes::get_recipe)
                    .put(recipes::update_recipe)
                    .delete(recipes::delete_recipe),
            )
            .route("/pets", get(pets::list_pets).post(pets::create_pet))
            .route(
                "/pets/:id",
                get(pets::get_pet).put(pets::update_pet).delete(pets::delete_pet),
            )
            .route("/vehicles", get(vehicles::list_vehicles).post(vehicles::create_vehicle))
            .route(
                "/vehicles/:id",
                get(vehicles::get_vehicle)
                    .put(vehicles::update_vehicle)
                    .delete(vehicles::delete_vehicle),
            ),
        Capability::HouseholdResources,
    );

    let finance_routes = scoped(
        Router::new()
            .route(
                "/finance/budgets",
                get(finance::list_budgets).post(finance::create_budget),
            )
            .route(
                "/finance/budgets/:id",
                get(finance::get_budget)
                    .put(finance::update_budget)
                    .delete(finance::delete_budget),
            )
            .route("/finance/budgets/:id/summary", get(finance::budget_summary))
            .route(
                "/finance/transactions",
                get(finance::list_transactions).post(finance::create_transaction),
            )
            .route(
                "/finance/transactions/:id",
                get(finance::get_transaction).delete(finance::delete_transaction),
            ),
        Capability::Finance,
    );

    let staff_routes = scoped(
        Router::new()
            .route(
                "/employees",
                get(employees::list_employees).post(employees::create_employee),
            )
            .route(
                "/employees/:id",
                get(employees::get_employee)
                    .put(employees::update_employee)
                    .delete(employees::delete_employee),
            ),
        Capability::StaffManagement,
    );

    let member_routes = scoped(
        Router::new()
            .route(
                "/household/invitations",
                get(invitations::list_invitations).post(invitations::create_invitation),
            )
            .route(
                "/household/invitations/:id",
                axum::routing::delete(invitations::revoke_invitation),
            ),
        Capability::MemberManagement,
    );

    let admin_routes = scoped(
        Router::new()
            .route("/household", put(households::rename_household))
            .route("/admin/members/:user_id/role", put(admin::update_member_role))
            .route("/admin/users/:user_id/status", put(admin::update_user_status)),
        Capability::SystemAdministration,
    );

    let authenticated = Router::new()
        .merge(account_routes)
        .merge(household_routes)
        .merge(finance_routes)
        .merge(staff_routes)
        .merge(member_routes)
        .merge(admin_routes)
        .route_layer(axum::middleware::from_fn_with_state(state, authenticate));

    Router::new()
        .nest("/auth", auth_routes)
        .merge(authenticated)
}

/// Permissive CORS when `*` is configured, otherwise an explicit allow-list
fn cors_layer(config: &Config) -> CorsLayer {
    if config.api.cors_origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .api
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600))
}
