/// Household task endpoints (any member)
///
/// # Endpoints
///
/// - `GET /v1/tasks?status=&assigned_to=` - List tasks
/// - `POST /v1/tasks` - Create a task
/// - `GET /v1/tasks/:id` - Get a task
/// - `PUT /v1/tasks/:id` - Update a task
/// - `DELETE /v1/tasks/:id` - Delete a task

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use householdhero_shared::{
    auth::access::HouseholdScope,
    models::{
        task::{CreateTask, Task, TaskStatus, UpdateTask},
        user::User,
    },
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Default, Deserialize)]
pub struct TaskQuery {
    pub status: Option<TaskStatus>,
    pub assigned_to: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct ListTasksResponse {
    pub tasks: Vec<Task>,
}

fn not_found() -> ApiError {
    ApiError::NotFound("Task not found".to_string())
}

/// Assignees must belong to the same household
async fn ensure_assignee(state: &AppState, scope: &HouseholdScope, assigned_to: Option<Uuid>) -> ApiResult<()> {
    if let Some(user_id) = assigned_to {
        if User::find_in_household(&state.db, scope.household_id(), user_id)
            .await?
            .is_none()
        {
            return Err(ApiError::invalid_field(
                "assigned_to",
                "Assignee is not a member of this household",
            ));
        }
    }

    Ok(())
}

pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(scope): Extension<HouseholdScope>,
    Query(query): Query<TaskQuery>,
) -> ApiResult<Json<ListTasksResponse>> {
    let tasks = Task::list_by_household(&state.db, scope.household_id(), query.status, query.assigned_to).await?;

    Ok(Json(ListTasksResponse { tasks }))
}

pub async fn create_task(
    State(state): State<AppState>,
    Extension(scope): Extension<HouseholdScope>,
    Json(req): Json<CreateTask>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    req.validate()?;
    ensure_assignee(&state, &scope, req.assigned_to).await?;

    let task = Task::create(&state.db, scope.household_id(), scope.user_id(), req).await?;

    tracing::debug!(household_id = %scope.household_id(), task_id = %task.id, "Task created");

    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn get_task(
    State(state): State<AppState>,
    Extension(scope): Extension<HouseholdScope>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Task>> {
    let task = Task::find(&state.db, scope.household_id(), id)
        .await?
        .ok_or_else(not_found)?;

    Ok(Json(task))
}

/// Updates a task
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Invalid field, foreign assignee, or a status
///   change the current status does not allow
pub async fn update_task(
    State(state): State<AppState>,
    Extension(scope): Extension<HouseholdScope>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTask>,
) -> ApiResult<Json<Task>> {
    req.validate()?;
    ensure_assignee(&state, &scope, req.assigned_to).await?;

    if let Some(next) = req.status {
        let current = Task::find(&state.db, scope.household_id(), id)
            .await?
            .ok_or_else(not_found)?;

        if !current.status.can_transition_to(next) {
            return Err(ApiError::invalid_field(
                "status",
                &format!(
                    "Cannot move a task from '{}' to '{}'",
                    current.status.as_str(),
                    next.as_str()
                ),
            ));
        }
    }

    let task = Task::update(&state.db, scope.household_id(), id, req)
        .await?
        .ok_or_else(not_found)?;

    Ok(Json(task))
}

pub async fn delete_task(
    State(state): State<AppState>,
    Extension(scope): Extension<HouseholdScope>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    if !Task::delete(&state.db, scope.household_id(), id).await? {
        return Err(not_found());
    }

    Ok(StatusCode::NO_CONTENT)
}
