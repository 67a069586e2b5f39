/// Household chore/task model and database operations
///
/// # State Machine
///
/// ```text
/// pending → in_progress → completed
/// pending → completed
/// completed → pending   (reopen)
/// ```
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('pending', 'in_progress', 'completed');
/// CREATE TYPE task_priority AS ENUM ('low', 'medium', 'high');
///
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     household_id UUID NOT NULL REFERENCES households(id) ON DELETE CASCADE,
///     created_by UUID NOT NULL REFERENCES users(id),
///     assigned_to UUID REFERENCES users(id) ON DELETE SET NULL,
///     title VARCHAR(200) NOT NULL,
///     description TEXT,
///     due_date DATE,
///     priority task_priority NOT NULL DEFAULT 'medium',
///     status task_status NOT NULL DEFAULT 'pending',
///     completed_at TIMESTAMPTZ,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// Every query takes the household ID and includes it in its `WHERE` clause.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

/// Task progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
        }
    }

    /// Checks whether moving from `self` to `next` is allowed
    pub fn can_transition_to(&self, next: TaskStatus) -> bool {
        matches!(
            (self, next),
            (TaskStatus::Pending, TaskStatus::InProgress)
                | (TaskStatus::Pending, TaskStatus::Completed)
                | (TaskStatus::InProgress, TaskStatus::Completed)
                | (TaskStatus::InProgress, TaskStatus::Pending)
                | (TaskStatus::Completed, TaskStatus::Pending)
        ) || *self == next
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

/// Household task
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    pub id: Uuid,
    pub household_id: Uuid,
    pub created_by: Uuid,

    /// Member responsible for the task
    pub assigned_to: Option<Uuid>,

    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub priority: TaskPriority,
    pub status: TaskStatus,

    /// Set when the task reaches `completed`, cleared on reopen
    pub completed_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Returns true if the task is open and its due date has passed
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status != TaskStatus::Completed && self.due_date.map(|d| d < today).unwrap_or(false)
    }
}

/// Input for creating a task
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateTask {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: Option<String>,

    pub assigned_to: Option<Uuid>,
    pub due_date: Option<NaiveDate>,

    #[serde(default)]
    pub priority: TaskPriority,
}

/// Partial update; `None` leaves a field unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateTask {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,

    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: Option<String>,

    pub assigned_to: Option<Uuid>,
    pub due_date: Option<NaiveDate>,
    pub priority: Option<TaskPriority>,
    pub status: Option<TaskStatus>,
}

const TASK_COLUMNS: &str = "id, household_id, created_by, assigned_to, title, description, \
                            due_date, priority, status, completed_at, created_at, updated_at";

impl Task {
    pub async fn create(
        pool: &PgPool,
        household_id: Uuid,
        created_by: Uuid,
        data: CreateTask,
    ) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(&format!(
            r#"
            INSERT INTO tasks (household_id, created_by, assigned_to, title, description, due_date, priority)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            TASK_COLUMNS
        ))
        .bind(household_id)
        .bind(created_by)
        .bind(data.assigned_to)
        .bind(data.title)
        .bind(data.description)
        .bind(data.due_date)
        .bind(data.priority)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID within a household
    pub async fn find(pool: &PgPool, household_id: Uuid, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "SELECT {} FROM tasks WHERE id = $1 AND household_id = $2",
            TASK_COLUMNS
        ))
        .bind(id)
        .bind(household_id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Lists tasks, optionally filtered by status and assignee
    ///
    /// Ordered by due date (undated last), then creation time.
    pub async fn list_by_household(
        pool: &PgPool,
        household_id: Uuid,
        status: Option<TaskStatus>,
        assigned_to: Option<Uuid>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            r#"
            SELECT {} FROM tasks
            WHERE household_id = $1
              AND ($2::task_status IS NULL OR status = $2)
              AND ($3::uuid IS NULL OR assigned_to = $3)
            ORDER BY due_date ASC NULLS LAST, created_at ASC
            "#,
            TASK_COLUMNS
        ))
        .bind(household_id)
        .bind(status)
        .bind(assigned_to)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Applies a partial update
    ///
    /// `completed_at` follows the status: set when moving into `completed`,
    /// cleared when moving out of it.
    pub async fn update(
        pool: &PgPool,
        household_id: Uuid,
        id: Uuid,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(&format!(
            r#"
            UPDATE tasks SET
                title = COALESCE($3, title),
                description = COALESCE($4, description),
                assigned_to = COALESCE($5, assigned_to),
                due_date = COALESCE($6, due_date),
                priority = COALESCE($7, priority),
                completed_at = CASE
                    WHEN $8::task_status = 'completed' AND status <> 'completed' THEN NOW()
                    WHEN $8::task_status IS NOT NULL AND $8::task_status <> 'completed' THEN NULL
                    ELSE completed_at
                END,
                status = COALESCE($8, status),
                updated_at = NOW()
            WHERE id = $1 AND household_id = $2
            RETURNING {}
            "#,
            TASK_COLUMNS
        ))
        .bind(id)
        .bind(household_id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.assigned_to)
        .bind(data.due_date)
        .bind(data.priority)
        .bind(data.status)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    pub async fn delete(pool: &PgPool, household_id: Uuid, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND household_id = $2")
            .bind(id)
            .bind(household_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
