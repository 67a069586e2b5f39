/// Household staff (nannies, cleaners, gardeners)
///
/// An employee may optionally be linked to a `staff` user account in the
/// same household.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE employees (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     household_id UUID NOT NULL REFERENCES households(id) ON DELETE CASCADE,
///     user_id UUID REFERENCES users(id) ON DELETE SET NULL,
///     name VARCHAR(200) NOT NULL,
///     position VARCHAR(100) NOT NULL,
///     phone VARCHAR(50),
///     hourly_rate_cents BIGINT CHECK (hourly_rate_cents >= 0),
///     start_date DATE,
///     active BOOLEAN NOT NULL DEFAULT TRUE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Employee {
    pub id: Uuid,
    pub household_id: Uuid,
    pub user_id: Option<Uuid>,
    pub name: String,
    pub position: String,
    pub phone: Option<String>,
    pub hourly_rate_cents: Option<i64>,
    pub start_date: Option<NaiveDate>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateEmployee {
    pub user_id: Option<Uuid>,

    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,

    #[validate(length(min = 1, max = 100, message = "Position must be 1-100 characters"))]
    pub position: String,

    #[validate(length(max = 50))]
    pub phone: Option<String>,

    #[validate(range(min = 0, message = "Rate cannot be negative"))]
    pub hourly_rate_cents: Option<i64>,

    pub start_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateEmployee {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: Option<String>,

    #[validate(length(min = 1, max = 100, message = "Position must be 1-100 characters"))]
    pub position: Option<String>,

    #[validate(length(max = 50))]
    pub phone: Option<String>,

    #[validate(range(min = 0, message = "Rate cannot be negative"))]
    pub hourly_rate_cents: Option<i64>,

    pub start_date: Option<NaiveDate>,
    pub active: Option<bool>,
}

const EMPLOYEE_COLUMNS: &str = "id, household_id, user_id, name, position, phone, \
                                hourly_rate_cents, start_date, active, created_at, updated_at";

impl Employee {
    /// Adds an employee record
    ///
    /// A `user_id` outside the household yields `RowNotFound`.
    pub async fn create(pool: &PgPool, household_id: Uuid, data: CreateEmployee) -> Result<Self, sqlx::Error> {
        let employee = sqlx::query_as::<_, Employee>(&format!(
            r#"
            INSERT INTO employees (household_id, user_id, name, position, phone, hourly_rate_cents, start_date)
            SELECT $1, $2, $3, $4, $5, $6, $7
            WHERE $2::uuid IS NULL
               OR EXISTS (SELECT 1 FROM users WHERE id = $2 AND household_id = $1)
            RETURNING {}
            "#,
            EMPLOYEE_COLUMNS
        ))
        .bind(household_id)
        .bind(data.user_id)
        .bind(data.name)
        .bind(data.position)
        .bind(data.phone)
        .bind(data.hourly_rate_cents)
        .bind(data.start_date)
        .fetch_one(pool)
        .await?;

        Ok(employee)
    }

    pub async fn find(pool: &PgPool, household_id: Uuid, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let employee = sqlx::query_as::<_, Employee>(&format!(
            "SELECT {} FROM employees WHERE id = $1 AND household_id = $2",
            EMPLOYEE_COLUMNS
        ))
        .bind(id)
        .bind(household_id)
        .fetch_optional(pool)
        .await?;

        Ok(employee)
    }

    pub async fn list_by_household(
        pool: &PgPool,
        household_id: Uuid,
        include_inactive: bool,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let employees = sqlx::query_as::<_, Employee>(&format!(
            r#"
            SELECT {} FROM employees
            WHERE household_id = $1 AND ($2 OR active)
            ORDER BY name ASC
            "#,
            EMPLOYEE_COLUMNS
        ))
        .bind(household_id)
        .bind(include_inactive)
        .fetch_all(pool)
        .await?;

        Ok(employees)
    }

    pub async fn update(
        pool: &PgPool,
        household_id: Uuid,
        id: Uuid,
        data: UpdateEmployee,
    ) -> Result<Option<Self>, sqlx::Error> {
        let employee = sqlx::query_as::<_, Employee>(&format!(
            r#"
            UPDATE employees SET
                name = COALESCE($3, name),
                position = COALESCE($4, position),
                phone = COALESCE($5, phone),
                hourly_rate_cents = COALESCE($6, hourly_rate_cents),
                start_date = COALESCE($7, start_date),
                active = COALESCE($8, active),
                updated_at = NOW()
            WHERE id = $1 AND household_id = $2
            RETURNING {}
            "#,
            EMPLOYEE_COLUMNS
        ))
        .bind(id)
        .bind(household_id)
        .bind(data.name)
        .bind(data.position)
        .bind(data.phone)
        .bind(data.hourly_rate_cents)
        .bind(data.start_date)
        .bind(data.active)
        .fetch_optional(pool)
        .await?;

        Ok(employee)
    }

    pub async fn delete(pool: &PgPool, household_id: Uuid, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM employees WHERE id = $1 AND household_id = $2")
            .bind(id)
            .bind(household_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
