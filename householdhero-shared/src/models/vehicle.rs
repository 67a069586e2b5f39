/// Household vehicles and their service schedule
///
/// # Schema
///
/// ```sql
/// CREATE TABLE vehicles (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     household_id UUID NOT NULL REFERENCES households(id) ON DELETE CASCADE,
///     created_by UUID NOT NULL REFERENCES users(id),
///     make VARCHAR(100) NOT NULL,
///     model VARCHAR(100) NOT NULL,
///     year INTEGER,
///     license_plate VARCHAR(20),
///     mileage INTEGER CHECK (mileage >= 0),
///     next_service_date DATE,
///     insurance_expires_on DATE,
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
pub struct Vehicle {
    pub id: Uuid,
    pub household_id: Uuid,
    pub created_by: Uuid,
    pub make: String,
    pub model: String,
    pub year: Option<i32>,
    pub license_plate: Option<String>,
    pub mileage: Option<i32>,
    pub next_service_date: Option<NaiveDate>,
    pub insurance_expires_on: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Vehicle {
    /// Returns true if the next service is due within `days` of `today`
    /// (or is already overdue)
    pub fn service_due_within(&self, today: NaiveDate, days: i64) -> bool {
        self.next_service_date
            .map(|d| (d - today).num_days() <= days)
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateVehicle {
    #[validate(length(min = 1, max = 100, message = "Make must be 1-100 characters"))]
    pub make: String,

    #[validate(length(min = 1, max = 100, message = "Model must be 1-100 characters"))]
    pub model: String,

    #[validate(range(min = 1886, max = 2100, message = "Year is out of range"))]
    pub year: Option<i32>,

    #[validate(length(max = 20))]
    pub license_plate: Option<String>,

    #[validate(range(min = 0, message = "Mileage cannot be negative"))]
    pub mileage: Option<i32>,

    pub next_service_date: Option<NaiveDate>,
    pub insurance_expires_on: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateVehicle {
    #[validate(length(min = 1, max = 100, message = "Make must be 1-100 characters"))]
    pub make: Option<String>,

    #[validate(length(min = 1, max = 100, message = "Model must be 1-100 characters"))]
    pub model: Option<String>,

    #[validate(range(min = 1886, max = 2100, message = "Year is out of range"))]
    pub year: Option<i32>,

    #[validate(length(max = 20))]
    pub license_plate: Option<String>,

    #[validate(range(min = 0, message = "Mileage cannot be negative"))]
    pub mileage: Option<i32>,

    pub next_service_date: Option<NaiveDate>,
    pub insurance_expires_on: Option<NaiveDate>,
}

const VEHICLE_COLUMNS: &str = "id, household_id, created_by, make, model, year, license_plate, \
                               mileage, next_service_date, insurance_expires_on, created_at, updated_at";

impl Vehicle {
    pub async fn create(
        pool: &PgPool,
        household_id: Uuid,
        created_by: Uuid,
        data: CreateVehicle,
    ) -> Result<Self, sqlx::Error> {
        let vehicle = sqlx::query_as::<_, Vehicle>(&format!(
            r#"
            INSERT INTO vehicles
                (household_id, created_by, make, model, year, license_plate, mileage,
                 next_service_date, insurance_expires_on)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            VEHICLE_COLUMNS
        ))
        .bind(household_id)
        .bind(created_by)
        .bind(data.make)
        .bind(data.model)
        .bind(data.year)
        .bind(data.license_plate)
        .bind(data.mileage)
        .bind(data.next_service_date)
        .bind(data.insurance_expires_on)
        .fetch_one(pool)
        .await?;

        Ok(vehicle)
    }

    pub async fn find(pool: &PgPool, household_id: Uuid, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let vehicle = sqlx::query_as::<_, Vehicle>(&format!(
            "SELECT {} FROM vehicles WHERE id = $1 AND household_id = $2",
            VEHICLE_COLUMNS
        ))
        .bind(id)
        .bind(household_id)
        .fetch_optional(pool)
        .await?;

        Ok(vehicle)
    }

    pub async fn list_by_household(pool: &PgPool, household_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let vehicles = sqlx::query_as::<_, Vehicle>(&format!(
            r#"
            SELECT {} FROM vehicles
            WHERE household_id = $1
            ORDER BY next_service_date ASC NULLS LAST, make ASC, model ASC
            "#,
            VEHICLE_COLUMNS
        ))
        .bind(household_id)
        .fetch_all(pool)
        .await?;

        Ok(vehicles)
    }

    pub async fn update(
        pool: &PgPool,
        household_id: Uuid,
        id: Uuid,
        data: UpdateVehicle,
    ) -> Result<Option<Self>, sqlx::Error> {
        let vehicle = sqlx::query_as::<_, Vehicle>(&format!(
            r#"
            UPDATE vehicles SET
                make = COALESCE($3, make),
                model = COALESCE($4, model),
                year = COALESCE($5, year),
                license_plate = COALESCE($6, license_plate),
                mileage = COALESCE($7, mileage),
                next_service_date = COALESCE($8, next_service_date),
                insurance_expires_on = COALESCE($9, insurance_expires_on),
                updated_at = NOW()
            WHERE id = $1 AND household_id = $2
            RETURNING {}
            "#,
            VEHICLE_COLUMNS
        ))
        .bind(id)
        .bind(household_id)
        .bind(data.make)
        .bind(data.model)
        .bind(data.year)
        .bind(data.license_plate)
        .bind(data.mileage)
        .bind(data.next_service_date)
        .bind(data.insurance_expires_on)
        .fetch_optional(pool)
        .await?;

        Ok(vehicle)
    }

    pub async fn delete(pool: &PgPool, household_id: Uuid, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM vehicles WHERE id = $1 AND household_id = $2")
            .bind(id)
            .bind(household_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
