/// Household pets
///
/// ```sql
/// CREATE TABLE pets (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     household_id UUID NOT NULL REFERENCES households(id) ON DELETE CASCADE,
///     created_by UUID NOT NULL REFERENCES users(id),
///     name VARCHAR(100) NOT NULL,
///     species VARCHAR(50) NOT NULL,
///     breed VARCHAR(100),
///     birth_date DATE,
///     vet_name VARCHAR(200),
///     next_vet_visit DATE,
///     notes TEXT,
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
pub struct Pet {
    pub id: Uuid,
    pub household_id: Uuid,
    pub created_by: Uuid,
    pub name: String,
    pub species: String,
    pub breed: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub vet_name: Option<String>,
    pub next_vet_visit: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreatePet {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(length(min = 1, max = 50, message = "Species must be 1-50 characters"))]
    pub species: String,

    pub breed: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub vet_name: Option<String>,
    pub next_vet_visit: Option<NaiveDate>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdatePet {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,

    #[validate(length(min = 1, max = 50, message = "Species must be 1-50 characters"))]
    pub species: Option<String>,

    pub breed: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub vet_name: Option<String>,
    pub next_vet_visit: Option<NaiveDate>,
    pub notes: Option<String>,
}

const PET_COLUMNS: &str = "id, household_id, created_by, name, species, breed, birth_date, \
                           vet_name, next_vet_visit, notes, created_at, updated_at";

impl Pet {
    pub async fn create(
        pool: &PgPool,
        household_id: Uuid,
        created_by: Uuid,
        data: CreatePet,
    ) -> Result<Self, sqlx::Error> {
        let pet = sqlx::query_as::<_, Pet>(&format!(
            r#"
            INSERT INTO pets
                (household_id, created_by, name, species, breed, birth_date, vet_name, next_vet_visit, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            PET_COLUMNS
        ))
        .bind(household_id)
        .bind(created_by)
        .bind(data.name)
        .bind(data.species)
        .bind(data.breed)
        .bind(data.birth_date)
        .bind(data.vet_name)
        .bind(data.next_vet_visit)
        .bind(data.notes)
        .fetch_one(pool)
        .await?;

        Ok(pet)
    }

    pub async fn find(pool: &PgPool, household_id: Uuid, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let pet = sqlx::query_as::<_, Pet>(&format!(
            "SELECT {} FROM pets WHERE id = $1 AND household_id = $2",
            PET_COLUMNS
        ))
        .bind(id)
        .bind(household_id)
        .fetch_optional(pool)
        .await?;

        Ok(pet)
    }

    pub async fn list_by_household(pool: &PgPool, household_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let pets = sqlx::query_as::<_, Pet>(&format!(
            "SELECT {} FROM pets WHERE household_id = $1 ORDER BY name ASC",
            PET_COLUMNS
        ))
        .bind(household_id)
        .fetch_all(pool)
        .await?;

        Ok(pets)
    }

    pub async fn update(
        pool: &PgPool,
        household_id: Uuid,
        id: Uuid,
        data: UpdatePet,
    ) -> Result<Option<Self>, sqlx::Error> {
        let pet = sqlx::query_as::<_, Pet>(&format!(
            r#"
            UPDATE pets SET
                name = COALESCE($3, name),
                species = COALESCE($4, species),
                breed = COALESCE($5, breed),
                birth_date = COALESCE($6, birth_date),
                vet_name = COALESCE($7, vet_name),
                next_vet_visit = COALESCE($8, next_vet_visit),
                notes = COALESCE($9, notes),
                updated_at = NOW()
            WHERE id = $1 AND household_id = $2
            RETURNING {}
            "#,
            PET_COLUMNS
        ))
        .bind(id)
        .bind(household_id)
        .bind(data.name)
        .bind(data.species)
        .bind(data.breed)
        .bind(data.birth_date)
        .bind(data.vet_name)
        .bind(data.next_vet_visit)
        .bind(data.notes)
        .fetch_optional(pool)
        .await?;

        Ok(pet)
    }

    pub async fn delete(pool: &PgPool, household_id: Uuid, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM pets WHERE id = $1 AND household_id = $2")
            .bind(id)
            .bind(household_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
