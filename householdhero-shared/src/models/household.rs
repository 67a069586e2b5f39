/// Household model and database operations
///
/// A household is the tenant boundary. Every tenant-scoped row carries a
/// `household_id` and no row is ever shared between households.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE households (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL,
///     created_by UUID NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use householdhero_shared::models::household::{Household, CreateHousehold};
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, user_id: Uuid) -> Result<(), sqlx::Error> {
/// let created = Household::create_with_admin(&pool, CreateHousehold {
///     name: "The Smiths".to_string(),
///     created_by: user_id,
/// }).await?;
///
/// if let Some((household, admin)) = created {
///     println!("{} now administers {}", admin.id, household.name);
/// }
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::user::{Role, User};

/// Household (tenant)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Household {
    /// Unique household ID
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// User who created the household
    pub created_by: Uuid,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a household
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateHousehold {
    /// Display name
    pub name: String,

    /// Creating user, who becomes the first admin
    pub created_by: Uuid,
}

impl Household {
    /// Creates a household and makes its creator the first admin
    ///
    /// Both writes happen in one transaction. The creator's row is locked
    /// first, so two concurrent calls for the same user cannot both succeed.
    ///
    /// # Returns
    ///
    /// `Some((household, creator))` on success, `None` if the creator already
    /// belongs to a household (nothing is written in that case).
    pub async fn create_with_admin(
        pool: &PgPool,
        data: CreateHousehold,
    ) -> Result<Option<(Self, User)>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let existing: Option<(Option<Uuid>,)> =
            sqlx::query_as("SELECT household_id FROM users WHERE id = $1 FOR UPDATE")
                .bind(data.created_by)
                .fetch_optional(&mut *tx)
                .await?;

        match existing {
            None => return Err(sqlx::Error::RowNotFound),
            Some((Some(_),)) => {
                tx.rollback().await?;
                return Ok(None);
            }
            Some((None,)) => {}
        }

        let household = sqlx::query_as::<_, Household>(
            r#"
            INSERT INTO households (name, created_by)
            VALUES ($1, $2)
            RETURNING id, name, created_by, created_at, updated_at
            "#,
        )
        .bind(data.name)
        .bind(data.created_by)
        .fetch_one(&mut *tx)
        .await?;

        let Some(admin) = User::join_household(&mut tx, data.created_by, household.id, Role::Admin).await? else {
            tx.rollback().await?;
            return Ok(None);
        };

        tx.commit().await?;

        tracing::info!(
            household_id = %household.id,
            user_id = %admin.id,
            "Household created"
        );

        Ok(Some((household, admin)))
    }

    /// Finds a household by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let household = sqlx::query_as::<_, Household>(
            r#"
            SELECT id, name, created_by, created_at, updated_at
            FROM households
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(household)
    }

    /// Renames a household
    pub async fn rename(pool: &PgPool, id: Uuid, name: &str) -> Result<Option<Self>, sqlx::Error> {
        let household = sqlx::query_as::<_, Household>(
            r#"
            UPDATE households
            SET name = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, created_by, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(name)
        .fetch_optional(pool)
        .await?;

        Ok(household)
    }
}
