/// Household inventory (pantry, supplies, equipment)
///
/// # Schema
///
/// ```sql
/// CREATE TABLE inventory_items (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     household_id UUID NOT NULL REFERENCES households(id) ON DELETE CASCADE,
///     created_by UUID NOT NULL REFERENCES users(id),
///     name VARCHAR(200) NOT NULL,
///     category VARCHAR(100),
///     quantity INTEGER NOT NULL DEFAULT 0 CHECK (quantity >= 0),
///     unit VARCHAR(32),
///     min_quantity INTEGER NOT NULL DEFAULT 0 CHECK (min_quantity >= 0),
///     location VARCHAR(100),
///     expires_on DATE,
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
pub struct InventoryItem {
    pub id: Uuid,
    pub household_id: Uuid,
    pub created_by: Uuid,
    pub name: String,
    pub category: Option<String>,
    pub quantity: i32,
    pub unit: Option<String>,

    /// Restock threshold; the item is low on stock at or below it
    pub min_quantity: i32,

    pub location: Option<String>,
    pub expires_on: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InventoryItem {
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.min_quantity
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateInventoryItem {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,

    #[validate(length(max = 100))]
    pub category: Option<String>,

    #[serde(default)]
    #[validate(range(min = 0, message = "Quantity cannot be negative"))]
    pub quantity: i32,

    #[validate(length(max = 32))]
    pub unit: Option<String>,

    #[serde(default)]
    #[validate(range(min = 0, message = "Threshold cannot be negative"))]
    pub min_quantity: i32,

    #[validate(length(max = 100))]
    pub location: Option<String>,

    pub expires_on: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateInventoryItem {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 100))]
    pub category: Option<String>,

    #[validate(range(min = 0, message = "Quantity cannot be negative"))]
    pub quantity: Option<i32>,

    #[validate(length(max = 32))]
    pub unit: Option<String>,

    #[validate(range(min = 0, message = "Threshold cannot be negative"))]
    pub min_quantity: Option<i32>,

    #[validate(length(max = 100))]
    pub location: Option<String>,

    pub expires_on: Option<NaiveDate>,
}

const ITEM_COLUMNS: &str = "id, household_id, created_by, name, category, quantity, unit, \
                            min_quantity, location, expires_on, created_at, updated_at";

impl InventoryItem {
    pub async fn create(
        pool: &PgPool,
        household_id: Uuid,
        created_by: Uuid,
        data: CreateInventoryItem,
    ) -> Result<Self, sqlx::Error> {
        let item = sqlx::query_as::<_, InventoryItem>(&format!(
            r#"
            INSERT INTO inventory_items
                (household_id, created_by, name, category, quantity, unit, min_quantity, location, expires_on)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            ITEM_COLUMNS
        ))
        .bind(household_id)
        .bind(created_by)
        .bind(data.name)
        .bind(data.category)
        .bind(data.quantity)
        .bind(data.unit)
        .bind(data.min_quantity)
        .bind(data.location)
        .bind(data.expires_on)
        .fetch_one(pool)
        .await?;

        Ok(item)
    }

    pub async fn find(pool: &PgPool, household_id: Uuid, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let item = sqlx::query_as::<_, InventoryItem>(&format!(
            "SELECT {} FROM inventory_items WHERE id = $1 AND household_id = $2",
            ITEM_COLUMNS
        ))
        .bind(id)
        .bind(household_id)
        .fetch_optional(pool)
        .await?;

        Ok(item)
    }

    /// Lists items by name, optionally only those at or below their threshold
    pub async fn list_by_household(
        pool: &PgPool,
        household_id: Uuid,
        low_stock_only: bool,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let items = sqlx::query_as::<_, InventoryItem>(&format!(
            r#"
            SELECT {} FROM inventory_items
            WHERE household_id = $1 AND (NOT $2 OR quantity <= min_quantity)
            ORDER BY name ASC
            "#,
            ITEM_COLUMNS
        ))
        .bind(household_id)
        .bind(low_stock_only)
        .fetch_all(pool)
        .await?;

        Ok(items)
    }

    pub async fn update(
        pool: &PgPool,
        household_id: Uuid,
        id: Uuid,
        data: UpdateInventoryItem,
    ) -> Result<Option<Self>, sqlx::Error> {
        let item = sqlx::query_as::<_, InventoryItem>(&format!(
            r#"
            UPDATE inventory_items SET
                name = COALESCE($3, name),
                category = COALESCE($4, category),
                quantity = COALESCE($5, quantity),
                unit = COALESCE($6, unit),
                min_quantity = COALESCE($7, min_quantity),
                location = COALESCE($8, location),
                expires_on = COALESCE($9, expires_on),
                updated_at = NOW()
            WHERE id = $1 AND household_id = $2
            RETURNING {}
            "#,
            ITEM_COLUMNS
        ))
        .bind(id)
        .bind(household_id)
        .bind(data.name)
        .bind(data.category)
        .bind(data.quantity)
        .bind(data.unit)
        .bind(data.min_quantity)
        .bind(data.location)
        .bind(data.expires_on)
        .fetch_optional(pool)
        .await?;

        Ok(item)
    }

    /// Adds `delta` (may be negative) to the quantity
    ///
    /// Returns None if the item does not exist or the result would go below zero.
    pub async fn adjust_quantity(
        pool: &PgPool,
        household_id: Uuid,
        id: Uuid,
        delta: i32,
    ) -> Result<Option<Self>, sqlx::Error> {
        let item = sqlx::query_as::<_, InventoryItem>(&format!(
            r#"
            UPDATE inventory_items
            SET quantity = quantity + $3, updated_at = NOW()
            WHERE id = $1 AND household_id = $2 AND quantity + $3 >= 0
            RETURNING {}
            "#,
            ITEM_COLUMNS
        ))
        .bind(id)
        .bind(household_id)
        .bind(delta)
        .fetch_optional(pool)
        .await?;

        Ok(item)
    }

    pub async fn delete(pool: &PgPool, household_id: Uuid, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM inventory_items WHERE id = $1 AND household_id = $2")
            .bind(id)
            .bind(household_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_low_stock_threshold() {
        let mut item = InventoryItem {
            id: Uuid::new_v4(),
            household_id: Uuid::new_v4(),
            created_by: Uuid::new_v4(),
            name: "Rice".to_string(),
            category: Some("Pantry".to_string()),
            quantity: 3,
            unit: Some("kg".to_string()),
            min_quantity: 2,
            location: None,
            expires_on: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(!item.is_low_stock());

        item.quantity = 2;
        assert!(item.is_low_stock());

        item.quantity = 0;
        assert!(item.is_low_stock());
    }
}
