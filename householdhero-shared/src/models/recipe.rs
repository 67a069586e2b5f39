/// Household recipe book
///
/// # Schema
///
/// ```sql
/// CREATE TABLE recipes (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     household_id UUID NOT NULL REFERENCES households(id) ON DELETE CASCADE,
///     created_by UUID NOT NULL REFERENCES users(id),
///     title VARCHAR(200) NOT NULL,
///     ingredients TEXT[] NOT NULL DEFAULT '{}',
///     instructions TEXT NOT NULL DEFAULT '',
///     prep_minutes INTEGER CHECK (prep_minutes >= 0),
///     servings INTEGER CHECK (servings > 0),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Recipe {
    pub id: Uuid,
    pub household_id: Uuid,
    pub created_by: Uuid,
    pub title: String,
    pub ingredients: Vec<String>,
    pub instructions: String,
    pub prep_minutes: Option<i32>,
    pub servings: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateRecipe {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    #[serde(default)]
    pub ingredients: Vec<String>,

    #[serde(default)]
    pub instructions: String,

    #[validate(range(min = 0, message = "Preparation time cannot be negative"))]
    pub prep_minutes: Option<i32>,

    #[validate(range(min = 1, message = "Servings must be at least 1"))]
    pub servings: Option<i32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateRecipe {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,

    pub ingredients: Option<Vec<String>>,
    pub instructions: Option<String>,

    #[validate(range(min = 0, message = "Preparation time cannot be negative"))]
    pub prep_minutes: Option<i32>,

    #[validate(range(min = 1, message = "Servings must be at least 1"))]
    pub servings: Option<i32>,
}

const RECIPE_COLUMNS: &str = "id, household_id, created_by, title, ingredients, instructions, \
                              prep_minutes, servings, created_at, updated_at";

impl Recipe {
    pub async fn create(
        pool: &PgPool,
        household_id: Uuid,
        created_by: Uuid,
        data: CreateRecipe,
    ) -> Result<Self, sqlx::Error> {
        let recipe = sqlx::query_as::<_, Recipe>(&format!(
            r#"
            INSERT INTO recipes (household_id, created_by, title, ingredients, instructions, prep_minutes, servings)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            RECIPE_COLUMNS
        ))
        .bind(household_id)
        .bind(created_by)
        .bind(data.title)
        .bind(data.ingredients)
        .bind(data.instructions)
        .bind(data.prep_minutes)
        .bind(data.servings)
        .fetch_one(pool)
        .await?;

        Ok(recipe)
    }

    pub async fn find(pool: &PgPool, household_id: Uuid, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let recipe = sqlx::query_as::<_, Recipe>(&format!(
            "SELECT {} FROM recipes WHERE id = $1 AND household_id = $2",
            RECIPE_COLUMNS
        ))
        .bind(id)
        .bind(household_id)
        .fetch_optional(pool)
        .await?;

        Ok(recipe)
    }

    /// Lists recipes by title, optionally filtered by a case-insensitive
    /// title substring
    pub async fn list_by_household(
        pool: &PgPool,
        household_id: Uuid,
        search: Option<&str>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let pattern = search.map(|s| format!("%{}%", escape_like(s)));

        let recipes = sqlx::query_as::<_, Recipe>(&format!(
            r#"
            SELECT {} FROM recipes
            WHERE household_id = $1 AND ($2::text IS NULL OR title ILIKE $2)
            ORDER BY title ASC
            "#,
            RECIPE_COLUMNS
        ))
        .bind(household_id)
        .bind(pattern)
        .fetch_all(pool)
        .await?;

        Ok(recipes)
    }

    pub async fn update(
        pool: &PgPool,
        household_id: Uuid,
        id: Uuid,
        data: UpdateRecipe,
    ) -> Result<Option<Self>, sqlx::Error> {
        let recipe = sqlx::query_as::<_, Recipe>(&format!(
            r#"
            UPDATE recipes SET
                title = COALESCE($3, title),
                ingredients = COALESCE($4, ingredients),
                instructions = COALESCE($5, instructions),
                prep_minutes = COALESCE($6, prep_minutes),
                servings = COALESCE($7, servings),
                updated_at = NOW()
            WHERE id = $1 AND household_id = $2
            RETURNING {}
            "#,
            RECIPE_COLUMNS
        ))
        .bind(id)
        .bind(household_id)
        .bind(data.title)
        .bind(data.ingredients)
        .bind(data.instructions)
        .bind(data.prep_minutes)
        .bind(data.servings)
        .fetch_optional(pool)
        .await?;

        Ok(recipe)
    }

    pub async fn delete(pool: &PgPool, household_id: Uuid, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM recipes WHERE id = $1 AND household_id = $2")
            .bind(id)
            .bind(household_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Escapes `%`, `_` and `\` so user input matches literally inside ILIKE
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("soup"), "soup");
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a_b\\c"), "a\\_b\\\\c");
    }
}
