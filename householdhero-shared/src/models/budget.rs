/// Household budgets
///
/// A budget caps spending over a date period. Expense transactions that
/// reference a budget count against it.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE budgets (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     household_id UUID NOT NULL REFERENCES households(id) ON DELETE CASCADE,
///     created_by UUID NOT NULL REFERENCES users(id),
///     name VARCHAR(200) NOT NULL,
///     category VARCHAR(100),
///     amount_cents BIGINT NOT NULL CHECK (amount_cents >= 0),
///     period_start DATE NOT NULL,
///     period_end DATE NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     CONSTRAINT budgets_period_check CHECK (period_end >= period_start)
/// );
/// ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Budget {
    pub id: Uuid,
    pub household_id: Uuid,
    pub created_by: Uuid,
    pub name: String,
    pub category: Option<String>,
    pub amount_cents: i64,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Budget {
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.period_start <= date && date <= self.period_end
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateBudget {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,

    #[validate(length(max = 100))]
    pub category: Option<String>,

    #[validate(range(min = 0, message = "Amount cannot be negative"))]
    pub amount_cents: i64,

    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateBudget {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 100))]
    pub category: Option<String>,

    #[validate(range(min = 0, message = "Amount cannot be negative"))]
    pub amount_cents: Option<i64>,

    pub period_start: Option<NaiveDate>,
    pub period_end: Option<NaiveDate>,
}

/// Spending against a budget
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BudgetSummary {
    pub budget_id: Uuid,
    pub amount_cents: i64,
    pub spent_cents: i64,
    pub remaining_cents: i64,
    pub over_budget: bool,
}

impl BudgetSummary {
    pub fn new(budget_id: Uuid, amount_cents: i64, spent_cents: i64) -> Self {
        let remaining_cents = amount_cents - spent_cents;
        Self {
            budget_id,
            amount_cents,
            spent_cents,
            remaining_cents,
            over_budget: remaining_cents < 0,
        }
    }
}

const BUDGET_COLUMNS: &str = "id, household_id, created_by, name, category, amount_cents, \
                              period_start, period_end, created_at, updated_at";

impl Budget {
    pub async fn create(
        pool: &PgPool,
        household_id: Uuid,
        created_by: Uuid,
        data: CreateBudget,
    ) -> Result<Self, sqlx::Error> {
        let budget = sqlx::query_as::<_, Budget>(&format!(
            r#"
            INSERT INTO budgets (household_id, created_by, name, category, amount_cents, period_start, period_end)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            BUDGET_COLUMNS
        ))
        .bind(household_id)
        .bind(created_by)
        .bind(data.name)
        .bind(data.category)
        .bind(data.amount_cents)
        .bind(data.period_start)
        .bind(data.period_end)
        .fetch_one(pool)
        .await?;

        Ok(budget)
    }

    pub async fn find(pool: &PgPool, household_id: Uuid, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let budget = sqlx::query_as::<_, Budget>(&format!(
            "SELECT {} FROM budgets WHERE id = $1 AND household_id = $2",
            BUDGET_COLUMNS
        ))
        .bind(id)
        .bind(household_id)
        .fetch_optional(pool)
        .await?;

        Ok(budget)
    }

    pub async fn list_by_household(pool: &PgPool, household_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let budgets = sqlx::query_as::<_, Budget>(&format!(
            "SELECT {} FROM budgets WHERE household_id = $1 ORDER BY period_start DESC, name ASC",
            BUDGET_COLUMNS
        ))
        .bind(household_id)
        .fetch_all(pool)
        .await?;

        Ok(budgets)
    }

    pub async fn update(
        pool: &PgPool,
        household_id: Uuid,
        id: Uuid,
        data: UpdateBudget,
    ) -> Result<Option<Self>, sqlx::Error> {
        let budget = sqlx::query_as::<_, Budget>(&format!(
            r#"
            UPDATE budgets SET
                name = COALESCE($3, name),
                category = COALESCE($4, category),
                amount_cents = COALESCE($5, amount_cents),
                period_start = COALESCE($6, period_start),
                period_end = COALESCE($7, period_end),
                updated_at = NOW()
            WHERE id = $1 AND household_id = $2
            RETURNING {}
            "#,
            BUDGET_COLUMNS
        ))
        .bind(id)
        .bind(household_id)
        .bind(data.name)
        .bind(data.category)
        .bind(data.amount_cents)
        .bind(data.period_start)
        .bind(data.period_end)
        .fetch_optional(pool)
        .await?;

        Ok(budget)
    }

    /// Deletes a budget; transactions that referenced it are kept and unlinked
    pub async fn delete(pool: &PgPool, household_id: Uuid, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM budgets WHERE id = $1 AND household_id = $2")
            .bind(id)
            .bind(household_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Totals expense transactions linked to this budget within its period
    pub async fn summary(&self, pool: &PgPool) -> Result<BudgetSummary, sqlx::Error> {
        let spent: (i64,) = sqlx::query_as(
            r#"
            SELECT COALESCE(SUM(amount_cents), 0)::BIGINT
            FROM transactions
            WHERE household_id = $1
              AND budget_id = $2
              AND kind = 'expense'
              AND occurred_on BETWEEN $3 AND $4
            "#,
        )
        .bind(self.household_id)
        .bind(self.id)
        .bind(self.period_start)
        .bind(self.period_end)
        .fetch_one(pool)
        .await?;

        Ok(BudgetSummary::new(self.id, self.amount_cents, spent.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_remaining() {
        let id = Uuid::new_v4();

        let summary = BudgetSummary::new(id, 50_000, 12_345);
        assert_eq!(summary.remaining_cents, 37_655);
        assert!(!summary.over_budget);

        let summary = BudgetSummary::new(id, 50_000, 50_000);
        assert_eq!(summary.remaining_cents, 0);
        assert!(!summary.over_budget);

        let summary = BudgetSummary::new(id, 50_000, 60_000);
        assert_eq!(summary.remaining_cents, -10_000);
        assert!(summary.over_budget);
    }

    #[test]
    fn test_covers_is_inclusive() {
        let budget = Budget {
            id: Uuid::new_v4(),
            household_id: Uuid::new_v4(),
            created_by: Uuid::new_v4(),
            name: "Groceries".to_string(),
            category: None,
            amount_cents: 40_000,
            period_start: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            period_end: NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        assert!(budget.covers(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()));
        assert!(budget.covers(NaiveDate::from_ymd_opt(2025, 3, 31).unwrap()));
        assert!(!budget.covers(NaiveDate::from_ymd_opt(2025, 4, 1).unwrap()));
        assert!(!budget.covers(NaiveDate::from_ymd_opt(2025, 2, 28).unwrap()));
    }
}
