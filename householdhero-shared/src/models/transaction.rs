/// Household ledger entries
///
/// # Schema
///
/// ```sql
/// CREATE TYPE transaction_kind AS ENUM ('income', 'expense');
///
/// CREATE TABLE transactions (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     household_id UUID NOT NULL REFERENCES households(id) ON DELETE CASCADE,
///     created_by UUID NOT NULL REFERENCES users(id),
///     budget_id UUID REFERENCES budgets(id) ON DELETE SET NULL,
///     kind transaction_kind NOT NULL,
///     amount_cents BIGINT NOT NULL CHECK (amount_cents > 0 AND amount_cents <= 100000000000),
///     category VARCHAR(100),
///     description TEXT,
///     occurred_on DATE NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "transaction_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    /// Sign applied when netting amounts
    pub fn sign(&self) -> i64 {
        match self {
            TransactionKind::Income => 1,
            TransactionKind::Expense => -1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Transaction {
    pub id: Uuid,
    pub household_id: Uuid,
    pub created_by: Uuid,
    pub budget_id: Option<Uuid>,
    pub kind: TransactionKind,

    /// Always positive; direction comes from `kind`
    pub amount_cents: i64,

    pub category: Option<String>,
    pub description: Option<String>,
    pub occurred_on: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Largest single transaction accepted, in cents
pub const MAX_AMOUNT_CENTS: i64 = 100_000_000_000;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateTransaction {
    pub budget_id: Option<Uuid>,
    pub kind: TransactionKind,

    #[validate(range(min = 1, max = MAX_AMOUNT_CENTS, message = "Amount must be between 1 and 100000000000 cents"))]
    pub amount_cents: i64,

    #[validate(length(max = 100))]
    pub category: Option<String>,

    pub description: Option<String>,
    pub occurred_on: NaiveDate,
}

/// Filters for [`Transaction::list_by_household`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionFilter {
    pub kind: Option<TransactionKind>,
    pub budget_id: Option<Uuid>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// Net of income minus expenses, in cents
///
/// Returns None if the total does not fit in an `i64`.
pub fn net_cents(transactions: &[Transaction]) -> Option<i64> {
    transactions.iter().try_fold(0i64, |net, t| {
        t.amount_cents
            .checked_mul(t.kind.sign())
            .and_then(|signed| net.checked_add(signed))
    })
}

const TRANSACTION_COLUMNS: &str = "id, household_id, created_by, budget_id, kind, amount_cents, \
                                   category, description, occurred_on, created_at";

impl Transaction {
    /// Records a transaction
    ///
    /// A `budget_id` that does not belong to the household yields
    /// `RowNotFound`, so a member cannot attach entries to another
    /// household's budget.
    pub async fn create(
        pool: &PgPool,
        household_id: Uuid,
        created_by: Uuid,
        data: CreateTransaction,
    ) -> Result<Self, sqlx::Error> {
        let transaction = sqlx::query_as::<_, Transaction>(&format!(
            r#"
            INSERT INTO transactions
                (household_id, created_by, budget_id, kind, amount_cents, category, description, occurred_on)
            SELECT $1, $2, $3, $4, $5, $6, $7, $8
            WHERE $3::uuid IS NULL
               OR EXISTS (SELECT 1 FROM budgets WHERE id = $3 AND household_id = $1)
            RETURNING {}
            "#,
            TRANSACTION_COLUMNS
        ))
        .bind(household_id)
        .bind(created_by)
        .bind(data.budget_id)
        .bind(data.kind)
        .bind(data.amount_cents)
        .bind(data.category)
        .bind(data.description)
        .bind(data.occurred_on)
        .fetch_one(pool)
        .await?;

        Ok(transaction)
    }

    pub async fn find(pool: &PgPool, household_id: Uuid, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let transaction = sqlx::query_as::<_, Transaction>(&format!(
            "SELECT {} FROM transactions WHERE id = $1 AND household_id = $2",
            TRANSACTION_COLUMNS
        ))
        .bind(id)
        .bind(household_id)
        .fetch_optional(pool)
        .await?;

        Ok(transaction)
    }

    /// Lists transactions newest first
    pub async fn list_by_household(
        pool: &PgPool,
        household_id: Uuid,
        filter: TransactionFilter,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let transactions = sqlx::query_as::<_, Transaction>(&format!(
            r#"
            SELECT {} FROM transactions
            WHERE household_id = $1
              AND ($2::transaction_kind IS NULL OR kind = $2)
              AND ($3::uuid IS NULL OR budget_id = $3)
              AND ($4::date IS NULL OR occurred_on >= $4)
              AND ($5::date IS NULL OR occurred_on <= $5)
            ORDER BY occurred_on DESC, created_at DESC
            "#,
            TRANSACTION_COLUMNS
        ))
        .bind(household_id)
        .bind(filter.kind)
        .bind(filter.budget_id)
        .bind(filter.from)
        .bind(filter.to)
        .fetch_all(pool)
        .await?;

        Ok(transactions)
    }

    pub async fn delete(pool: &PgPool, household_id: Uuid, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM transactions WHERE id = $1 AND household_id = $2")
            .bind(id)
            .bind(household_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
