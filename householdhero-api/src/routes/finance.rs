/// Household finance endpoints (admin, parent)
///
/// # Endpoints
///
/// Budgets:
/// - `GET /v1/finance/budgets`, `POST /v1/finance/budgets`
/// - `GET|PUT|DELETE /v1/finance/budgets/:id`
/// - `GET /v1/finance/budgets/:id/summary` - Spent and remaining amounts
///
/// Transactions (immutable once recorded):
/// - `GET /v1/finance/transactions?kind=&budget_id=&from=&to=`
/// - `POST /v1/finance/transactions`
/// - `GET|DELETE /v1/finance/transactions/:id`
///
/// Amounts are integer cents.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::NaiveDate;
use householdhero_shared::{
    auth::access::HouseholdScope,
    models::{
        budget::{Budget, BudgetSummary, CreateBudget, UpdateBudget},
        transaction::{net_cents, CreateTransaction, Transaction, TransactionFilter},
    },
};
use serde::Serialize;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize)]
pub struct ListBudgetsResponse {
    pub budgets: Vec<Budget>,
}

#[derive(Debug, Serialize)]
pub struct ListTransactionsResponse {
    pub transactions: Vec<Transaction>,

    /// Income minus expenses over the listed transactions
    pub net_cents: i64,
}

fn budget_not_found() -> ApiError {
    ApiError::NotFound("Budget not found".to_string())
}

fn transaction_not_found() -> ApiError {
    ApiError::NotFound("Transaction not found".to_string())
}

fn check_period(period_start: NaiveDate, period_end: NaiveDate) -> ApiResult<()> {
    if period_end < period_start {
        return Err(ApiError::invalid_field(
            "period_end",
            "Budget period cannot end before it starts",
        ));
    }
    Ok(())
}

pub async fn list_budgets(
    State(state): State<AppState>,
    Extension(scope): Extension<HouseholdScope>,
) -> ApiResult<Json<ListBudgetsResponse>> {
    let budgets = Budget::list_by_household(&state.db, scope.household_id()).await?;

    Ok(Json(ListBudgetsResponse { budgets }))
}

pub async fn create_budget(
    State(state): State<AppState>,
    Extension(scope): Extension<HouseholdScope>,
    Json(req): Json<CreateBudget>,
) -> ApiResult<(StatusCode, Json<Budget>)> {
    req.validate()?;
    check_period(req.period_start, req.period_end)?;

    let budget = Budget::create(&state.db, scope.household_id(), scope.user_id(), req).await?;

    tracing::info!(
        household_id = %scope.household_id(),
        budget_id = %budget.id,
        amount_cents = budget.amount_cents,
        "Budget created"
    );

    Ok((StatusCode::CREATED, Json(budget)))
}

pub async fn get_budget(
    State(state): State<AppState>,
    Extension(scope): Extension<HouseholdScope>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Budget>> {
    let budget = Budget::find(&state.db, scope.household_id(), id)
        .await?
        .ok_or_else(budget_not_found)?;

    Ok(Json(budget))
}

pub async fn update_budget(
    State(state): State<AppState>,
    Extension(scope): Extension<HouseholdScope>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateBudget>,
) -> ApiResult<Json<Budget>> {
    req.validate()?;

    if req.period_start.is_some() || req.period_end.is_some() {
        let current = Budget::find(&state.db, scope.household_id(), id)
            .await?
            .ok_or_else(budget_not_found)?;

        check_period(
            req.period_start.unwrap_or(current.period_start),
            req.period_end.unwrap_or(current.period_end),
        )?;
    }

    let budget = Budget::update(&state.db, scope.household_id(), id, req)
        .await?
        .ok_or_else(budget_not_found)?;

    Ok(Json(budget))
}

/// Deletes a budget; its transactions are kept and unlinked
pub async fn delete_budget(
    State(state): State<AppState>,
    Extension(scope): Extension<HouseholdScope>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    if !Budget::delete(&state.db, scope.household_id(), id).await? {
        return Err(budget_not_found());
    }

    Ok(StatusCode::NO_CONTENT)
}

pub async fn budget_summary(
    State(state): State<AppState>,
    Extension(scope): Extension<HouseholdScope>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<BudgetSummary>> {
    let budget = Budget::find(&state.db, scope.household_id(), id)
        .await?
        .ok_or_else(budget_not_found)?;

    Ok(Json(budget.summary(&state.db).await?))
}

pub async fn list_transactions(
    State(state): State<AppState>,
    Extension(scope): Extension<HouseholdScope>,
    Query(filter): Query<TransactionFilter>,
) -> ApiResult<Json<ListTransactionsResponse>> {
    if let (Some(from), Some(to)) = (filter.from, filter.to) {
        if to < from {
            return Err(ApiError::invalid_field("to", "Range end cannot precede its start"));
        }
    }

    let transactions = Transaction::list_by_household(&state.db, scope.household_id(), filter).await?;
    let net_cents = net_cents(&transactions)
        .ok_or_else(|| ApiError::InternalError("Transaction total out of range".to_string()))?;

    Ok(Json(ListTransactionsResponse {
        transactions,
        net_cents,
    }))
}

/// Records a transaction
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Invalid fields, or `budget_id` is not a
///   budget of this household
pub async fn create_transaction(
    State(state): State<AppState>,
    Extension(scope): Extension<HouseholdScope>,
    Json(req): Json<CreateTransaction>,
) -> ApiResult<(StatusCode, Json<Transaction>)> {
    req.validate()?;

    let transaction = match Transaction::create(&state.db, scope.household_id(), scope.user_id(), req).await {
        Ok(transaction) => transaction,
        Err(sqlx::Error::RowNotFound) => {
            return Err(ApiError::invalid_field("budget_id", "Budget not found in this household"));
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(
        household_id = %scope.household_id(),
        transaction_id = %transaction.id,
        kind = ?transaction.kind,
        amount_cents = transaction.amount_cents,
        "Transaction recorded"
    );

    Ok((StatusCode::CREATED, Json(transaction)))
}

pub async fn get_transaction(
    State(state): State<AppState>,
    Extension(scope): Extension<HouseholdScope>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Transaction>> {
    let transaction = Transaction::find(&state.db, scope.household_id(), id)
        .await?
        .ok_or_else(transaction_not_found)?;

    Ok(Json(transaction))
}

pub async fn delete_transaction(
    State(state): State<AppState>,
    Extension(scope): Extension<HouseholdScope>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    if !Transaction::delete(&state.db, scope.household_id(), id).await? {
        return Err(transaction_not_found());
    }

    Ok(StatusCode::NO_CONTENT)
}
