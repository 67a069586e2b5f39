/// Household inventory endpoints (any member)
///
/// # Endpoints
///
/// - `GET /v1/inventory?low_stock=true` - List items
/// - `POST /v1/inventory` - Add an item
/// - `GET /v1/inventory/:id` - Get an item
/// - `PUT /v1/inventory/:id` - Update an item
/// - `DELETE /v1/inventory/:id` - Remove an item
/// - `POST /v1/inventory/:id/adjust` - Add to or take from the quantity

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use householdhero_shared::{
    auth::access::HouseholdScope,
    models::inventory::{CreateInventoryItem, InventoryItem, UpdateInventoryItem},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Default, Deserialize)]
pub struct InventoryQuery {
    #[serde(default)]
    pub low_stock: bool,
}

#[derive(Debug, Serialize)]
pub struct ListItemsResponse {
    pub items: Vec<InventoryItem>,
}

#[derive(Debug, Deserialize)]
pub struct AdjustRequest {
    /// Amount to add; negative to consume
    pub delta: i32,
}

fn not_found() -> ApiError {
    ApiError::NotFound("Inventory item not found".to_string())
}

pub async fn list_items(
    State(state): State<AppState>,
    Extension(scope): Extension<HouseholdScope>,
    Query(query): Query<InventoryQuery>,
) -> ApiResult<Json<ListItemsResponse>> {
    let items = InventoryItem::list_by_household(&state.db, scope.household_id(), query.low_stock).await?;

    Ok(Json(ListItemsResponse { items }))
}

pub async fn create_item(
    State(state): State<AppState>,
    Extension(scope): Extension<HouseholdScope>,
    Json(req): Json<CreateInventoryItem>,
) -> ApiResult<(StatusCode, Json<InventoryItem>)> {
    req.validate()?;

    let item = InventoryItem::create(&state.db, scope.household_id(), scope.user_id(), req).await?;

    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn get_item(
    State(state): State<AppState>,
    Extension(scope): Extension<HouseholdScope>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<InventoryItem>> {
    let item = InventoryItem::find(&state.db, scope.household_id(), id)
        .await?
        .ok_or_else(not_found)?;

    Ok(Json(item))
}

pub async fn update_item(
    State(state): State<AppState>,
    Extension(scope): Extension<HouseholdScope>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateInventoryItem>,
) -> ApiResult<Json<InventoryItem>> {
    req.validate()?;

    let item = InventoryItem::update(&state.db, scope.household_id(), id, req)
        .await?
        .ok_or_else(not_found)?;

    Ok(Json(item))
}

/// Adjusts the stock level
///
/// # Errors
///
/// - `404 Not Found`: No such item
/// - `409 Conflict`: Not enough stock to take `-delta`
pub async fn adjust_item(
    State(state): State<AppState>,
    Extension(scope): Extension<HouseholdScope>,
    Path(id): Path<Uuid>,
    Json(req): Json<AdjustRequest>,
) -> ApiResult<Json<InventoryItem>> {
    if let Some(item) = InventoryItem::adjust_quantity(&state.db, scope.household_id(), id, req.delta).await? {
        if item.is_low_stock() {
            tracing::info!(
                household_id = %scope.household_id(),
                item_id = %item.id,
                quantity = item.quantity,
                "Inventory item is low on stock"
            );
        }
        return Ok(Json(item));
    }

    // Tell a missing item apart from insufficient stock
    match InventoryItem::find(&state.db, scope.household_id(), id).await? {
        None => Err(not_found()),
        Some(item) => Err(ApiError::Conflict(format!(
            "Only {} in stock, cannot take {}",
            item.quantity,
            req.delta.unsigned_abs()
        ))),
    }
}

pub async fn delete_item(
    State(state): State<AppState>,
    Extension(scope): Extension<HouseholdScope>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    if !InventoryItem::delete(&state.db, scope.household_id(), id).await? {
        return Err(not_found());
    }

    Ok(StatusCode::NO_CONTENT)
}
