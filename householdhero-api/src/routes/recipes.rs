/// Household recipe endpoints (any member)
///
/// - `GET /v1/recipes?search=` - List recipes, optionally by title substring
/// - `POST /v1/recipes`, `GET|PUT|DELETE /v1/recipes/:id`

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
    models::recipe::{CreateRecipe, Recipe, UpdateRecipe},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Default, Deserialize)]
pub struct RecipeQuery {
    pub search: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ListRecipesResponse {
    pub recipes: Vec<Recipe>,
}

fn not_found() -> ApiError {
    ApiError::NotFound("Recipe not found".to_string())
}

pub async fn list_recipes(
    State(state): State<AppState>,
    Extension(scope): Extension<HouseholdScope>,
    Query(query): Query<RecipeQuery>,
) -> ApiResult<Json<ListRecipesResponse>> {
    let search = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty());
    let recipes = Recipe::list_by_household(&state.db, scope.household_id(), search).await?;

    Ok(Json(ListRecipesResponse { recipes }))
}

pub async fn create_recipe(
    State(state): State<AppState>,
    Extension(scope): Extension<HouseholdScope>,
    Json(req): Json<CreateRecipe>,
) -> ApiResult<(StatusCode, Json<Recipe>)> {
    req.validate()?;

    let recipe = Recipe::create(&state.db, scope.household_id(), scope.user_id(), req).await?;

    Ok((StatusCode::CREATED, Json(recipe)))
}

pub async fn get_recipe(
    State(state): State<AppState>,
    Extension(scope): Extension<HouseholdScope>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Recipe>> {
    let recipe = Recipe::find(&state.db, scope.household_id(), id)
        .await?
        .ok_or_else(not_found)?;

    Ok(Json(recipe))
}

pub async fn update_recipe(
    State(state): State<AppState>,
    Extension(scope): Extension<HouseholdScope>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateRecipe>,
) -> ApiResult<Json<Recipe>> {
    req.validate()?;

    let recipe = Recipe::update(&state.db, scope.household_id(), id, req)
        .await?
        .ok_or_else(not_found)?;

    Ok(Json(recipe))
}

pub async fn delete_recipe(
    State(state): State<AppState>,
    Extension(scope): Extension<HouseholdScope>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    if !Recipe::delete(&state.db, scope.household_id(), id).await? {
        return Err(not_found());
    }

    Ok(StatusCode::NO_CONTENT)
}
