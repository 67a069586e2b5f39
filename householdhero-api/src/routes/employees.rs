/// Household staff endpoints (admin, parent)
///
/// - `GET /v1/employees?include_inactive=true`, `POST /v1/employees`
/// - `GET|PUT|DELETE /v1/employees/:id`

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
    models::employee::{CreateEmployee, Employee, UpdateEmployee},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Default, Deserialize)]
pub struct EmployeeQuery {
    #[serde(default)]
    pub include_inactive: bool,
}

#[derive(Debug, Serialize)]
pub struct ListEmployeesResponse {
    pub employees: Vec<Employee>,
}

fn not_found() -> ApiError {
    ApiError::NotFound("Employee not found".to_string())
}

pub async fn list_employees(
    State(state): State<AppState>,
    Extension(scope): Extension<HouseholdScope>,
    Query(query): Query<EmployeeQuery>,
) -> ApiResult<Json<ListEmployeesResponse>> {
    let employees = Employee::list_by_household(&state.db, scope.household_id(), query.include_inactive).await?;

    Ok(Json(ListEmployeesResponse { employees }))
}

/// Adds an employee record
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Invalid fields, or `user_id` is not a member
///   of this household
pub async fn create_employee(
    State(state): State<AppState>,
    Extension(scope): Extension<HouseholdScope>,
    Json(req): Json<CreateEmployee>,
) -> ApiResult<(StatusCode, Json<Employee>)> {
    req.validate()?;

    let employee = match Employee::create(&state.db, scope.household_id(), req).await {
        Ok(employee) => employee,
        Err(sqlx::Error::RowNotFound) => {
            return Err(ApiError::invalid_field("user_id", "User is not a member of this household"));
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(
        household_id = %scope.household_id(),
        employee_id = %employee.id,
        actor_id = %scope.user_id(),
        "Employee added"
    );

    Ok((StatusCode::CREATED, Json(employee)))
}

pub async fn get_employee(
    State(state): State<AppState>,
    Extension(scope): Extension<HouseholdScope>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Employee>> {
    let employee = Employee::find(&state.db, scope.household_id(), id)
        .await?
        .ok_or_else(not_found)?;

    Ok(Json(employee))
}

pub async fn update_employee(
    State(state): State<AppState>,
    Extension(scope): Extension<HouseholdScope>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateEmployee>,
) -> ApiResult<Json<Employee>> {
    req.validate()?;

    let employee = Employee::update(&state.db, scope.household_id(), id, req)
        .await?
        .ok_or_else(not_found)?;

    Ok(Json(employee))
}

pub async fn delete_employee(
    State(state): State<AppState>,
    Extension(scope): Extension<HouseholdScope>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    if !Employee::delete(&state.db, scope.household_id(), id).await? {
        return Err(not_found());
    }

    Ok(StatusCode::NO_CONTENT)
}
