/// Household calendar endpoints (any member)
///
/// # Endpoints
///
/// - `GET /v1/calendar/events?from=&to=` - Events overlapping `[from, to)`
/// - `POST /v1/calendar/events` - Create an event
/// - `GET /v1/calendar/events/:id` - Get an event
/// - `PUT /v1/calendar/events/:id` - Update an event
/// - `DELETE /v1/calendar/events/:id` - Delete an event

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use householdhero_shared::{
    auth::access::HouseholdScope,
    models::calendar_event::{CalendarEvent, CreateCalendarEvent, UpdateCalendarEvent},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Default, Deserialize)]
pub struct EventRangeQuery {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct ListEventsResponse {
    pub events: Vec<CalendarEvent>,
}

fn not_found() -> ApiError {
    ApiError::NotFound("Event not found".to_string())
}

/// Rejects an event that would end before it starts
fn check_range(starts_at: DateTime<Utc>, ends_at: DateTime<Utc>) -> ApiResult<()> {
    if ends_at < starts_at {
        return Err(ApiError::invalid_field("ends_at", "Event cannot end before it starts"));
    }
    Ok(())
}

pub async fn list_events(
    State(state): State<AppState>,
    Extension(scope): Extension<HouseholdScope>,
    Query(query): Query<EventRangeQuery>,
) -> ApiResult<Json<ListEventsResponse>> {
    if let (Some(from), Some(to)) = (query.from, query.to) {
        if to < from {
            return Err(ApiError::invalid_field("to", "Range end cannot precede its start"));
        }
    }

    let events = CalendarEvent::list_in_range(&state.db, scope.household_id(), query.from, query.to).await?;

    Ok(Json(ListEventsResponse { events }))
}

pub async fn create_event(
    State(state): State<AppState>,
    Extension(scope): Extension<HouseholdScope>,
    Json(req): Json<CreateCalendarEvent>,
) -> ApiResult<(StatusCode, Json<CalendarEvent>)> {
    req.validate()?;
    check_range(req.starts_at, req.ends_at)?;

    let event = CalendarEvent::create(&state.db, scope.household_id(), scope.user_id(), req).await?;

    Ok((StatusCode::CREATED, Json(event)))
}

pub async fn get_event(
    State(state): State<AppState>,
    Extension(scope): Extension<HouseholdScope>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<CalendarEvent>> {
    let event = CalendarEvent::find(&state.db, scope.household_id(), id)
        .await?
        .ok_or_else(not_found)?;

    Ok(Json(event))
}

/// Updates an event
///
/// A partial change of either bound is checked against the stored other bound.
pub async fn update_event(
    State(state): State<AppState>,
    Extension(scope): Extension<HouseholdScope>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateCalendarEvent>,
) -> ApiResult<Json<CalendarEvent>> {
    req.validate()?;

    if req.starts_at.is_some() || req.ends_at.is_some() {
        let current = CalendarEvent::find(&state.db, scope.household_id(), id)
            .await?
            .ok_or_else(not_found)?;

        check_range(
            req.starts_at.unwrap_or(current.starts_at),
            req.ends_at.unwrap_or(current.ends_at),
        )?;
    }

    let event = CalendarEvent::update(&state.db, scope.household_id(), id, req)
        .await?
        .ok_or_else(not_found)?;

    Ok(Json(event))
}

pub async fn delete_event(
    State(state): State<AppState>,
    Extension(scope): Extension<HouseholdScope>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    if !CalendarEvent::delete(&state.db, scope.household_id(), id).await? {
        return Err(not_found());
    }

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_check_range() {
        let start = Utc::now();
        assert!(check_range(start, start).is_ok());
        assert!(check_range(start, start + Duration::hours(1)).is_ok());
        assert!(matches!(
            check_range(start, start - Duration::minutes(1)),
            Err(ApiError::ValidationError(_))
        ));
    }
}
