/// Shared household calendar
///
/// # Schema
///
/// ```sql
/// CREATE TABLE calendar_events (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     household_id UUID NOT NULL REFERENCES households(id) ON DELETE CASCADE,
///     created_by UUID NOT NULL REFERENCES users(id),
///     title VARCHAR(200) NOT NULL,
///     description TEXT,
///     location VARCHAR(200),
///     starts_at TIMESTAMPTZ NOT NULL,
///     ends_at TIMESTAMPTZ NOT NULL,
///     all_day BOOLEAN NOT NULL DEFAULT FALSE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     CONSTRAINT calendar_events_range_check CHECK (ends_at >= starts_at)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CalendarEvent {
    pub id: Uuid,
    pub household_id: Uuid,
    pub created_by: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub all_day: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CalendarEvent {
    /// Returns true if the event intersects the half-open window `[from, to)`
    pub fn overlaps(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> bool {
        self.starts_at < to && self.ends_at >= from
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCalendarEvent {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    pub description: Option<String>,

    #[validate(length(max = 200))]
    pub location: Option<String>,

    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,

    #[serde(default)]
    pub all_day: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateCalendarEvent {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,

    pub description: Option<String>,

    #[validate(length(max = 200))]
    pub location: Option<String>,

    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub all_day: Option<bool>,
}

const EVENT_COLUMNS: &str = "id, household_id, created_by, title, description, location, \
                             starts_at, ends_at, all_day, created_at, updated_at";

impl CalendarEvent {
    pub async fn create(
        pool: &PgPool,
        household_id: Uuid,
        created_by: Uuid,
        data: CreateCalendarEvent,
    ) -> Result<Self, sqlx::Error> {
        let event = sqlx::query_as::<_, CalendarEvent>(&format!(
            r#"
            INSERT INTO calendar_events
                (household_id, created_by, title, description, location, starts_at, ends_at, all_day)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            EVENT_COLUMNS
        ))
        .bind(household_id)
        .bind(created_by)
        .bind(data.title)
        .bind(data.description)
        .bind(data.location)
        .bind(data.starts_at)
        .bind(data.ends_at)
        .bind(data.all_day)
        .fetch_one(pool)
        .await?;

        Ok(event)
    }

    pub async fn find(pool: &PgPool, household_id: Uuid, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let event = sqlx::query_as::<_, CalendarEvent>(&format!(
            "SELECT {} FROM calendar_events WHERE id = $1 AND household_id = $2",
            EVENT_COLUMNS
        ))
        .bind(id)
        .bind(household_id)
        .fetch_optional(pool)
        .await?;

        Ok(event)
    }

    /// Lists events overlapping `[from, to)`; open bounds are unbounded
    pub async fn list_in_range(
        pool: &PgPool,
        household_id: Uuid,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let events = sqlx::query_as::<_, CalendarEvent>(&format!(
            r#"
            SELECT {} FROM calendar_events
            WHERE household_id = $1
              AND ($2::timestamptz IS NULL OR ends_at >= $2)
              AND ($3::timestamptz IS NULL OR starts_at < $3)
            ORDER BY starts_at ASC
            "#,
            EVENT_COLUMNS
        ))
        .bind(household_id)
        .bind(from)
        .bind(to)
        .fetch_all(pool)
        .await?;

        Ok(events)
    }

    /// Applies a partial update
    ///
    /// The range check constraint rejects updates that would leave `ends_at`
    /// before `starts_at`; callers validate merged values beforehand.
    pub async fn update(
        pool: &PgPool,
        household_id: Uuid,
        id: Uuid,
        data: UpdateCalendarEvent,
    ) -> Result<Option<Self>, sqlx::Error> {
        let event = sqlx::query_as::<_, CalendarEvent>(&format!(
            r#"
            UPDATE calendar_events SET
                title = COALESCE($3, title),
                description = COALESCE($4, description),
                location = COALESCE($5, location),
                starts_at = COALESCE($6, starts_at),
                ends_at = COALESCE($7, ends_at),
                all_day = COALESCE($8, all_day),
                updated_at = NOW()
            WHERE id = $1 AND household_id = $2
            RETURNING {}
            "#,
            EVENT_COLUMNS
        ))
        .bind(id)
        .bind(household_id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.location)
        .bind(data.starts_at)
        .bind(data.ends_at)
        .bind(data.all_day)
        .fetch_optional(pool)
        .await?;

        Ok(event)
    }

    pub async fn delete(pool: &PgPool, household_id: Uuid, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM calendar_events WHERE id = $1 AND household_id = $2")
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
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_overlaps() {
        let start = Utc.with_ymd_and_hms(2025, 5, 1, 9, 0, 0).unwrap();
        let event = CalendarEvent {
            id: Uuid::new_v4(),
            household_id: Uuid::new_v4(),
            created_by: Uuid::new_v4(),
            title: "Dentist".to_string(),
            description: None,
            location: None,
            starts_at: start,
            ends_at: start + Duration::hours(1),
            all_day: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        assert!(event.overlaps(start - Duration::hours(1), start + Duration::minutes(1)));
        assert!(event.overlaps(start + Duration::minutes(30), start + Duration::hours(5)));
        assert!(!event.overlaps(start + Duration::hours(2), start + Duration::hours(3)));
        assert!(!event.overlaps(start - Duration::hours(2), start));
    }
}
