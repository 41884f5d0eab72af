//! Class schedule route handlers.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use tracing::instrument;

use brightclass_core::ScheduleId;

use crate::db::ScheduleRepository;
use crate::error::{AppError, Result};
use crate::models::{ClassSchedule, NewSchedule, ScheduleUpdate};
use crate::state::AppState;

const WEEKDAYS: &[&str] = &[
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

/// Build the schedules router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/schedules", get(list).post(create))
        .route(
            "/api/schedules/{id}",
            get(show).patch(update).delete(destroy),
        )
}

/// GET /api/schedules
#[instrument(skip(state))]
async fn list(State(state): State<AppState>) -> Result<Json<Vec<ClassSchedule>>> {
    let schedules = ScheduleRepository::new(state.pool()).list().await?;
    Ok(Json(schedules))
}

/// GET /api/schedules/{id}
#[instrument(skip(state))]
async fn show(
    State(state): State<AppState>,
    Path(id): Path<ScheduleId>,
) -> Result<Json<ClassSchedule>> {
    ScheduleRepository::new(state.pool())
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("schedule".to_owned()))
}

/// POST /api/schedules
#[instrument(skip(state, new), fields(staff_id = %new.staff_id))]
async fn create(
    State(state): State<AppState>,
    Json(new): Json<NewSchedule>,
) -> Result<(StatusCode, Json<ClassSchedule>)> {
    validate_day_of_week(&new.day_of_week)?;
    if let Some(lead) = new.reminder_time
        && lead <= 0
    {
        return Err(AppError::InvalidInput(
            "reminder_time must be positive".to_owned(),
        ));
    }

    let schedule = ScheduleRepository::new(state.pool()).create(&new).await?;
    Ok((StatusCode::CREATED, Json(schedule)))
}

/// PATCH /api/schedules/{id}
#[instrument(skip(state, update))]
async fn update(
    State(state): State<AppState>,
    Path(id): Path<ScheduleId>,
    Json(update): Json<ScheduleUpdate>,
) -> Result<Json<ClassSchedule>> {
    if let Some(day) = update.day_of_week.as_deref() {
        validate_day_of_week(day)?;
    }
    if let Some(lead) = update.reminder_time
        && lead <= 0
    {
        return Err(AppError::InvalidInput(
            "reminder_time must be positive".to_owned(),
        ));
    }

    let schedule = ScheduleRepository::new(state.pool())
        .update(id, &update)
        .await?;
    Ok(Json(schedule))
}

/// DELETE /api/schedules/{id}
#[instrument(skip(state))]
async fn destroy(State(state): State<AppState>, Path(id): Path<ScheduleId>) -> Result<StatusCode> {
    let deleted = ScheduleRepository::new(state.pool()).delete(id).await?;
    if !deleted {
        return Err(AppError::NotFound("schedule".to_owned()));
    }
    Ok(StatusCode::NO_CONTENT)
}

fn validate_day_of_week(day: &str) -> Result<()> {
    if WEEKDAYS.contains(&day) {
        Ok(())
    } else {
        Err(AppError::InvalidInput(format!(
            "day_of_week must be a lowercase weekday name, got '{day}'"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_day_of_week() {
        assert!(validate_day_of_week("monday").is_ok());
        assert!(validate_day_of_week("sunday").is_ok());
        assert!(validate_day_of_week("Monday").is_err());
        assert!(validate_day_of_week("someday").is_err());
    }
}
