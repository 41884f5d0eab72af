//! Reminder scan trigger endpoint.
//!
//! Intended for invocation by an external scheduler (e.g. a platform cron
//! hitting it every ~10 minutes). The job itself never self-schedules.

use axum::{Json, Router, extract::State, routing::post};
use chrono::Utc;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::services::reminders::{ReminderJob, ReminderOutcome};
use crate::state::AppState;

/// Build the reminders router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/reminders/run", post(run))
}

/// POST /api/reminders/run
///
/// Fails fast with 503 when the messaging provider is not configured.
#[instrument(skip(state))]
async fn run(State(state): State<AppState>) -> Result<Json<ReminderOutcome>> {
    let messaging = state
        .messaging()
        .ok_or(AppError::ServiceNotConfigured("messaging"))?;

    let job = ReminderJob::new(state.pool(), messaging, &state.config().reminder);
    let outcome = job.run(Utc::now()).await?;

    Ok(Json(outcome))
}
