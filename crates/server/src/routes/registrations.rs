//! Course registration route handlers.
//!
//! Creation is the public site's registration form; update/delete are
//! operator follow-up actions.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use serde::Deserialize;
use tracing::instrument;

use brightclass_core::{Email, RegistrationId, RegistrationStatus};

use crate::db::RegistrationRepository;
use crate::error::{AppError, Result};
use crate::models::content::{NewRegistration, Registration, RegistrationUpdate};
use crate::state::AppState;

/// Build the registrations router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/registrations", get(list).post(create))
        .route(
            "/api/registrations/{id}",
            get(show).patch(update).delete(destroy),
        )
}

/// List filters.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<RegistrationStatus>,
}

/// GET /api/registrations
#[instrument(skip(state))]
async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Registration>>> {
    let registrations = RegistrationRepository::new(state.pool())
        .list(query.status)
        .await?;
    Ok(Json(registrations))
}

/// GET /api/registrations/{id}
#[instrument(skip(state))]
async fn show(
    State(state): State<AppState>,
    Path(id): Path<RegistrationId>,
) -> Result<Json<Registration>> {
    RegistrationRepository::new(state.pool())
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("registration".to_owned()))
}

/// POST /api/registrations
#[instrument(skip(state, new), fields(email = %new.email))]
async fn create(
    State(state): State<AppState>,
    Json(new): Json<NewRegistration>,
) -> Result<(StatusCode, Json<Registration>)> {
    if new.student_name.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "student_name is required".to_owned(),
        ));
    }
    Email::parse(new.email.trim()).map_err(|e| AppError::InvalidInput(e.to_string()))?;

    let registration = RegistrationRepository::new(state.pool())
        .create(&new)
        .await?;
    Ok((StatusCode::CREATED, Json(registration)))
}

/// PATCH /api/registrations/{id}
#[instrument(skip(state, update))]
async fn update(
    State(state): State<AppState>,
    Path(id): Path<RegistrationId>,
    Json(update): Json<RegistrationUpdate>,
) -> Result<Json<Registration>> {
    let registration = RegistrationRepository::new(state.pool())
        .update(id, &update)
        .await?;
    Ok(Json(registration))
}

/// DELETE /api/registrations/{id}
#[instrument(skip(state))]
async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<RegistrationId>,
) -> Result<StatusCode> {
    let deleted = RegistrationRepository::new(state.pool()).delete(id).await?;
    if !deleted {
        return Err(AppError::NotFound("registration".to_owned()));
    }
    Ok(StatusCode::NO_CONTENT)
}
