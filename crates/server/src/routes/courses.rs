//! Course route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use serde::Deserialize;
use tracing::instrument;

use brightclass_core::{CourseId, CourseStatus};

use crate::db::CourseRepository;
use crate::error::{AppError, Result};
use crate::models::content::{Course, CourseUpdate, NewCourse};
use crate::state::AppState;

/// Build the courses router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/courses", get(list).post(create))
        .route("/api/courses/{id}", get(show).patch(update).delete(destroy))
}

/// List filters.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<CourseStatus>,
}

/// GET /api/courses
#[instrument(skip(state))]
async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Course>>> {
    let courses = CourseRepository::new(state.pool())
        .list(query.status)
        .await?;
    Ok(Json(courses))
}

/// GET /api/courses/{id}
#[instrument(skip(state))]
async fn show(State(state): State<AppState>, Path(id): Path<CourseId>) -> Result<Json<Course>> {
    CourseRepository::new(state.pool())
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("course".to_owned()))
}

/// POST /api/courses
#[instrument(skip(state, new), fields(slug = %new.slug))]
async fn create(
    State(state): State<AppState>,
    Json(new): Json<NewCourse>,
) -> Result<(StatusCode, Json<Course>)> {
    if new.title.trim().is_empty() || new.slug.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "title and slug are required".to_owned(),
        ));
    }

    let course = CourseRepository::new(state.pool()).create(&new).await?;
    Ok((StatusCode::CREATED, Json(course)))
}

/// PATCH /api/courses/{id}
#[instrument(skip(state, update))]
async fn update(
    State(state): State<AppState>,
    Path(id): Path<CourseId>,
    Json(update): Json<CourseUpdate>,
) -> Result<Json<Course>> {
    let course = CourseRepository::new(state.pool())
        .update(id, &update)
        .await?;
    Ok(Json(course))
}

/// DELETE /api/courses/{id}
#[instrument(skip(state))]
async fn destroy(State(state): State<AppState>, Path(id): Path<CourseId>) -> Result<StatusCode> {
    let deleted = CourseRepository::new(state.pool()).delete(id).await?;
    if !deleted {
        return Err(AppError::NotFound("course".to_owned()));
    }
    Ok(StatusCode::NO_CONTENT)
}
