//! Testimonial route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use serde::Deserialize;
use tracing::instrument;

use brightclass_core::{TestimonialId, TestimonialStatus};

use crate::db::TestimonialRepository;
use crate::error::{AppError, Result};
use crate::models::content::{NewTestimonial, Testimonial, TestimonialUpdate};
use crate::state::AppState;

/// Build the testimonials router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/testimonials", get(list).post(create))
        .route(
            "/api/testimonials/{id}",
            get(show).patch(update).delete(destroy),
        )
}

/// List filters.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<TestimonialStatus>,
}

/// GET /api/testimonials
#[instrument(skip(state))]
async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Testimonial>>> {
    let testimonials = TestimonialRepository::new(state.pool())
        .list(query.status)
        .await?;
    Ok(Json(testimonials))
}

/// GET /api/testimonials/{id}
#[instrument(skip(state))]
async fn show(
    State(state): State<AppState>,
    Path(id): Path<TestimonialId>,
) -> Result<Json<Testimonial>> {
    TestimonialRepository::new(state.pool())
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("testimonial".to_owned()))
}

/// POST /api/testimonials
#[instrument(skip(state, new))]
async fn create(
    State(state): State<AppState>,
    Json(new): Json<NewTestimonial>,
) -> Result<(StatusCode, Json<Testimonial>)> {
    if new.author_name.trim().is_empty() || new.quote.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "author_name and quote are required".to_owned(),
        ));
    }

    if let Some(rating) = new.rating
        && !(1..=5).contains(&rating)
    {
        return Err(AppError::InvalidInput(
            "rating must be between 1 and 5".to_owned(),
        ));
    }

    let testimonial = TestimonialRepository::new(state.pool()).create(&new).await?;
    Ok((StatusCode::CREATED, Json(testimonial)))
}

/// PATCH /api/testimonials/{id}
#[instrument(skip(state, update))]
async fn update(
    State(state): State<AppState>,
    Path(id): Path<TestimonialId>,
    Json(update): Json<TestimonialUpdate>,
) -> Result<Json<Testimonial>> {
    let testimonial = TestimonialRepository::new(state.pool())
        .update(id, &update)
        .await?;
    Ok(Json(testimonial))
}

/// DELETE /api/testimonials/{id}
#[instrument(skip(state))]
async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<TestimonialId>,
) -> Result<StatusCode> {
    let deleted = TestimonialRepository::new(state.pool()).delete(id).await?;
    if !deleted {
        return Err(AppError::NotFound("testimonial".to_owned()));
    }
    Ok(StatusCode::NO_CONTENT)
}
