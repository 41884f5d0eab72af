//! Gallery image route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use serde::Deserialize;
use tracing::instrument;

use brightclass_core::{GalleryImageId, GalleryStatus};

use crate::db::GalleryRepository;
use crate::error::{AppError, Result};
use crate::models::content::{GalleryImage, GalleryImageUpdate, NewGalleryImage};
use crate::state::AppState;

/// Build the gallery router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/gallery", get(list).post(create))
        .route("/api/gallery/{id}", get(show).patch(update).delete(destroy))
}

/// List filters.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<GalleryStatus>,
}

/// GET /api/gallery
#[instrument(skip(state))]
async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<GalleryImage>>> {
    let images = GalleryRepository::new(state.pool())
        .list(query.status)
        .await?;
    Ok(Json(images))
}

/// GET /api/gallery/{id}
#[instrument(skip(state))]
async fn show(
    State(state): State<AppState>,
    Path(id): Path<GalleryImageId>,
) -> Result<Json<GalleryImage>> {
    GalleryRepository::new(state.pool())
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("gallery image".to_owned()))
}

/// POST /api/gallery
#[instrument(skip(state, new))]
async fn create(
    State(state): State<AppState>,
    Json(new): Json<NewGalleryImage>,
) -> Result<(StatusCode, Json<GalleryImage>)> {
    if new.title.trim().is_empty() || new.image_url.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "title and image_url are required".to_owned(),
        ));
    }

    let image = GalleryRepository::new(state.pool()).create(&new).await?;
    Ok((StatusCode::CREATED, Json(image)))
}

/// PATCH /api/gallery/{id}
#[instrument(skip(state, update))]
async fn update(
    State(state): State<AppState>,
    Path(id): Path<GalleryImageId>,
    Json(update): Json<GalleryImageUpdate>,
) -> Result<Json<GalleryImage>> {
    let image = GalleryRepository::new(state.pool())
        .update(id, &update)
        .await?;
    Ok(Json(image))
}

/// DELETE /api/gallery/{id}
#[instrument(skip(state))]
async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<GalleryImageId>,
) -> Result<StatusCode> {
    let deleted = GalleryRepository::new(state.pool()).delete(id).await?;
    if !deleted {
        return Err(AppError::NotFound("gallery image".to_owned()));
    }
    Ok(StatusCode::NO_CONTENT)
}
