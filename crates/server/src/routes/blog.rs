//! Blog post route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use serde::Deserialize;
use tracing::instrument;

use brightclass_core::{BlogPostId, BlogStatus};

use crate::db::BlogPostRepository;
use crate::error::{AppError, Result};
use crate::models::content::{BlogPost, BlogPostUpdate, NewBlogPost};
use crate::state::AppState;

/// Build the blog router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/blog", get(list).post(create))
        .route("/api/blog/{id}", get(show).patch(update).delete(destroy))
}

/// List filters.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<BlogStatus>,
    pub category: Option<String>,
}

/// GET /api/blog
#[instrument(skip(state))]
async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<BlogPost>>> {
    let posts = BlogPostRepository::new(state.pool())
        .list(query.status, query.category.as_deref())
        .await?;
    Ok(Json(posts))
}

/// GET /api/blog/{id}
#[instrument(skip(state))]
async fn show(State(state): State<AppState>, Path(id): Path<BlogPostId>) -> Result<Json<BlogPost>> {
    BlogPostRepository::new(state.pool())
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("blog post".to_owned()))
}

/// POST /api/blog
#[instrument(skip(state, new), fields(slug = %new.slug))]
async fn create(
    State(state): State<AppState>,
    Json(new): Json<NewBlogPost>,
) -> Result<(StatusCode, Json<BlogPost>)> {
    if new.title.trim().is_empty() || new.slug.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "title and slug are required".to_owned(),
        ));
    }

    let post = BlogPostRepository::new(state.pool()).create(&new).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

/// PATCH /api/blog/{id}
#[instrument(skip(state, update))]
async fn update(
    State(state): State<AppState>,
    Path(id): Path<BlogPostId>,
    Json(update): Json<BlogPostUpdate>,
) -> Result<Json<BlogPost>> {
    let post = BlogPostRepository::new(state.pool())
        .update(id, &update)
        .await?;
    Ok(Json(post))
}

/// DELETE /api/blog/{id}
#[instrument(skip(state))]
async fn destroy(State(state): State<AppState>, Path(id): Path<BlogPostId>) -> Result<StatusCode> {
    let deleted = BlogPostRepository::new(state.pool()).delete(id).await?;
    if !deleted {
        return Err(AppError::NotFound("blog post".to_owned()));
    }
    Ok(StatusCode::NO_CONTENT)
}
