//! Portfolio item route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use serde::Deserialize;
use tracing::instrument;

use brightclass_core::{PortfolioItemId, PortfolioStatus};

use crate::db::PortfolioRepository;
use crate::error::{AppError, Result};
use crate::models::content::{NewPortfolioItem, PortfolioItem, PortfolioItemUpdate};
use crate::state::AppState;

/// Build the portfolio router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/portfolio", get(list).post(create))
        .route(
            "/api/portfolio/{id}",
            get(show).patch(update).delete(destroy),
        )
}

/// List filters.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<PortfolioStatus>,
}

/// GET /api/portfolio
#[instrument(skip(state))]
async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<PortfolioItem>>> {
    let items = PortfolioRepository::new(state.pool())
        .list(query.status)
        .await?;
    Ok(Json(items))
}

/// GET /api/portfolio/{id}
#[instrument(skip(state))]
async fn show(
    State(state): State<AppState>,
    Path(id): Path<PortfolioItemId>,
) -> Result<Json<PortfolioItem>> {
    PortfolioRepository::new(state.pool())
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("portfolio item".to_owned()))
}

/// POST /api/portfolio
#[instrument(skip(state, new))]
async fn create(
    State(state): State<AppState>,
    Json(new): Json<NewPortfolioItem>,
) -> Result<(StatusCode, Json<PortfolioItem>)> {
    if new.title.trim().is_empty() || new.summary.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "title and summary are required".to_owned(),
        ));
    }

    let item = PortfolioRepository::new(state.pool()).create(&new).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// PATCH /api/portfolio/{id}
#[instrument(skip(state, update))]
async fn update(
    State(state): State<AppState>,
    Path(id): Path<PortfolioItemId>,
    Json(update): Json<PortfolioItemUpdate>,
) -> Result<Json<PortfolioItem>> {
    let item = PortfolioRepository::new(state.pool())
        .update(id, &update)
        .await?;
    Ok(Json(item))
}

/// DELETE /api/portfolio/{id}
#[instrument(skip(state))]
async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<PortfolioItemId>,
) -> Result<StatusCode> {
    let deleted = PortfolioRepository::new(state.pool()).delete(id).await?;
    if !deleted {
        return Err(AppError::NotFound("portfolio item".to_owned()));
    }
    Ok(StatusCode::NO_CONTENT)
}
