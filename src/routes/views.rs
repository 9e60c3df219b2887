/**
 * View Routes
 * Server-rendered gallery and page viewer
 */
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;

use crate::error::ApiError;
use crate::render::{
    gallery::render_gallery,
    viewer::{render_not_found, render_page},
};
use crate::routes::{
    pages::{parse_page_id, PageSummary},
    AppState,
};

#[derive(Debug, Default, Deserialize)]
pub struct GalleryQuery {
    #[serde(default)]
    pub q: String,
}

/// GET /forum?q= - Gallery of published pages
pub async fn gallery(
    State(state): State<AppState>,
    Query(query): Query<GalleryQuery>,
) -> Result<Html<String>, ApiError> {
    let pages: Vec<PageSummary> = state
        .pages
        .list_all()
        .await?
        .into_iter()
        .map(PageSummary::from_row)
        .collect();

    Ok(Html(render_gallery(&pages, &query.q)))
}

/// GET /view/{id} - Published page
pub async fn view_page(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let not_found = || (StatusCode::NOT_FOUND, Html(render_not_found(&id))).into_response();

    let Ok(page_id) = parse_page_id(&id) else {
        return Ok(not_found());
    };
    let Some(row) = state.pages.get_by_id(page_id).await? else {
        return Ok(not_found());
    };

    let blocks = row.blocks_or_empty();
    Ok(Html(render_page(&row.name, &blocks, row.bg_image.as_deref())).into_response())
}
