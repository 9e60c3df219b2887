/**
 * Page Routes
 * Publish, fetch and list student pages
 */
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::blocks::{
    preview::{extract_preview, DisplayNameParts, Preview},
    tag::{derive_tag, Tag},
    Block,
};
use crate::db::models::{NewPage, PageRow};
use crate::error::ApiError;
use crate::routes::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for POST /api/page
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePageRequest {
    #[serde(default)]
    pub sections: Option<Vec<Block>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orientation: Option<String>,
}

/// Response for POST /api/page
#[derive(Debug, Serialize, Deserialize)]
pub struct CreatePageResponse {
    pub success: bool,
    pub id: i32,
}

/// Response for GET /api/page/{id}
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse {
    pub sections: Vec<Block>,
    pub bg_image: Option<String>,
    pub name: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orientation: Option<String>,
}

impl PageResponse {
    pub fn from_row(row: PageRow) -> Self {
        Self {
            sections: row.blocks_or_empty(),
            bg_image: row.bg_image,
            name: row.name,
            created_at: row.created_at,
            orientation: row.orientation,
        }
    }
}

/// Gallery card data (item of GET /api/pages)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSummary {
    pub id: i32,
    pub name: String,
    pub bg_image: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub preview: Preview,
    pub tag: Tag,
}

impl PageSummary {
    /// Corrupt content degrades to an empty page: null previews, default tag.
    pub fn from_row(row: PageRow) -> Self {
        let blocks = row.blocks_or_empty();
        Self {
            preview: extract_preview(&blocks),
            tag: derive_tag(&blocks),
            id: row.id,
            name: row.name,
            bg_image: row.bg_image,
            created_at: row.created_at,
        }
    }
}

// ============================================================================
// Validation
// ============================================================================

static PAGE_ID_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{1,10}$").expect("page id pattern is valid"));

/// Parse a path segment into a positive page id.
pub fn parse_page_id(raw: &str) -> Result<i32, ApiError> {
    if !PAGE_ID_REGEX.is_match(raw) {
        return Err(ApiError::InvalidId);
    }
    match raw.parse::<i32>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ApiError::InvalidId),
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/page - Publish a page
pub async fn create_page(
    State(state): State<AppState>,
    payload: Result<Json<CreatePageRequest>, JsonRejection>,
) -> Result<Json<CreatePageResponse>, ApiError> {
    let Json(payload) = payload.map_err(|e| match e.status() {
        StatusCode::PAYLOAD_TOO_LARGE => ApiError::BodyTooLarge,
        _ => ApiError::InvalidBody(e.body_text()),
    })?;

    let sections = payload
        .sections
        .filter(|s| !s.is_empty())
        .ok_or(ApiError::SectionsRequired)?;

    let parts = DisplayNameParts::new(payload.student_first_name, payload.student_last_name);
    let page = NewPage::prepare(&sections, payload.bg_image, &parts, payload.orientation)?;
    let id = state.pages.create(page).await?;

    tracing::info!(
        page_id = id,
        blocks = sections.len(),
        backend = state.pages.backend(),
        "page published"
    );

    Ok(Json(CreatePageResponse { success: true, id }))
}

/// GET /api/page/{id} - Get one page
pub async fn get_page(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PageResponse>, ApiError> {
    let id = parse_page_id(&id)?;
    let row = state
        .pages
        .get_by_id(id)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(PageResponse::from_row(row)))
}

/// GET /api/pages - Gallery listing, newest first
pub async fn list_pages(State(state): State<AppState>) -> Result<Json<Vec<PageSummary>>, ApiError> {
    let rows = state.pages.list_all().await?;
    tracing::debug!(count = rows.len(), "listing pages");

    Ok(Json(rows.into_iter().map(PageSummary::from_row).collect()))
}
