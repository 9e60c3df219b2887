/**
 * Routes Module
 * API route handlers and HTML surfaces
 */
pub mod blocks;
pub mod health;
pub mod pages;
pub mod views;

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::db::repository::PageRepository;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub pages: Arc<dyn PageRepository>,
}

impl AppState {
    pub fn new(pages: Arc<dyn PageRepository>) -> Self {
        Self { pages }
    }
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
