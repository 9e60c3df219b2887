//! Database Models - structs representing database tables (used by sqlx/serde).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::blocks::{
    decode_blocks, encode_blocks,
    preview::{resolve_display_name, DisplayNameParts},
    Block,
};

/// Row of the `student_pages` table
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct PageRow {
    pub id: i32,
    pub name: String,
    /// JSON array of blocks, as published
    pub content: String,
    pub bg_image: Option<String>,
    pub orientation: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl PageRow {
    pub fn blocks(&self) -> Result<Vec<Block>, serde_json::Error> {
        decode_blocks(&self.content)
    }

    /// Blocks of the row, or an empty page if the stored JSON is corrupt.
    pub fn blocks_or_empty(&self) -> Vec<Block> {
        self.blocks().unwrap_or_else(|e| {
            tracing::warn!(page_id = self.id, error = %e, "corrupt page content, using empty page");
            Vec::new()
        })
    }
}

/// New page for insertion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPage {
    pub name: String,
    pub content: String,
    pub bg_image: Option<String>,
    pub orientation: Option<String>,
}

impl NewPage {
    /// Serialize the blocks and resolve the display name.
    pub fn prepare(
        blocks: &[Block],
        bg_image: Option<String>,
        parts: &DisplayNameParts,
        orientation: Option<String>,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            name: resolve_display_name(parts, blocks),
            content: encode_blocks(blocks)?,
            bg_image: bg_image.filter(|s| !s.is_empty()),
            orientation: orientation.filter(|s| !s.trim().is_empty()),
        })
    }
}
