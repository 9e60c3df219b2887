//! Card preview fields and display-name resolution.

use serde::{Deserialize, Serialize};

use super::{Block, BlockKind};

/// Name stored when neither explicit names nor a headline title exist.
pub const ANONYMOUS_NAME: &str = "Anonyme";

/// Preview fields shown on a gallery card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preview {
    pub preview_title: Option<String>,
    #[serde(rename = "previewBg")]
    pub preview_background: Option<String>,
    pub preview_color: Option<String>,
}

fn is_headline(block: &Block) -> bool {
    matches!(block.kind(), Some(BlockKind::Hero | BlockKind::Glitch))
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

/// First `hero`/`glitch` block, else the first block.
pub fn preview_source(blocks: &[Block]) -> Option<&Block> {
    blocks.iter().find(|b| is_headline(b)).or_else(|| blocks.first())
}

pub fn extract_preview(blocks: &[Block]) -> Preview {
    let Some(source) = preview_source(blocks) else {
        return Preview::default();
    };
    Preview {
        preview_title: source.content().title().and_then(non_empty),
        preview_background: non_empty(&source.style.background),
        preview_color: non_empty(&source.style.foreground),
    }
}

/// Explicit first/last names typed in the publish dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayNameParts {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl DisplayNameParts {
    pub fn new(first_name: Option<String>, last_name: Option<String>) -> Self {
        Self {
            first_name,
            last_name,
        }
    }

    fn full_name(&self) -> Option<String> {
        let first = self.first_name.as_deref().map(str::trim).unwrap_or_default();
        let last = self.last_name.as_deref().map(str::trim).unwrap_or_default();
        if first.is_empty() || last.is_empty() {
            return None;
        }
        Some(format!("{} {}", first, last))
    }
}

/// Both explicit names win; else the first headline title; else [`ANONYMOUS_NAME`].
pub fn resolve_display_name(parts: &DisplayNameParts, blocks: &[Block]) -> String {
    if let Some(name) = parts.full_name() {
        return name;
    }
    blocks
        .iter()
        .find(|b| is_headline(b))
        .and_then(|b| b.content().title())
        .and_then(non_empty)
        .unwrap_or_else(|| ANONYMOUS_NAME.to_string())
}
