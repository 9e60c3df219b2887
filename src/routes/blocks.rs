/**
 * Block Catalog Routes
 * Palette of block types with their defaults and editor inputs
 */
use axum::Json;
use serde::Serialize;

use crate::blocks::{
    factory::{default_content, default_style},
    Block, BlockContent, BlockKind, BlockStyle,
};
use crate::render::editor::{editor_form, EditorField, EditorItem};

/// One entry of GET /api/blocks
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    #[serde(rename = "type")]
    pub kind: BlockKind,
    pub label: &'static str,
    pub dark: bool,
    pub has_items: bool,
    pub content: BlockContent,
    pub styles: BlockStyle,
    pub fields: Vec<EditorField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<EditorItem>>,
}

impl CatalogEntry {
    pub fn for_kind(kind: BlockKind) -> Self {
        let content = default_content(kind);
        let styles = default_style(kind);
        let form = editor_form(&Block::with_content(
            kind.as_str(),
            content.clone(),
            styles.clone(),
        ));
        Self {
            kind,
            label: kind.label(),
            dark: kind.is_dark(),
            has_items: kind.has_items(),
            content,
            styles,
            fields: form.fields,
            items: form.items,
        }
    }
}

/// Every block type, in palette order.
pub fn catalog() -> Vec<CatalogEntry> {
    BlockKind::ALL.into_iter().map(CatalogEntry::for_kind).collect()
}

/// GET /api/blocks - Block catalog for the builder
pub async fn list_blocks() -> Json<Vec<CatalogEntry>> {
    Json(catalog())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::routing::get;
    use axum::Router;
    use tower::ServiceExt;

    #[test]
    fn test_catalog_covers_every_kind() {
        let entries = catalog();
        assert_eq!(entries.len(), 12);
        let terminal = entries
            .iter()
            .find(|e| e.kind == BlockKind::Terminal)
            .unwrap();
        assert!(terminal.dark);
        assert_eq!(terminal.styles, BlockStyle::new("#000000", "#22c55e"));
        assert!(entries
            .iter()
            .filter(|e| e.has_items)
            .all(|e| e.items.is_some() && e.fields.is_empty()));
    }

    #[tokio::test]
    async fn test_list_blocks_json() {
        let app = Router::new().route("/api/blocks", get(list_blocks));
        let res = app
            .oneshot(Request::get("/api/blocks").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value[0]["type"], "hero");
        assert_eq!(value[0]["content"]["title"], "Mon Portfolio");
        assert_eq!(value[0]["styles"]["bg"], "#ffffff");
        assert_eq!(value[6]["type"], "skills");
        assert_eq!(value[6]["hasItems"], true);
    }
}
