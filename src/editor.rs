/*!
 * Editor
 * In-memory editing session: ordered blocks, field edits and publish drafts
 */
use serde_json::Value;
use std::{
    path::Path,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};
use thiserror::Error;

use crate::blocks::{
    clamp_level,
    preview::{extract_preview, resolve_display_name, DisplayNameParts, Preview},
    tag::{derive_tag, Tag},
    Block, BlockContent, BlockKind, BlockStyle, Skill, TimelineEntry,
};
use crate::media::{self, MediaError};
use crate::routes::pages::CreatePageRequest;

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("block not found: {0}")]
    BlockNotFound(String),
    #[error("block type `{tag}` has no field `{field}`")]
    UnknownField { tag: String, field: String },
    #[error("block type `{0}` has no items")]
    NoItems(String),
    #[error("item {index} out of range (len {len})")]
    ItemOutOfRange { index: usize, len: usize },
    #[error("invalid skill level: {0}")]
    InvalidLevel(String),
    #[error("a page needs at least one block")]
    EmptyPage,
    #[error(transparent)]
    Media(#[from] MediaError),
}

// ============================================================================
// Field edits
// ============================================================================

fn item_at<T>(items: &mut [T], index: usize) -> Result<&mut T, EditorError> {
    let len = items.len();
    items
        .get_mut(index)
        .ok_or(EditorError::ItemOutOfRange { index, len })
}

impl BlockContent {
    /// Set a scalar text field. Unknown tags accept any field name.
    pub fn set_field(&mut self, field: &str, value: String) -> Result<(), EditorError> {
        let tag = self.tag().to_string();
        let slot = match (self, field) {
            (BlockContent::Hero(c) | BlockContent::Glitch(c), "title") => &mut c.title,
            (BlockContent::Hero(c) | BlockContent::Glitch(c), "subtitle") => &mut c.subtitle,
            (BlockContent::Terminal(c) | BlockContent::Bio(c), "text") => &mut c.text,
            (BlockContent::Project(c), "title") => &mut c.title,
            (BlockContent::Project(c), "desc") => &mut c.desc,
            (BlockContent::Project(c), "image") => &mut c.image,
            (BlockContent::Socials(c), "linkedin") => &mut c.linkedin,
            (BlockContent::Socials(c), "github") => &mut c.github,
            (BlockContent::Socials(c), "portfolio") => &mut c.portfolio,
            (BlockContent::Video(c), "url") => &mut c.url,
            (BlockContent::Clicker(c), "label") => &mut c.label,
            (BlockContent::Clicker(c), "message") => &mut c.message,
            (BlockContent::Code(c), "code") => &mut c.code,
            (BlockContent::Other { fields, .. }, _) => {
                fields.insert(field.to_string(), Value::String(value));
                return Ok(());
            }
            _ => {
                return Err(EditorError::UnknownField {
                    tag,
                    field: field.to_string(),
                })
            }
        };
        *slot = value;
        Ok(())
    }

    /// Append a placeholder item; returns the new item count.
    pub fn push_item(&mut self) -> Result<usize, EditorError> {
        match self {
            BlockContent::Skills(c) => {
                c.list.push(Skill {
                    name: "Nouvelle compétence".to_string(),
                    level: 50,
                });
                Ok(c.list.len())
            }
            BlockContent::Timeline(c) => {
                c.items.push(TimelineEntry {
                    date: String::new(),
                    title: "Nouvelle étape".to_string(),
                    text: String::new(),
                });
                Ok(c.items.len())
            }
            BlockContent::Stack(c) => {
                c.items.push("Nouvel outil".to_string());
                Ok(c.items.len())
            }
            other => Err(EditorError::NoItems(other.tag().to_string())),
        }
    }

    pub fn remove_item(&mut self, index: usize) -> Result<(), EditorError> {
        fn remove<T>(items: &mut Vec<T>, index: usize) -> Result<(), EditorError> {
            if index >= items.len() {
                return Err(EditorError::ItemOutOfRange {
                    index,
                    len: items.len(),
                });
            }
            items.remove(index);
            Ok(())
        }

        match self {
            BlockContent::Skills(c) => remove(&mut c.list, index),
            BlockContent::Timeline(c) => remove(&mut c.items, index),
            BlockContent::Stack(c) => remove(&mut c.items, index),
            other => Err(EditorError::NoItems(other.tag().to_string())),
        }
    }

    /// Edit one field of a list item. Stack items are plain strings (`value`).
    pub fn update_item(&mut self, index: usize, field: &str, value: String) -> Result<(), EditorError> {
        let tag = self.tag().to_string();
        let unknown = || EditorError::UnknownField {
            tag: tag.clone(),
            field: field.to_string(),
        };
        match self {
            BlockContent::Skills(c) => {
                let skill = item_at(&mut c.list, index)?;
                match field {
                    "name" => skill.name = value,
                    "level" => {
                        let raw: f64 = value
                            .trim()
                            .parse()
                            .map_err(|_| EditorError::InvalidLevel(value.clone()))?;
                        skill.level = clamp_level(raw);
                    }
                    _ => return Err(unknown()),
                }
            }
            BlockContent::Timeline(c) => {
                let entry = item_at(&mut c.items, index)?;
                match field {
                    "date" => entry.date = value,
                    "title" => entry.title = value,
                    "text" => entry.text = value,
                    _ => return Err(unknown()),
                }
            }
            BlockContent::Stack(c) => {
                let item = item_at(&mut c.items, index)?;
                match field {
                    "value" => *item = value,
                    _ => return Err(unknown()),
                }
            }
            _ => return Err(EditorError::NoItems(tag.clone())),
        }
        Ok(())
    }
}

// ============================================================================
// Ordered block container
// ============================================================================

/// The page being edited, in render order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockList {
    blocks: Vec<Block>,
}

impl BlockList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_blocks(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn as_slice(&self) -> &[Block] {
        &self.blocks
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Block> {
        self.blocks.iter()
    }

    pub fn get(&self, id: &str) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id() == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.blocks.iter().position(|b| b.id() == id)
    }

    pub fn push(&mut self, block: Block) -> &Block {
        let index = self.blocks.len();
        self.blocks.push(block);
        &self.blocks[index]
    }

    /// Append a default block of `kind`.
    pub fn add(&mut self, kind: BlockKind) -> &Block {
        self.push(Block::new(kind))
    }

    /// Append a default block for any tag; unknown tags start empty.
    pub fn add_tag(&mut self, tag: &str) -> &Block {
        self.push(Block::from_tag(tag))
    }

    pub fn remove(&mut self, id: &str) -> Option<Block> {
        let index = self.position(id)?;
        Some(self.blocks.remove(index))
    }

    /// Swap with the previous block. No-op at the top or out of range.
    pub fn move_up(&mut self, index: usize) -> bool {
        if index == 0 || index >= self.blocks.len() {
            return false;
        }
        self.blocks.swap(index - 1, index);
        true
    }

    /// Swap with the next block. No-op at the bottom or out of range.
    pub fn move_down(&mut self, index: usize) -> bool {
        if index.saturating_add(1) >= self.blocks.len() {
            return false;
        }
        self.blocks.swap(index, index + 1);
        true
    }

    fn block_mut(&mut self, id: &str) -> Result<&mut Block, EditorError> {
        self.blocks
            .iter_mut()
            .find(|b| b.id() == id)
            .ok_or_else(|| EditorError::BlockNotFound(id.to_string()))
    }

    pub fn update_field(
        &mut self,
        id: &str,
        field: &str,
        value: impl Into<String>,
    ) -> Result<(), EditorError> {
        self.block_mut(id)?
            .content_mut()
            .set_field(field, value.into())
    }

    pub fn set_style(
        &mut self,
        id: &str,
        background: impl Into<String>,
        foreground: impl Into<String>,
    ) -> Result<(), EditorError> {
        self.block_mut(id)?.style = BlockStyle::new(background, foreground);
        Ok(())
    }

    pub fn push_item(&mut self, id: &str) -> Result<usize, EditorError> {
        self.block_mut(id)?.content_mut().push_item()
    }

    pub fn remove_item(&mut self, id: &str, index: usize) -> Result<(), EditorError> {
        self.block_mut(id)?.content_mut().remove_item(index)
    }

    pub fn update_item(
        &mut self,
        id: &str,
        index: usize,
        field: &str,
        value: impl Into<String>,
    ) -> Result<(), EditorError> {
        self.block_mut(id)?
            .content_mut()
            .update_item(index, field, value.into())
    }
}

// ============================================================================
// Publish guard
// ============================================================================

/// Allows one publish at a time; cloned handles share the same flag.
#[derive(Debug, Clone, Default)]
pub struct PublishGuard {
    in_flight: Arc<AtomicBool>,
}

impl PublishGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` while another publish has not settled.
    pub fn try_begin(&self) -> Option<PublishTicket> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| PublishTicket {
                in_flight: Arc::clone(&self.in_flight),
            })
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }
}

/// Held for the duration of a publish request; dropping it settles the publish.
#[derive(Debug)]
#[must_use]
pub struct PublishTicket {
    in_flight: Arc<AtomicBool>,
}

impl Drop for PublishTicket {
    fn drop(&mut self) {
        self.in_flight.store(false, Ordering::Release);
    }
}

// ============================================================================
// Session
// ============================================================================

/// Everything the builder holds before publishing.
#[derive(Debug, Clone, Default)]
pub struct EditorSession {
    pub blocks: BlockList,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub orientation: Option<String>,
    background_image: Option<String>,
}

impl EditorSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_blocks(blocks: Vec<Block>) -> Self {
        Self {
            blocks: BlockList::from_blocks(blocks),
            ..Self::default()
        }
    }

    pub fn background_image(&self) -> Option<&str> {
        self.background_image.as_deref()
    }

    /// Set a remote background image URL, or clear it.
    pub fn set_background_image(&mut self, url: Option<String>) {
        self.background_image = url.filter(|u| !u.trim().is_empty());
    }

    /// Embed a local file. The field only changes once encoding succeeded.
    pub async fn set_background_image_file(
        &mut self,
        path: impl AsRef<Path>,
    ) -> Result<(), EditorError> {
        let uri = media::embed_image_file(path).await?;
        self.background_image = Some(uri);
        Ok(())
    }

    /// Embed a local file into a block's image field.
    pub async fn set_block_image_file(
        &mut self,
        id: &str,
        path: impl AsRef<Path>,
    ) -> Result<(), EditorError> {
        if self.blocks.get(id).is_none() {
            return Err(EditorError::BlockNotFound(id.to_string()));
        }
        let uri = media::embed_image_file(path).await?;
        self.blocks.update_field(id, "image", uri)
    }

    pub fn name_parts(&self) -> DisplayNameParts {
        DisplayNameParts::new(self.first_name.clone(), self.last_name.clone())
    }

    /// Name the gallery will show once published.
    pub fn display_name(&self) -> String {
        resolve_display_name(&self.name_parts(), self.blocks.as_slice())
    }

    pub fn preview(&self) -> Preview {
        extract_preview(self.blocks.as_slice())
    }

    pub fn tag(&self) -> Tag {
        derive_tag(self.blocks.as_slice())
    }

    /// Create request for the current state.
    pub fn draft(&self) -> Result<CreatePageRequest, EditorError> {
        if self.blocks.is_empty() {
            return Err(EditorError::EmptyPage);
        }
        Ok(CreatePageRequest {
            sections: Some(self.blocks.as_slice().to_vec()),
            bg_image: self.background_image.clone(),
            student_first_name: self.first_name.clone(),
            student_last_name: self.last_name.clone(),
            orientation: self.orientation.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::{SkillsContent, StackContent};

    fn list_of(kinds: &[BlockKind]) -> BlockList {
        let mut list = BlockList::new();
        for kind in kinds {
            list.add(*kind);
        }
        list
    }

    fn kinds(list: &BlockList) -> Vec<Option<BlockKind>> {
        list.iter().map(Block::kind).collect()
    }

    #[test]
    fn test_move_up_and_down() {
        let mut list = list_of(&[BlockKind::Hero, BlockKind::Bio, BlockKind::Skills]);
        assert!(list.move_up(2));
        assert_eq!(
            kinds(&list),
            [Some(BlockKind::Hero), Some(BlockKind::Skills), Some(BlockKind::Bio)]
        );
        assert!(list.move_down(0));
        assert_eq!(
            kinds(&list),
            [Some(BlockKind::Skills), Some(BlockKind::Hero), Some(BlockKind::Bio)]
        );
    }

    #[test]
    fn test_moves_are_noops_at_ends() {
        let mut list = list_of(&[BlockKind::Hero, BlockKind::Bio]);
        let before = list.clone();
        assert!(!list.move_up(0));
        assert!(!list.move_down(1));
        assert!(!list.move_up(7));
        assert!(!list.move_down(7));
        assert_eq!(list, before);

        let mut empty = BlockList::new();
        assert!(!empty.move_down(0));
        assert!(!empty.move_up(0));
    }

    #[test]
    fn test_remove_by_id() {
        let mut list = list_of(&[BlockKind::Hero, BlockKind::Bio]);
        let id = list.as_slice()[0].id().to_string();
        let removed = list.remove(&id).unwrap();
        assert_eq!(removed.kind(), Some(BlockKind::Hero));
        assert_eq!(list.len(), 1);
        assert!(list.remove(&id).is_none());
    }

    #[test]
    fn test_update_field() {
        let mut list = BlockList::new();
        let id = list.add(BlockKind::Hero).id().to_string();
        list.update_field(&id, "title", "Marie Curie").unwrap();
        assert_eq!(list.get(&id).unwrap().content().title(), Some("Marie Curie"));

        let err = list.update_field(&id, "code", "x").unwrap_err();
        assert!(matches!(err, EditorError::UnknownField { .. }));
        let err = list.update_field("missing", "title", "x").unwrap_err();
        assert!(matches!(err, EditorError::BlockNotFound(_)));
    }

    #[test]
    fn test_unknown_tag_accepts_any_field() {
        let mut list = BlockList::new();
        let id = list.add_tag("quiz").id().to_string();
        list.update_field(&id, "question", "2+2 ?").unwrap();
        let BlockContent::Other { fields, .. } = list.get(&id).unwrap().content() else {
            panic!("expected open content");
        };
        assert_eq!(fields["question"], "2+2 ?");
    }

    #[test]
    fn test_set_style_keeps_kind() {
        let mut list = BlockList::new();
        let id = list.add(BlockKind::Terminal).id().to_string();
        list.set_style(&id, "#123456", "#abcdef").unwrap();
        let block = list.get(&id).unwrap();
        assert_eq!(block.style, BlockStyle::new("#123456", "#abcdef"));
        assert_eq!(block.kind(), Some(BlockKind::Terminal));
    }

    #[test]
    fn test_skill_items() {
        let mut list = BlockList::new();
        let id = list.add(BlockKind::Skills).id().to_string();
        let len = list.push_item(&id).unwrap();
        list.update_item(&id, len - 1, "name", "Rust").unwrap();
        list.update_item(&id, len - 1, "level", "130").unwrap();
        assert!(matches!(
            list.update_item(&id, len - 1, "level", "beaucoup"),
            Err(EditorError::InvalidLevel(_))
        ));
        assert!(matches!(
            list.update_item(&id, len, "name", "x"),
            Err(EditorError::ItemOutOfRange { .. })
        ));

        let BlockContent::Skills(SkillsContent { list: skills }) = list.get(&id).unwrap().content()
        else {
            panic!("expected skills");
        };
        let last = skills.last().unwrap();
        assert_eq!(last.name, "Rust");
        assert_eq!(last.level, 100);
    }

    #[test]
    fn test_stack_items() {
        let mut list = BlockList::new();
        let id = list.add(BlockKind::Stack).id().to_string();
        list.update_item(&id, 0, "value", "Rust").unwrap();
        list.remove_item(&id, 1).unwrap();
        assert_eq!(
            list.get(&id).unwrap().content(),
            &BlockContent::Stack(StackContent {
                items: vec!["Rust".to_string()],
            })
        );
        assert!(list.remove_item(&id, 5).is_err());
    }

    #[test]
    fn test_items_on_scalar_block_rejected() {
        let mut list = BlockList::new();
        let id = list.add(BlockKind::Bio).id().to_string();
        assert!(matches!(list.push_item(&id), Err(EditorError::NoItems(_))));
    }

    #[test]
    fn test_publish_guard_rejects_second_publish() {
        let guard = PublishGuard::new();
        let ticket = guard.try_begin().expect("first publish");
        assert!(guard.is_in_flight());
        assert!(guard.clone().try_begin().is_none());
        drop(ticket);
        assert!(!guard.is_in_flight());
        assert!(guard.try_begin().is_some());
    }

    #[test]
    fn test_draft_requires_blocks() {
        let session = EditorSession::new();
        assert!(matches!(session.draft(), Err(EditorError::EmptyPage)));
    }

    #[test]
    fn test_draft_carries_session_fields() {
        let mut session = EditorSession::new();
        session.blocks.add(BlockKind::Glitch);
        session.first_name = Some("Ada".to_string());
        session.last_name = Some("Lovelace".to_string());
        session.set_background_image(Some("https://example.com/bg.png".to_string()));
        let draft = session.draft().unwrap();
        assert_eq!(draft.sections.as_ref().map(Vec::len), Some(1));
        assert_eq!(draft.bg_image.as_deref(), Some("https://example.com/bg.png"));
        assert_eq!(session.display_name(), "Ada Lovelace");
        assert_eq!(session.tag(), Tag::Hacker);
        assert_eq!(session.preview().preview_title.as_deref(), Some("CYBER_DEV"));
    }

    #[tokio::test]
    async fn test_failed_embed_leaves_background_untouched() {
        let mut session = EditorSession::new();
        session.set_background_image(Some("https://example.com/a.png".to_string()));
        let path = std::env::temp_dir().join(format!("not-an-image-{}.txt", uuid::Uuid::new_v4()));
        tokio::fs::write(&path, b"plain text").await.unwrap();
        let result = session.set_background_image_file(&path).await;
        tokio::fs::remove_file(&path).await.unwrap();
        assert!(matches!(result, Err(EditorError::Media(MediaError::UnsupportedImage))));
        assert_eq!(session.background_image(), Some("https://example.com/a.png"));
    }
}
