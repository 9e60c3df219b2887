//! Editor form descriptors: which inputs the builder shows for a block.
//!
//! Field names are the ones accepted by `BlockContent::set_field` and
//! `BlockContent::update_item`.

use serde::Serialize;
use serde_json::Value;

use crate::blocks::{Block, BlockContent, BlockStyle};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    Text,
    Textarea,
    Code,
    Url,
    Image,
    Range,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditorField {
    pub name: String,
    pub label: String,
    pub input: InputKind,
    pub value: String,
}

impl EditorField {
    fn new(name: &str, label: &str, input: InputKind, value: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            input,
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditorItem {
    pub index: usize,
    pub fields: Vec<EditorField>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditorForm {
    pub block_id: String,
    #[serde(rename = "type")]
    pub tag: String,
    pub label: String,
    pub fields: Vec<EditorField>,
    /// `None` for variants without a list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<EditorItem>>,
    pub style: BlockStyle,
}

fn items<T>(list: &[T], fields: impl Fn(&T) -> Vec<EditorField>) -> Option<Vec<EditorItem>> {
    Some(
        list.iter()
            .enumerate()
            .map(|(index, item)| EditorItem {
                index,
                fields: fields(item),
            })
            .collect(),
    )
}

/// Editable fields and list items of a block.
pub fn editor_form(block: &Block) -> EditorForm {
    use InputKind::*;

    let (fields, items) = match block.content() {
        BlockContent::Hero(c) | BlockContent::Glitch(c) => (
            vec![
                EditorField::new("title", "Titre", Text, &c.title),
                EditorField::new("subtitle", "Sous-titre", Text, &c.subtitle),
            ],
            None,
        ),
        BlockContent::Terminal(c) => (
            vec![EditorField::new("text", "Commande", Code, &c.text)],
            None,
        ),
        BlockContent::Bio(c) => (
            vec![EditorField::new("text", "Texte", Textarea, &c.text)],
            None,
        ),
        BlockContent::Project(c) => (
            vec![
                EditorField::new("title", "Titre", Text, &c.title),
                EditorField::new("desc", "Description", Textarea, &c.desc),
                EditorField::new("image", "Image", Image, &c.image),
            ],
            None,
        ),
        BlockContent::Socials(c) => (
            vec![
                EditorField::new("linkedin", "LinkedIn", Text, &c.linkedin),
                EditorField::new("github", "GitHub", Text, &c.github),
                EditorField::new("portfolio", "Portfolio", Url, &c.portfolio),
            ],
            None,
        ),
        BlockContent::Skills(c) => (
            Vec::new(),
            items(&c.list, |skill| {
                vec![
                    EditorField::new("name", "Compétence", Text, &skill.name),
                    EditorField::new("level", "Niveau", Range, skill.level.to_string()),
                ]
            }),
        ),
        BlockContent::Video(c) => (
            vec![EditorField::new("url", "Lien de la vidéo", Url, &c.url)],
            None,
        ),
        BlockContent::Clicker(c) => (
            vec![
                EditorField::new("label", "Bouton", Text, &c.label),
                EditorField::new("message", "Message", Text, &c.message),
            ],
            None,
        ),
        BlockContent::Code(c) => (
            vec![EditorField::new("code", "Code", Code, &c.code)],
            None,
        ),
        BlockContent::Timeline(c) => (
            Vec::new(),
            items(&c.items, |entry| {
                vec![
                    EditorField::new("date", "Date", Text, &entry.date),
                    EditorField::new("title", "Titre", Text, &entry.title),
                    EditorField::new("text", "Texte", Textarea, &entry.text),
                ]
            }),
        ),
        BlockContent::Stack(c) => (
            Vec::new(),
            items(&c.items, |item| {
                vec![EditorField::new("value", "Outil", Text, item)]
            }),
        ),
        BlockContent::Other { fields, .. } => (
            fields
                .iter()
                .filter_map(|(name, value)| match value {
                    Value::String(s) => Some(EditorField::new(name, name, Text, s)),
                    _ => None,
                })
                .collect(),
            None,
        ),
    };

    EditorForm {
        block_id: block.id().to_string(),
        tag: block.tag().to_string(),
        label: block
            .kind()
            .map(|kind| kind.label().to_string())
            .unwrap_or_else(|| block.tag().to_string()),
        fields,
        items,
        style: block.style.clone(),
    }
}
