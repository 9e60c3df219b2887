/*!
 * Block Schema
 * Typed page blocks and their JSON wire form
 */
pub mod factory;
pub mod preview;
pub mod tag;

use serde::{
    de::{DeserializeOwned, Error as _},
    ser::SerializeStruct,
    Deserialize, Deserializer, Serialize, Serializer,
};
use serde_json::{Map, Value};
use std::{fmt, str::FromStr};
use thiserror::Error;

// ============================================================================
// Block kinds
// ============================================================================

/// The fixed set of block variants a page can contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Hero,
    Glitch,
    Terminal,
    Bio,
    Project,
    Socials,
    Skills,
    Video,
    Clicker,
    Code,
    Timeline,
    Stack,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown block type: {0}")]
pub struct UnknownBlockKind(pub String);

impl BlockKind {
    pub const ALL: [BlockKind; 12] = [
        BlockKind::Hero,
        BlockKind::Glitch,
        BlockKind::Terminal,
        BlockKind::Bio,
        BlockKind::Project,
        BlockKind::Socials,
        BlockKind::Skills,
        BlockKind::Video,
        BlockKind::Clicker,
        BlockKind::Code,
        BlockKind::Timeline,
        BlockKind::Stack,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BlockKind::Hero => "hero",
            BlockKind::Glitch => "glitch",
            BlockKind::Terminal => "terminal",
            BlockKind::Bio => "bio",
            BlockKind::Project => "project",
            BlockKind::Socials => "socials",
            BlockKind::Skills => "skills",
            BlockKind::Video => "video",
            BlockKind::Clicker => "clicker",
            BlockKind::Code => "code",
            BlockKind::Timeline => "timeline",
            BlockKind::Stack => "stack",
        }
    }

    /// Label shown in the builder palette.
    pub fn label(self) -> &'static str {
        match self {
            BlockKind::Hero => "Titre",
            BlockKind::Glitch => "Titre Glitch",
            BlockKind::Terminal => "Terminal",
            BlockKind::Bio => "Bio",
            BlockKind::Project => "Projet",
            BlockKind::Socials => "Réseaux",
            BlockKind::Skills => "Compétences",
            BlockKind::Video => "Vidéo",
            BlockKind::Clicker => "Clicker",
            BlockKind::Code => "Code",
            BlockKind::Timeline => "Parcours",
            BlockKind::Stack => "Stack",
        }
    }

    /// Variants created with the dark colour scheme.
    pub fn is_dark(self) -> bool {
        matches!(
            self,
            BlockKind::Terminal | BlockKind::Code | BlockKind::Glitch
        )
    }

    /// Variants whose content is a list of items.
    pub fn has_items(self) -> bool {
        matches!(
            self,
            BlockKind::Skills | BlockKind::Timeline | BlockKind::Stack
        )
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlockKind {
    type Err = UnknownBlockKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BlockKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownBlockKind(s.to_string()))
    }
}

// ============================================================================
// Content shapes
// ============================================================================

/// `hero` and `glitch`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadlineContent {
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub subtitle: String,
}

/// `terminal` and `bio`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextContent {
    #[serde(deserialize_with = "null_as_default")]
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectContent {
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub desc: String,
    /// URL or inline data URI, empty when unset.
    #[serde(deserialize_with = "null_as_default")]
    pub image: String,
}

/// Handles or full URLs; empty means "not shown".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialsContent {
    #[serde(deserialize_with = "null_as_default")]
    pub linkedin: String,
    #[serde(deserialize_with = "null_as_default")]
    pub github: String,
    #[serde(deserialize_with = "null_as_default")]
    pub portfolio: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillsContent {
    #[serde(deserialize_with = "null_as_default")]
    pub list: Vec<Skill>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Skill {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "deserialize_level")]
    pub level: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoContent {
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClickerContent {
    #[serde(deserialize_with = "null_as_default")]
    pub label: String,
    #[serde(deserialize_with = "null_as_default")]
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodeContent {
    #[serde(deserialize_with = "null_as_default")]
    pub code: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineContent {
    #[serde(deserialize_with = "null_as_default")]
    pub items: Vec<TimelineEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineEntry {
    #[serde(deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StackContent {
    #[serde(deserialize_with = "null_as_default")]
    pub items: Vec<String>,
}

// Builders send `null` for cleared fields.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Clamp a raw level into `0..=100`.
pub fn clamp_level(raw: f64) -> u8 {
    if raw.is_nan() {
        return 0;
    }
    raw.round().clamp(0.0, 100.0) as u8
}

// Range inputs in the builder post levels as strings, older rows hold floats.
fn deserialize_level<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let raw = match &value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Null => Some(0.0),
        _ => None,
    };
    raw.map(clamp_level)
        .ok_or_else(|| D::Error::custom(format!("invalid skill level: {}", value)))
}

/// Variant-specific content of a block.
///
/// Tags outside the fixed set are kept as an open field mapping so rows
/// written by newer builders still round-trip.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockContent {
    Hero(HeadlineContent),
    Glitch(HeadlineContent),
    Terminal(TextContent),
    Bio(TextContent),
    Project(ProjectContent),
    Socials(SocialsContent),
    Skills(SkillsContent),
    Video(VideoContent),
    Clicker(ClickerContent),
    Code(CodeContent),
    Timeline(TimelineContent),
    Stack(StackContent),
    Other {
        tag: String,
        fields: Map<String, Value>,
    },
}

impl BlockContent {
    pub fn kind(&self) -> Option<BlockKind> {
        Some(match self {
            BlockContent::Hero(_) => BlockKind::Hero,
            BlockContent::Glitch(_) => BlockKind::Glitch,
            BlockContent::Terminal(_) => BlockKind::Terminal,
            BlockContent::Bio(_) => BlockKind::Bio,
            BlockContent::Project(_) => BlockKind::Project,
            BlockContent::Socials(_) => BlockKind::Socials,
            BlockContent::Skills(_) => BlockKind::Skills,
            BlockContent::Video(_) => BlockKind::Video,
            BlockContent::Clicker(_) => BlockKind::Clicker,
            BlockContent::Code(_) => BlockKind::Code,
            BlockContent::Timeline(_) => BlockKind::Timeline,
            BlockContent::Stack(_) => BlockKind::Stack,
            BlockContent::Other { .. } => return None,
        })
    }

    /// Wire tag, including unknown ones.
    pub fn tag(&self) -> &str {
        match self {
            BlockContent::Other { tag, .. } => tag,
            known => known.kind().map(BlockKind::as_str).unwrap_or_default(),
        }
    }

    /// The `title` field, for variants that carry one.
    pub fn title(&self) -> Option<&str> {
        match self {
            BlockContent::Hero(c) | BlockContent::Glitch(c) => Some(&c.title),
            BlockContent::Project(c) => Some(&c.title),
            BlockContent::Other { fields, .. } => fields.get("title").and_then(Value::as_str),
            _ => None,
        }
    }

    fn decode(tag: &str, content: Value) -> Result<Self, serde_json::Error> {
        fn typed<T: DeserializeOwned + Default>(value: Value) -> Result<T, serde_json::Error> {
            match value {
                Value::Null => Ok(T::default()),
                other => serde_json::from_value(other),
            }
        }

        let Ok(kind) = tag.parse::<BlockKind>() else {
            let fields = match content {
                Value::Object(map) => map,
                _ => Map::new(),
            };
            return Ok(BlockContent::Other {
                tag: tag.to_string(),
                fields,
            });
        };

        Ok(match kind {
            BlockKind::Hero => BlockContent::Hero(typed(content)?),
            BlockKind::Glitch => BlockContent::Glitch(typed(content)?),
            BlockKind::Terminal => BlockContent::Terminal(typed(content)?),
            BlockKind::Bio => BlockContent::Bio(typed(content)?),
            BlockKind::Project => BlockContent::Project(typed(content)?),
            BlockKind::Socials => BlockContent::Socials(typed(content)?),
            BlockKind::Skills => BlockContent::Skills(typed(content)?),
            BlockKind::Video => BlockContent::Video(typed(content)?),
            BlockKind::Clicker => BlockContent::Clicker(typed(content)?),
            BlockKind::Code => BlockContent::Code(typed(content)?),
            BlockKind::Timeline => BlockContent::Timeline(typed(content)?),
            BlockKind::Stack => BlockContent::Stack(typed(content)?),
        })
    }
}

impl Serialize for BlockContent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            BlockContent::Hero(c) | BlockContent::Glitch(c) => c.serialize(serializer),
            BlockContent::Terminal(c) | BlockContent::Bio(c) => c.serialize(serializer),
            BlockContent::Project(c) => c.serialize(serializer),
            BlockContent::Socials(c) => c.serialize(serializer),
            BlockContent::Skills(c) => c.serialize(serializer),
            BlockContent::Video(c) => c.serialize(serializer),
            BlockContent::Clicker(c) => c.serialize(serializer),
            BlockContent::Code(c) => c.serialize(serializer),
            BlockContent::Timeline(c) => c.serialize(serializer),
            BlockContent::Stack(c) => c.serialize(serializer),
            BlockContent::Other { fields, .. } => fields.serialize(serializer),
        }
    }
}

// ============================================================================
// Blocks
// ============================================================================

/// Background and foreground colours of a block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockStyle {
    #[serde(rename = "bg", deserialize_with = "null_as_default")]
    pub background: String,
    #[serde(rename = "color", deserialize_with = "null_as_default")]
    pub foreground: String,
}

impl BlockStyle {
    pub fn new(background: impl Into<String>, foreground: impl Into<String>) -> Self {
        Self {
            background: background.into(),
            foreground: foreground.into(),
        }
    }
}

/// One styleable content unit of a page.
///
/// Serialized as `{"id", "type", "content", "styles": {"bg", "color"}}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawBlock")]
pub struct Block {
    id: String,
    content: BlockContent,
    pub style: BlockStyle,
}

impl Block {
    pub fn with_content(id: impl Into<String>, content: BlockContent, style: BlockStyle) -> Self {
        Self {
            id: id.into(),
            content,
            style,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> Option<BlockKind> {
        self.content.kind()
    }

    pub fn tag(&self) -> &str {
        self.content.tag()
    }

    pub fn content(&self) -> &BlockContent {
        &self.content
    }

    // The variant never changes after creation; only the editor mutates fields.
    pub(crate) fn content_mut(&mut self) -> &mut BlockContent {
        &mut self.content
    }
}

impl Serialize for Block {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Block", 4)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("type", self.content.tag())?;
        state.serialize_field("content", &self.content)?;
        state.serialize_field("styles", &self.style)?;
        state.end()
    }
}

#[derive(Deserialize)]
struct RawBlock {
    #[serde(default, deserialize_with = "null_as_default")]
    id: String,
    #[serde(rename = "type")]
    tag: String,
    #[serde(default)]
    content: Value,
    #[serde(default, deserialize_with = "null_as_default")]
    styles: BlockStyle,
}

impl TryFrom<RawBlock> for Block {
    type Error = serde_json::Error;

    fn try_from(raw: RawBlock) -> Result<Self, Self::Error> {
        Ok(Block {
            content: BlockContent::decode(&raw.tag, raw.content)?,
            id: raw.id,
            style: raw.styles,
        })
    }
}

/// Serialize a block sequence to the text stored in a page row.
pub fn encode_blocks(blocks: &[Block]) -> Result<String, serde_json::Error> {
    serde_json::to_string(blocks)
}

/// Parse the text stored in a page row.
pub fn decode_blocks(text: &str) -> Result<Vec<Block>, serde_json::Error> {
    serde_json::from_str(text)
}
