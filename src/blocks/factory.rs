//! Default content and colours for freshly added blocks.

use serde_json::Map;
use uuid::Uuid;

use super::{
    Block, BlockContent, BlockKind, BlockStyle, ClickerContent, CodeContent, HeadlineContent,
    ProjectContent, Skill, SkillsContent, SocialsContent, StackContent, TextContent,
    TimelineContent, TimelineEntry, VideoContent,
};

const LIGHT_BACKGROUND: &str = "#ffffff";
const LIGHT_FOREGROUND: &str = "#0f172a";

/// Canonical colours of a variant.
pub fn default_style(kind: BlockKind) -> BlockStyle {
    match kind {
        BlockKind::Terminal => BlockStyle::new("#000000", "#22c55e"),
        BlockKind::Code => BlockStyle::new("#1e1e1e", "#93c5fd"),
        BlockKind::Glitch => BlockStyle::new("#000000", "#00ff41"),
        _ => BlockStyle::new(LIGHT_BACKGROUND, LIGHT_FOREGROUND),
    }
}

/// Placeholder content a student edits after adding the block.
pub fn default_content(kind: BlockKind) -> BlockContent {
    match kind {
        BlockKind::Hero => BlockContent::Hero(HeadlineContent {
            title: "Mon Portfolio".to_string(),
            subtitle: "Étudiant(e) en MMI".to_string(),
        }),
        BlockKind::Glitch => BlockContent::Glitch(HeadlineContent {
            title: "CYBER_DEV".to_string(),
            subtitle: "> system.init()".to_string(),
        }),
        BlockKind::Terminal => BlockContent::Terminal(TextContent {
            text: "> Bonjour, je suis prêt(e) à coder.".to_string(),
        }),
        BlockKind::Bio => BlockContent::Bio(TextContent {
            text: "Parlez de vous, de vos passions et de vos projets.".to_string(),
        }),
        BlockKind::Project => BlockContent::Project(ProjectContent {
            title: "Mon projet".to_string(),
            desc: "Décrivez votre projet en quelques lignes.".to_string(),
            image: String::new(),
        }),
        BlockKind::Socials => BlockContent::Socials(SocialsContent::default()),
        BlockKind::Skills => BlockContent::Skills(SkillsContent {
            list: vec![
                Skill {
                    name: "HTML / CSS".to_string(),
                    level: 80,
                },
                Skill {
                    name: "JavaScript".to_string(),
                    level: 60,
                },
                Skill {
                    name: "Design".to_string(),
                    level: 70,
                },
            ],
        }),
        BlockKind::Video => BlockContent::Video(VideoContent::default()),
        BlockKind::Clicker => BlockContent::Clicker(ClickerContent {
            label: "Clique-moi !".to_string(),
            message: "Bravo !".to_string(),
        }),
        BlockKind::Code => BlockContent::Code(CodeContent {
            code: "console.log(\"Hello MMI\");".to_string(),
        }),
        BlockKind::Timeline => BlockContent::Timeline(TimelineContent {
            items: vec![TimelineEntry {
                date: "2026".to_string(),
                title: "Journée Portes Ouvertes".to_string(),
                text: "Première visite à l'IUT.".to_string(),
            }],
        }),
        BlockKind::Stack => BlockContent::Stack(StackContent {
            items: vec!["Figma".to_string(), "VS Code".to_string()],
        }),
    }
}

/// Same as [`default_style`] for an arbitrary tag; unknown tags get the light scheme.
pub fn default_style_for_tag(tag: &str) -> BlockStyle {
    match tag.parse::<BlockKind>() {
        Ok(kind) => default_style(kind),
        Err(_) => BlockStyle::new(LIGHT_BACKGROUND, LIGHT_FOREGROUND),
    }
}

/// Same as [`default_content`] for an arbitrary tag; unknown tags get an empty mapping.
pub fn default_content_for_tag(tag: &str) -> BlockContent {
    match tag.parse::<BlockKind>() {
        Ok(kind) => default_content(kind),
        Err(_) => BlockContent::Other {
            tag: tag.to_string(),
            fields: Map::new(),
        },
    }
}

impl Block {
    /// A new block of `kind` with a fresh id and default content.
    pub fn new(kind: BlockKind) -> Self {
        Block::with_content(
            Uuid::new_v4().to_string(),
            default_content(kind),
            default_style(kind),
        )
    }

    /// A new block for any tag, known or not.
    pub fn from_tag(tag: &str) -> Self {
        Block::with_content(
            Uuid::new_v4().to_string(),
            default_content_for_tag(tag),
            default_style_for_tag(tag),
        )
    }
}
