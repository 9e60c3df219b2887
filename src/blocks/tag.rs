//! Single display tag summarising the kinds of blocks on a page.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::{Block, BlockKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tag {
    Code,
    Terminal,
    Video,
    #[serde(rename = "Projet")]
    Project,
    Skills,
    Hacker,
    Portfolio,
}

impl Tag {
    pub fn label(self) -> &'static str {
        match self {
            Tag::Code => "Code",
            Tag::Terminal => "Terminal",
            Tag::Video => "Video",
            Tag::Project => "Projet",
            Tag::Skills => "Skills",
            Tag::Hacker => "Hacker",
            Tag::Portfolio => "Portfolio",
        }
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Checked in order; the first kind present decides the tag.
const PRIORITY: [(BlockKind, Tag); 6] = [
    (BlockKind::Code, Tag::Code),
    (BlockKind::Terminal, Tag::Terminal),
    (BlockKind::Video, Tag::Video),
    (BlockKind::Project, Tag::Project),
    (BlockKind::Skills, Tag::Skills),
    (BlockKind::Glitch, Tag::Hacker),
];

pub fn derive_tag(blocks: &[Block]) -> Tag {
    let present: HashSet<BlockKind> = blocks.iter().filter_map(Block::kind).collect();
    PRIORITY
        .iter()
        .find(|(kind, _)| present.contains(kind))
        .map(|(_, tag)| *tag)
        .unwrap_or(Tag::Portfolio)
}
