//! Content blocks, the atomic units of an entry.
//!
//! A block is one of three closed variants. Routing by variant is always an
//! exhaustive `match`, so there is no "unclassifiable block" path.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Identifier of a block, unique within one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(Uuid);

impl BlockId {
    /// Generates a fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for BlockId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for BlockId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for BlockId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Heading level of a text block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextSize {
    H1,
    H2,
    /// Body text.
    #[default]
    H3,
}

/// Weight of a divider line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DividerStyle {
    Thick,
    #[default]
    Thin,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextBlock {
    pub id: BlockId,
    pub size: TextSize,
    pub content: String,
}

/// An ordered group of binary image payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageBlock {
    pub id: BlockId,
    pub content: Vec<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DividerBlock {
    pub id: BlockId,
    pub style: DividerStyle,
}

/// Tag naming which variant a [`BlockRef`] points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Text,
    Images,
    Divider,
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockKind::Text => write!(f, "text"),
            BlockKind::Images => write!(f, "images"),
            BlockKind::Divider => write!(f, "divider"),
        }
    }
}

/// Lightweight pointer to a block: its id plus its variant tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockRef {
    pub id: BlockId,
    pub kind: BlockKind,
}

/// A piece of entry content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentBlock {
    Text(TextBlock),
    Images(ImageBlock),
    Divider(DividerBlock),
}

impl ContentBlock {
    /// Creates a text block with a fresh id.
    pub fn text(size: TextSize, content: impl Into<String>) -> Self {
        ContentBlock::Text(TextBlock {
            id: BlockId::new(),
            size,
            content: content.into(),
        })
    }

    /// Creates an image block with a fresh id.
    pub fn images(content: Vec<Vec<u8>>) -> Self {
        ContentBlock::Images(ImageBlock {
            id: BlockId::new(),
            content,
        })
    }

    /// Creates a divider with a fresh id.
    pub fn divider(style: DividerStyle) -> Self {
        ContentBlock::Divider(DividerBlock {
            id: BlockId::new(),
            style,
        })
    }

    pub fn id(&self) -> BlockId {
        match self {
            ContentBlock::Text(block) => block.id,
            ContentBlock::Images(block) => block.id,
            ContentBlock::Divider(block) => block.id,
        }
    }

    pub fn kind(&self) -> BlockKind {
        match self {
            ContentBlock::Text(_) => BlockKind::Text,
            ContentBlock::Images(_) => BlockKind::Images,
            ContentBlock::Divider(_) => BlockKind::Divider,
        }
    }

    /// Returns the order-list pointer for this block.
    pub fn block_ref(&self) -> BlockRef {
        BlockRef {
            id: self.id(),
            kind: self.kind(),
        }
    }
}

impl From<TextBlock> for ContentBlock {
    fn from(block: TextBlock) -> Self {
        ContentBlock::Text(block)
    }
}

impl From<ImageBlock> for ContentBlock {
    fn from(block: ImageBlock) -> Self {
        ContentBlock::Images(block)
    }
}

impl From<DividerBlock> for ContentBlock {
    fn from(block: DividerBlock) -> Self {
        ContentBlock::Divider(block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_ref_matches_variant() {
        let text = ContentBlock::text(TextSize::H1, "Title");
        let images = ContentBlock::images(vec![vec![1, 2, 3]]);
        let divider = ContentBlock::divider(DividerStyle::Thick);

        assert_eq!(text.block_ref().kind, BlockKind::Text);
        assert_eq!(images.block_ref().kind, BlockKind::Images);
        assert_eq!(divider.block_ref().kind, BlockKind::Divider);
        assert_eq!(text.block_ref().id, text.id());
    }

    #[test]
    fn test_fresh_ids_are_distinct() {
        let a = ContentBlock::divider(DividerStyle::Thin);
        let b = ContentBlock::divider(DividerStyle::Thin);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_block_id_parse_roundtrip() {
        let id = BlockId::new();
        let parsed: BlockId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
        assert!("not-a-uuid".parse::<BlockId>().is_err());
    }

    #[test]
    fn test_tags_serialize_lowercase() {
        assert_eq!(serde_json::to_string(&BlockKind::Images).unwrap(), "\"images\"");
        assert_eq!(serde_json::to_string(&TextSize::H2).unwrap(), "\"h2\"");
        assert_eq!(
            serde_json::to_string(&DividerStyle::Thick).unwrap(),
            "\"thick\""
        );
    }
}
