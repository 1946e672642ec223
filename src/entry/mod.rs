//! Diary entries and their ordered, heterogeneous content.
//!
//! An [`Entry`] owns a single ordered sequence of [`ContentBlock`]s. The order of
//! that sequence is the display order. Per-variant views (`text_blocks()`,
//! `image_blocks()`, `divider_blocks()`) and the order list (`refs()`) are derived
//! from it on demand, so they cannot drift apart.
//!
//! The persisted shape, which keeps an order list next to three unordered typed
//! collections, lives in [`record`].
//!
//! Every failure path here is non-fatal: it logs and either does nothing or
//! returns `None`.
//!
//! # Example
//!
//! ```
//! use quill::entry::{ContentBlock, DividerStyle, Entry, TextSize};
//! use chrono::Utc;
//!
//! let mut entry = Entry::new("Sunday", Utc::now());
//! entry.append(ContentBlock::text(TextSize::H3, "Slept in."));
//! entry.append(ContentBlock::divider(DividerStyle::Thin));
//!
//! assert_eq!(entry.ordered_content().len(), 2);
//! assert_eq!(entry.share_text(), "Sunday\nSlept in.\n");
//! ```

pub mod block;
pub mod record;

pub use block::{
    BlockId, BlockKind, BlockRef, ContentBlock, DividerBlock, DividerStyle, ImageBlock, TextBlock,
    TextSize,
};
pub use record::StoredEntry;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};
use uuid::Uuid;

/// Identifier of an entry.
pub type EntryId = Uuid;

/// A dated diary entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub id: EntryId,
    pub heading: String,
    pub date: DateTime<Utc>,
    mood: Option<f64>,
    blocks: Vec<ContentBlock>,
}

impl Entry {
    /// Creates an entry with no content.
    pub fn new(heading: impl Into<String>, date: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            heading: heading.into(),
            date,
            mood: None,
            blocks: Vec::new(),
        }
    }

    /// Creates an entry from an ordered list of blocks.
    pub fn with_blocks(
        heading: impl Into<String>,
        date: DateTime<Utc>,
        blocks: impl IntoIterator<Item = ContentBlock>,
    ) -> Self {
        let mut entry = Self::new(heading, date);
        entry.append_many(blocks);
        entry
    }

    /// Mood computed for this entry, in `[-1, 1]`.
    pub fn mood(&self) -> Option<f64> {
        self.mood
    }

    /// Stores a mood, clamped to `[-1, 1]`. NaN clears the mood.
    pub fn set_mood(&mut self, mood: Option<f64>) {
        self.mood = match mood {
            Some(value) if value.is_nan() => {
                warn!("Ignoring NaN mood for entry {}", self.id);
                None
            }
            Some(value) => Some(value.clamp(-1.0, 1.0)),
            None => None,
        };
    }

    /// Appends a block at the end of the entry.
    ///
    /// Returns `false` without changing anything if a block with the same id is
    /// already present.
    pub fn append(&mut self, block: ContentBlock) -> bool {
        let id = block.id();
        if self.block_exists(id) {
            warn!(
                "Refusing to append block {} to entry {}: id already present",
                id, self.id
            );
            return false;
        }
        self.blocks.push(block);
        true
    }

    /// Appends blocks in iteration order.
    pub fn append_many(&mut self, blocks: impl IntoIterator<Item = ContentBlock>) {
        for block in blocks {
            self.append(block);
        }
    }

    /// Removes the block at `index` in display order.
    pub fn remove_by_index(&mut self, index: usize) -> Option<ContentBlock> {
        let Some(id) = self.blocks.get(index).map(ContentBlock::id) else {
            warn!(
                "Cannot remove block at index {} from entry {}: only {} blocks",
                index,
                self.id,
                self.blocks.len()
            );
            return None;
        };
        self.remove_by_id(id)
    }

    /// Removes the block with `id`, keeping the order of the remaining blocks.
    pub fn remove_by_id(&mut self, id: BlockId) -> Option<ContentBlock> {
        match self.blocks.iter().position(|block| block.id() == id) {
            Some(position) => {
                debug!("Removing block {} from entry {}", id, self.id);
                Some(self.blocks.remove(position))
            }
            None => {
                debug!("No block {} in entry {}", id, self.id);
                None
            }
        }
    }

    /// Resolves an order-list pointer.
    ///
    /// A pointer whose block is missing, or whose tag does not match the block
    /// found, is an invariant violation: it is logged and resolves to `None`.
    pub fn get_block(&self, block_ref: &BlockRef) -> Option<&ContentBlock> {
        let Some(block) = self.blocks.iter().find(|block| block.id() == block_ref.id) else {
            warn!(
                "Entry {} has no {} block {}",
                self.id, block_ref.kind, block_ref.id
            );
            return None;
        };
        if block.kind() != block_ref.kind {
            warn!(
                "Block {} in entry {} is {}, not {}",
                block_ref.id,
                self.id,
                block.kind(),
                block_ref.kind
            );
            return None;
        }
        Some(block)
    }

    pub fn block_exists(&self, id: BlockId) -> bool {
        self.blocks.iter().any(|block| block.id() == id)
    }

    /// Updates the text and/or size of a text block in place.
    ///
    /// Returns `false` if no text block has that id.
    pub fn update_text_block(
        &mut self,
        id: BlockId,
        content: Option<String>,
        size: Option<TextSize>,
    ) -> bool {
        let target = self.blocks.iter_mut().find_map(|block| match block {
            ContentBlock::Text(text) if text.id == id => Some(text),
            _ => None,
        });
        let Some(text) = target else {
            warn!("Entry {} has no text block {}", self.id, id);
            return false;
        };
        if let Some(content) = content {
            text.content = content;
        }
        if let Some(size) = size {
            text.size = size;
        }
        true
    }

    /// All blocks in display order.
    pub fn ordered_content(&self) -> &[ContentBlock] {
        &self.blocks
    }

    /// Replaces the whole content with `blocks`, in the given order.
    pub fn set_ordered_content(&mut self, blocks: impl IntoIterator<Item = ContentBlock>) {
        self.blocks.clear();
        self.append_many(blocks);
    }

    /// Order list: one pointer per block, in display order.
    pub fn refs(&self) -> Vec<BlockRef> {
        self.blocks.iter().map(ContentBlock::block_ref).collect()
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn text_blocks(&self) -> impl Iterator<Item = &TextBlock> {
        self.blocks.iter().filter_map(|block| match block {
            ContentBlock::Text(text) => Some(text),
            _ => None,
        })
    }

    pub fn image_blocks(&self) -> impl Iterator<Item = &ImageBlock> {
        self.blocks.iter().filter_map(|block| match block {
            ContentBlock::Images(images) => Some(images),
            _ => None,
        })
    }

    pub fn divider_blocks(&self) -> impl Iterator<Item = &DividerBlock> {
        self.blocks.iter().filter_map(|block| match block {
            ContentBlock::Divider(divider) => Some(divider),
            _ => None,
        })
    }

    /// Text content of the entry, one line per text block.
    pub fn plain_text(&self) -> String {
        self.text_blocks()
            .map(|text| text.content.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Plain-text rendering handed to the OS share sheet.
    pub fn share_text(&self) -> String {
        format!("{}\n{}\n", self.heading, self.plain_text())
    }
}
