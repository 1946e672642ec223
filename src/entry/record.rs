//! Persisted shape of an entry.
//!
//! On disk an entry keeps an order list of [`BlockRef`]s next to one unordered
//! collection per block variant, so image payloads can be stored apart from the
//! rest of the record. The order list is the only source of ordering truth.
//!
//! Converting back to an [`Entry`] treats the order list as authoritative:
//! a ref without a backing block is logged and skipped, and a typed block that
//! no ref points at is logged and dropped.

use super::{
    BlockId, BlockKind, BlockRef, ContentBlock, DividerBlock, Entry, EntryId, ImageBlock, TextBlock,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredEntry {
    pub id: EntryId,
    pub heading: String,
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<f64>,
    pub order: Vec<BlockRef>,
    #[serde(default)]
    pub text_blocks: Vec<TextBlock>,
    #[serde(default)]
    pub image_blocks: Vec<ImageBlock>,
    #[serde(default)]
    pub divider_blocks: Vec<DividerBlock>,
}

impl StoredEntry {
    /// Splits an entry into the order list plus typed collections.
    pub fn from_entry(entry: &Entry) -> Self {
        let mut stored = StoredEntry {
            id: entry.id,
            heading: entry.heading.clone(),
            date: entry.date,
            mood: entry.mood(),
            order: Vec::with_capacity(entry.block_count()),
            text_blocks: Vec::new(),
            image_blocks: Vec::new(),
            divider_blocks: Vec::new(),
        };
        for block in entry.ordered_content() {
            stored.order.push(block.block_ref());
            match block {
                ContentBlock::Text(text) => stored.text_blocks.push(text.clone()),
                ContentBlock::Images(images) => stored.image_blocks.push(images.clone()),
                ContentBlock::Divider(divider) => stored.divider_blocks.push(divider.clone()),
            }
        }
        stored
    }

    /// Rebuilds the ordered entry from the order list.
    pub fn into_entry(self) -> Entry {
        let mut text: HashMap<BlockId, TextBlock> =
            self.text_blocks.into_iter().map(|b| (b.id, b)).collect();
        let mut images: HashMap<BlockId, ImageBlock> =
            self.image_blocks.into_iter().map(|b| (b.id, b)).collect();
        let mut dividers: HashMap<BlockId, DividerBlock> =
            self.divider_blocks.into_iter().map(|b| (b.id, b)).collect();

        let mut entry = Entry::new(self.heading, self.date);
        entry.id = self.id;
        entry.set_mood(self.mood);

        for block_ref in &self.order {
            let block = match block_ref.kind {
                BlockKind::Text => text.remove(&block_ref.id).map(ContentBlock::from),
                BlockKind::Images => images.remove(&block_ref.id).map(ContentBlock::from),
                BlockKind::Divider => dividers.remove(&block_ref.id).map(ContentBlock::from),
            };
            match block {
                Some(block) => {
                    entry.append(block);
                }
                None => warn!(
                    "Entry {} references missing {} block {}; skipping",
                    self.id, block_ref.kind, block_ref.id
                ),
            }
        }

        let orphans = text.len() + images.len() + dividers.len();
        if orphans > 0 {
            warn!(
                "Entry {} has {} blocks outside its order list; dropping them",
                self.id, orphans
            );
        }

        entry
    }
}
