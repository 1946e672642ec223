//! Writing, finding and printing entries.

use crate::cache::ImageCache;
use crate::constants::DATE_FORMAT_ISO;
use crate::entry::{ContentBlock, DividerStyle, Entry, TextSize};
use crate::errors::{AppError, AppResult, StoreError};
use crate::mood::mood_to_scale;
use crate::store::ObjectStore;
use chrono::{DateTime, Utc};
use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};

/// What the user asked to write.
#[derive(Debug, Clone)]
pub struct NewEntry {
    pub heading: String,
    pub date: DateTime<Utc>,
    pub size: TextSize,
    pub paragraphs: Vec<String>,
    pub images: Vec<Vec<u8>>,
    /// Put a divider between consecutive paragraphs.
    pub dividers: bool,
}

impl NewEntry {
    /// Lays the parts out as blocks: paragraphs first, then one image group.
    pub fn into_entry(self) -> Entry {
        let mut blocks = Vec::new();
        for (index, paragraph) in self.paragraphs.into_iter().enumerate() {
            if self.dividers && index > 0 {
                blocks.push(ContentBlock::divider(DividerStyle::Thin));
            }
            blocks.push(ContentBlock::text(self.size, paragraph));
        }
        if !self.images.is_empty() {
            blocks.push(ContentBlock::images(self.images));
        }
        Entry::with_blocks(self.heading, self.date, blocks)
    }
}

/// Reads image files for a new entry.
pub fn read_images(paths: &[PathBuf]) -> AppResult<Vec<Vec<u8>>> {
    paths
        .iter()
        .map(|path| {
            fs::read(path).map_err(|e| {
                AppError::Io(std::io::Error::new(
                    e.kind(),
                    format!("Failed to read image {}: {}", path.display(), e),
                ))
            })
        })
        .collect()
}

pub fn create_entry(store: &dyn ObjectStore<Entry>, new_entry: NewEntry) -> AppResult<Entry> {
    let entry = new_entry.into_entry();
    store.insert(&entry)?;
    info!("Created entry {} with {} blocks", entry.id, entry.block_count());
    Ok(entry)
}

/// All entries, newest first.
pub fn list_entries(store: &dyn ObjectStore<Entry>) -> AppResult<Vec<Entry>> {
    let mut entries = store.fetch_all()?;
    entries.sort_by(|a, b| b.date.cmp(&a.date));
    Ok(entries)
}

/// Finds the entry whose id is, or starts with, `id_prefix`.
///
/// # Errors
///
/// `StoreError::NotFound` when nothing matches, `AppError::Journal` when the
/// prefix matches more than one entry.
pub fn find_entry(store: &dyn ObjectStore<Entry>, id_prefix: &str) -> AppResult<Entry> {
    let prefix = id_prefix.trim().to_lowercase();
    if prefix.is_empty() {
        return Err(AppError::Journal("Entry id cannot be empty".to_string()));
    }

    let mut matches = store.fetch_by_key_prefix(&prefix)?;
    match matches.len() {
        0 => Err(StoreError::NotFound(format!("entry {}", id_prefix)).into()),
        1 => Ok(matches.remove(0)),
        n => Err(AppError::Journal(format!(
            "Entry id '{}' is ambiguous ({} matches), use more characters",
            id_prefix, n
        ))),
    }
}

pub fn delete_entry(store: &dyn ObjectStore<Entry>, id_prefix: &str) -> AppResult<Entry> {
    let entry = find_entry(store, id_prefix)?;
    store.delete(&entry)?;
    info!("Deleted entry {}", entry.id);
    Ok(entry)
}

/// What `show` prints for an attached image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePreview {
    pub format: &'static str,
    pub bytes: usize,
}

impl ImagePreview {
    pub fn from_bytes(data: &[u8]) -> Self {
        let format = if data.starts_with(b"\x89PNG\r\n\x1a\n") {
            "png"
        } else if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            "jpeg"
        } else if data.starts_with(b"GIF8") {
            "gif"
        } else if data.len() >= 12 && &data[4..8] == b"ftyp" {
            "heic"
        } else {
            "unknown"
        };
        Self {
            format,
            bytes: data.len(),
        }
    }
}

impl std::fmt::Display for ImagePreview {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.bytes >= 1024 * 1024 {
            write!(f, "{} {:.1} MiB", self.format, self.bytes as f64 / (1024.0 * 1024.0))
        } else if self.bytes >= 1024 {
            write!(f, "{} {:.1} KiB", self.format, self.bytes as f64 / 1024.0)
        } else {
            write!(f, "{} {} B", self.format, self.bytes)
        }
    }
}

/// One line of `list` output.
pub fn render_list_line(entry: &Entry) -> String {
    let id = entry.id.to_string();
    let mood = entry
        .mood()
        .map(|mood| format!("mood {}/10", mood_to_scale(mood)))
        .unwrap_or_else(|| "mood -".to_string());
    format!(
        "{}  {}  {}  ({})",
        &id[..8],
        entry.date.format(DATE_FORMAT_ISO),
        entry.heading,
        mood
    )
}

/// Full text rendering of an entry for `show`.
pub fn render_entry(entry: &Entry, cache: &mut ImageCache<ImagePreview>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# {}", entry.heading);
    let _ = writeln!(out, "{}", entry.date.format("%A, %B %-d, %Y"));
    if let Some(mood) = entry.mood() {
        let _ = writeln!(out, "Mood: {}/10", mood_to_scale(mood));
    }
    out.push('\n');

    for block in entry.ordered_content() {
        match block {
            ContentBlock::Text(text) => {
                let marker = match text.size {
                    TextSize::H1 => "## ",
                    TextSize::H2 => "### ",
                    TextSize::H3 => "",
                };
                let _ = writeln!(out, "{}{}", marker, text.content);
            }
            ContentBlock::Images(images) => {
                let previews: Vec<String> = images
                    .content
                    .iter()
                    .map(|data| {
                        cache
                            .get_or_insert_with(data, |data| {
                                let preview = ImagePreview::from_bytes(data);
                                let cost = preview.bytes;
                                (preview, cost)
                            })
                            .to_string()
                    })
                    .collect();
                let _ = writeln!(out, "[{} image(s): {}]", previews.len(), previews.join(", "));
            }
            ContentBlock::Divider(divider) => {
                let rule = match divider.style {
                    DividerStyle::Thick => "━━━━━━━━━━",
                    DividerStyle::Thin => "──────────",
                };
                let _ = writeln!(out, "{}", rule);
            }
        }
    }
    debug!("Rendered entry {} ({} cached previews)", entry.id, cache.len());
    out
}
