//! High-level operations behind the command line.
//!
//! These functions orchestrate the library pieces: opening the journal
//! (key, database, settings, lock, auto-delete), writing and reading entries,
//! and mood analytics. They return data or rendered text and leave printing
//! to the caller.

pub mod insights;
pub mod journal;
pub mod session;

// Re-export commonly used functions
pub use insights::{analyze_entries, render_analysis, render_stats};
pub use journal::{
    create_entry, delete_entry, find_entry, list_entries, read_images, render_entry,
    render_list_line, ImagePreview, NewEntry,
};
pub use session::Journal;
