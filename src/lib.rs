/*!
# Quill

Quill is a private diary. Entries are dated and made of text, image and
divider blocks. Everything is sealed with a local key before it reaches the
database, the journal can require device authentication to open, and entry
text can be scored for mood by sentence classifiers running on a local
Ollama server.

## Core Features

- Write entries as ordered text, image and divider blocks
- Encrypt every entry and image at rest
- Score mood per sentence and aggregate it per entry
- Writing statistics and a smoothed mood-over-time series
- Optional unlock requirement and auto-delete after inactivity

## Architecture

- `entry`: the content-block entry model and its persisted shape
- `mood`: sentence segmentation, classifier seams and mood scoring
- `analytics`: corpus statistics and mood series
- `ai`: classifiers backed by Ollama
- `store`, `db`: the object store and its SQLite implementation
- `crypto`: the entry key and sealing
- `settings`, `retention`, `lock`: user settings and what they govern
- `telemetry`, `logging`: crash reports and tracing setup
- `cache`: bounded image cache
- `config`, `cli`, `ops`: configuration, argument parsing and commands

## Usage Example

```rust,no_run
use quill::entry::{ContentBlock, Entry, TextSize};
use quill::lock::DeviceUnavailable;
use quill::ops::Journal;
use quill::store::ObjectStore;
use quill::Config;
use std::sync::Arc;

fn main() -> quill::AppResult<()> {
    let config = Config::load()?;
    let journal = Journal::open(&config, Arc::new(DeviceUnavailable), chrono::Utc::now())?;

    let entry = Entry::with_blocks(
        "Tuesday",
        chrono::Utc::now(),
        vec![ContentBlock::text(TextSize::H3, "Long walk by the river.")],
    );
    journal.entries().insert(&entry)
}
```
*/

pub mod ai;
pub mod analytics;
pub mod cache;
/// Command-line interface for parsing and handling user arguments
pub mod cli;
/// Configuration loading and management
pub mod config;
pub mod constants;
pub mod crypto;
pub mod db;
pub mod entry;
/// Error types and utilities for error handling
pub mod errors;
pub mod lock;
pub mod logging;
pub mod mood;
pub mod ops;
pub mod retention;
pub mod settings;
pub mod store;
pub mod telemetry;

// Re-export important types for convenience
pub use cli::CliArgs;
pub use config::Config;
pub use entry::{ContentBlock, Entry};
pub use errors::{AppError, AppResult};
