/*!
# Quill - A Private Diary

Quill keeps dated diary entries encrypted on disk and scores their mood with
local sentence classifiers.

## Usage

```
quill [OPTIONS] <COMMAND>

Commands:
  new       Write a new entry. Each TEXT argument becomes one paragraph
  list      List entries, newest first
  show      Print one entry
  share     Print an entry as plain text for sharing
  delete    Delete an entry and its images
  analyze   Score the mood of one entry, or of every entry with --all
  stats     Writing statistics and the mood chart
  settings  Show or change settings

Options:
  -v, --verbose  Print verbose output
```

## Configuration

See [`quill::config`] for the environment variables.
*/

use chrono::{DateTime, TimeZone, Utc};
use quill::analytics::{CorpusStats, MoodSeries};
use quill::cache::ImageCache;
use quill::cli::{parse_date, CliArgs, Command};
use quill::config::Config;
use quill::constants::{TRACING_ROOT_SPAN_NAME, TRACING_SERVICE_NAME};
use quill::errors::{AppError, AppResult, ClassifierError};
use quill::lock::DeviceUnavailable;
use quill::ops::{self, Journal, NewEntry};
use std::sync::Arc;
use tracing::{debug, error, info, info_span};
use uuid::Uuid;

/// Entry point: parses arguments, sets up logging, opens the journal and runs
/// the command. Errors are logged once here and returned.
fn main() -> AppResult<()> {
    let now = Utc::now();
    let args = CliArgs::parse();

    let mut config = Config::load()?;
    if args.verbose {
        config.log_level = "debug".to_string();
    }
    config.validate()?;
    // Dropped last, after the error below has been reported.
    let _telemetry = quill::logging::init(&config)?;

    let invocation_id = Uuid::new_v4();
    let span = info_span!(
        TRACING_ROOT_SPAN_NAME,
        service = TRACING_SERVICE_NAME,
        invocation_id = %invocation_id
    );
    let _guard = span.enter();
    debug!("CLI arguments: {:?}", args);

    let result = run(args.command, &config, now);
    if let Err(e) = &result {
        error!("{}", e);
    }
    result
}

fn run(command: Command, config: &Config, now: DateTime<Utc>) -> AppResult<()> {
    let mut journal = Journal::open(config, Arc::new(DeviceUnavailable), now)?;

    match command {
        Command::New {
            heading,
            date,
            size,
            images,
            dividers,
            text,
        } => {
            let date = match date {
                Some(date) => entry_date(&date)?,
                None => now,
            };
            let entry = ops::create_entry(
                &journal.entries(),
                NewEntry {
                    heading,
                    date,
                    size: size.into(),
                    paragraphs: text,
                    images: ops::read_images(&images)?,
                    dividers,
                },
            )?;
            println!("{}", entry.id);
        }
        Command::List => {
            for entry in ops::list_entries(&journal.entries())? {
                println!("{}", ops::render_list_line(&entry));
            }
        }
        Command::Show { id } => {
            let entry = ops::find_entry(&journal.entries(), &id)?;
            let mut cache = ImageCache::default();
            print!("{}", ops::render_entry(&entry, &mut cache));
        }
        Command::Share { id } => {
            let entry = ops::find_entry(&journal.entries(), &id)?;
            print!("{}", entry.share_text());
        }
        Command::Delete { id } => {
            let entry = ops::delete_entry(&journal.entries(), &id)?;
            println!("Deleted {}", entry.id);
        }
        Command::Analyze { id, all } => {
            let entries = if all {
                ops::list_entries(&journal.entries())?
            } else {
                let id = id.unwrap_or_default();
                vec![ops::find_entry(&journal.entries(), &id)?]
            };

            let scorer = quill::ai::load_scorer(config);
            match ops::analyze_entries(&journal.entries(), &scorer, entries) {
                Ok(analyzed) => {
                    for (entry, report) in &analyzed {
                        print!("{}", ops::render_analysis(entry, report));
                    }
                }
                Err(AppError::Classifier(e @ ClassifierError::Unavailable { .. })) => {
                    println!("Mood analytics are unavailable: {}", e);
                }
                Err(e) => return Err(e),
            }
        }
        Command::Stats => {
            let entries = ops::list_entries(&journal.entries())?;
            let stats = CorpusStats::compute(&entries);
            let series = MoodSeries::from_entries(&entries);
            print!("{}", ops::render_stats(&stats, &series));
        }
        Command::Settings {
            require_unlock,
            auto_delete,
        } => {
            if require_unlock.is_some() || auto_delete.is_some() {
                journal.update_settings(
                    |settings| {
                        if let Some(require) = require_unlock {
                            settings.require_biometric_unlock = require;
                        }
                        if let Some(period) = auto_delete {
                            settings.auto_delete = period;
                        }
                    },
                    now,
                )?;
            }
            let settings = journal.settings();
            println!("require-unlock: {}", settings.require_biometric_unlock);
            println!("auto-delete: {}", settings.auto_delete);
        }
    }

    info!("Command completed");
    Ok(())
}

/// Noon UTC on the given day.
fn entry_date(date: &str) -> AppResult<DateTime<Utc>> {
    let day = parse_date(date)
        .map_err(|e| AppError::Journal(format!("Invalid date format: {}", e)))?;
    let noon = day
        .and_hms_opt(12, 0, 0)
        .ok_or_else(|| AppError::Journal(format!("Invalid date: {}", date)))?;
    Ok(Utc.from_utc_datetime(&noon))
}
