use crate::constants::{APP_DESCRIPTION, APP_NAME};
use crate::entry::TextSize;
use crate::settings::AutoDelete;
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::str::FromStr;

/// A private diary with on-device mood analytics
#[derive(Parser, Debug)]
#[clap(name = APP_NAME, about = APP_DESCRIPTION)]
#[clap(author, version, long_about = None)]
pub struct CliArgs {
    #[clap(subcommand)]
    pub command: Command,

    /// Print verbose output
    #[clap(short = 'v', long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Write a new entry. Each TEXT argument becomes one paragraph.
    New {
        /// Entry heading
        #[clap(long)]
        heading: String,

        /// Entry date (format: YYYY-MM-DD or YYYYMMDD), defaults to now
        #[clap(short = 'd', long)]
        date: Option<String>,

        /// Text size for the paragraphs
        #[clap(long, value_enum, default_value = "h3")]
        size: SizeArg,

        /// Attach an image file; repeat for several
        #[clap(long = "image")]
        images: Vec<PathBuf>,

        /// Separate paragraphs with dividers
        #[clap(long)]
        dividers: bool,

        text: Vec<String>,
    },

    /// List entries, newest first
    List,

    /// Print one entry
    Show {
        /// Entry id or a unique prefix of it
        id: String,
    },

    /// Print an entry as plain text for sharing
    Share { id: String },

    /// Delete an entry and its images
    Delete { id: String },

    /// Score the mood of one entry, or of every entry with --all
    Analyze {
        #[clap(required_unless_present = "all")]
        id: Option<String>,

        #[clap(long, conflicts_with = "id")]
        all: bool,
    },

    /// Writing statistics and the mood chart
    Stats,

    /// Show or change settings
    Settings {
        /// Require device authentication to open the journal
        #[clap(long)]
        require_unlock: Option<bool>,

        /// Delete every entry after this much inactivity (off, 1w, 1m, 3m, 6m, 1y)
        #[clap(long, value_parser = parse_auto_delete)]
        auto_delete: Option<AutoDelete>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SizeArg {
    H1,
    H2,
    H3,
}

impl From<SizeArg> for TextSize {
    fn from(size: SizeArg) -> Self {
        match size {
            SizeArg::H1 => TextSize::H1,
            SizeArg::H2 => TextSize::H2,
            SizeArg::H3 => TextSize::H3,
        }
    }
}

impl CliArgs {
    /// Parse command-line arguments
    pub fn parse() -> Self {
        CliArgs::parse_from(std::env::args())
    }
}

fn parse_auto_delete(value: &str) -> Result<AutoDelete, String> {
    value.parse().map_err(|e: crate::errors::AppError| e.to_string())
}

/// Parses a date in YYYY-MM-DD or YYYYMMDD format.
pub fn parse_date(date_str: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::from_str(date_str).or_else(|_| NaiveDate::parse_from_str(date_str, "%Y%m%d"))
}
