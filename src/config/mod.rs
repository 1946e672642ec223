//! Configuration management for the quill application.
//!
//! This module loads and validates configuration from environment variables,
//! with sensible defaults. Configuration covers where data lives, which
//! classifier server and models to use, where crash reports go, and logging.
//! User-facing settings such as the unlock requirement are persisted records,
//! see [`crate::settings`].
//!
//! # Environment Variables
//!
//! - `QUILL_DIR`: Data directory holding the database and key (defaults to ~/.local/share/quill)
//! - `QUILL_OLLAMA_URL`: Classifier server (defaults to http://127.0.0.1:11434)
//! - `QUILL_EMOTION_MODEL`, `QUILL_SENTIMENT_MODEL`: Model names
//! - `QUILL_TELEMETRY_URL`: Crash-report endpoint; reporting is off when unset
//! - `QUILL_LOG_LEVEL`: Default log filter (`RUST_LOG` still wins)
//! - `QUILL_LOG_FORMAT`: `text` or `json`
//! - `HOME`: Used for expanding the default data directory path

use crate::constants::{
    DATABASE_FILE_NAME, DEFAULT_DATA_SUBDIR, DEFAULT_EMOTION_MODEL, DEFAULT_LOG_LEVEL,
    DEFAULT_OLLAMA_URL, DEFAULT_SENTIMENT_MODEL, ENV_VAR_EMOTION_MODEL, ENV_VAR_HOME,
    ENV_VAR_LOG_FORMAT, ENV_VAR_LOG_LEVEL, ENV_VAR_OLLAMA_URL, ENV_VAR_QUILL_DIR,
    ENV_VAR_SENTIMENT_MODEL, ENV_VAR_TELEMETRY_URL, KEY_FILE_NAME, LOG_FORMAT_JSON,
    LOG_FORMAT_TEXT, REDACTED_PLACEHOLDER,
};
use crate::errors::{AppError, AppResult};
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Configuration for the quill application.
///
/// # Examples
///
/// ```
/// use quill::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     data_dir: PathBuf::from("/var/lib/quill"),
///     ..Config::default()
/// };
/// assert!(config.validate().is_ok());
/// assert_eq!(config.db_path(), PathBuf::from("/var/lib/quill/quill.db"));
/// ```
#[derive(Clone, PartialEq)]
pub struct Config {
    /// Directory holding the database and the entry key.
    pub data_dir: PathBuf,

    /// Base URL of the Ollama server.
    pub ollama_url: String,

    /// Model answering "is this sentence emotional?".
    pub emotion_model: String,

    /// Model producing sentiment label probabilities.
    pub sentiment_model: String,

    /// Crash-report endpoint. `None` disables reporting.
    pub telemetry_url: Option<String>,

    /// Default log filter directive.
    pub log_level: String,

    /// `text` or `json`.
    pub log_format: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("data_dir", &REDACTED_PLACEHOLDER)
            .field("ollama_url", &self.ollama_url)
            .field("emotion_model", &self.emotion_model)
            .field("sentiment_model", &self.sentiment_model)
            .field(
                "telemetry_url",
                &self.telemetry_url.as_ref().map(|_| REDACTED_PLACEHOLDER),
            )
            .field("log_level", &self.log_level)
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_dir: PathBuf::from(""),
            ollama_url: DEFAULT_OLLAMA_URL.to_string(),
            emotion_model: DEFAULT_EMOTION_MODEL.to_string(),
            sentiment_model: DEFAULT_SENTIMENT_MODEL.to_string(),
            telemetry_url: None,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_format: LOG_FORMAT_TEXT.to_string(),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

impl Config {
    /// Loads configuration from environment variables with sensible defaults.
    ///
    /// The data directory is expanded with `shellexpand`, so `~` and `$VAR`
    /// references work.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if path expansion fails or the data
    /// directory resolves to an empty path.
    pub fn load() -> AppResult<Self> {
        let data_dir_str = non_empty_var(ENV_VAR_QUILL_DIR).unwrap_or_else(|| {
            let home = env::var(ENV_VAR_HOME).unwrap_or_default();
            format!("{}/{}", home, DEFAULT_DATA_SUBDIR)
        });

        let expanded_path = shellexpand::full(&data_dir_str)
            .map_err(|e| AppError::Config(format!("Failed to expand path: {}", e)))?;
        let data_dir = PathBuf::from(expanded_path.into_owned());

        if data_dir.as_os_str().is_empty() {
            return Err(AppError::Config("Data directory path is empty".to_string()));
        }

        let defaults = Config::default();
        let config = Config {
            data_dir,
            ollama_url: non_empty_var(ENV_VAR_OLLAMA_URL).unwrap_or(defaults.ollama_url),
            emotion_model: non_empty_var(ENV_VAR_EMOTION_MODEL).unwrap_or(defaults.emotion_model),
            sentiment_model: non_empty_var(ENV_VAR_SENTIMENT_MODEL)
                .unwrap_or(defaults.sentiment_model),
            telemetry_url: non_empty_var(ENV_VAR_TELEMETRY_URL),
            log_level: non_empty_var(ENV_VAR_LOG_LEVEL).unwrap_or(defaults.log_level),
            log_format: non_empty_var(ENV_VAR_LOG_FORMAT)
                .map(|format| format.to_lowercase())
                .unwrap_or(defaults.log_format),
        };

        debug!("Loaded configuration: {:?}", config);
        Ok(config)
    }

    /// Validates that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` when the data directory is empty or relative,
    /// a URL is not http(s), a model name is empty, or the log format is unknown.
    pub fn validate(&self) -> AppResult<()> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(AppError::Config("Data directory path is empty".to_string()));
        }

        if !self.data_dir.is_absolute() {
            return Err(AppError::Config(
                "Data directory must be an absolute path".to_string(),
            ));
        }

        validate_url("Ollama URL", &self.ollama_url)?;
        if let Some(url) = &self.telemetry_url {
            validate_url("Telemetry URL", url)?;
        }

        if self.emotion_model.is_empty() || self.sentiment_model.is_empty() {
            return Err(AppError::Config("Model names cannot be empty".to_string()));
        }

        if self.log_format != LOG_FORMAT_TEXT && self.log_format != LOG_FORMAT_JSON {
            return Err(AppError::Config(format!(
                "Unknown log format '{}'. Use '{}' or '{}'",
                self.log_format, LOG_FORMAT_TEXT, LOG_FORMAT_JSON
            )));
        }

        Ok(())
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILE_NAME)
    }

    pub fn key_path(&self) -> PathBuf {
        self.data_dir.join(KEY_FILE_NAME)
    }

    /// Creates the data directory, owner-only on Unix, if it does not exist.
    pub fn ensure_data_dir(&self) -> AppResult<()> {
        ensure_private_dir(&self.data_dir)
    }
}

fn validate_url(what: &str, url: &str) -> AppResult<()> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(AppError::Config(format!(
            "{} must start with http:// or https://",
            what
        )))
    }
}

fn ensure_private_dir(dir: &Path) -> AppResult<()> {
    if dir.exists() {
        return Ok(());
    }

    fs::create_dir_all(dir).map_err(|e| {
        AppError::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to create data directory: {}", e),
        ))
    })?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let permissions = fs::Permissions::from_mode(crate::constants::DEFAULT_DIR_PERMISSIONS);
        fs::set_permissions(dir, permissions).map_err(|e| {
            AppError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to set secure permissions on data directory: {}", e),
            ))
        })?;
    }

    debug!("Created data directory");
    Ok(())
}
