//! Constants used throughout the application.
//!
//! This module contains the tunable values of the Quill journal, organized
//! into logical groups. Having constants centralized makes them easier to find,
//! modify, and reference consistently.

// Application Metadata
/// The name of the application.
pub const APP_NAME: &str = "quill";
/// The description of the application used in CLI help text.
pub const APP_DESCRIPTION: &str = "A private diary with on-device mood analytics";

// Configuration Keys & Environment Variables
/// Environment variable for the data directory (database and key file).
pub const ENV_VAR_QUILL_DIR: &str = "QUILL_DIR";
/// Environment variable for the classifier server base URL.
pub const ENV_VAR_OLLAMA_URL: &str = "QUILL_OLLAMA_URL";
/// Environment variable for the emotionality model name.
pub const ENV_VAR_EMOTION_MODEL: &str = "QUILL_EMOTION_MODEL";
/// Environment variable for the sentiment model name.
pub const ENV_VAR_SENTIMENT_MODEL: &str = "QUILL_SENTIMENT_MODEL";
/// Environment variable for the crash-report endpoint. Telemetry is off when unset.
pub const ENV_VAR_TELEMETRY_URL: &str = "QUILL_TELEMETRY_URL";
/// Environment variable for the log level.
pub const ENV_VAR_LOG_LEVEL: &str = "QUILL_LOG_LEVEL";
/// Environment variable for the log format (`json` or `text`).
pub const ENV_VAR_LOG_FORMAT: &str = "QUILL_LOG_FORMAT";
/// Standard environment variable for the user's home directory.
pub const ENV_VAR_HOME: &str = "HOME";
/// Default sub-directory for application data within the user's home directory.
pub const DEFAULT_DATA_SUBDIR: &str = ".local/share/quill";
/// Database file name inside the data directory.
pub const DATABASE_FILE_NAME: &str = "quill.db";
/// Key file name inside the data directory.
pub const KEY_FILE_NAME: &str = "quill.key";
/// Default classifier server.
pub const DEFAULT_OLLAMA_URL: &str = "http://127.0.0.1:11434";
/// Default model used for the emotional/not-emotional gate.
pub const DEFAULT_EMOTION_MODEL: &str = "llama3.2:3b";
/// Default model used for polarity.
pub const DEFAULT_SENTIMENT_MODEL: &str = "llama3.2:3b";

// Logging
/// Log format identifier for plain text.
pub const LOG_FORMAT_TEXT: &str = "text";
/// Log format identifier for JSON.
pub const LOG_FORMAT_JSON: &str = "json";
/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";
/// Placeholder string for redacted information in debug output.
pub const REDACTED_PLACEHOLDER: &str = "[REDACTED]";

// File System Parameters
/// Default POSIX permissions for newly created directories (owner read/write/execute).
#[cfg(unix)]
pub const DEFAULT_DIR_PERMISSIONS: u32 = 0o700;
/// Default POSIX permissions for the key file (owner read/write).
#[cfg(unix)]
pub const DEFAULT_FILE_PERMISSIONS: u32 = 0o600;

// Date/Time Logic
/// Date format string for ISO date format (YYYY-MM-DD).
pub const DATE_FORMAT_ISO: &str = "%Y-%m-%d";

// Sentiment Scoring
/// Sentences with fewer words than this are neutral without consulting a model.
pub const MIN_WORDS_FOR_CLASSIFICATION: usize = 3;
/// Positive/negative probabilities closer than this are too ambiguous to call.
pub const POLARITY_AMBIGUITY_THRESHOLD: f64 = 0.1;
/// Number of hypotheses requested from the sentiment classifier.
pub const SENTIMENT_TOP_K: usize = 3;
/// Label the emotionality classifier uses for "emotional".
pub const EMOTIONAL_LABEL: &str = "Yes";
/// Sentiment label for positive polarity.
pub const POSITIVE_LABEL: &str = "positive";
/// Sentiment label for negative polarity.
pub const NEGATIVE_LABEL: &str = "negative";
/// Upper bound of the discrete gauge scale produced from a mood scalar.
pub const MOOD_SCALE_MAX: i32 = 10;

// Analytics
/// Half-width of the smoothing window for mood series.
pub const SMOOTHING_RADIUS: usize = 2;
/// Half-width of the smoothing window once the series is large.
pub const SMOOTHING_RADIUS_LARGE: usize = 3;
/// Number of points from which a series counts as large.
pub const LARGE_SERIES_THRESHOLD: usize = 100;
/// Number of points from which the chart shows the average reference mark.
pub const REFERENCE_MARK_MIN_POINTS: usize = 10;

// Image cache
/// Default maximum number of cached images.
pub const IMAGE_CACHE_COUNT_LIMIT: usize = 64;
/// Default maximum total bytes held by the image cache.
pub const IMAGE_CACHE_COST_LIMIT: usize = 64 * 1024 * 1024;

// Logging Configuration
/// Service name used in tracing spans and structured logs.
pub const TRACING_SERVICE_NAME: &str = "quill";
/// Name for the root tracing span covering an application invocation.
pub const TRACING_ROOT_SPAN_NAME: &str = "app_invocation";

// Telemetry
/// How long the CLI waits at exit for crash reports still being posted, in milliseconds.
pub const TELEMETRY_FLUSH_TIMEOUT_MS: u64 = 2000;
