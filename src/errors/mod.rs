//! Error handling utilities for the quill application.
//!
//! This module provides the central error type `AppError` which represents all
//! possible error conditions that might occur in the application, as well as the
//! convenience type alias `AppResult` for functions that can return these errors.
//!
//! Expected absence (a missing block, an out-of-range index, an unknown entry id)
//! is never an error: those paths log and return `Option`/no-op. The types here
//! cover failures of the external collaborators.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Represents specific error cases that can occur in the persistence layer.
///
/// # Examples
///
/// ```
/// use quill::errors::StoreError;
///
/// let error = StoreError::NotFound("Entry 42".to_string());
/// assert!(format!("{}", error).contains("not found"));
/// ```
#[derive(Debug, Error)]
pub enum StoreError {
    /// SQLite database error.
    #[error("Database error: {0}\n\nIf you're seeing 'file is not a database' errors, the database file may be corrupted or was written by an incompatible version.")]
    Sqlite(#[from] rusqlite::Error),

    /// Connection pool error.
    #[error("Failed to get connection from pool: {0}\n\nThis may indicate database connection issues. Try closing other quill instances.")]
    Pool(#[from] r2d2::Error),

    /// A record the caller explicitly asked for does not exist.
    #[error("Record not found: {0}")]
    NotFound(String),

    /// A persisted record could not be decoded.
    #[error("Corrupt record: {0}")]
    Corrupt(String),
}

/// Represents specific error cases that can occur during key management,
/// sealing, or opening of entry payloads.
///
/// # Examples
///
/// ```
/// use quill::errors::CryptoError;
///
/// let error = CryptoError::InvalidKey("truncated".to_string());
/// assert!(format!("{}", error).contains("truncated"));
/// ```
#[derive(Debug, Error)]
pub enum CryptoError {
    /// The key file could not be read or written.
    #[error("Key file {path} is not accessible: {source}. Please check the permissions of the data directory.")]
    KeyFile {
        /// Path of the key file
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The stored key could not be parsed.
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Sealed data uses an unsupported encryption format.
    #[error("Unsupported encryption format")]
    UnsupportedFormat,

    /// Error during encryption.
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    /// Error during decryption.
    #[error("Decryption failed: {0}")]
    DecryptionFailed(#[source] age::DecryptError),
}

/// Represents failures of the sentence classifiers.
///
/// `Unavailable` is the "no analytics" signal: a model that could not be loaded.
/// Callers must handle it; it is never fatal.
///
/// # Examples
///
/// ```
/// use quill::errors::ClassifierError;
///
/// let error = ClassifierError::Unavailable {
///     model: "sentiment".to_string(),
///     reason: "not installed".to_string(),
/// };
/// assert!(format!("{}", error).contains("sentiment"));
/// ```
#[derive(Debug, Error)]
pub enum ClassifierError {
    /// The model could not be loaded.
    #[error("Classifier '{model}' is unavailable: {reason}")]
    Unavailable {
        /// Model name
        model: String,
        /// Why loading failed
        reason: String,
    },

    /// The classifier server is not reachable.
    #[error("Classifier server error: {0}. Is Ollama running? Try: ollama serve")]
    ServerOffline(#[source] reqwest::Error),

    /// The classifier answered with something that is not a prediction.
    #[error("Invalid classifier response: {0}")]
    InvalidResponse(String),
}

/// Represents failures of the crash-report call.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The HTTP request itself failed.
    #[error("Crash report could not be sent: {0}")]
    Request(#[source] reqwest::Error),

    /// The endpoint rejected the report.
    #[error("Crash report endpoint answered with status {0}")]
    Status(u16),
}

/// Outcome of a failed authentication attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The user dismissed the prompt.
    #[error("Authentication was cancelled")]
    Cancelled,

    /// The authenticator rejected the attempt.
    #[error("Authentication failed: {0}")]
    Failed(String),
}

/// Represents all possible errors that can occur in the quill application.
///
/// # Examples
///
/// Converting from an IO error:
/// ```
/// use quill::errors::AppError;
/// use std::io::{self, ErrorKind};
///
/// let io_error = io::Error::new(ErrorKind::NotFound, "file not found");
/// let app_error: AppError = io_error.into();
///
/// match app_error {
///     AppError::Io(inner) => assert_eq!(inner.kind(), ErrorKind::NotFound),
///     _ => panic!("Expected Io variant"),
/// }
/// ```
#[derive(Debug, Error)]
pub enum AppError {
    /// Errors related to configuration loading or validation.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input/output errors from filesystem operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Errors in journal logic (e.g., an unknown entry id given on the command line).
    #[error("Journal error: {0}")]
    Journal(String),

    /// Errors related to persistence.
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// Errors related to cryptographic operations.
    #[error("Cryptographic error: {0}")]
    Crypto(#[from] CryptoError),

    /// Errors related to the sentence classifiers.
    #[error("Classifier error: {0}")]
    Classifier(#[from] ClassifierError),

    /// Errors related to crash reporting.
    #[error("Telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),

    /// Payload (de)serialization errors.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A type alias for `Result<T, AppError>` to simplify function signatures.
pub type AppResult<T> = Result<T, AppError>;
