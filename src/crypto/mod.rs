//! At-rest encryption of journal entries.
//!
//! Entry payloads and image data are sealed with age to an X25519 identity
//! before they reach SQLite.
//!
//! # Module Structure
//!
//! - `keys`: the entry key and its file-backed [`KeyStore`]
//! - `seal`: [`seal`] and [`open`] over byte payloads
//!
//! # Example
//!
//! ```no_run
//! use quill::crypto::{open, seal, FileKeyStore, KeyStore};
//!
//! let key = FileKeyStore::new("/tmp/quill.key").get_or_create()?;
//! let sealed = seal(b"Secret journal entry", &key)?;
//! assert_eq!(open(&sealed, &key).unwrap(), b"Secret journal entry");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod keys;
pub mod seal;

// Re-export commonly used types
pub use self::keys::{EntryKey, FileKeyStore, KeyStore};
pub use self::seal::{open, open_checked, seal};
