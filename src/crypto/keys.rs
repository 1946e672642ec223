//! Entry key storage.
//!
//! The entry key is an age X25519 identity kept in a file next to the
//! database. It is generated on first use and never leaves the data directory.

use crate::errors::{AppResult, CryptoError};
use age::secrecy::ExposeSecret;
use age::x25519;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info};
use zeroize::Zeroizing;

/// The key entries are sealed with.
#[derive(Clone)]
pub struct EntryKey {
    identity: x25519::Identity,
}

impl EntryKey {
    pub fn generate() -> Self {
        Self {
            identity: x25519::Identity::generate(),
        }
    }

    pub(crate) fn identity(&self) -> &x25519::Identity {
        &self.identity
    }

    pub(crate) fn recipient(&self) -> x25519::Recipient {
        self.identity.to_public()
    }

    /// Fingerprint of the public half, safe to log.
    pub fn fingerprint(&self) -> String {
        let digest = blake3::hash(self.recipient().to_string().as_bytes());
        digest.to_hex()[..16].to_string()
    }
}

impl std::fmt::Debug for EntryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntryKey")
            .field("fingerprint", &self.fingerprint())
            .finish()
    }
}

impl FromStr for EntryKey {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let identity = x25519::Identity::from_str(s.trim())
            .map_err(|e| CryptoError::InvalidKey(e.to_string()))?;
        Ok(Self { identity })
    }
}

/// Source of the entry key.
pub trait KeyStore: Send + Sync {
    /// Returns the stored key, creating and storing a new one if none exists.
    fn get_or_create(&self) -> AppResult<EntryKey>;
}

/// Keeps the key in a single file readable only by the owner.
#[derive(Debug, Clone)]
pub struct FileKeyStore {
    path: PathBuf,
}

impl FileKeyStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn key_file_error(&self, source: std::io::Error) -> CryptoError {
        CryptoError::KeyFile {
            path: self.path.clone(),
            source,
        }
    }

    fn read(&self) -> AppResult<EntryKey> {
        let contents = Zeroizing::new(
            fs::read_to_string(&self.path).map_err(|e| self.key_file_error(e))?,
        );
        let key = EntryKey::from_str(&contents)?;
        debug!("Loaded entry key {}", key.fingerprint());
        Ok(key)
    }

    fn write(&self, key: &EntryKey) -> AppResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.key_file_error(e))?;
        }

        let mut options = fs::OpenOptions::new();
        options.write(true).create_new(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(crate::constants::DEFAULT_FILE_PERMISSIONS);
        }

        let mut file = options.open(&self.path).map_err(|e| self.key_file_error(e))?;
        let encoded = key.identity.to_string();
        file.write_all(encoded.expose_secret().as_bytes())
            .and_then(|_| file.write_all(b"\n"))
            .and_then(|_| file.sync_all())
            .map_err(|e| self.key_file_error(e))?;
        Ok(())
    }
}

impl KeyStore for FileKeyStore {
    fn get_or_create(&self) -> AppResult<EntryKey> {
        if self.path.exists() {
            return self.read();
        }

        let key = EntryKey::generate();
        self.write(&key)?;
        info!(
            "Created entry key {} at {}",
            key.fingerprint(),
            self.path.display()
        );
        Ok(key)
    }
}
