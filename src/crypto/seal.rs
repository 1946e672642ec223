//! Sealing entry payloads with age.

use super::keys::EntryKey;
use crate::errors::{AppResult, CryptoError};
use std::io::{Read, Write};
use std::iter;
use tracing::warn;

/// Encrypts `plaintext` to the entry key.
///
/// # Example
///
/// ```
/// use quill::crypto::{open, seal, EntryKey};
///
/// let key = EntryKey::generate();
/// let sealed = seal(b"Dear diary", &key)?;
/// assert_eq!(open(&sealed, &key).as_deref(), Some(&b"Dear diary"[..]));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn seal(plaintext: &[u8], key: &EntryKey) -> AppResult<Vec<u8>> {
    let encryptor = age::Encryptor::with_recipients(vec![Box::new(key.recipient())]).ok_or_else(
        || CryptoError::EncryptionFailed("no recipients for entry key".to_string()),
    )?;

    let mut sealed = Vec::with_capacity(plaintext.len() + 256);
    let mut writer = encryptor
        .wrap_output(&mut sealed)
        .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;
    writer
        .write_all(plaintext)
        .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;
    writer
        .finish()
        .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;

    Ok(sealed)
}

/// Decrypts data produced by [`seal`].
///
/// # Errors
///
/// Fails when the data is not age-encrypted to a recipient, or was sealed
/// under a different key.
pub fn open_checked(ciphertext: &[u8], key: &EntryKey) -> AppResult<Vec<u8>> {
    let decryptor = match age::Decryptor::new(ciphertext).map_err(CryptoError::DecryptionFailed)? {
        age::Decryptor::Recipients(d) => d,
        _ => return Err(CryptoError::UnsupportedFormat.into()),
    };

    let mut reader = decryptor
        .decrypt(iter::once(key.identity() as &dyn age::Identity))
        .map_err(CryptoError::DecryptionFailed)?;

    let mut plaintext = Vec::with_capacity(ciphertext.len());
    reader.read_to_end(&mut plaintext)?;
    Ok(plaintext)
}

/// Decrypts data produced by [`seal`], or `None` if it cannot be opened.
pub fn open(ciphertext: &[u8], key: &EntryKey) -> Option<Vec<u8>> {
    match open_checked(ciphertext, key) {
        Ok(plaintext) => Some(plaintext),
        Err(e) => {
            warn!("Could not open sealed data: {}", e);
            None
        }
    }
}
