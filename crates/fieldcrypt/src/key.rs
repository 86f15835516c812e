//! [`KeyManager`]: validated holder of the single AES-256 field encryption key.
//!
//! # Lifecycle
//!
//! 1. At startup the raw secret is read from configuration as an [`EncodedKey`]
//!    (64 hex characters or base64 of 32 bytes).
//! 2. [`KeyManager::from_encoded`] decodes and validates it. A missing or
//!    malformed key is fatal: no [`KeyManager`] exists, so no
//!    [`Cipher`](crate::crypto::Cipher) can be built and nothing is served.
//! 3. The key is immutable for the rest of the process lifetime and may be
//!    shared across threads without synchronisation.
//!
//! # Security invariants
//!
//! - Key bytes are **never** logged, serialised, or printed by `Debug`.
//! - Buffers holding the key are zeroed on drop.

use base64::{
    engine::general_purpose::{STANDARD, STANDARD_NO_PAD},
    Engine as _,
};
use serde::Deserialize;
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// Byte length of an AES-256 key (32 bytes = 256 bits).
pub const KEY_LEN: usize = 32;

/// Errors produced while resolving the encryption key.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyError {
    /// No key material was supplied.
    #[error("encryption key is missing")]
    Missing,

    /// The key is neither valid hex nor valid base64.
    #[error("encryption key is not valid hex or base64")]
    InvalidEncoding,

    /// The key decoded to the wrong number of bytes.
    #[error("encryption key has invalid length: expected {KEY_LEN} bytes, got {0}")]
    InvalidLength(usize),
}

/// The raw, still-encoded key string as read from configuration.
#[derive(Clone, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(transparent)]
pub struct EncodedKey(String);

impl EncodedKey {
    /// Wrap an encoded key string.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    fn as_str(&self) -> &str {
        self.0.trim()
    }
}

impl std::fmt::Debug for EncodedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("EncodedKey([REDACTED])")
    }
}

/// Process-wide owner of the validated key bytes.
pub struct KeyManager {
    key: Zeroizing<[u8; KEY_LEN]>,
}

impl KeyManager {
    /// Decode and validate an [`EncodedKey`].
    ///
    /// Hex is tried first (exactly `2 * KEY_LEN` hex digits), then standard
    /// base64 with or without padding. The key is never derived, padded, or
    /// truncated to fit.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::Missing`] for an empty value,
    /// [`KeyError::InvalidEncoding`] if neither encoding applies, and
    /// [`KeyError::InvalidLength`] if the decoded key is not [`KEY_LEN`] bytes.
    pub fn from_encoded(encoded: &EncodedKey) -> Result<Self, KeyError> {
        let raw = encoded.as_str();
        if raw.is_empty() {
            return Err(KeyError::Missing);
        }

        let decoded = Zeroizing::new(decode_key(raw)?);
        Self::from_bytes(&decoded)
    }

    /// Build a [`KeyManager`] from raw key bytes.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::InvalidLength`] if `bytes` is not [`KEY_LEN`] long.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KeyError> {
        if bytes.len() != KEY_LEN {
            return Err(KeyError::InvalidLength(bytes.len()));
        }
        let mut key = Zeroizing::new([0u8; KEY_LEN]);
        key.copy_from_slice(bytes);
        Ok(Self { key })
    }

    /// Borrow the key bytes.
    pub fn key_bytes(&self) -> &[u8; KEY_LEN] {
        &self.key
    }

    /// Diagnostic flag for health reporting. A constructed manager always holds a key.
    pub fn is_configured(&self) -> bool {
        true
    }
}

impl std::fmt::Debug for KeyManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("KeyManager([REDACTED])")
    }
}

fn decode_key(raw: &str) -> Result<Vec<u8>, KeyError> {
    if raw.len() == KEY_LEN * 2 && raw.bytes().all(|b| b.is_ascii_hexdigit()) {
        return hex::decode(raw).map_err(|_| KeyError::InvalidEncoding);
    }
    STANDARD
        .decode(raw)
        .or_else(|_| STANDARD_NO_PAD.decode(raw))
        .map_err(|_| KeyError::InvalidEncoding)
}
