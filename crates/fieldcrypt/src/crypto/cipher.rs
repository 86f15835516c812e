//! AES-256-GCM encryption and decryption of individual text values.
//!
//! Every call to [`Cipher::encrypt`] draws a fresh 96-bit nonce from the OS
//! CSPRNG. GCM nonce reuse under one key breaks both confidentiality and
//! authentication, so nonces are never derived, counted, or cached.

use aes_gcm::{
    aead::{AeadInPlace, KeyInit, OsRng},
    Aes256Gcm, Key, Nonce, Tag,
};
use serde_json::Value;
use thiserror::Error;
use tracing::trace;

use super::envelope::{Envelope, NONCE_LEN, TAG_LEN};
use crate::key::KeyManager;

/// No associated data is bound into field ciphertexts.
const NO_AAD: &[u8] = b"";

/// Errors produced by the cipher layer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CipherError {
    /// AES-GCM encryption failed.
    #[error("aead operation failed")]
    AeadFailure,

    /// A well-formed envelope failed authentication (wrong key or tampered data).
    #[error("ciphertext failed integrity check")]
    Integrity,

    /// The envelope authenticated but its plaintext is not valid UTF-8.
    #[error("decrypted value is not valid UTF-8")]
    NotUtf8,

    /// The value is not a `nonce:tag:ciphertext` envelope.
    #[error("invalid encrypted field format")]
    InvalidFormat,
}

/// Stateless text cipher bound to the process key.
///
/// Cloning is cheap and clones share nothing mutable, so a [`Cipher`] can be
/// used from any number of threads at once.
#[derive(Clone)]
pub struct Cipher {
    aead: Aes256Gcm,
}

impl Cipher {
    /// Build a cipher from a validated key.
    pub fn new(key: &KeyManager) -> Self {
        let key = Key::<Aes256Gcm>::from_slice(key.key_bytes());
        Self {
            aead: Aes256Gcm::new(key),
        }
    }

    /// Encrypt `plaintext` into its envelope string.
    ///
    /// The empty string is encrypted too; its envelope has an empty
    /// ciphertext segment but is still authenticated by the tag.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::AeadFailure`] on an internal AEAD error (only
    /// reachable for inputs beyond the GCM length limit).
    pub fn encrypt(&self, plaintext: &str) -> Result<String, CipherError> {
        use aes_gcm::aead::rand_core::RngCore;
        let mut nonce = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce);

        let mut buffer = plaintext.as_bytes().to_vec();
        let tag = self
            .aead
            .encrypt_in_place_detached(Nonce::from_slice(&nonce), NO_AAD, &mut buffer)
            .map_err(|_| CipherError::AeadFailure)?;

        let mut tag_bytes = [0u8; TAG_LEN];
        tag_bytes.copy_from_slice(tag.as_slice());

        let envelope = Envelope {
            nonce,
            tag: tag_bytes,
            ciphertext: buffer,
        };
        Ok(envelope.to_string())
    }

    /// Decrypt an envelope string back to text.
    ///
    /// Input that does not parse as an envelope is legacy plaintext and is
    /// returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::Integrity`] if a well-formed envelope fails
    /// authentication, and [`CipherError::NotUtf8`] if it authenticates to
    /// bytes that are not UTF-8.
    pub fn decrypt(&self, input: &str) -> Result<String, CipherError> {
        let envelope = match Envelope::parse(input) {
            Ok(envelope) => envelope,
            Err(_) => {
                trace!("value is not an envelope; passing through");
                return Ok(input.to_owned());
            }
        };

        let mut buffer = envelope.ciphertext;
        self.aead
            .decrypt_in_place_detached(
                Nonce::from_slice(&envelope.nonce),
                NO_AAD,
                &mut buffer,
                Tag::from_slice(&envelope.tag),
            )
            .map_err(|_| CipherError::Integrity)?;

        String::from_utf8(buffer).map_err(|_| CipherError::NotUtf8)
    }

    /// Encrypt a JSON value. Only strings are transformed.
    ///
    /// # Errors
    ///
    /// See [`Cipher::encrypt`].
    pub fn encrypt_value(&self, value: Value) -> Result<Value, CipherError> {
        match value {
            Value::String(s) => self.encrypt(&s).map(Value::String),
            other => Ok(other),
        }
    }

    /// Decrypt a JSON value. Only strings are transformed.
    ///
    /// # Errors
    ///
    /// See [`Cipher::decrypt`].
    pub fn decrypt_value(&self, value: Value) -> Result<Value, CipherError> {
        match value {
            Value::String(s) => self.decrypt(&s).map(Value::String),
            other => Ok(other),
        }
    }
}

impl std::fmt::Debug for Cipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Cipher(Aes256Gcm)")
    }
}
