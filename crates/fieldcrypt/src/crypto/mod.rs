//! AES-256-GCM field encryption primitives.
//!
//! This module only knows about text values and key bytes; it has no notion of
//! records, entity types, or transport.
//!
//! # Ciphertext format
//!
//! ```text
//! <hex(nonce)>:<hex(tag)>:<hex(ciphertext)>
//! ```
//!
//! Segments are lowercase hexadecimal. The nonce is 12 bytes and the tag is
//! 16 bytes. Anything that does not have this exact shape is treated as
//! legacy plaintext on decrypt and returned unchanged.

pub mod cipher;
pub mod envelope;

pub use cipher::{Cipher, CipherError};
pub use envelope::{Envelope, NONCE_LEN, TAG_LEN};
