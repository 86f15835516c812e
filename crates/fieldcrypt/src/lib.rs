//! Field-level authenticated encryption for sensitive record attributes.
//!
//! Components, bottom-up:
//!
//! - [`key::KeyManager`] validates the single process-wide AES-256 key.
//! - [`crypto::Cipher`] encrypts and decrypts individual text values into
//!   `nonce:tag:ciphertext` hex envelopes.
//! - [`codec::ObjectCodec`] applies the cipher to the fields a
//!   [`schema::FieldSchema`] marks as sensitive for an entity type.
//!
//! ```no_run
//! use fieldcrypt::{Cipher, EncodedKey, FieldSchema, KeyManager, ObjectCodec};
//! use serde_json::json;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let key = KeyManager::from_encoded(&EncodedKey::new(std::env::var("ENCRYPTION_KEY")?))?;
//! let codec = ObjectCodec::new(Cipher::new(&key), FieldSchema::default());
//!
//! let row = codec.encrypt_object("transactions", json!({"description": "Coffee", "amount": 4.5}))?;
//! let back = codec.decrypt_object("transactions", row)?;
//! assert_eq!(back["description"], "Coffee");
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod crypto;
pub mod key;
pub mod schema;

pub use codec::{CodecError, ObjectCodec};
pub use crypto::{Cipher, CipherError, Envelope};
pub use key::{EncodedKey, KeyError, KeyManager, KEY_LEN};
pub use schema::{FieldSchema, SchemaError};
