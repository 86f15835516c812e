//! Schema-driven encryption of records.
//!
//! [`ObjectCodec`] applies the [`Cipher`] to the sensitive fields of a record
//! (a JSON object) or of every record in a JSON array. Fields not named in the
//! [`FieldSchema`] for the entity type are never touched.
//!
//! Each call either transforms every sensitive field or fails before changing
//! anything: replacements are computed first and committed only once all of
//! them succeeded.

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::crypto::{Cipher, CipherError};
use crate::schema::{FieldSchema, SensitiveFields};

/// Errors produced while transforming a record.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    /// A sensitive field failed authentication on decrypt.
    #[error("integrity check failed for {entity}.{field}")]
    Integrity {
        /// Entity type of the record.
        entity: String,
        /// Name of the offending field.
        field: String,
    },

    /// Any other cipher failure on a sensitive field.
    #[error("cipher failure on {entity}.{field}: {source}")]
    Cipher {
        /// Entity type of the record.
        entity: String,
        /// Name of the offending field.
        field: String,
        /// Underlying cipher error.
        source: CipherError,
    },
}

#[derive(Debug, Clone, Copy)]
enum Direction {
    Encrypt,
    Decrypt,
}

/// New values for every sensitive field of one record, applied together.
type Patch = Vec<(String, String)>;

/// Encrypts and decrypts the sensitive fields of records.
#[derive(Debug, Clone)]
pub struct ObjectCodec {
    cipher: Cipher,
    schema: FieldSchema,
}

impl ObjectCodec {
    /// Create a codec from a cipher and a schema.
    pub fn new(cipher: Cipher, schema: FieldSchema) -> Self {
        Self { cipher, schema }
    }

    /// The underlying text cipher, for ad hoc scalar values.
    pub fn cipher(&self) -> &Cipher {
        &self.cipher
    }

    /// The field schema in use.
    pub fn schema(&self) -> &FieldSchema {
        &self.schema
    }

    /// Encrypt the sensitive fields of a record or array of records.
    ///
    /// Unregistered entity types and non-record values are returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Cipher`] if encryption of any field fails; the
    /// input is dropped and no partially encrypted record is returned.
    pub fn encrypt_object(&self, entity_type: &str, mut record: Value) -> Result<Value, CodecError> {
        self.encrypt_in_place(entity_type, &mut record)?;
        Ok(record)
    }

    /// Decrypt the sensitive fields of a record or array of records.
    ///
    /// Fields holding legacy plaintext decrypt to themselves.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Integrity`] if any sensitive field holds a
    /// well-formed envelope that fails authentication.
    pub fn decrypt_object(&self, entity_type: &str, mut record: Value) -> Result<Value, CodecError> {
        self.decrypt_in_place(entity_type, &mut record)?;
        Ok(record)
    }

    /// In-place form of [`ObjectCodec::encrypt_object`].
    ///
    /// On error `record` is left exactly as it was.
    pub fn encrypt_in_place(&self, entity_type: &str, record: &mut Value) -> Result<(), CodecError> {
        self.transform(entity_type, record, Direction::Encrypt)
    }

    /// In-place form of [`ObjectCodec::decrypt_object`].
    ///
    /// On error `record` is left exactly as it was.
    pub fn decrypt_in_place(&self, entity_type: &str, record: &mut Value) -> Result<(), CodecError> {
        self.transform(entity_type, record, Direction::Decrypt)
    }

    fn transform(
        &self,
        entity_type: &str,
        record: &mut Value,
        direction: Direction,
    ) -> Result<(), CodecError> {
        let Some(fields) = self.schema.fields(entity_type) else {
            debug!(entity = entity_type, "entity type not registered; passing through");
            return Ok(());
        };

        match record {
            Value::Object(map) => {
                let patch = self.plan(entity_type, fields, map, direction)?;
                apply(map, patch);
            }
            Value::Array(items) => {
                let patches = items
                    .iter()
                    .map(|item| match item {
                        Value::Object(map) => self.plan(entity_type, fields, map, direction),
                        _ => Ok(Patch::new()),
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                for (item, patch) in items.iter_mut().zip(patches) {
                    if let Value::Object(map) = item {
                        apply(map, patch);
                    }
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Compute new values for every sensitive text field in `map`.
    fn plan(
        &self,
        entity_type: &str,
        fields: &SensitiveFields,
        map: &Map<String, Value>,
        direction: Direction,
    ) -> Result<Patch, CodecError> {
        let mut patch = Patch::new();
        for field in fields {
            let Some(Value::String(current)) = map.get(field) else {
                continue;
            };
            let result = match direction {
                Direction::Encrypt => self.cipher.encrypt(current),
                Direction::Decrypt => self.cipher.decrypt(current),
            };
            match result {
                Ok(next) => patch.push((field.clone(), next)),
                Err(CipherError::Integrity) => {
                    warn!(entity = entity_type, field = %field, "sensitive field failed integrity check");
                    return Err(CodecError::Integrity {
                        entity: entity_type.to_owned(),
                        field: field.clone(),
                    });
                }
                Err(source) => {
                    warn!(entity = entity_type, field = %field, error = %source, "sensitive field cipher failure");
                    return Err(CodecError::Cipher {
                        entity: entity_type.to_owned(),
                        field: field.clone(),
                        source,
                    });
                }
            }
        }
        Ok(patch)
    }
}

fn apply(map: &mut Map<String, Value>, patch: Patch) {
    for (field, value) in patch {
        if let Some(slot) = map.get_mut(&field) {
            *slot = Value::String(value);
        }
    }
}
