//! Field schema: which fields of which entity types hold sensitive text.
//!
//! # Responsibilities
//!
//! - Hold the static `entity type -> [field]` table consulted by the codec.
//! - Load an operator-supplied table from a YAML file at startup.
//!
//! # Module invariants
//!
//! - **No crypto dependencies.** This module must not import anything from
//!   `crate::crypto` or `crate::key`.
//! - The table is immutable once built; there is no runtime refresh.

pub mod registry;

pub use registry::{FieldSchema, FieldSchemaBuilder, SchemaError, SensitiveFields};

use std::path::Path;

use tracing::info;

/// Load a [`FieldSchema`] from a YAML file.
///
/// # Errors
///
/// Returns [`SchemaError::Io`] if the file cannot be read, or any error from
/// [`FieldSchema::from_yaml_str`].
pub fn load_file(path: impl AsRef<Path>) -> Result<FieldSchema, SchemaError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let schema = FieldSchema::from_yaml_str(&text)?;
    info!(
        path = %path.display(),
        entity_types = schema.len(),
        "loaded field schema"
    );
    Ok(schema)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("fieldcrypt-{}-{name}", std::process::id()))
    }

    #[test]
    fn load_file_reads_yaml() {
        let path = temp_path("schema.yaml");
        std::fs::write(&path, "accounts:\n  - notes\n").unwrap();
        let schema = load_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert!(schema.fields("accounts").unwrap().contains("notes"));
    }

    #[test]
    fn load_file_missing_is_io_error() {
        let err = load_file(temp_path("does-not-exist.yaml")).unwrap_err();
        assert!(matches!(err, SchemaError::Io(_)));
    }
}
