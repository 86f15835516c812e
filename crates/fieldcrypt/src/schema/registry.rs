//! Immutable table of sensitive fields, keyed by entity type.

use std::{collections::HashMap, sync::Arc};

use indexmap::IndexSet;
use thiserror::Error;

/// Ordered set of sensitive field names for one entity type.
pub type SensitiveFields = IndexSet<String>;

/// Errors from building or loading a [`FieldSchema`].
#[derive(Debug, Error)]
pub enum SchemaError {
    /// An entity type or field name is empty.
    #[error("invalid field schema: {0}")]
    Invalid(String),

    /// The schema document could not be parsed.
    #[error("failed to parse field schema: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// The schema file could not be read.
    #[error("failed to read field schema: {0}")]
    Io(#[from] std::io::Error),
}

/// Mapping from entity-type name to the fields that must be encrypted.
///
/// Built once at startup and never mutated. Clones share the same table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSchema {
    entities: Arc<HashMap<String, SensitiveFields>>,
}

impl FieldSchema {
    /// Start building a schema.
    pub fn builder() -> FieldSchemaBuilder {
        FieldSchemaBuilder::default()
    }

    /// A schema with no registered entity types.
    pub fn empty() -> Self {
        Self {
            entities: Arc::new(HashMap::new()),
        }
    }

    /// Parse a YAML mapping of `entity_type: [field, ...]`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Parse`] for malformed YAML and
    /// [`SchemaError::Invalid`] for empty names.
    pub fn from_yaml_str(text: &str) -> Result<Self, SchemaError> {
        let raw: HashMap<String, Vec<String>> = serde_yaml::from_str(text)?;
        let mut builder = Self::builder();
        for (entity, fields) in raw {
            builder = builder.entity(entity, fields);
        }
        builder.try_build()
    }

    /// Sensitive fields of `entity_type`, or `None` if it is not registered.
    pub fn fields(&self, entity_type: &str) -> Option<&SensitiveFields> {
        self.entities.get(entity_type)
    }

    /// Returns `true` if `entity_type` has an entry.
    pub fn is_registered(&self, entity_type: &str) -> bool {
        self.entities.contains_key(entity_type)
    }

    /// Iterate over registered entity types in no particular order.
    pub fn entity_types(&self) -> impl Iterator<Item = &str> {
        self.entities.keys().map(String::as_str)
    }

    /// Number of registered entity types.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns `true` if no entity types are registered.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl Default for FieldSchema {
    /// The finance application's sensitive text columns.
    fn default() -> Self {
        Self::builder()
            .entity("transactions", ["description", "notes"])
            .entity("accounts", ["notes"])
            .build()
    }
}

/// Builder for [`FieldSchema`].
///
/// Registering the same entity twice merges the field lists; duplicate field
/// names keep their first position.
#[derive(Debug, Default)]
pub struct FieldSchemaBuilder {
    entities: HashMap<String, SensitiveFields>,
}

impl FieldSchemaBuilder {
    /// Register `fields` as sensitive for `entity_type`.
    pub fn entity<I, S>(mut self, entity_type: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entities
            .entry(entity_type.into())
            .or_default()
            .extend(fields.into_iter().map(Into::into));
        self
    }

    /// Validate and finish the schema.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Invalid`] if an entity type or field name is blank.
    pub fn try_build(self) -> Result<FieldSchema, SchemaError> {
        for (entity, fields) in &self.entities {
            if entity.trim().is_empty() {
                return Err(SchemaError::Invalid("entity type must not be empty".into()));
            }
            if fields.iter().any(|f| f.trim().is_empty()) {
                return Err(SchemaError::Invalid(format!(
                    "entity `{entity}` has an empty field name"
                )));
            }
        }
        Ok(FieldSchema {
            entities: Arc::new(self.entities),
        })
    }

    /// Finish the schema without validation.
    ///
    /// Intended for compile-time tables whose names are literals.
    pub fn build(self) -> FieldSchema {
        FieldSchema {
            entities: Arc::new(self.entities),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_covers_transactions_and_accounts() {
        let schema = FieldSchema::default();
        let tx: Vec<&str> = schema
            .fields("transactions")
            .unwrap()
            .iter()
            .map(String::as_str)
            .collect();
        assert_eq!(tx, ["description", "notes"]);
        assert!(schema.fields("accounts").unwrap().contains("notes"));
        assert_eq!(schema.len(), 2);
    }

    #[test]
    fn unknown_entity_has_no_fields() {
        let schema = FieldSchema::default();
        assert!(schema.fields("unknown_type").is_none());
        assert!(!schema.is_registered("unknown_type"));
    }

    #[test]
    fn builder_preserves_order_and_dedups() {
        let schema = FieldSchema::builder()
            .entity("transactions", ["notes", "description"])
            .entity("transactions", ["notes", "memo"])
            .build();
        let fields: Vec<&str> = schema
            .fields("transactions")
            .unwrap()
            .iter()
            .map(String::as_str)
            .collect();
        assert_eq!(fields, ["notes", "description", "memo"]);
    }

    #[test]
    fn try_build_rejects_blank_names() {
        assert!(FieldSchema::builder().entity(" ", ["a"]).try_build().is_err());
        assert!(FieldSchema::builder().entity("t", [""]).try_build().is_err());
    }

    #[test]
    fn empty_schema() {
        let schema = FieldSchema::empty();
        assert!(schema.is_empty());
        assert_eq!(schema.entity_types().count(), 0);
    }

    #[test]
    fn parses_yaml() {
        let yaml = r#"
transactions:
  - description
  - notes
goals:
  - name
"#;
        let schema = FieldSchema::from_yaml_str(yaml).unwrap();
        assert_eq!(schema.len(), 2);
        assert!(schema.fields("goals").unwrap().contains("name"));
        assert_eq!(schema.fields("transactions").unwrap().len(), 2);
    }

    #[test]
    fn rejects_malformed_yaml() {
        let err = FieldSchema::from_yaml_str("transactions: description").unwrap_err();
        assert!(matches!(err, SchemaError::Parse(_)));
    }
}
