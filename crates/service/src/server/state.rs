//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use fieldcrypt::ObjectCodec;

/// Application state shared across all request handlers.
///
/// All fields are `Arc`-wrapped so that Axum can clone the state for each
/// request without copying the cipher or the schema table.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Schema-driven record codec bound to the process key.
    pub codec: Arc<ObjectCodec>,
    /// Name of the HTTP header carrying the entity type of each record request.
    pub entity_header_name: Arc<String>,
}

impl AppState {
    /// Create a new [`AppState`] from a codec and header name.
    pub fn new(codec: ObjectCodec, entity_header_name: String) -> Self {
        Self {
            codec: Arc::new(codec),
            entity_header_name: Arc::new(entity_header_name),
        }
    }
}
