//! Request and response types for the HTTP surface.
//!
//! All bodies are JSON. The entity type of a record request travels in a
//! header, not in the body, so payloads are exactly the rows the persistence
//! layer reads and writes.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Record endpoints
// ---------------------------------------------------------------------------

/// Request body for `POST /records/encrypt` and `POST /records/decrypt`.
///
/// `payload` is a single record (JSON object) or an array of records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordRequest {
    /// Record or array of records to transform.
    pub payload: serde_json::Value,
}

/// Successful response body for the record endpoints.
///
/// Same shape as the request, with sensitive fields transformed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordResponse {
    /// Transformed record or array of records.
    pub payload: serde_json::Value,
}

// ---------------------------------------------------------------------------
// Scalar endpoints
// ---------------------------------------------------------------------------

/// Request body for `POST /values/encrypt` and `POST /values/decrypt`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValueRequest {
    /// Any JSON value; only strings are transformed.
    pub value: serde_json::Value,
}

/// Successful response body for the scalar endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValueResponse {
    /// Transformed value.
    pub value: serde_json::Value,
}

// ---------------------------------------------------------------------------
// Error response
// ---------------------------------------------------------------------------

/// Standard error response body returned on any non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short machine-readable error code (e.g. `"bad_request"`).
    pub code: String,
    /// Human-readable description safe to expose to callers.
    pub message: String,
}

impl ErrorResponse {
    /// Construct an [`ErrorResponse`] from a code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl From<&crate::ServiceError> for ErrorResponse {
    fn from(err: &crate::ServiceError) -> Self {
        Self::new(err.code(), err.to_string())
    }
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

/// Response body for `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall service status; `"ok"` whenever the server is answering.
    pub status: String,
    /// Whether the encryption key is loaded. Never the key itself.
    pub key_configured: bool,
    /// Number of entity types with sensitive fields registered.
    pub entity_types: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ServiceError;
    use serde_json::json;

    #[test]
    fn record_request_accepts_arrays() {
        let req: RecordRequest =
            serde_json::from_str(r#"{"payload":[{"description":"Coffee"},{"description":"Lunch"}]}"#)
                .unwrap();
        assert_eq!(req.payload[1]["description"], "Lunch");
    }

    #[test]
    fn value_request_keeps_non_text() {
        let req: ValueRequest = serde_json::from_value(json!({"value": 4.5})).unwrap();
        assert_eq!(req.value, json!(4.5));
    }

    #[test]
    fn error_response_from_service_error() {
        let e = ErrorResponse::from(&ServiceError::IntegrityFailure("transactions.description".into()));
        assert_eq!(e.code, "integrity_failure");
        assert!(e.message.contains("transactions.description"));
    }

    #[test]
    fn health_response_serde() {
        let h = HealthResponse {
            status: "ok".into(),
            key_configured: true,
            entity_types: 2,
        };
        let json = serde_json::to_value(&h).unwrap();
        assert_eq!(json["key_configured"], true);
        assert_eq!(json["entity_types"], 2);
    }
}
