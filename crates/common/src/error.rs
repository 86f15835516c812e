//! Common error types shared across crates.

use thiserror::Error;

/// Top-level service error type.
///
/// Variants map to HTTP status codes returned to callers:
/// - [`ServiceError::BadRequest`] → 400
/// - [`ServiceError::IntegrityFailure`] → 422
/// - [`ServiceError::EncryptionFailure`] → 500
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request was malformed — missing entity header or invalid JSON.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Stored ciphertext failed authentication: wrong key or tampered data.
    #[error("integrity failure: {0}")]
    IntegrityFailure(String),

    /// Encryption or decryption failed for another crypto-layer reason.
    #[error("encryption failure: {0}")]
    EncryptionFailure(String),
}

impl ServiceError {
    /// Returns the HTTP status code that should be sent for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            ServiceError::BadRequest(_) => 400,
            ServiceError::IntegrityFailure(_) => 422,
            ServiceError::EncryptionFailure(_) => 500,
        }
    }

    /// Short machine-readable code for the error response body.
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::BadRequest(_) => "bad_request",
            ServiceError::IntegrityFailure(_) => "integrity_failure",
            ServiceError::EncryptionFailure(_) => "encryption_failure",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_status_codes() {
        assert_eq!(ServiceError::BadRequest("x".into()).http_status(), 400);
        assert_eq!(ServiceError::IntegrityFailure("x".into()).http_status(), 422);
        assert_eq!(
            ServiceError::EncryptionFailure("x".into()).http_status(),
            500
        );
    }

    #[test]
    fn codes_are_snake_case() {
        assert_eq!(ServiceError::IntegrityFailure("x".into()).code(), "integrity_failure");
        assert_eq!(ServiceError::BadRequest("x".into()).code(), "bad_request");
    }

    #[test]
    fn display_includes_message() {
        let e = ServiceError::BadRequest("missing X-Entity-Type header".into());
        assert!(e.to_string().contains("missing X-Entity-Type header"));
    }
}
