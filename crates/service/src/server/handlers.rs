//! Axum request handlers for all service endpoints.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use common::{
    protocol::{ErrorResponse, HealthResponse, RecordRequest, RecordResponse, ValueRequest, ValueResponse},
    ServiceError,
};
use fieldcrypt::{CipherError, CodecError};
use tracing::warn;

use super::state::AppState;

/// `POST /records/encrypt` — encrypt the sensitive fields of a record or array of records.
///
/// The entity type is read from the configured header (default `X-Entity-Type`).
/// Unregistered entity types are returned unchanged.
pub async fn encrypt_records(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<RecordRequest>,
) -> Response {
    let entity_type = match entity_type(&headers, &state.entity_header_name) {
        Ok(e) => e,
        Err(err) => return error_response(err),
    };

    let mut payload = req.payload;
    if let Err(e) = state.codec.encrypt_in_place(&entity_type, &mut payload) {
        return error_response(codec_error(e));
    }

    (StatusCode::OK, Json(RecordResponse { payload })).into_response()
}

/// `POST /records/decrypt` — decrypt the sensitive fields of a record or array of records.
///
/// Legacy plaintext in a sensitive field is returned as-is. A field that fails
/// authentication fails the whole request with `422`.
pub async fn decrypt_records(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<RecordRequest>,
) -> Response {
    let entity_type = match entity_type(&headers, &state.entity_header_name) {
        Ok(e) => e,
        Err(err) => return error_response(err),
    };

    let mut payload = req.payload;
    if let Err(e) = state.codec.decrypt_in_place(&entity_type, &mut payload) {
        return error_response(codec_error(e));
    }

    (StatusCode::OK, Json(RecordResponse { payload })).into_response()
}

/// `POST /values/encrypt` — encrypt a single value. Non-strings pass through.
pub async fn encrypt_value(State(state): State<AppState>, Json(req): Json<ValueRequest>) -> Response {
    match state.codec.cipher().encrypt_value(req.value) {
        Ok(value) => (StatusCode::OK, Json(ValueResponse { value })).into_response(),
        Err(e) => error_response(cipher_error(e)),
    }
}

/// `POST /values/decrypt` — decrypt a single value. Non-envelopes pass through.
pub async fn decrypt_value(State(state): State<AppState>, Json(req): Json<ValueRequest>) -> Response {
    match state.codec.cipher().decrypt_value(req.value) {
        Ok(value) => (StatusCode::OK, Json(ValueResponse { value })).into_response(),
        Err(e) => {
            warn!(error = %e, "scalar decrypt failed");
            error_response(cipher_error(e))
        }
    }
}

/// `GET /health` — liveness and readiness check.
///
/// The state cannot exist without a validated key, so a running server always
/// reports `ok`.
pub async fn health(State(state): State<AppState>) -> Response {
    let body = HealthResponse {
        status: "ok".into(),
        key_configured: true,
        entity_types: state.codec.schema().len(),
    };
    (StatusCode::OK, Json(body)).into_response()
}

/// Catch-all 404 handler.
pub async fn not_found() -> impl IntoResponse {
    let err = ErrorResponse::new("not_found", "the requested resource does not exist");
    (StatusCode::NOT_FOUND, Json(err))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Read the entity type from the configured request header.
fn entity_type(headers: &HeaderMap, header_name: &str) -> Result<String, ServiceError> {
    let value = headers
        .get(header_name)
        .ok_or_else(|| ServiceError::BadRequest(format!("missing {header_name} header")))?;
    let value = value.to_str().map_err(|_| {
        ServiceError::BadRequest(format!("{header_name} header contains non-ASCII characters"))
    })?;
    let value = value.trim();
    if value.is_empty() {
        return Err(ServiceError::BadRequest(format!("{header_name} header is empty")));
    }
    Ok(value.to_owned())
}

fn codec_error(err: CodecError) -> ServiceError {
    match err {
        CodecError::Integrity { entity, field } => {
            ServiceError::IntegrityFailure(format!("{entity}.{field}"))
        }
        CodecError::Cipher { entity, field, source } => {
            ServiceError::EncryptionFailure(format!("{entity}.{field}: {source}"))
        }
    }
}

fn cipher_error(err: CipherError) -> ServiceError {
    match err {
        CipherError::Integrity => ServiceError::IntegrityFailure("value".into()),
        other => ServiceError::EncryptionFailure(other.to_string()),
    }
}

fn error_response(err: ServiceError) -> Response {
    let status =
        StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ErrorResponse::from(&err))).into_response()
}
