//! Tracing setup: structured JSON logs, plus optional OTLP trace export.
//!
//! # Telemetry invariants
//!
//! - **No plaintext, ciphertext, or key material** may appear in any span
//!   attribute or log field. Entity types and field names are allowed.
//! - Log level is configurable via `LOG_LEVEL` (default: `info`); `RUST_LOG`
//!   takes precedence when set.

pub mod init;

pub use init::{init_telemetry, shutdown_telemetry};
