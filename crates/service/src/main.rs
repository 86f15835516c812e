//! `fieldcrypt-svc` — field encryption service entry point.
//!
//! Startup sequence:
//! 1. Load and validate [`Config`] from environment variables.
//! 2. Initialise the telemetry pipeline (JSON logs, optional OTLP).
//! 3. Decode and validate the encryption key. Failure here is fatal.
//! 4. Load the field schema (file or built-in table).
//! 5. Build the Axum router and serve until Ctrl-C.
//!
//! Nothing that can encrypt or decrypt is reachable before step 3 succeeds.

mod config;
mod server;
mod telemetry;

use anyhow::{Context, Result};
use fieldcrypt::{Cipher, FieldSchema, KeyManager, ObjectCodec};
use tracing::info;

use config::Config;
use server::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Configuration
    // -----------------------------------------------------------------------
    let cfg = Config::from_env().map_err(|e| {
        // Telemetry is not yet up; write to stderr directly.
        eprintln!("ERROR: configuration invalid: {e:#}");
        e
    })?;

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init_telemetry(cfg.otlp_endpoint(), &cfg.log_level)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        listen_port = cfg.listen_port,
        "fieldcrypt-svc starting"
    );

    // -----------------------------------------------------------------------
    // 3. Encryption key
    // -----------------------------------------------------------------------
    let key = KeyManager::from_encoded(&cfg.encryption_key).context("ENCRYPTION_KEY is invalid")?;
    info!(key_configured = key.is_configured(), "encryption key loaded");

    // -----------------------------------------------------------------------
    // 4. Field schema
    // -----------------------------------------------------------------------
    let schema = match cfg.schema_path() {
        Some(path) => fieldcrypt::schema::load_file(path)
            .with_context(|| format!("failed to load FIELD_SCHEMA_PATH {path}"))?,
        None => {
            info!("FIELD_SCHEMA_PATH not set; using built-in field schema");
            FieldSchema::default()
        }
    };

    let codec = ObjectCodec::new(Cipher::new(&key), schema);
    drop(key);

    // -----------------------------------------------------------------------
    // 5. HTTP server
    // -----------------------------------------------------------------------
    let state = AppState::new(codec, cfg.entity_header_name.clone());
    let router = server::router::build(state);

    let addr: std::net::SocketAddr = ([0, 0, 0, 0], cfg.listen_port).into();
    info!(addr = %addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("fieldcrypt-svc stopped");
    telemetry::shutdown_telemetry();
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
