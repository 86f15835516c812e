//! Axum HTTP surface over the field codec.
//!
//! # Responsibilities
//! - Define the Axum router with all routes and shared middleware.
//! - Inject shared application state (`AppState`) into handlers.
//! - Map codec errors onto [`common::ServiceError`] status codes.

pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;
