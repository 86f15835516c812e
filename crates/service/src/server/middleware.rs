//! Layer stack wrapped around every route: tracing, timeout, compression.

use std::time::Duration;

use axum::Router;
use tower_http::{compression::CompressionLayer, timeout::TimeoutLayer, trace::TraceLayer};

/// Per-request timeout. Every operation is in-memory, so this only bounds
/// slow clients.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Wrap `router` in the service's middleware layers.
pub fn apply<S>(router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(CompressionLayer::new())
}
