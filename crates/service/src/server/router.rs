//! Axum router construction.

use axum::{
    routing::{get, post},
    Router,
};

use super::{handlers, middleware, state::AppState};

/// Build the application [`Router`] with all routes and middleware attached.
pub fn build(state: AppState) -> Router {
    let routes: Router<AppState> = Router::new()
        .route("/records/encrypt", post(handlers::encrypt_records))
        .route("/records/decrypt", post(handlers::decrypt_records))
        .route("/values/encrypt", post(handlers::encrypt_value))
        .route("/values/decrypt", post(handlers::decrypt_value))
        .route("/health", get(handlers::health))
        .fallback(handlers::not_found);

    middleware::apply(routes).with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::state::test_support::test_state;
    use axum::{body::Body, http::Request};
    use tower::ServiceExt;

    #[tokio::test]
    async fn unknown_route_returns_404() {
        let app = build(test_state());
        let req = Request::builder()
            .uri("/unknown")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), 404);
    }

    #[tokio::test]
    async fn health_route_exists() {
        let app = build(test_state());
        let req = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), 200);
    }
}
