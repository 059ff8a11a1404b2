//! HTTP surface of the relay: the prediction endpoint, the submission page
//! and a health check.

pub mod handler;
pub mod page;
pub mod response;
pub mod state;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

pub use state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(page::index))
        .route("/health", get(page::health))
        .route(
            "/api/predictions",
            post(handler::create_prediction).fallback(handler::method_not_allowed),
        )
        // Encoded videos routinely exceed the default 2 MB extractor limit
        .layer(DefaultBodyLimit::disable())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
