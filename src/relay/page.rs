use axum::response::Html;
use axum::Json;
use serde::Serialize;

/// Browser submission form; talks to `/api/predictions` from the page.
const INDEX_HTML: &str = include_str!("../../static/index.html");

/// GET / -- the submission page.
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
