use axum::response::Html;

const INDEX_HTML: &str = include_str!("../../static/index.html");

/// GET `/` — the bundled single-page UI.
pub async fn homepage() -> Html<&'static str> {
    Html(INDEX_HTML)
}
