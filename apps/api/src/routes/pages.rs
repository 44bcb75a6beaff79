use axum::response::Html;

/// GET /
/// Serves the single-page matchmaking form. The page posts to
/// `/api/v1/match` and renders the JSON envelope as a status banner.
pub async fn form_page() -> Html<&'static str> {
    Html(include_str!("../../static/index.html"))
}
