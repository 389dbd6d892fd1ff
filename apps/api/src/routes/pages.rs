use axum::response::Html;

/// GET /
pub async fn index_page() -> Html<&'static str> {
    Html(include_str!("../../static/index.html"))
}

/// GET /why, the "who is this for" page.
pub async fn why_page() -> Html<&'static str> {
    Html(include_str!("../../static/why.html"))
}
