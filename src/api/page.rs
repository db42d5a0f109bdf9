// SPDX-License-Identifier: Apache-2.0

use axum::response::Html;

const INDEX_HTML: &str = include_str!("../../assets/index.html");

/// `GET /`: the query page.
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
