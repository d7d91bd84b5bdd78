//! Plain-text response helper for the exchange wire protocol.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

/// Media type of every exchange response. The exporter is a legacy client
/// that expects exactly this value.
pub const PLAIN_TEXT_UTF8: &str = "text/plain; charset=utf-8";

/// Build a `text/plain; charset=utf-8` response with the given status and
/// body. Exchange bodies are newline-separated lines, first line `success`
/// or `failure`.
pub fn plain(status: StatusCode, body: impl Into<String>) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, PLAIN_TEXT_UTF8)],
        body.into(),
    )
        .into_response()
}
