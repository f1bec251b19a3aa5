//! Response construction for relayed and locally answered requests.
//!
//! # Responsibilities
//! - Inject the fixed CORS header set
//! - Build fully buffered responses with an exact Content-Length
//! - Synthesize `{"error": "..."}` JSON bodies for failures
//! - Immediate replies: pre-flight 204, 405, 501
//!
//! # Design Decisions
//! - Bodies are always buffered, so Content-Length is always known
//! - CORS values are literals; there is no origin negotiation

use axum::{
    body::Body,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use bytes::Bytes;

pub const CORS_ALLOW_ORIGIN: &str = "*";
pub const CORS_ALLOW_METHODS: &str = "GET, POST, OPTIONS";
pub const CORS_ALLOW_HEADERS: &str = "Content-Type";

/// Add the CORS headers every relayed response carries.
pub fn apply_cors(headers: &mut HeaderMap) {
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static(CORS_ALLOW_ORIGIN),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(CORS_ALLOW_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(CORS_ALLOW_HEADERS),
    );
}

/// A buffered response with CORS headers and an exact Content-Length.
/// `headers` are copied on top (e.g. Content-Type).
pub fn buffered(status: StatusCode, headers: HeaderMap, body: Bytes) -> Response {
    let len = body.len();
    let mut response = (status, Body::from(body)).into_response();

    let out = response.headers_mut();
    out.extend(headers);
    apply_cors(out);
    out.insert(header::CONTENT_LENGTH, HeaderValue::from(len));
    response
}

/// A buffered JSON response. The body is sent as given, not re-encoded.
pub fn json_bytes(status: StatusCode, body: Bytes) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    buffered(status, headers, body)
}

/// `{"error": "<message>"}` with the given status.
pub fn json_error(status: StatusCode, message: &str) -> Response {
    let body = serde_json::json!({ "error": message }).to_string();
    json_bytes(status, Bytes::from(body))
}

/// CORS pre-flight answer: 204, CORS headers, no body.
pub fn preflight() -> Response {
    let mut response = StatusCode::NO_CONTENT.into_response();
    apply_cors(response.headers_mut());
    response
}

/// POST outside the relay prefix.
pub fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(header::ALLOW, "GET, HEAD, OPTIONS")],
        "Method Not Allowed",
    )
        .into_response()
}

/// Methods the server does not handle at all.
pub fn not_implemented() -> Response {
    (StatusCode::NOT_IMPLEMENTED, "Unsupported method").into_response()
}
