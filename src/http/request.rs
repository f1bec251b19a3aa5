//! Request handling and transformation.
//!
//! # Responsibilities
//! - Generate a request ID (UUID v4) and echo it back on the response
//! - Extract the routing target (path plus query) from the request line
//! - Buffer the inbound body for relay, bounded by the configured limit
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - The request ID is never forwarded upstream; only Content-Type is

use axum::{
    body::Body,
    http::{HeaderMap, HeaderName, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use http_body_util::LengthLimitError;
use std::error::Error as StdError;
use thiserror::Error;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

use crate::http::response;

/// Header carrying the per-request ID.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Layer assigning a UUID to requests that arrive without one.
pub fn set_request_id_layer() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid)
}

/// Layer copying the request ID onto the response.
pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::new(X_REQUEST_ID)
}

/// The request ID, or "unknown" when the layer is not installed.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(&X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// Path plus query exactly as received, e.g. `/ace-api/jobs?id=3`.
pub fn routing_target(uri: &Uri) -> String {
    uri.path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string())
}

/// Failure reading an inbound body that was meant for the upstream.
#[derive(Debug, Error)]
pub enum BodyError {
    #[error("request body exceeds {limit} bytes")]
    TooLarge { limit: usize },

    #[error("failed to read request body: {0}")]
    Read(String),
}

impl IntoResponse for BodyError {
    fn into_response(self) -> Response {
        let status = match self {
            BodyError::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            BodyError::Read(_) => StatusCode::BAD_REQUEST,
        };
        response::json_error(status, &self.to_string())
    }
}

/// Buffer the whole request body, up to `limit` bytes when a limit is set.
pub async fn read_body(body: Body, limit: Option<usize>) -> Result<Bytes, BodyError> {
    let limit = limit.unwrap_or(usize::MAX);
    axum::body::to_bytes(body, limit).await.map_err(|err| {
        if caused_by_length_limit(&err) {
            BodyError::TooLarge { limit }
        } else {
            BodyError::Read(err.to_string())
        }
    })
}

fn caused_by_length_limit(err: &(dyn StdError + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(e) = current {
        if e.is::<LengthLimitError>() {
            return true;
        }
        current = e.source();
    }
    false
}
