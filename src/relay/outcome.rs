//! Upstream outcomes and their mapping to client responses.
//!
//! Every relay ends in exactly one [`UpstreamOutcome`]; turning it into a
//! client response is a pure function with no I/O.

use axum::{
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use bytes::Bytes;

use crate::http::response;
use crate::relay::error::RelayError;

/// Raw result of an exchange: status, headers and buffered body.
pub type ExchangeResult = Result<(StatusCode, HeaderMap, Bytes), RelayError>;

/// Result of one upstream exchange.
#[derive(Debug)]
pub enum UpstreamOutcome {
    /// Upstream answered 2xx.
    Success {
        status: StatusCode,
        content_type: Option<HeaderValue>,
        content_disposition: Option<HeaderValue>,
        body: Bytes,
    },
    /// Upstream answered with any non-2xx status, including a redirect the
    /// client did not follow. The body is assumed to be JSON.
    UpstreamError { status: StatusCode, body: Bytes },
    /// No usable HTTP response (refused, reset, timeout, malformed, ...).
    TransportFailure(RelayError),
}

impl UpstreamOutcome {
    /// Classify a complete upstream response.
    pub fn from_response(status: StatusCode, headers: &HeaderMap, body: Bytes) -> Self {
        if status.is_success() {
            UpstreamOutcome::Success {
                status,
                content_type: headers.get(header::CONTENT_TYPE).cloned(),
                content_disposition: headers.get(header::CONTENT_DISPOSITION).cloned(),
                body,
            }
        } else {
            UpstreamOutcome::UpstreamError { status, body }
        }
    }

    /// Status the client will receive.
    pub fn status(&self) -> StatusCode {
        match self {
            UpstreamOutcome::Success { status, .. } | UpstreamOutcome::UpstreamError { status, .. } => {
                *status
            }
            UpstreamOutcome::TransportFailure(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<ExchangeResult> for UpstreamOutcome {
    fn from(result: ExchangeResult) -> Self {
        match result {
            Ok((status, headers, body)) => UpstreamOutcome::from_response(status, &headers, body),
            Err(err) => UpstreamOutcome::TransportFailure(err),
        }
    }
}

impl IntoResponse for UpstreamOutcome {
    fn into_response(self) -> Response {
        match self {
            UpstreamOutcome::Success {
                status,
                content_type,
                content_disposition,
                body,
            } => {
                let mut headers = HeaderMap::new();
                if let Some(value) = content_type {
                    headers.insert(header::CONTENT_TYPE, value);
                }
                if let Some(value) = content_disposition {
                    headers.insert(header::CONTENT_DISPOSITION, value);
                }
                response::buffered(status, headers, body)
            }
            UpstreamOutcome::UpstreamError { status, body } => response::json_bytes(status, body),
            UpstreamOutcome::TransportFailure(err) => {
                response::json_error(StatusCode::BAD_GATEWAY, &err.to_string())
            }
        }
    }
}
