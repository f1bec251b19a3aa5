//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber
//! - Emit one access log line per request, tagged `proxy` or `static`
//!
//! # Design Decisions
//! - `RUST_LOG` wins over the configured level
//! - Static asset fetches (scripts, styles, icons, source maps) log at debug
//!   so the console shows page loads and API traffic only

use axum::http::{Method, StatusCode};
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const QUIET_EXTENSIONS: [&str; 5] = [".js", ".css", ".ico", ".map", ".env"];

/// Install the global subscriber. `default_filter` applies when `RUST_LOG` is unset.
pub fn init(default_filter: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// True for static paths whose fetches are logged at debug.
pub fn is_quiet_asset(target: &str) -> bool {
    let path = target.split('?').next().unwrap_or(target);
    QUIET_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

/// Access log for one completed request.
pub fn log_request(
    kind: &'static str,
    request_id: &str,
    method: &Method,
    target: &str,
    status: StatusCode,
    elapsed: Duration,
) {
    let elapsed_ms = elapsed.as_millis() as u64;
    if kind == "static" && is_quiet_asset(target) {
        tracing::debug!(
            kind,
            request_id = %request_id,
            method = %method,
            path = %target,
            status = status.as_u16(),
            elapsed_ms,
            "Request completed"
        );
    } else {
        tracing::info!(
            kind,
            request_id = %request_id,
            method = %method,
            path = %target,
            status = status.as_u16(),
            elapsed_ms,
            "Request completed"
        );
    }
}
