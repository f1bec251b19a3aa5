//! HTTP server setup and request dispatch.
//!
//! # Responsibilities
//! - Create the Axum Router with the single dispatch handler
//! - Wire up middleware (request ID, tracing)
//! - Bind server to listener
//! - Dispatch each request to the relay, the static collaborator or an
//!   immediate reply

use axum::{
    body::Body,
    extract::State,
    http::{header, Method, Request},
    response::{IntoResponse, Response},
    Router,
};
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::config::DevServerConfig;
use crate::http::request::{self, propagate_request_id_layer, set_request_id_layer};
use crate::http::response;
use crate::http::static_files::StaticFiles;
use crate::observability::logging;
use crate::relay::{RelayError, RelayRequest, UpstreamClient, UpstreamOutcome};
use crate::routing::{Dispatch, PathPrefixMatcher};

/// Application state injected into handlers. Immutable after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<DevServerConfig>,
    pub matcher: Arc<PathPrefixMatcher>,
    pub upstream: UpstreamClient,
    pub static_files: StaticFiles,
}

impl AppState {
    pub fn new(config: DevServerConfig) -> Result<Self, RelayError> {
        Ok(Self {
            matcher: Arc::new(PathPrefixMatcher::new(config.upstream.prefix.clone())),
            upstream: UpstreamClient::new(&config.upstream)?,
            static_files: StaticFiles::new(&config.static_files.root),
            config: Arc::new(config),
        })
    }
}

/// HTTP server for static files plus the upstream relay.
pub struct HttpServer {
    router: Router,
    config: Arc<DevServerConfig>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: DevServerConfig) -> Result<Self, RelayError> {
        let state = AppState::new(config)?;
        let config = state.config.clone();
        Ok(Self {
            router: Self::build_router(state),
            config,
        })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .fallback(dispatch_handler)
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(set_request_id_layer())
                    .layer(TraceLayer::new_for_http())
                    .layer(propagate_request_id_layer()),
            )
    }

    /// The fully layered router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve on `listener` until `shutdown` resolves.
    pub async fn run<F>(self, listener: TcpListener, shutdown: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.base_url,
            prefix = %self.config.upstream.prefix,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Main handler. Classifies the request and produces exactly one response.
async fn dispatch_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let method = request.method().clone();
    let target = request::routing_target(request.uri());
    let request_id = request::request_id(request.headers()).to_string();

    let dispatch = Dispatch::classify(&method, &target, &state.matcher);
    let kind = dispatch.kind();

    let response = match dispatch {
        Dispatch::Preflight => response::preflight(),
        Dispatch::MethodNotAllowed => response::method_not_allowed(),
        Dispatch::NotImplemented => response::not_implemented(),
        Dispatch::Static => state.static_files.serve(request).await,
        Dispatch::Relay { method, suffix } => {
            relay(&state, &request_id, method, suffix, request).await
        }
    };

    logging::log_request(
        kind,
        &request_id,
        &method,
        &target,
        response.status(),
        start_time.elapsed(),
    );
    response
}

/// Forward one request upstream and map the outcome to a response.
async fn relay(
    state: &AppState,
    request_id: &str,
    method: Method,
    suffix: &str,
    request: Request<Body>,
) -> Response {
    let (parts, body) = request.into_parts();
    let content_type = parts.headers.get(header::CONTENT_TYPE).cloned();

    let body = if method == Method::POST {
        match request::read_body(body, state.config.upstream.max_body_bytes).await {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                tracing::warn!(request_id = %request_id, error = %e, "Rejecting relay body");
                return e.into_response();
            }
        }
    } else {
        None
    };

    let outcome = state
        .upstream
        .forward(RelayRequest {
            method,
            suffix: suffix.to_string(),
            content_type,
            body,
        })
        .await;

    match &outcome {
        UpstreamOutcome::TransportFailure(e) => {
            tracing::warn!(
                request_id = %request_id,
                upstream = %state.upstream.target(suffix),
                error = %e,
                "Upstream relay failed"
            );
        }
        UpstreamOutcome::UpstreamError { .. } => {
            tracing::debug!(request_id = %request_id, status = %outcome.status(), "Upstream returned error status");
        }
        UpstreamOutcome::Success { .. } => {}
    }

    outcome.into_response()
}
