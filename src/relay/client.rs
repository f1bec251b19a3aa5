//! Outbound HTTP client for the upstream API.
//!
//! # Responsibilities
//! - Build the upstream target from the base URL and stripped suffix
//! - Forward method, `Content-Type` and body; drop every other header
//! - Follow upstream redirects, then buffer the full final response
//!
//! # Design Decisions
//! - No connection reuse: idle pool size is zero
//! - No retries: every failure is returned to the caller as-is
//! - The timeout bounds inactivity, not the whole exchange: connect plus
//!   response head get one window, then every body chunk gets a fresh one
//! - Redirects: GET follows 301/302/303/307/308; POST follows 301/302/303
//!   as a body-less GET and stops at 307/308; at most ten hops

use axum::http::{header, HeaderValue, Method, StatusCode};
use bytes::{Bytes, BytesMut};
use reqwest::redirect::{Attempt, Policy};
use std::time::Duration;

use crate::config::UpstreamConfig;
use crate::relay::error::RelayError;
use crate::relay::outcome::{ExchangeResult, UpstreamOutcome};

/// Redirect hops followed before the last 3xx is relayed as-is.
pub const MAX_REDIRECTS: usize = 10;

/// A request on its way to the upstream.
#[derive(Debug, Clone)]
pub struct RelayRequest {
    pub method: Method,
    /// Path-and-query with the routing prefix already removed.
    pub suffix: String,
    pub content_type: Option<HeaderValue>,
    /// Present only for POST.
    pub body: Option<Bytes>,
}

/// Client for the single configured upstream.
///
/// Holds two reqwest clients because a redirect policy cannot see the
/// request method: one follows every redirect status, the other refuses
/// to replay a POST on 307/308.
#[derive(Clone)]
pub struct UpstreamClient {
    follow_all: reqwest::Client,
    method_changing_only: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl UpstreamClient {
    /// Create a client for the configured upstream.
    pub fn new(config: &UpstreamConfig) -> Result<Self, RelayError> {
        let timeout = config.timeout();
        Ok(Self {
            follow_all: build_client(timeout, Policy::custom(follow_any_redirect))?,
            method_changing_only: build_client(timeout, Policy::custom(follow_method_changing_redirect))?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    /// Full upstream URL for a stripped suffix.
    pub fn target(&self, suffix: &str) -> String {
        format!("{}{}", self.base_url, suffix)
    }

    /// Perform one upstream exchange and classify the result.
    pub async fn forward(&self, request: RelayRequest) -> UpstreamOutcome {
        UpstreamOutcome::from(self.exchange(request).await)
    }

    async fn exchange(&self, request: RelayRequest) -> ExchangeResult {
        let target = self.target(&request.suffix);
        let url = reqwest::Url::parse(&target).map_err(|e| RelayError::InvalidTarget {
            target: target.clone(),
            reason: e.to_string(),
        })?;

        let client = if request.method == Method::POST {
            &self.method_changing_only
        } else {
            &self.follow_all
        };

        tracing::debug!(upstream = %target, method = %request.method, "Forwarding to upstream");

        let mut builder = client.request(request.method, url);
        if let Some(content_type) = request.content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let mut response = tokio::time::timeout(self.timeout, builder.send())
            .await
            .map_err(|_| RelayError::Timeout(self.timeout))?
            .map_err(|e| RelayError::connect(&e))?;

        if response.url().as_str() != target {
            tracing::debug!(upstream = %target, final_url = %response.url(), "Followed upstream redirect");
        }

        let status = response.status();
        let headers = response.headers().clone();

        let mut body = BytesMut::new();
        loop {
            let chunk = tokio::time::timeout(self.timeout, response.chunk())
                .await
                .map_err(|_| RelayError::Timeout(self.timeout))?
                .map_err(|e| RelayError::body(&e))?;
            match chunk {
                Some(bytes) => body.extend_from_slice(&bytes),
                None => break,
            }
        }

        Ok((status, headers, body.freeze()))
    }
}

fn build_client(timeout: Duration, redirects: Policy) -> Result<reqwest::Client, RelayError> {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .connect_timeout(timeout)
        .redirect(redirects)
        .no_proxy()
        .build()
        .map_err(|e| RelayError::Setup(e.to_string()))
}

fn follow_any_redirect(attempt: Attempt) -> reqwest::redirect::Action {
    if attempt.previous().len() > MAX_REDIRECTS {
        return attempt.stop();
    }
    attempt.follow()
}

/// `previous()` holds every URL requested so far, so a length of one means
/// the redirect answers the original POST. reqwest turns a POST into a
/// body-less GET on 301/302/303; 307/308 would replay the body, which is
/// not done.
fn follow_method_changing_redirect(attempt: Attempt) -> reqwest::redirect::Action {
    let replays_method = matches!(
        attempt.status(),
        StatusCode::TEMPORARY_REDIRECT | StatusCode::PERMANENT_REDIRECT
    );
    if replays_method && attempt.previous().len() == 1 {
        return attempt.stop();
    }
    follow_any_redirect(attempt)
}
