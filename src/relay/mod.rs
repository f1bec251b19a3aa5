//! Upstream relay subsystem.
//!
//! # Data Flow
//! ```text
//! Dispatch::Relay { method, suffix }
//!     → client.rs (one outbound call plus redirects, Content-Type + body only, 600s inactivity timeout)
//!     → outcome.rs (Success | UpstreamError | TransportFailure)
//!     → IntoResponse (CORS, exact Content-Length, JSON error body on failure)
//! ```
//!
//! # Design Decisions
//! - Responses are fully buffered before relay
//! - No retry, no pooling, no fallback upstream
//! - Outcome → response mapping is pure and unit tested without sockets

pub mod client;
pub mod error;
pub mod outcome;

pub use client::{RelayRequest, UpstreamClient};
pub use error::RelayError;
pub use outcome::{ExchangeResult, UpstreamOutcome};
