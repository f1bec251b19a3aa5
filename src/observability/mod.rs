//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! dispatch handler
//!     → logging.rs (one access event per request)
//! tower-http TraceLayer
//!     → debug-level request/response spans
//! ```
//!
//! # Design Decisions
//! - `tracing` events with structured fields, formatted by tracing-subscriber
//! - Request ID flows through every event for a request

pub mod logging;
