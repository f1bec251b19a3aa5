//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, path-and-query)
//!     → router.rs (Dispatch::classify)
//!     → matcher.rs (prefix check + strip)
//!     → Return: Relay / Static / Preflight / MethodNotAllowed / NotImplemented
//! ```
//!
//! # Design Decisions
//! - One fixed prefix, compiled at startup, immutable at runtime
//! - No regex in hot path (prefix matching only)
//! - Deterministic: same input always yields the same dispatch

pub mod matcher;
pub mod router;

pub use matcher::PathPrefixMatcher;
pub use router::Dispatch;
