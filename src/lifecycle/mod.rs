//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Validate → Bind listener → Print banner → Serve
//!
//! Signals (signals.rs):
//!     SIGINT (Ctrl+C) → stop accepting → exit
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - No reload: configuration is fixed for the process lifetime

pub mod signals;
pub mod startup;

pub use signals::shutdown_signal;
