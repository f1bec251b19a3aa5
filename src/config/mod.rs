//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! built-in defaults
//!     → optional TOML file (loader.rs)
//!     → ACE_STEP_URL / command line flags (loader.rs, clap)
//!     → validation.rs (semantic checks)
//!     → DevServerConfig (validated, immutable)
//!     → shared via Arc with the request handlers
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload
//! - All fields have defaults to allow running with no arguments
//! - Validation separates syntactic (serde/clap) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_from_cli, Cli, ConfigError};
pub use schema::{DevServerConfig, ListenerConfig, ObservabilityConfig, StaticConfig, UpstreamConfig};
pub use validation::ValidationError;
