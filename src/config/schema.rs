//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the dev server.
//! All types derive Serde traits so a TOML file can provide any subset of them.

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

/// Default port when none is given on the command line.
pub const DEFAULT_PORT: u16 = 8080;

/// Default upstream API base URL.
pub const DEFAULT_UPSTREAM_URL: &str = "http://localhost:8001";

/// Default routing prefix for relayed requests.
pub const DEFAULT_PREFIX: &str = "/ace-api/";

/// Upstream calls may run long synchronous jobs (audio synthesis), so the
/// relay waits up to ten minutes.
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 600;

/// Root configuration for the dev server.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct DevServerConfig {
    /// Listener configuration (bind address, port).
    pub listener: ListenerConfig,

    /// Upstream API relay settings.
    pub upstream: UpstreamConfig,

    /// Static file serving settings.
    pub static_files: StaticConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl DevServerConfig {
    /// Socket address the listener binds to.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.listener.bind_address, self.listener.port)
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Interface to bind (e.g., "0.0.0.0").
    pub bind_address: IpAddr,

    /// TCP port. Zero asks the OS for an ephemeral port.
    pub port: u16,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
        }
    }
}

/// Upstream relay configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL the stripped path is appended to (e.g., "http://localhost:8001").
    pub base_url: String,

    /// Path prefix marking a request for relay. Must start and end with '/'.
    pub prefix: String,

    /// Inactivity timeout for the upstream, in seconds. Applies to connect
    /// plus response head, then separately to each body read.
    pub timeout_secs: u64,

    /// Largest inbound request body accepted for relay. Unset means no limit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_body_bytes: Option<usize>,
}

impl UpstreamConfig {
    /// Upstream exchange timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_UPSTREAM_URL.to_string(),
            prefix: DEFAULT_PREFIX.to_string(),
            timeout_secs: DEFAULT_UPSTREAM_TIMEOUT_SECS,
            max_body_bytes: None,
        }
    }
}

/// Static file serving configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct StaticConfig {
    /// Directory served for non-relayed GET requests.
    pub root: PathBuf,
}

impl Default for StaticConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log filter directive used when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "devrelay=info,tower_http=warn".to_string(),
        }
    }
}
