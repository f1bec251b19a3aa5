//! devrelay: local development server.
//!
//! Serves static files from a directory and relays every request under one
//! path prefix (default `/ace-api/`) to a separately running upstream API,
//! so a browser front end talks to a single origin.
//!
//! ```text
//!   browser ──▶ devrelay ──┬─▶ /ace-api/*  ──▶ upstream API (prefix stripped)
//!                          ├─▶ OPTIONS     ──▶ 204 + CORS
//!                          └─▶ GET others  ──▶ static files
//! ```

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod relay;
pub mod routing;

pub use config::DevServerConfig;
pub use http::HttpServer;
