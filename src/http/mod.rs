//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection (one Tokio task per connection, via axum::serve)
//!     → server.rs (Axum setup, request ID + trace layers)
//!     → request.rs (routing target, request ID, body buffering)
//!     → routing::Dispatch decides the handling path
//!     → static_files.rs | relay | response.rs immediate reply
//!     → response.rs (CORS, Content-Length, JSON errors)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;
pub mod static_files;

pub use request::X_REQUEST_ID;
pub use server::{AppState, HttpServer};
pub use static_files::StaticFiles;
