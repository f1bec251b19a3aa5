//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the upstream base URL is a usable plain-HTTP origin
//! - Check the routing prefix shape
//! - Validate value ranges (timeouts > 0, static root exists)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure apart from the static root existence check
//! - Runs before config is accepted into the system

use thiserror::Error;
use url::Url;

use crate::config::schema::DevServerConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("upstream base URL {url:?} is invalid: {reason}")]
    UpstreamUrl { url: String, reason: String },

    #[error("routing prefix {0:?} must start and end with '/' and name at least one segment")]
    Prefix(String),

    #[error("upstream timeout must be greater than zero")]
    ZeroTimeout,

    #[error("static root {0:?} is not a directory")]
    StaticRoot(String),
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &DevServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(reason) = check_upstream_url(&config.upstream.base_url) {
        errors.push(ValidationError::UpstreamUrl {
            url: config.upstream.base_url.clone(),
            reason,
        });
    }

    if !is_valid_prefix(&config.upstream.prefix) {
        errors.push(ValidationError::Prefix(config.upstream.prefix.clone()));
    }

    if config.upstream.timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    if !config.static_files.root.is_dir() {
        errors.push(ValidationError::StaticRoot(
            config.static_files.root.display().to_string(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_upstream_url(raw: &str) -> Result<(), String> {
    let url = Url::parse(raw).map_err(|e| e.to_string())?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!(
            "scheme {:?} is not supported, use http or https",
            url.scheme()
        ));
    }
    if url.host_str().is_none() {
        return Err("missing host".to_string());
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err("must not carry a query or fragment".to_string());
    }
    Ok(())
}

fn is_valid_prefix(prefix: &str) -> bool {
    prefix.len() > 2 && prefix.starts_with('/') && prefix.ends_with('/') && !prefix.contains('?')
}
