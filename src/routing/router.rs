//! Request dispatch rule.
//!
//! # Responsibilities
//! - Decide, per request, between relay, static serving and an immediate reply
//! - Return an explicit variant for every outcome rather than a silent default
//!
//! # Design Decisions
//! - Pure function of (method, target, matcher); no state, no I/O
//! - OPTIONS short-circuits before any path inspection
//! - HEAD is never relayed; it goes to the static collaborator

use axum::http::Method;

use crate::routing::matcher::PathPrefixMatcher;

/// How a single inbound request is handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch<'a> {
    /// CORS pre-flight: answer 204 with CORS headers.
    Preflight,
    /// Forward to the upstream. `suffix` is the path-and-query with the
    /// prefix mount removed.
    Relay { method: Method, suffix: &'a str },
    /// Hand the request to the static file server.
    Static,
    /// POST outside the relay prefix.
    MethodNotAllowed,
    /// Any method the server does not handle at all.
    NotImplemented,
}

impl<'a> Dispatch<'a> {
    /// Classify a request by method and path-and-query.
    pub fn classify(method: &Method, path_and_query: &'a str, matcher: &PathPrefixMatcher) -> Self {
        if method == Method::OPTIONS {
            return Dispatch::Preflight;
        }

        if method == Method::GET || method == Method::POST {
            if let Some(suffix) = matcher.strip(path_and_query) {
                return Dispatch::Relay {
                    method: method.clone(),
                    suffix,
                };
            }
        }

        if method == Method::GET || method == Method::HEAD {
            Dispatch::Static
        } else if method == Method::POST {
            Dispatch::MethodNotAllowed
        } else {
            Dispatch::NotImplemented
        }
    }

    /// Short label used in access logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Dispatch::Relay { .. } => "proxy",
            Dispatch::Static => "static",
            Dispatch::Preflight => "preflight",
            Dispatch::MethodNotAllowed | Dispatch::NotImplemented => "rejected",
        }
    }
}
