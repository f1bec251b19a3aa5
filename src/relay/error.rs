//! Transport-level relay failures.

use std::error::Error as StdError;
use std::time::Duration;
use thiserror::Error;

/// Why an upstream exchange produced no usable HTTP response.
///
/// The `Display` text is what the browser sees in the 502 body, so every
/// variant renders a non-empty, human-readable message.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("invalid upstream target {target:?}: {reason}")]
    InvalidTarget { target: String, reason: String },

    #[error("upstream request failed: {0}")]
    Connect(String),

    #[error("upstream did not respond within {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("failed to read upstream response: {0}")]
    Body(String),

    #[error("failed to build upstream client: {0}")]
    Setup(String),
}

impl RelayError {
    pub(crate) fn connect(err: &(dyn StdError + 'static)) -> Self {
        RelayError::Connect(error_chain(err))
    }

    pub(crate) fn body(err: &(dyn StdError + 'static)) -> Self {
        RelayError::Body(error_chain(err))
    }
}

/// Flatten an error and its sources into one line. reqwest's top-level
/// messages ("error sending request for url (...)") hide the useful part in
/// the chain.
pub(crate) fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[derive(Debug, Error)]
    #[error("client error (Connect)")]
    struct Outer(#[source] io::Error);

    #[test]
    fn chain_includes_sources() {
        let err = Outer(io::Error::new(io::ErrorKind::ConnectionRefused, "Connection refused"));
        assert_eq!(
            error_chain(&err),
            "client error (Connect): Connection refused"
        );
    }

    #[test]
    fn messages_are_never_empty() {
        let errors = [
            RelayError::InvalidTarget {
                target: "http://x y".into(),
                reason: "invalid uri character".into(),
            },
            RelayError::Connect(String::new()),
            RelayError::Timeout(Duration::from_secs(600)),
            RelayError::Body(String::new()),
            RelayError::Setup(String::new()),
        ];
        for err in errors {
            assert!(!err.to_string().is_empty());
        }
        assert_eq!(
            RelayError::Timeout(Duration::from_secs(600)).to_string(),
            "upstream did not respond within 600s"
        );
    }
}
