//! Oracle error types.

use std::time::Duration;

use thiserror::Error;

/// Errors from an analysis call.
#[derive(Debug, Error)]
pub enum OracleError {
    /// Transport failure: connection refused, reset, DNS, TLS.
    #[error("oracle unavailable: {0}")]
    Unavailable(String),

    /// The call did not finish within the configured bound.
    #[error("oracle timed out after {0:?}")]
    Timeout(Duration),

    /// The reply did not parse into a conforming analysis.
    #[error("malformed analysis: {0}")]
    Malformed(String),

    /// The endpoint answered with a non-success status.
    #[error("oracle API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// No endpoint or credentials are configured.
    #[error("oracle not configured: set oracle.base_url and oracle.api_key")]
    NotConfigured,
}

impl OracleError {
    /// Whether the failure is about the reply's content rather than reaching
    /// the oracle at all.
    #[must_use]
    pub const fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed(_))
    }
}

impl From<reqwest::Error> for OracleError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Unavailable(format!("request timed out: {e}"))
        } else if e.is_decode() {
            Self::Malformed(e.to_string())
        } else {
            Self::Unavailable(e.to_string())
        }
    }
}
