//! Error types for the JSON client facade.
//!
//! # Design
//! Every failure of a call maps to exactly one variant, checked in pipeline
//! order: reachability, request construction, payload encoding, transport,
//! response parsing. Callers match on the variant rather than the message.
//! `RequestFailed` keeps the transport's own error as its `source()` so DNS,
//! TLS and timeout failures stay inspectable.

use thiserror::Error;

/// Error reported by the underlying HTTP transport.
pub type TransportError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type for client operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors returned by `Client` calls and the individual pipeline stages.
#[derive(Debug, Error)]
pub enum Error {
    /// No network route was available; no request was attempted.
    #[error("network is not reachable")]
    Offline,

    /// The URL could not be parsed, a header was malformed, or a stage ran
    /// before a request was built.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The payload could not be encoded as JSON.
    #[error("payload serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),

    /// The response body is not a JSON document.
    #[error("response deserialization failed: {0}")]
    Deserialization(#[source] serde_json::Error),

    /// The exchange finished without any response metadata.
    #[error("no response received")]
    NoResponse,

    /// The transport reported an error (DNS, connect, TLS, timeout, ...).
    #[error("request failed: {0}")]
    RequestFailed(#[source] TransportError),
}

impl Error {
    /// The transport error behind `RequestFailed`, if any.
    pub fn transport_error(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            Error::RequestFailed(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

/// Errors raised while loading a `ClientConfig`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}
