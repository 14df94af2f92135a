//! Blocking JSON-over-HTTP client.
//!
//! # Overview
//! One call sends one request and blocks until a response or error arrives:
//! reachability gate, request building (URL, query, headers, JSON body),
//! transport, then decoding the body into a `serde_json::Value`.
//!
//! # Design
//! - `Client` is immutable after construction; settings live in
//!   `ClientConfig` instead of process-wide state.
//! - The transport is the async `reqwest` client driven on a worker thread;
//!   the caller blocks on a one-slot channel (see `transport`).
//! - `Call` exposes the pipeline stages individually, and `Exchange` keeps
//!   the sent request next to its outcome for inspection.
//! - Every failure is a distinct `Error` variant. Nothing is retried.

pub mod call;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod reachability;
pub mod request;
pub mod response;
mod shape;
pub mod transport;

pub use call::Call;
pub use client::{Client, NO_PAYLOAD};
pub use config::ClientConfig;
pub use error::{ConfigError, Error, Result, TransportError};
pub use http::{Exchange, ExchangeResult, Headers, HttpMethod, HttpRequest, QueryParams, ResponseHead};
pub use reachability::{DefaultRoute, Reachability};
pub use serde_json::Value;
