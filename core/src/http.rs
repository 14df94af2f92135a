//! HTTP exchange types.
//!
//! # Design
//! These types describe one exchange as plain data: the `HttpRequest`
//! descriptor built by the request stages, and the `ExchangeResult` recorded
//! by the transport. The parser only ever looks at an `ExchangeResult`, so it
//! can be driven from hand-made values without touching the network.
//!
//! Header maps use `reqwest::header::HeaderMap`, whose names compare
//! case-insensitively.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use reqwest::header::HeaderMap;
use serde_json::Value;
use url::Url;

use crate::error::{Error, Result, TransportError};
use crate::response;

/// Query parameters appended to a request URL. Iteration order is unspecified.
pub type QueryParams = HashMap<String, String>;

/// Caller-supplied request headers.
pub type Headers = HashMap<String, String>;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
}

impl HttpMethod {
    /// Canonical uppercase token.
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "PATCH" => Ok(HttpMethod::Patch),
            "DELETE" => Ok(HttpMethod::Delete),
            "HEAD" => Ok(HttpMethod::Head),
            other => Err(Error::InvalidRequest(format!("unsupported method: {other}"))),
        }
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
            HttpMethod::Head => reqwest::Method::HEAD,
        }
    }
}

/// A fully assembled request, ready for the transport.
///
/// Built by `request::build_request`; headers and body are filled in by the
/// composer stages. `url` is always absolute.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
}

/// Status line and headers of a received response.
#[derive(Debug, Clone)]
pub struct ResponseHead {
    pub status: u16,
    pub headers: HeaderMap,
}

/// What the transport recorded for one exchange.
///
/// The transport fills either `error` or `response` (plus `body`), never
/// both. `ExchangeResult::default()` is an exchange where nothing was
/// recorded at all.
#[derive(Debug, Default)]
pub struct ExchangeResult {
    pub error: Option<TransportError>,
    pub response: Option<ResponseHead>,
    pub body: Option<Vec<u8>>,
}

impl ExchangeResult {
    pub fn failed(error: TransportError) -> Self {
        Self {
            error: Some(error),
            response: None,
            body: None,
        }
    }

    pub fn received(response: ResponseHead, body: Option<Vec<u8>>) -> Self {
        Self {
            error: None,
            response: Some(response),
            body,
        }
    }

    /// Status code of the response, if one was received.
    pub fn status(&self) -> Option<u16> {
        self.response.as_ref().map(|r| r.status)
    }
}

/// One completed call: the request that was sent and what came back.
#[derive(Debug)]
pub struct Exchange {
    pub request: HttpRequest,
    pub result: ExchangeResult,
}

impl Exchange {
    /// Parse the response body into a JSON value. See `response::parse`.
    pub fn into_value(self) -> Result<Option<Value>> {
        response::parse(self.result)
    }
}
