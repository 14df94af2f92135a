//! Blocking JSON client facade.
//!
//! # Design
//! `Client` holds only its immutable `ClientConfig` and a reachability gate.
//! Each call builds its own `Call`, so one client can serve concurrent calls
//! from several threads. `exchange` returns the sent request together with
//! what the transport recorded; `send` and the verb helpers go one step
//! further and parse the body.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::call::Call;
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::http::{Exchange, Headers, HttpMethod, QueryParams};
use crate::reachability::{DefaultRoute, Reachability};

/// Pass as `payload` to send a request without a body.
pub const NO_PAYLOAD: Option<&'static Value> = None;

/// Synchronous client that sends JSON and returns decoded JSON.
///
/// ```no_run
/// use jab_core::{Client, ClientConfig};
/// use serde_json::json;
///
/// let client = Client::new(ClientConfig::default().with_user_agent("my-app/1.0"));
/// let echoed = client.post("https://httpbin.org/post", None, Some(&json!({"a": 1})), None)?;
/// assert_eq!(echoed.unwrap()["json"]["a"], 1);
/// # Ok::<(), jab_core::Error>(())
/// ```
#[derive(Clone)]
pub struct Client {
    config: ClientConfig,
    reachability: Arc<dyn Reachability>,
}

impl Client {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            reachability: Arc::new(DefaultRoute::default()),
        }
    }

    /// Replace the default-route check used to gate every call.
    pub fn with_reachability(mut self, gate: impl Reachability + 'static) -> Self {
        self.reachability = Arc::new(gate);
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn is_network_reachable(&self) -> bool {
        self.reachability.is_reachable()
    }

    /// Send one request and return the request with its raw outcome.
    ///
    /// Transport failures are not errors here; they are recorded in
    /// `Exchange::result` and surface from `Exchange::into_value`.
    pub fn exchange<P>(
        &self,
        method: HttpMethod,
        url: &str,
        query: Option<&QueryParams>,
        payload: Option<&P>,
        headers: Option<&Headers>,
    ) -> Result<Exchange>
    where
        P: Serialize + ?Sized,
    {
        if !self.is_network_reachable() {
            tracing::warn!(%method, url, "network unreachable, request not sent");
            return Err(Error::Offline);
        }

        let mut call = Call::new();
        call.build(method, url, query)?;
        call.apply_headers(headers)?;
        call.apply_payload(payload)?;
        call.execute(&self.config)
    }

    /// Send one request and decode the response body.
    ///
    /// `Ok(None)` means a response arrived with an empty body.
    pub fn send<P>(
        &self,
        method: HttpMethod,
        url: &str,
        query: Option<&QueryParams>,
        payload: Option<&P>,
        headers: Option<&Headers>,
    ) -> Result<Option<Value>>
    where
        P: Serialize + ?Sized,
    {
        self.exchange(method, url, query, payload, headers)?.into_value()
    }

    pub fn get(&self, url: &str, query: Option<&QueryParams>, headers: Option<&Headers>) -> Result<Option<Value>> {
        self.send(HttpMethod::Get, url, query, NO_PAYLOAD, headers)
    }

    pub fn head(&self, url: &str, query: Option<&QueryParams>, headers: Option<&Headers>) -> Result<Option<Value>> {
        self.send(HttpMethod::Head, url, query, NO_PAYLOAD, headers)
    }

    pub fn post<P>(
        &self,
        url: &str,
        query: Option<&QueryParams>,
        payload: Option<&P>,
        headers: Option<&Headers>,
    ) -> Result<Option<Value>>
    where
        P: Serialize + ?Sized,
    {
        self.send(HttpMethod::Post, url, query, payload, headers)
    }

    pub fn put<P>(
        &self,
        url: &str,
        query: Option<&QueryParams>,
        payload: Option<&P>,
        headers: Option<&Headers>,
    ) -> Result<Option<Value>>
    where
        P: Serialize + ?Sized,
    {
        self.send(HttpMethod::Put, url, query, payload, headers)
    }

    pub fn patch<P>(
        &self,
        url: &str,
        query: Option<&QueryParams>,
        payload: Option<&P>,
        headers: Option<&Headers>,
    ) -> Result<Option<Value>>
    where
        P: Serialize + ?Sized,
    {
        self.send(HttpMethod::Patch, url, query, payload, headers)
    }

    pub fn delete<P>(
        &self,
        url: &str,
        query: Option<&QueryParams>,
        payload: Option<&P>,
        headers: Option<&Headers>,
    ) -> Result<Option<Value>>
    where
        P: Serialize + ?Sized,
    {
        self.send(HttpMethod::Delete, url, query, payload, headers)
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new(ClientConfig::default())
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serde_json::json;

    use super::*;

    fn online() -> Client {
        Client::default().with_reachability(|| true)
    }

    fn offline() -> Client {
        Client::default().with_reachability(|| false)
    }

    #[test]
    fn client_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Client>();
    }

    #[test]
    fn offline_fails_before_anything_else() {
        let err = offline().get("http://httpbin.org/get", None, None).unwrap_err();
        assert!(matches!(err, Error::Offline));

        // even a malformed url is reported as offline first
        let err = offline().get("bad url", None, None).unwrap_err();
        assert!(matches!(err, Error::Offline));
    }

    #[test]
    fn gate_decides_reachability() {
        assert!(online().is_network_reachable());
        assert!(!offline().is_network_reachable());
    }

    #[test]
    fn malformed_url_is_invalid_request() {
        let err = online().get("bad url", None, None).unwrap_err();
        assert!(matches!(err, Error::InvalidRequest(_)));

        let err = online().post("", None, Some(&json!({})), None).unwrap_err();
        assert!(matches!(err, Error::InvalidRequest(_)));
    }

    #[test]
    fn malformed_header_is_invalid_request() {
        let headers: Headers = HashMap::from([("bad header".to_string(), "x".to_string())]);
        let err = online().get("http://httpbin.org/get", None, Some(&headers)).unwrap_err();
        assert!(matches!(err, Error::InvalidRequest(_)));
    }

    #[test]
    fn unencodable_payload_is_serialization_error() {
        let payload: HashMap<(u8, u8), u8> = HashMap::from([((0, 1), 2)]);
        let err = online()
            .post("http://httpbin.org/post", None, Some(&payload), None)
            .unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
    }

    #[test]
    fn config_is_exposed() {
        let client = Client::new(ClientConfig::default().with_user_agent("ua"));
        assert_eq!(client.config().user_agent.as_deref(), Some("ua"));
        assert!(format!("{client:?}").contains("ua"));
    }
}
