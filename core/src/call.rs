//! One call, assembled stage by stage.
//!
//! # Design
//! `Call` owns the request while it is being built. Each stage works on the
//! request produced by `build`; running a later stage first is an
//! `InvalidRequest` error rather than a silent no-op. `execute` consumes the
//! call, so a sent request can no longer be modified.

use serde::Serialize;

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::http::{Exchange, Headers, HttpMethod, HttpRequest, QueryParams};
use crate::{request, transport};

#[derive(Debug, Default)]
pub struct Call {
    request: Option<HttpRequest>,
}

impl Call {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the request descriptor, replacing any previous one. A failed
    /// build leaves the call with no request.
    pub fn build(&mut self, method: HttpMethod, url: &str, query: Option<&QueryParams>) -> Result<&HttpRequest> {
        self.request = None;
        let built = request::build_request(method, url, query)?;
        Ok(&*self.request.insert(built))
    }

    pub fn apply_headers(&mut self, headers: Option<&Headers>) -> Result<()> {
        request::apply_headers(self.request_mut()?, headers)
    }

    pub fn apply_payload<P>(&mut self, payload: Option<&P>) -> Result<()>
    where
        P: Serialize + ?Sized,
    {
        request::apply_payload(self.request_mut()?, payload)
    }

    /// The request built so far, if `build` has succeeded.
    pub fn request(&self) -> Option<&HttpRequest> {
        self.request.as_ref()
    }

    /// Send the request and block until the exchange completes.
    pub fn execute(self, config: &ClientConfig) -> Result<Exchange> {
        let request = self.request.ok_or_else(not_built)?;
        let result = transport::execute(&request, config);
        Ok(Exchange { request, result })
    }

    fn request_mut(&mut self) -> Result<&mut HttpRequest> {
        self.request.as_mut().ok_or_else(not_built)
    }
}

fn not_built() -> Error {
    Error::InvalidRequest("no request has been built".to_string())
}
