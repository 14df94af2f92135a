//! Response parsing.

use serde_json::Value;

use crate::error::{Error, Result};
use crate::http::ExchangeResult;

/// Turn a recorded exchange into a JSON value.
///
/// Checked in order: a transport error wins, then a missing response, then an
/// empty body (`Ok(None)`, which is not JSON `null`), then the body is decoded.
/// Bare JSON scalars are accepted as documents. The status code is not
/// inspected.
pub fn parse(result: ExchangeResult) -> Result<Option<Value>> {
    if let Some(err) = result.error {
        return Err(Error::RequestFailed(err));
    }
    if result.response.is_none() {
        return Err(Error::NoResponse);
    }
    match result.body {
        Some(body) if !body.is_empty() => serde_json::from_slice(&body)
            .map(Some)
            .map_err(Error::Deserialization),
        _ => Ok(None),
    }
}
