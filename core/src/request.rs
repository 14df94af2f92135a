//! Request construction: URL and query building, default headers, JSON body.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use serde::Serialize;
use url::Url;

use crate::error::{Error, Result};
use crate::http::{Headers, HttpMethod, HttpRequest, QueryParams};
use crate::shape;

const APPLICATION_JSON: &str = "application/json";

/// Parse `url` and append `query` to whatever query it already carries.
///
/// Existing pairs are kept as-is and new pairs are appended after them, so a
/// key may appear more than once. Pairs from `query` come out in the map's
/// iteration order.
pub fn build_request(method: HttpMethod, url: &str, query: Option<&QueryParams>) -> Result<HttpRequest> {
    let mut parsed =
        Url::parse(url).map_err(|e| Error::InvalidRequest(format!("invalid url {url:?}: {e}")))?;

    if let Some(params) = query.filter(|p| !p.is_empty()) {
        let mut pairs = parsed.query_pairs_mut();
        for (key, value) in params {
            pairs.append_pair(key, value);
        }
    }

    Ok(HttpRequest {
        method,
        url: parsed,
        headers: HeaderMap::new(),
        body: None,
    })
}

/// Set the JSON `Content-Type`/`Accept` defaults, then overlay `headers`.
///
/// Caller headers replace defaults of the same name regardless of case.
pub fn apply_headers(request: &mut HttpRequest, headers: Option<&Headers>) -> Result<()> {
    request
        .headers
        .insert(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));
    request
        .headers
        .insert(ACCEPT, HeaderValue::from_static(APPLICATION_JSON));

    for (name, value) in headers.into_iter().flatten() {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| Error::InvalidRequest(format!("invalid header name {name:?}: {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| Error::InvalidRequest(format!("invalid value for header {name}: {e}")))?;
        request.headers.insert(name, value);
    }
    Ok(())
}

/// Encode `payload` as the JSON request body. `None` leaves the body alone.
///
/// On failure the body is left unset.
pub fn apply_payload<P>(request: &mut HttpRequest, payload: Option<&P>) -> Result<()>
where
    P: Serialize + ?Sized,
{
    if let Some(payload) = payload {
        request.body = Some(encode_payload(payload)?);
    }
    Ok(())
}

/// Convert `payload` into a JSON document, then into bytes.
///
/// Non-finite floats and byte blobs are refused by the shape check, and maps
/// with non-string keys by the conversion to `serde_json::Value`, all before
/// any bytes are produced.
pub fn encode_payload<P>(payload: &P) -> Result<Vec<u8>>
where
    P: Serialize + ?Sized,
{
    shape::check(payload).map_err(Error::Serialization)?;
    let document = serde_json::to_value(payload).map_err(Error::Serialization)?;
    serde_json::to_vec(&document).map_err(Error::Serialization)
}
