use std::time::Duration;

use axum::{
    body::Bytes,
    extract::{Path, Query},
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::IntoResponse,
    routing::{any, delete, get, patch, post, put},
    Json, Router,
};
use serde_json::{json, map::Entry, Map, Value};
use tokio::net::TcpListener;

/// Body served by `/bytes`; not a JSON document.
pub const INVALID_JSON: [u8; 5] = [0, 1, 2, 3, 4];

pub fn app() -> Router {
    Router::new()
        .route("/get", get(echo))
        .route("/post", post(echo))
        .route("/put", put(echo))
        .route("/patch", patch(echo))
        .route("/delete", delete(echo))
        .route("/anything", any(echo))
        .route("/bytes", get(invalid_json))
        .route("/empty", get(|| async { StatusCode::OK }))
        .route("/fragment", get(|| async { Json(json!(42)) }))
        .route("/status/{code}", get(status))
        .route("/delay/{millis}", get(delay))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn echo(
    method: Method,
    uri: Uri,
    Query(args): Query<Vec<(String, String)>>,
    headers: HeaderMap,
    body: Bytes,
) -> Json<Value> {
    Json(echo_document(&method, &uri, args, &headers, &body))
}

async fn delay(
    Path(millis): Path<u64>,
    method: Method,
    uri: Uri,
    Query(args): Query<Vec<(String, String)>>,
    headers: HeaderMap,
    body: Bytes,
) -> Json<Value> {
    tokio::time::sleep(Duration::from_millis(millis)).await;
    Json(echo_document(&method, &uri, args, &headers, &body))
}

async fn invalid_json() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/octet-stream")],
        INVALID_JSON.to_vec(),
    )
}

async fn status(Path(code): Path<u16>) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_REQUEST)
}

/// Describe a request the way httpbin does.
///
/// `json` is the parsed body, or `null` when the body is empty or not JSON.
pub fn echo_document(
    method: &Method,
    uri: &Uri,
    args: Vec<(String, String)>,
    headers: &HeaderMap,
    body: &[u8],
) -> Value {
    let host = headers
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("localhost");
    json!({
        "method": method.as_str(),
        "url": format!("http://{host}{uri}"),
        "args": collect_args(args),
        "headers": collect_headers(headers),
        "json": serde_json::from_slice::<Value>(body).ok(),
        "data": String::from_utf8_lossy(body),
    })
}

/// Repeated keys collapse into an array of their values.
fn collect_args(args: Vec<(String, String)>) -> Map<String, Value> {
    let mut out = Map::new();
    for (key, value) in args {
        match out.entry(key) {
            Entry::Vacant(slot) => {
                slot.insert(Value::String(value));
            }
            Entry::Occupied(mut slot) => match slot.get_mut() {
                Value::Array(values) => values.push(Value::String(value)),
                existing => {
                    let first = existing.take();
                    *existing = Value::Array(vec![first, Value::String(value)]);
                }
            },
        }
    }
    out
}

fn collect_headers(headers: &HeaderMap) -> Map<String, Value> {
    let mut out = Map::new();
    for name in headers.keys() {
        let joined = headers
            .get_all(name)
            .iter()
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
            .collect::<Vec<_>>()
            .join(",");
        out.insert(title_case(name.as_str()), Value::String(joined));
    }
    out
}

/// `user-agent` -> `User-Agent`.
fn title_case(name: &str) -> String {
    name.split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn header_names_are_title_cased() {
        assert_eq!(title_case("user-agent"), "User-Agent");
        assert_eq!(title_case("custom"), "Custom");
        assert_eq!(title_case("x-request-id"), "X-Request-Id");
    }

    #[test]
    fn single_args_are_strings() {
        let args = collect_args(pairs(&[("q", "Jab"), ("n", "1")]));
        assert_eq!(args["q"], "Jab");
        assert_eq!(args["n"], "1");
    }

    #[test]
    fn repeated_args_become_arrays() {
        let args = collect_args(pairs(&[("a", "1"), ("b", "x"), ("a", "1"), ("a", "2")]));
        assert_eq!(args["a"], json!(["1", "1", "2"]));
        assert_eq!(args["b"], "x");
    }

    #[test]
    fn echo_document_parses_json_body() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, "example.org".parse().unwrap());
        let uri: Uri = "/post?q=1".parse().unwrap();
        let doc = echo_document(&Method::POST, &uri, pairs(&[("q", "1")]), &headers, br#"{"a":1}"#);

        assert_eq!(doc["method"], "POST");
        assert_eq!(doc["url"], "http://example.org/post?q=1");
        assert_eq!(doc["json"]["a"], 1);
        assert_eq!(doc["data"], r#"{"a":1}"#);
        assert_eq!(doc["headers"]["Host"], "example.org");
    }

    #[test]
    fn echo_document_without_json_body() {
        let uri: Uri = "/get".parse().unwrap();
        let doc = echo_document(&Method::GET, &uri, Vec::new(), &HeaderMap::new(), b"");
        assert_eq!(doc["json"], Value::Null);
        assert_eq!(doc["data"], "");
        assert_eq!(doc["url"], "http://localhost/get");
        assert!(doc["args"].as_object().unwrap().is_empty());
    }
}
