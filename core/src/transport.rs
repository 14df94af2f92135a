//! Blocking execution of one request over an async HTTP client.
//!
//! # Design
//! The request is sent by `reqwest` on a dedicated worker thread that owns a
//! single-threaded tokio runtime. The worker reports its outcome through a
//! one-slot channel and the calling thread blocks on that channel until the
//! exchange completes.
//!
//! The runtime lives on the worker rather than the caller, so the caller may
//! itself be inside a tokio runtime without panicking on a nested `block_on`
//! or starving the task that completes the request.
//!
//! A new `reqwest::Client` is built per call; nothing is pooled between
//! calls. Timeouts come from `ClientConfig` and are enforced by the client.

use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crate::config::ClientConfig;
use crate::http::{ExchangeResult, HttpRequest, ResponseHead};

/// Send `request` and block until the transport completes.
///
/// Never fails: transport errors are recorded in the returned
/// `ExchangeResult`. A worker that exits without reporting yields a result
/// with nothing recorded.
pub fn execute(request: &HttpRequest, config: &ClientConfig) -> ExchangeResult {
    let started = Instant::now();
    tracing::debug!(method = %request.method, url = %request.url, "dispatching request");

    let (tx, rx) = mpsc::sync_channel::<ExchangeResult>(1);
    let outgoing = request.clone();
    let config = config.clone();
    let worker = thread::Builder::new()
        .name("jab-transport".to_string())
        .spawn(move || {
            let result = run(outgoing, &config);
            let _ = tx.send(result);
        });

    let worker = match worker {
        Ok(handle) => handle,
        Err(e) => {
            tracing::warn!(error = %e, "could not spawn transport worker");
            return ExchangeResult::failed(Box::new(e));
        }
    };

    let result = rx.recv().unwrap_or_default();
    if worker.join().is_err() {
        tracing::warn!(url = %request.url, "transport worker panicked");
    }

    let elapsed_ms = whole_millis(started.elapsed());
    match (&result.error, result.status()) {
        (Some(err), _) => {
            tracing::warn!(method = %request.method, url = %request.url, elapsed_ms, error = %err, "request failed");
        }
        (None, Some(status)) => {
            tracing::debug!(method = %request.method, url = %request.url, status, elapsed_ms, "request completed");
        }
        (None, None) => {
            tracing::warn!(method = %request.method, url = %request.url, elapsed_ms, "request finished without a response");
        }
    }
    result
}

/// Milliseconds in `elapsed`, saturating at `u64::MAX`.
fn whole_millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

/// Worker body: drive the exchange to completion on a private runtime.
fn run(request: HttpRequest, config: &ClientConfig) -> ExchangeResult {
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => return ExchangeResult::failed(Box::new(e)),
    };
    runtime.block_on(dispatch(request, config))
}

async fn dispatch(request: HttpRequest, config: &ClientConfig) -> ExchangeResult {
    let client = match build_client(config) {
        Ok(client) => client,
        Err(e) => return ExchangeResult::failed(Box::new(e)),
    };

    let mut builder = client
        .request(request.method.into(), request.url)
        .headers(request.headers);
    if let Some(body) = request.body {
        builder = builder.body(body);
    }

    let response = match builder.send().await {
        Ok(response) => response,
        Err(e) => return ExchangeResult::failed(Box::new(e)),
    };
    let head = ResponseHead {
        status: response.status().as_u16(),
        headers: response.headers().clone(),
    };
    match response.bytes().await {
        Ok(body) => ExchangeResult::received(head, Some(body.to_vec())),
        Err(e) => ExchangeResult::failed(Box::new(e)),
    }
}

fn build_client(config: &ClientConfig) -> reqwest::Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder()
        .connect_timeout(config.connection_timeout)
        .timeout(config.completion_timeout);
    if let Some(user_agent) = &config.user_agent {
        builder = builder.user_agent(user_agent.as_str());
    }
    if !config.use_system_proxy {
        builder = builder.no_proxy();
    }
    builder.build()
}
