//! The boundary between built requests and the network.
//!
//! # Design
//! The dispatcher only needs "send this `HttpRequest`, give me an
//! `HttpResponse`". `Transport` is that seam. Status codes are always
//! returned as data; a transport only fails when no response arrived at all.
//! `UreqTransport` runs ureq's blocking agent on tokio's blocking pool and
//! reads bodies up to `MAX_BODY_BYTES`.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Executes one HTTP round-trip.
pub trait Transport: Send + Sync + 'static {
    fn execute(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, ApiError>> + Send;
}

/// ureq-backed transport.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    /// `timeout` bounds a whole attempt, from connect to the end of the body.
    pub fn new(timeout: Option<Duration>) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Transport for UreqTransport {
    fn execute(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, ApiError>> + Send {
        let agent = self.agent.clone();
        async move {
            tokio::task::spawn_blocking(move || call(&agent, request))
                .await
                .map_err(|e| ApiError::Transport(e.to_string()))?
        }
    }
}

/// Largest response body read into memory (64 MiB).
pub const MAX_BODY_BYTES: u64 = 64 * 1024 * 1024;

/// One round-trip. Only a failure to obtain the status line is a transport
/// error; once a status has arrived the response always reaches `classify`.
fn call(agent: &ureq::Agent, req: HttpRequest) -> Result<HttpResponse, ApiError> {
    let sent = match (req.method, req.body) {
        (HttpMethod::Get, _) => agent.get(&req.url).call(),
        (HttpMethod::Delete, _) => agent.delete(&req.url).call(),
        (HttpMethod::Post, Some(body)) => agent
            .post(&req.url)
            .content_type("application/json")
            .send(body.as_bytes()),
        (HttpMethod::Post, None) => agent.post(&req.url).send_empty(),
        (HttpMethod::Put, Some(body)) => agent
            .put(&req.url)
            .content_type("application/json")
            .send(body.as_bytes()),
        (HttpMethod::Put, None) => agent.put(&req.url).send_empty(),
    };
    let mut response = sent.map_err(|e| ApiError::Transport(e.to_string()))?;

    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .map(|(k, v)| (k.as_str().to_string(), v.to_str().unwrap_or_default().to_string()))
        .collect();

    let body = match response
        .body_mut()
        .with_config()
        .limit(MAX_BODY_BYTES)
        .read_to_vec()
    {
        // Invalid UTF-8 turns into replacement characters, which then fail
        // JSON parsing in `classify`.
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        // An error status is reported as such even if its body is unreadable.
        Err(e) if status >= 400 => {
            warn!(status, error = %e, "Discarding unreadable error body");
            String::new()
        }
        Err(e @ (ureq::Error::Timeout(_) | ureq::Error::Io(_))) => {
            return Err(ApiError::Transport(e.to_string()))
        }
        // Oversized or undecodable bodies.
        Err(e) => {
            return Err(ApiError::DeserializationError(format!(
                "failed to read response body: {e}"
            )))
        }
    };

    Ok(HttpResponse {
        status,
        headers,
        body,
    })
}
