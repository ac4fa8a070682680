//! Request dispatch: admission, 429 backoff, outcome classification.
//!
//! # Design
//! `Dispatcher::send` is the single async core. Every network attempt first
//! passes the shared `RateLimiter`. A 429 response is not an outcome: the
//! same request is sent again after a delay drawn from `BackoffConfig`, with
//! no ceiling on the number of attempts. Transport failures end the request
//! immediately. Any other response is classified by `classify`.
//!
//! `send_with_callback` spawns `send` and hands the outcome to the callback,
//! so both calling styles share one retry path.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::config::BackoffConfig;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::limiter::RateLimiter;
use crate::transport::Transport;

/// The result of one dispatched request.
pub type Outcome = Result<Value, ApiError>;

const TOO_MANY_REQUESTS: u16 = 429;

/// Sends built requests through a transport under a shared rate limit.
pub struct Dispatcher<T> {
    transport: Arc<T>,
    limiter: Arc<RateLimiter>,
    backoff: BackoffConfig,
}

impl<T> Clone for Dispatcher<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            limiter: Arc::clone(&self.limiter),
            backoff: self.backoff.clone(),
        }
    }
}

impl<T: Transport> Dispatcher<T> {
    pub fn new(transport: T, limiter: Arc<RateLimiter>, backoff: BackoffConfig) -> Self {
        Self {
            transport: Arc::new(transport),
            limiter,
            backoff,
        }
    }

    pub fn limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send `request` until the server answers with something other than 429.
    pub async fn send(&self, request: HttpRequest) -> Outcome {
        let mut attempt: u32 = 0;
        loop {
            self.limiter.acquire().await;
            attempt += 1;
            debug!(
                method = %request.method,
                url = request.redacted_url(),
                attempt,
                "Dispatching request"
            );

            let response = self.transport.execute(request.clone()).await?;
            if response.status != TOO_MANY_REQUESTS {
                return classify(response);
            }

            let delay = self.backoff.sample_delay();
            warn!(
                url = request.redacted_url(),
                attempt,
                delay_ms = delay.as_millis() as u64,
                "Throttled by server, retrying"
            );
            tokio::time::sleep(delay).await;
        }
    }

    /// Run `send` in the background and pass its outcome to `callback`.
    ///
    /// Fails with `RuntimeUnavailable` outside of a tokio runtime; in that
    /// case the callback is never called.
    pub fn send_with_callback<F>(&self, request: HttpRequest, callback: F) -> Result<(), ApiError>
    where
        F: FnOnce(Outcome) + Send + 'static,
    {
        let handle =
            tokio::runtime::Handle::try_current().map_err(|_| ApiError::RuntimeUnavailable)?;
        let dispatcher = self.clone();
        handle.spawn(async move {
            let outcome = dispatcher.send(request).await;
            callback(outcome);
        });
        Ok(())
    }
}

/// Map a final (non-429) response to an outcome.
///
/// Statuses >= 400 are errors. Anything else must carry a JSON body; an
/// empty body is `Value::Null`.
pub fn classify(response: HttpResponse) -> Outcome {
    match response.status {
        404 => Err(ApiError::NotFound {
            body: response.body,
        }),
        status if status >= 400 => Err(ApiError::HttpError {
            status,
            body: response.body,
        }),
        _ if response.body.trim().is_empty() => Ok(Value::Null),
        _ => serde_json::from_str(&response.body)
            .map_err(|e| ApiError::DeserializationError(e.to_string())),
    }
}
