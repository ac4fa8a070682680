//! Client facade: credentials, request building and dispatch in one value.
//!
//! # Design
//! `TrelloClient` owns the credentials, the base URL and a `Dispatcher`.
//! Building is synchronous and happens in the caller's stack frame, so a bad
//! verb or a malformed params bag is returned before anything is sent. What
//! happens after that (transport, HTTP and parse errors) is only ever
//! reported through the request's outcome, either as the resolved value of
//! the returned future or as the argument of a callback.

use std::future::Future;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::{BackoffConfig, DispatchConfig};
use crate::dispatch::{Dispatcher, Outcome};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest};
use crate::limiter::RateLimiter;
use crate::params::Params;
use crate::request::{build, Credentials, RequestSpec};
use crate::transport::{Transport, UreqTransport};

pub const DEFAULT_BASE_URL: &str = "https://api.trello.com";

/// Authenticated client for the Trello REST API.
pub struct TrelloClient<T = UreqTransport> {
    base_url: String,
    credentials: Credentials,
    dispatcher: Dispatcher<T>,
}

impl<T> Clone for TrelloClient<T> {
    fn clone(&self) -> Self {
        Self {
            base_url: self.base_url.clone(),
            credentials: self.credentials.clone(),
            dispatcher: self.dispatcher.clone(),
        }
    }
}

impl TrelloClient<UreqTransport> {
    /// Client against the public API with default settings (no rate limit).
    pub fn new(key: &str, token: &str) -> Self {
        let config = DispatchConfig::default();
        let limiter = Arc::new(RateLimiter::new(config.rate_limit));
        Self::with_limiter(
            DEFAULT_BASE_URL,
            Credentials::new(key, token),
            UreqTransport::default(),
            limiter,
            config.backoff,
        )
    }

    /// Client against the public API with explicit settings.
    pub fn with_config(key: &str, token: &str, config: DispatchConfig) -> Result<Self, ApiError> {
        let transport = UreqTransport::new(config.timeout());
        Self::with_transport(DEFAULT_BASE_URL, Credentials::new(key, token), transport, config)
    }
}

impl<T: Transport> TrelloClient<T> {
    /// Client with its own rate limiter built from `config`.
    pub fn with_transport(
        base_url: &str,
        credentials: Credentials,
        transport: T,
        config: DispatchConfig,
    ) -> Result<Self, ApiError> {
        config.validate()?;
        let limiter = Arc::new(RateLimiter::new(config.rate_limit));
        Ok(Self::with_limiter(
            base_url,
            credentials,
            transport,
            limiter,
            config.backoff,
        ))
    }

    /// Client drawing from an existing limiter, shared with other clients.
    pub fn with_limiter(
        base_url: &str,
        credentials: Credentials,
        transport: T,
        limiter: Arc<RateLimiter>,
        backoff: BackoffConfig,
    ) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
            dispatcher: Dispatcher::new(transport, limiter, backoff),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn rate_limiter(&self) -> &Arc<RateLimiter> {
        self.dispatcher.limiter()
    }

    pub fn dispatcher(&self) -> &Dispatcher<T> {
        &self.dispatcher
    }

    /// Serialize a spec with this client's base URL and credentials.
    pub fn build(&self, spec: &RequestSpec) -> HttpRequest {
        build(&self.base_url, &self.credentials, spec)
    }

    /// Validate and build a request from loosely typed arguments.
    ///
    /// `method` must be GET, POST, PUT or DELETE (any case). `params`, when
    /// given, must be a JSON object; `null` counts as absent.
    pub fn build_request(
        &self,
        method: &str,
        path: &str,
        params: Option<&Value>,
    ) -> Result<HttpRequest, ApiError> {
        let method: HttpMethod = method.parse()?;
        let mut spec = RequestSpec::new(method, path);
        if let Some(params) = params.filter(|p| !p.is_null()) {
            spec = spec.with_params(Params::from_json(params)?);
        }
        Ok(self.build(&spec))
    }

    /// The generic call surface.
    ///
    /// Validation errors are returned right away; the returned future yields
    /// the outcome of the request.
    ///
    /// ```no_run
    /// # async fn run() -> Result<(), trello_core::ApiError> {
    /// let client = trello_core::TrelloClient::new("key", "token");
    /// let me = client.request("GET", "/1/members/me", None)?.await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn request(
        &self,
        method: &str,
        path: &str,
        params: Option<&Value>,
    ) -> Result<impl Future<Output = Outcome> + Send + '_, ApiError> {
        let request = self.build_request(method, path, params)?;
        Ok(self.dispatcher.send(request))
    }

    /// Callback form of [`TrelloClient::request`].
    ///
    /// Returns `Err` only for validation failures (and a missing runtime);
    /// every other result goes to `callback`, exactly once.
    pub fn request_with_callback<F>(
        &self,
        method: &str,
        path: &str,
        params: Option<&Value>,
        callback: F,
    ) -> Result<(), ApiError>
    where
        F: FnOnce(Outcome) + Send + 'static,
    {
        let request = self.build_request(method, path, params)?;
        self.dispatcher.send_with_callback(request, callback)
    }

    /// Build and send a typed spec.
    pub async fn execute(&self, spec: RequestSpec) -> Outcome {
        let request = self.build(&spec);
        self.dispatcher.send(request).await
    }

    /// Build and send a typed spec, decoding the body into `D`.
    pub async fn execute_as<D: DeserializeOwned>(&self, spec: RequestSpec) -> Result<D, ApiError> {
        let value = self.execute(spec).await?;
        serde_json::from_value(value).map_err(|e| ApiError::DeserializationError(e.to_string()))
    }

    /// Callback form of [`TrelloClient::execute`].
    pub fn execute_with_callback<F>(&self, spec: RequestSpec, callback: F) -> Result<(), ApiError>
    where
        F: FnOnce(Outcome) + Send + 'static,
    {
        let request = self.build(&spec);
        self.dispatcher.send_with_callback(request, callback)
    }
}
