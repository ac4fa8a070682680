//! Error types for the Trello API client.
//!
//! # Design
//! Errors fall into two groups. Validation errors (`UnsupportedMethod`,
//! `InvalidParams`, `MissingParameter`, `InvalidConfig`) are returned from
//! the calling stack frame before any request is sent. Everything else is
//! produced by the dispatcher and only ever reaches the caller through the
//! outcome of a request. A 429 response is never an error value: the
//! dispatcher retries it internally.
//!
//! `NotFound` gets a dedicated variant because callers frequently
//! distinguish "the resource does not exist" from other failing statuses.

use thiserror::Error;

/// Errors returned by request building and dispatch.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The verb is not one of GET, POST, PUT, DELETE.
    #[error("unsupported request method `{0}`; pass one of POST, GET, PUT, DELETE")]
    UnsupportedMethod(String),

    /// The parameter bag is not a mapping, or nests deeper than one level.
    #[error("invalid params: {0}")]
    InvalidParams(String),

    /// A required argument of a resource method was empty.
    #[error("missing required parameter `{0}`")]
    MissingParameter(&'static str),

    /// A configuration value could not be used.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The request never produced an HTTP response (DNS, connect, timeout).
    #[error("transport error: {0}")]
    Transport(String),

    /// The server returned 404.
    #[error("resource not found: {body}")]
    NotFound { body: String },

    /// The server returned a status >= 400 other than 404 and 429.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body was not valid JSON.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// A callback-style call was made outside of a tokio runtime.
    #[error("no async runtime available to drive the request")]
    RuntimeUnavailable,
}

impl ApiError {
    /// True for errors raised before any I/O was attempted.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ApiError::UnsupportedMethod(_)
                | ApiError::InvalidParams(_)
                | ApiError::MissingParameter(_)
                | ApiError::InvalidConfig(_)
        )
    }
}
