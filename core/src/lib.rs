//! Async client core for the Trello REST API.
//!
//! # Overview
//! Two layers do the work. `request::build` turns a `RequestSpec` (route,
//! verb, typed params) into an `HttpRequest` with the credentials attached.
//! `Dispatcher` sends it through a `Transport` under a shared rate limiter,
//! retries 429 responses after a random delay, and classifies the final
//! response into an `Outcome`.
//!
//! # Design
//! - Building is pure and synchronous; validation errors never cross an
//!   await point.
//! - The network sits behind the `Transport` trait, so tests script
//!   responses in-process. `UreqTransport` is the production transport.
//! - Rate-limit state is an explicit `RateLimiter` value shared through
//!   `Arc`, not a global.
//! - Every call can be awaited or given a callback; both go through the
//!   same `Dispatcher::send`.
//! - `resources` holds the per-endpoint calls as thin wrappers.

pub mod client;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod http;
pub mod limiter;
pub mod params;
pub mod request;
pub mod resources;
pub mod transport;

pub use client::{TrelloClient, DEFAULT_BASE_URL};
pub use config::{BackoffConfig, DispatchConfig};
pub use dispatch::{classify, Dispatcher, Outcome};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use limiter::{RateLimitConfig, RateLimitSnapshot, RateLimiter};
pub use params::{ParamValue, Params, Payload, Scalar};
pub use request::{build, Credentials, RequestSpec, Route};
pub use transport::{Transport, UreqTransport};
