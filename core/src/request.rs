//! Request construction: turns a `RequestSpec` into an `HttpRequest`.
//!
//! # Design
//! `build` is a pure function of its inputs. It attaches credentials to
//! every request exactly once:
//!
//! - GET and DELETE put `key`, `token` and then the params in the query.
//! - POST puts the params and then `key`, `token` in a JSON body.
//! - PUT behaves like POST, except that a PUT with no params sends no body
//!   and carries the credentials in the query instead.
//!
//! Webhook management is addressed through `Route::TokenWebhooks`, which
//! embeds the token in the path (`/1/tokens/{token}/webhooks`). On that
//! route only `key` goes into the query or body.

use std::fmt;

use serde_json::{Map, Value};
use tracing::warn;
use url::form_urlencoded::byte_serialize;

use crate::http::{HttpMethod, HttpRequest};
use crate::params::{ParamValue, Params, Payload, Scalar};

const KEY: &str = "key";
const TOKEN: &str = "token";

/// API key and token, attached to every request.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    key: String,
    token: String,
}

impl Credentials {
    pub fn new(key: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            token: token.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("key", &self.key)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Where a request is addressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// A regular API path such as `/1/cards/{id}`.
    Api(String),
    /// `/1/tokens/{token}/webhooks` followed by `suffix` (empty or `/{id}`).
    TokenWebhooks(String),
}

/// One logical API call before serialization.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSpec {
    pub route: Route,
    pub method: HttpMethod,
    pub payload: Payload,
}

impl RequestSpec {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            route: Route::Api(path.into()),
            method,
            payload: Payload::None,
        }
    }

    pub fn webhooks(method: HttpMethod, suffix: impl Into<String>) -> Self {
        Self {
            route: Route::TokenWebhooks(suffix.into()),
            method,
            payload: Payload::None,
        }
    }

    pub fn with_params(mut self, params: Params) -> Self {
        self.payload = Payload::Params(params);
        self
    }

    /// Send `values` as a single `key=a,b,c` entry.
    pub fn with_list(mut self, key: impl Into<String>, values: Vec<Scalar>) -> Self {
        self.payload = Payload::List {
            key: key.into(),
            values,
        };
        self
    }
}

/// Serialize `spec` against `base_url` (no trailing slash).
pub fn build(base_url: &str, credentials: &Credentials, spec: &RequestSpec) -> HttpRequest {
    let (path, mut auth) = match &spec.route {
        Route::Api(path) => (
            format!("{base_url}{path}"),
            vec![(KEY, credentials.key()), (TOKEN, credentials.token())],
        ),
        Route::TokenWebhooks(suffix) => (
            format!(
                "{base_url}/1/tokens/{}/webhooks{suffix}",
                encode_segment(credentials.token())
            ),
            vec![(KEY, credentials.key())],
        ),
    };

    let in_body = spec.method.carries_body() && !(spec.method == HttpMethod::Put && spec.payload.is_empty());

    if !in_body {
        let mut query: Vec<(String, String)> = auth
            .drain(..)
            .map(|(k, v)| (k.to_string(), encode(v)))
            .collect();
        query.extend(query_pairs(&spec.payload));
        let query = query
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");
        return HttpRequest {
            method: spec.method,
            url: format!("{path}?{query}"),
            headers: Vec::new(),
            body: None,
        };
    }

    let mut body = body_object(&spec.payload);
    for (k, v) in auth {
        body.insert(k.to_string(), Value::String(v.to_string()));
    }
    HttpRequest {
        method: spec.method,
        url: path,
        headers: vec![("content-type".to_string(), "application/json".to_string())],
        body: Some(Value::Object(body).to_string()),
    }
}

fn encode(s: &str) -> String {
    byte_serialize(s.as_bytes()).collect()
}

/// Percent-encode one path segment. Form encoding turns spaces into `+` and
/// a literal `+` into `%2B`, so every `+` left is a space.
fn encode_segment(s: &str) -> String {
    encode(s).replace('+', "%20")
}

fn join(values: &[Scalar]) -> String {
    values
        .iter()
        .map(|v| encode(&v.to_string()))
        .collect::<Vec<_>>()
        .join(",")
}

fn is_reserved(key: &str) -> bool {
    if key == KEY || key == TOKEN {
        warn!(param = key, "dropping param that collides with a credential");
        return true;
    }
    false
}

fn query_pairs(payload: &Payload) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    match payload {
        Payload::None => {}
        Payload::List { key, values } => {
            if !is_reserved(key) {
                pairs.push((encode(key), join(values)));
            }
        }
        Payload::Params(params) => {
            for (key, value) in params.iter() {
                match value {
                    ParamValue::Scalar(s) => {
                        if !is_reserved(key) {
                            pairs.push((encode(key), encode(&s.to_string())));
                        }
                    }
                    ParamValue::List(items) => {
                        if !is_reserved(key) {
                            pairs.push((encode(key), join(items)));
                        }
                    }
                    ParamValue::Nested(inner) => {
                        for (k, s) in inner {
                            if !is_reserved(k) {
                                pairs.push((encode(k), encode(&s.to_string())));
                            }
                        }
                    }
                }
            }
        }
    }
    pairs
}

fn body_object(payload: &Payload) -> Map<String, Value> {
    let mut body = Map::new();
    match payload {
        Payload::None => {}
        Payload::List { key, values } => {
            if !is_reserved(key) {
                body.insert(
                    key.clone(),
                    Value::Array(values.iter().map(Scalar::to_json).collect()),
                );
            }
        }
        Payload::Params(params) => {
            for (key, value) in params.iter() {
                if !is_reserved(key) {
                    body.insert(key.to_string(), value.to_json());
                }
            }
        }
    }
    body
}
