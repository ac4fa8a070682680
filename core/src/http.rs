//! HTTP request and response values.
//!
//! # Design
//! Requests and responses are plain data. The request builder produces an
//! `HttpRequest` without touching the network, and whatever `Transport` the
//! dispatcher is given turns it into an `HttpResponse`. Keeping the two ends
//! as owned values lets tests script responses without a socket.

use std::fmt;
use std::str::FromStr;

use crate::error::ApiError;

/// HTTP method for a request. Only the four verbs the API accepts exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Whether credentials and params travel in a JSON body.
    pub fn carries_body(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "DELETE" => Ok(HttpMethod::Delete),
            _ => Err(ApiError::UnsupportedMethod(s.to_string())),
        }
    }
}

/// A fully serialized request, ready for a transport.
///
/// `url` already contains the query string. `body` is JSON and is only set
/// for POST and PUT.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// The URL without its query string. Used for logging so credentials
    /// never reach the log output.
    pub fn redacted_url(&self) -> &str {
        self.url.split('?').next().unwrap_or(&self.url)
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_supported_verbs_case_insensitively() {
        assert_eq!("GET".parse::<HttpMethod>().unwrap(), HttpMethod::Get);
        assert_eq!("post".parse::<HttpMethod>().unwrap(), HttpMethod::Post);
        assert_eq!("Put".parse::<HttpMethod>().unwrap(), HttpMethod::Put);
        assert_eq!("DELETE".parse::<HttpMethod>().unwrap(), HttpMethod::Delete);
    }

    #[test]
    fn rejects_patch() {
        let err = "PATCH".parse::<HttpMethod>().unwrap_err();
        assert!(matches!(err, ApiError::UnsupportedMethod(ref v) if v == "PATCH"));
    }

    #[test]
    fn redacted_url_drops_query() {
        let req = HttpRequest {
            method: HttpMethod::Get,
            url: "https://api.trello.com/1/cards/abc?key=k&token=t".to_string(),
            headers: Vec::new(),
            body: None,
        };
        assert_eq!(req.redacted_url(), "https://api.trello.com/1/cards/abc");
    }
}
