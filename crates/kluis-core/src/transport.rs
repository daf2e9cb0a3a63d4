//! The transport contract consumed by the client.
//!
//! A transport is a single capability: send one request, get back status,
//! headers, and body bytes. Non-2xx statuses are data, not errors -
//! [`TransportError`](crate::TransportError) is reserved for connection,
//! TLS, and timeout failures. Retries, pooling, and backoff belong to the
//! transport implementation, never to the client core.

use async_trait::async_trait;
use std::fmt;

use crate::error::TransportError;

/// HTTP method for a transport request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    /// Returns the method name, e.g. `GET`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request handed to the transport.
#[derive(Clone)]
pub struct TransportRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl TransportRequest {
    /// Start a GET request for the given URL.
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Start a POST request for the given URL.
    pub fn post(url: impl Into<String>) -> Self {
        Self {
            method: Method::Post,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Append a header, returning the request for chaining.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Set the request body, returning the request for chaining.
    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    /// Look up a header value by case-insensitive name.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

// Header values may carry session ids; Debug shows names and body length only.
impl fmt::Debug for TransportRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header_names: Vec<&str> = self.headers.iter().map(|(n, _)| n.as_str()).collect();
        f.debug_struct("TransportRequest")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("headers", &header_names)
            .field("body_len", &self.body.as_ref().map_or(0, Vec::len))
            .finish()
    }
}

/// A raw response returned by the transport.
#[derive(Clone, Debug)]
pub struct TransportResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl TransportResponse {
    /// A bare response with the given status and no headers or body.
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// True for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Look up a header value by case-insensitive name.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// The transport collaborator: sends one request, returns the raw response.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send the request and return the response, however the server judged it.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] only for connection-level failures;
    /// an HTTP error status is an ordinary response.
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_debug_redacts_header_values() {
        let request = TransportRequest::get("https://t.example.com/api")
            .header("Authorization", "secret-session-id");
        let debug = format!("{:?}", request);
        assert!(debug.contains("Authorization"));
        assert!(!debug.contains("secret-session-id"));
    }

    #[test]
    fn header_lookup_is_case_insensitive() {
        let request = TransportRequest::post("https://t.example.com/api")
            .header("Content-Type", "application/json");
        assert_eq!(
            request.header_value("content-type"),
            Some("application/json")
        );

        let response = TransportResponse {
            status: 200,
            headers: vec![("X-VaultAPI-Burst".to_string(), "1999".to_string())],
            body: Vec::new(),
        };
        assert_eq!(response.header_value("x-vaultapi-burst"), Some("1999"));
    }

    #[test]
    fn success_statuses() {
        assert!(TransportResponse::new(200).is_success());
        assert!(TransportResponse::new(204).is_success());
        assert!(!TransportResponse::new(301).is_success());
        assert!(!TransportResponse::new(401).is_success());
    }
}
