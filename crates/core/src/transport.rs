//! Transport boundary value types
//!
//! The engine never performs I/O itself. Providers describe a page fetch
//! as a [`Request`]; a transport executes it and hands back a
//! [`Response`]. Both are plain values so blocking and async transports
//! share them, and tests can script responses without a network.

use crate::error::TransportError;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// An HTTP GET described as data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Absolute URL without query string
    pub url: String,
    /// Query parameters in insertion order (unencoded)
    pub params: Vec<(String, String)>,
    /// Request headers in insertion order
    pub headers: Vec<(String, String)>,
}

impl Request {
    /// GET request for `url`
    pub fn get(url: impl Into<String>) -> Self {
        Request {
            url: url.into(),
            params: Vec::new(),
            headers: Vec::new(),
        }
    }

    /// Append a query parameter
    pub fn param(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.params.push((name.into(), value.to_string()));
        self
    }

    /// Append a header
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// First value of a query parameter
    pub fn param_value(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// First value of a header (case-insensitive name)
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A completed HTTP exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: Vec<(String, String)>,
    /// Raw body bytes
    pub body: Vec<u8>,
}

impl Response {
    /// Response with `status` and `body` and no headers
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Response {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    /// 200 response carrying `value` serialized as JSON
    pub fn json_body(value: &Value) -> Self {
        Response::new(200, value.to_string()).with_header("content-type", "application/json")
    }

    /// Append a header
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// First value of a header (case-insensitive name)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// True for 2xx statuses
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as UTF-8 text (lossy)
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Parse the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, TransportError> {
        serde_json::from_slice(&self.body).map_err(|e| TransportError::Malformed(e.to_string()))
    }

    /// Parse an XML body into its JSON rendering (see [`crate::xml`])
    pub fn xml_as_json(&self) -> Result<Value, TransportError> {
        crate::xml::to_json(&self.body)
    }

    /// Turn a non-2xx status into a classified [`TransportError`]
    pub fn error_for_status(self) -> Result<Self, TransportError> {
        if self.is_success() {
            return Ok(self);
        }
        let retry_after = self
            .header("retry-after")
            .and_then(|v| v.trim().parse::<u64>().ok());
        Err(TransportError::from_status(
            self.status,
            &self.text(),
            retry_after,
        ))
    }
}
