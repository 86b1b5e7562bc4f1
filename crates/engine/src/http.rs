//! HTTP transport over `ureq` (blocking) and `reqwest` (async)
//!
//! Non-success statuses are returned as ordinary responses; classifying
//! them is left to the provider's `accept` step. Requests are never
//! retried.

use crate::config::HttpConfig;
use crate::transport::{AsyncTransport, Transport};
use async_trait::async_trait;
use patent_client_core::{Error, Request, Response, TransportError};
use std::time::Duration;

/// Transport performing real HTTP requests
#[derive(Clone)]
pub struct HttpTransport {
    agent: ureq::Agent,
    client: reqwest::Client,
    user_agent: String,
}

impl HttpTransport {
    /// Transport honoring the configured timeout and user agent
    ///
    /// # Errors
    ///
    /// [`Error::Config`] if the async client cannot be built.
    pub fn new(config: &HttpConfig) -> Result<Self, Error> {
        let timeout = Duration::from_millis(config.timeout_ms);
        let agent_config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build();
        let agent = ureq::Agent::new_with_config(agent_config);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {}", e)))?;
        Ok(HttpTransport {
            agent,
            client,
            user_agent: config.user_agent.clone(),
        })
    }
}

impl Transport for HttpTransport {
    fn get(&self, request: &Request) -> Result<Response, TransportError> {
        tracing::debug!(target: "patent_client::http", url = %request.url, "GET");
        let mut builder = self
            .agent
            .get(&request.url)
            .header("User-Agent", &self.user_agent);
        for (name, value) in &request.params {
            builder = builder.query(name, value);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        let mut response = builder.call().map_err(|e| match e {
            ureq::Error::Timeout(_) => TransportError::Timeout,
            other => TransportError::Network(other.to_string()),
        })?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response
            .body_mut()
            .read_to_vec()
            .map_err(|e| TransportError::Network(format!("failed to read response: {}", e)))?;
        tracing::debug!(target: "patent_client::http", status, bytes = body.len(), "response");
        Ok(Response {
            status,
            headers,
            body,
        })
    }
}

#[async_trait]
impl AsyncTransport for HttpTransport {
    async fn get(&self, request: &Request) -> Result<Response, TransportError> {
        tracing::debug!(target: "patent_client::http", url = %request.url, "GET (async)");
        let mut builder = self.client.get(&request.url).query(&request.params);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        let response = builder.send().await.map_err(classify)?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.bytes().await.map_err(classify)?.to_vec();
        tracing::debug!(target: "patent_client::http", status, bytes = body.len(), "response");
        Ok(Response {
            status,
            headers,
            body,
        })
    }
}

fn classify(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Network(e.to_string())
    }
}
