//! Shared helpers for the providers suite

#![allow(dead_code)]

pub use patent_client::engine::testing::RecordingTransport;
use patent_client::core::{Request, Response};
use patent_client::{Client, ClientConfig, Session, TransportError};

/// Client answering every request with `handler`
pub fn client_with<F>(config: ClientConfig, handler: F) -> (Client, RecordingTransport)
where
    F: Fn(&Request) -> Result<Response, TransportError> + Send + Sync + 'static,
{
    let transport = RecordingTransport::new(handler);
    let client = Client::new(config, Session::new(transport.clone())).unwrap();
    (client, transport)
}

/// Client answering every request with `response`
pub fn client_fixed(response: Response) -> (Client, RecordingTransport) {
    let transport = RecordingTransport::fixed(response);
    let client = Client::new(ClientConfig::default(), Session::new(transport.clone())).unwrap();
    (client, transport)
}

/// Path of a URL after its scheme and host
pub fn url_path(request: &Request) -> &str {
    let rest = request.url.split_once("://").map_or(request.url.as_str(), |(_, r)| r);
    rest.find('/').map_or("/", |i| &rest[i..])
}
