//! Transport traits and the session that carries them
//!
//! The engine consumes transports; it never constructs one. A blocking
//! [`Transport`] and a suspend-on-I/O [`AsyncTransport`] take the same
//! [`Request`] and produce the same [`Response`], so both execution forms
//! of a QuerySet share one fetch/cache algorithm and differ only in how the
//! response is awaited.

use async_trait::async_trait;
use patent_client_core::{Request, Response, TransportError};
use std::fmt;
use std::sync::Arc;

/// Blocking transport
pub trait Transport: Send + Sync {
    /// Perform the request, occupying the calling thread until it completes
    fn get(&self, request: &Request) -> Result<Response, TransportError>;
}

/// Suspend-on-I/O transport
///
/// Dropping the returned future cancels the request. The engine only
/// touches the Result Cache after the future completes, so a canceled
/// fetch leaves no trace.
#[async_trait]
pub trait AsyncTransport: Send + Sync {
    /// Perform the request, suspending the calling task while it is in flight
    async fn get(&self, request: &Request) -> Result<Response, TransportError>;
}

/// The pair of transports a Manager and its QuerySets fetch through
#[derive(Clone)]
pub struct Session {
    blocking: Arc<dyn Transport>,
    nonblocking: Arc<dyn AsyncTransport>,
}

impl Session {
    /// Session over one value serving both execution forms
    pub fn new<T>(transport: T) -> Self
    where
        T: Transport + AsyncTransport + 'static,
    {
        Self::shared(Arc::new(transport))
    }

    /// Session over a shared value serving both execution forms
    pub fn shared<T>(transport: Arc<T>) -> Self
    where
        T: Transport + AsyncTransport + 'static,
    {
        Session {
            blocking: transport.clone(),
            nonblocking: transport,
        }
    }

    /// Session over two independent transports
    pub fn from_parts(blocking: Arc<dyn Transport>, nonblocking: Arc<dyn AsyncTransport>) -> Self {
        Session {
            blocking,
            nonblocking,
        }
    }

    /// Transport used by blocking operations
    pub fn blocking(&self) -> &dyn Transport {
        self.blocking.as_ref()
    }

    /// Transport used by `_async` operations and streams
    pub fn nonblocking(&self) -> &dyn AsyncTransport {
        self.nonblocking.as_ref()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session").finish_non_exhaustive()
    }
}
