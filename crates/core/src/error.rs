//! Error types for patent-client
//!
//! Every fault surfaces to the immediate caller of the operation that
//! triggered it. Nothing here is ever converted into an empty result: an
//! empty result set and a failed fetch must stay distinguishable.
//! We use `thiserror` for `Display` and `Error` implementations.

use thiserror::Error;

/// Result type alias for query operations
pub type Result<T> = std::result::Result<T, Error>;

/// Faults surfaced by managers and query sets
#[derive(Debug, Error)]
pub enum Error {
    /// A raw value did not match its declared coercion domain
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// `get`/`only` resolved to zero records
    #[error("{model} not found: {spec}")]
    NotFound {
        /// Record type name
        model: &'static str,
        /// Rendered query specification
        spec: String,
    },

    /// `get`/`only` resolved to more than one record
    #[error("multiple {model} records found: {spec}")]
    MultipleFound {
        /// Record type name
        model: &'static str,
        /// Rendered query specification
        spec: String,
    },

    /// Positional access beyond a known total
    #[error("position {position} out of range (total {total})")]
    OutOfRange {
        /// Requested view position
        position: usize,
        /// Known number of records in the view
        total: usize,
    },

    /// Failure reported by the transport, with enough context to diagnose
    #[error("transport error from {provider} at position {position} for {spec}: {source}")]
    Transport {
        /// Provider name
        provider: &'static str,
        /// Rendered query specification
        spec: String,
        /// Provider position the page fetch was covering
        position: usize,
        /// Underlying transport failure
        #[source]
        source: TransportError,
    },

    /// The provider cannot express the requested filter or sort
    #[error("invalid query: {reason}")]
    InvalidQuery {
        /// Why the query was rejected
        reason: String,
    },

    /// Configuration could not be loaded or is inconsistent
    #[error("configuration error: {reason}")]
    Config {
        /// What was wrong
        reason: String,
    },
}

impl Error {
    /// Shorthand for [`Error::InvalidQuery`]
    pub fn invalid_query(reason: impl Into<String>) -> Self {
        Error::InvalidQuery {
            reason: reason.into(),
        }
    }

    /// Shorthand for [`Error::Config`]
    pub fn config(reason: impl Into<String>) -> Self {
        Error::Config {
            reason: reason.into(),
        }
    }

    /// True for [`Error::NotFound`]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    /// True for [`Error::OutOfRange`]
    pub fn is_out_of_range(&self) -> bool {
        matches!(self, Error::OutOfRange { .. })
    }
}

/// A raw value outside the domain of its declared coercion
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("field `{field}` at `{path}`: expected {expected}, found {found}")]
pub struct DecodeError {
    /// Normalized field name (dotted for nested records)
    pub field: String,
    /// Source path that was read
    pub path: String,
    /// Description of the accepted domain
    pub expected: &'static str,
    /// Short rendering of the offending value
    pub found: String,
}

impl DecodeError {
    /// Prefix the field name with the name of an enclosing field
    pub fn within(mut self, parent: &str) -> Self {
        self.field = format!("{}.{}", parent, self.field);
        self
    }
}

/// Failures raised at the transport boundary
///
/// These are never retried by the engine; retry policy belongs to the
/// transport implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Credentials rejected (401/403)
    #[error("authentication rejected (status {status})")]
    Authentication {
        /// HTTP status
        status: u16,
    },

    /// Provider throttled the request (429)
    #[error("rate limited (status {status})")]
    RateLimited {
        /// HTTP status
        status: u16,
        /// Seconds from a `Retry-After` header, when present
        retry_after: Option<u64>,
    },

    /// Any other non-success status
    #[error("HTTP status {status}: {message}")]
    Status {
        /// HTTP status
        status: u16,
        /// Leading part of the response body
        message: String,
    },

    /// Connection-level failure
    #[error("network error: {0}")]
    Network(String),

    /// Request exceeded the configured timeout
    #[error("request timed out")]
    Timeout,

    /// Response body could not be interpreted
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl TransportError {
    /// Classify a non-success status code
    pub fn from_status(status: u16, body: &str, retry_after: Option<u64>) -> Self {
        match status {
            401 | 403 => TransportError::Authentication { status },
            429 => TransportError::RateLimited {
                status,
                retry_after,
            },
            _ => TransportError::Status {
                status,
                message: body.chars().take(200).collect(),
            },
        }
    }
}
