//! Provider adapters
//!
//! A [`Provider`] is the per-service half of a page fetch: it turns a
//! [`QuerySpec`] plus a [`PageToken`] into a [`Request`] and pulls the raw
//! items and result-set metadata back out of the [`Response`]. Everything
//! else (page alignment, caching, mapping, exhaustion) is shared engine
//! logic.

use patent_client_core::{PageBody, QuerySpec, Request, Response, Result, TransportError};

/// How a provider pages through its result set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pagination {
    /// Random access by `offset`/`limit`
    ///
    /// Pages are aligned to multiples of `page_size` so forward iteration
    /// requests strictly increasing, non-overlapping offsets.
    Offset {
        /// Items requested per page
        page_size: usize,
    },
    /// Forward-only continuation tokens
    ///
    /// Reaching an arbitrary position requires fetching every page before
    /// it. Those pages are kept in the Result Cache, so the sequential scan
    /// is paid once per QuerySet.
    Cursor {
        /// Items requested per page
        page_size: usize,
    },
    /// The whole result arrives in a single response
    Unpaged,
}

/// Which span of the provider's result set to request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageToken {
    /// Page at a provider offset
    Offset {
        /// Provider position of the first item
        offset: usize,
        /// Number of items requested
        limit: usize,
    },
    /// Page following a continuation token
    Cursor {
        /// Token returned with the previous page; `None` for the first page
        cursor: Option<String>,
        /// Provider position of the first item
        position: usize,
        /// Number of items requested
        limit: usize,
    },
    /// The complete, unpaged result
    Whole,
}

impl PageToken {
    /// Provider position of the first item this token asks for
    pub fn start(&self) -> usize {
        match self {
            PageToken::Offset { offset, .. } => *offset,
            PageToken::Cursor { position, .. } => *position,
            PageToken::Whole => 0,
        }
    }

    /// Requested page length, if bounded
    pub fn limit(&self) -> Option<usize> {
        match self {
            PageToken::Offset { limit, .. } | PageToken::Cursor { limit, .. } => Some(*limit),
            PageToken::Whole => None,
        }
    }
}

/// One remote data provider
///
/// Implementations are stateless translators; they never perform I/O.
pub trait Provider: Send + Sync + 'static {
    /// Short provider name used in faults and logs
    fn name(&self) -> &'static str;

    /// Paging idiom of this provider
    fn pagination(&self) -> Pagination;

    /// Build the native request for one page
    ///
    /// # Errors
    ///
    /// Returns [`patent_client_core::Error::InvalidQuery`] for a filter or
    /// sort the provider cannot express.
    fn request(&self, spec: &QuerySpec, token: &PageToken) -> Result<Request>;

    /// Screen the raw response before parsing
    ///
    /// `Ok(None)` means the provider answered "no results" in its own way
    /// (for example a 404 for an empty search) and is read as an empty,
    /// terminal page.
    fn accept(&self, response: Response) -> std::result::Result<Option<Response>, TransportError> {
        response.error_for_status().map(Some)
    }

    /// Extract raw items and result-set metadata
    fn parse(
        &self,
        spec: &QuerySpec,
        response: &Response,
    ) -> std::result::Result<PageBody, TransportError>;
}
