//! Page Fetcher
//!
//! The fetch/cache/materialize algorithm is written once, without I/O:
//!
//! 1. [`PageFetcher::resolve`] looks a view position up in the
//!    [`ResultCache`] and either answers it or returns the [`FetchPlan`]
//!    for the one page that must be fetched next.
//! 2. The caller performs the plan's request on whichever transport its
//!    execution form uses.
//! 3. [`PageFetcher::complete`] screens, parses and maps the response into
//!    a page, and [`PageFetcher::absorb`] stores it.
//!
//! Blocking and async callers drive the same steps, so for the same call
//! sequence they issue the same requests in the same order. The cache is
//! only locked inside steps 1 and 3, never across the request itself.

use crate::cache::{Mapped, ResultCache};
use crate::provider::{PageToken, Pagination, Provider};
use crate::transport::{AsyncTransport, Transport};
use patent_client_core::{
    map, Error, Model, Page, PageBody, QuerySpec, Request, Response, Result, TransportError,
};
use std::sync::Arc;

/// A page request ready to be sent
#[derive(Debug, Clone, PartialEq)]
pub struct FetchPlan {
    /// Span of the provider result set requested
    pub token: PageToken,
    /// Native request built by the provider
    pub request: Request,
    /// Provider position the caller is waiting for
    pub target: usize,
}

/// Outcome of looking a position up in the cache
#[derive(Debug)]
pub enum Step<T> {
    /// The position is cached
    Ready(T),
    /// The position lies beyond the known end of the view
    OutOfRange {
        /// Number of records in the view
        total: usize,
    },
    /// One more page is needed
    Fetch(FetchPlan),
}

/// Fetch logic for one query specification against one provider
#[derive(Clone)]
pub struct PageFetcher {
    provider: Arc<dyn Provider>,
    spec: QuerySpec,
}

impl PageFetcher {
    /// Fetcher for `spec` against `provider`
    pub fn new(provider: Arc<dyn Provider>, spec: QuerySpec) -> Self {
        PageFetcher { provider, spec }
    }

    /// The query specification
    pub fn spec(&self) -> &QuerySpec {
        &self.spec
    }

    /// The provider adapter
    pub fn provider(&self) -> &Arc<dyn Provider> {
        &self.provider
    }

    /// Number of view records given a provider-side total
    pub fn view_len(&self, provider_total: usize) -> usize {
        let available = provider_total.saturating_sub(self.spec.offset_bound());
        match self.spec.limit_bound() {
            Some(limit) => available.min(limit),
            None => available,
        }
    }

    /// Look up view position `index`, projecting a cached item with `project`
    pub fn resolve<M, T>(
        &self,
        cache: &ResultCache<M>,
        index: usize,
        project: impl Fn(&Mapped<M>) -> T,
    ) -> Result<Step<T>> {
        if let Some(limit) = self.spec.limit_bound() {
            if index >= limit {
                let total = cache.total().map_or(limit, |t| self.view_len(t));
                return Ok(Step::OutOfRange { total });
            }
        }
        let position = self.spec.offset_bound() + index;
        if let Some(item) = cache.get(position) {
            return Ok(Step::Ready(project(item)));
        }
        if let Some(total) = cache.total() {
            if position >= total {
                return Ok(Step::OutOfRange {
                    total: self.view_len(total),
                });
            }
        }
        self.plan(cache, position).map(Step::Fetch)
    }

    /// Next step towards knowing the number of view records
    ///
    /// `Ready` carries the count. When the provider reports its total on
    /// the first page, exactly one fetch is needed; otherwise pages are
    /// fetched forward until the end is seen or the limit is covered.
    pub fn count_step<M>(&self, cache: &ResultCache<M>) -> Result<Step<usize>> {
        if self.spec.limit_bound() == Some(0) {
            return Ok(Step::Ready(0));
        }
        if let Some(total) = cache.total() {
            return Ok(Step::Ready(self.view_len(total)));
        }
        let offset = self.spec.offset_bound();
        let next = cache.first_missing(offset);
        if let Some(limit) = self.spec.limit_bound() {
            if next - offset >= limit {
                return Ok(Step::Ready(limit));
            }
        }
        self.plan(cache, next).map(Step::Fetch)
    }

    fn plan<M>(&self, cache: &ResultCache<M>, position: usize) -> Result<FetchPlan> {
        let token = match self.provider.pagination() {
            Pagination::Offset { page_size } => {
                let page_size = page_size.max(1);
                let aligned = position / page_size * page_size;
                // A server may serve fewer rows than asked for; resume where
                // the short page stopped instead of asking for it again.
                let offset = cache.first_missing(aligned);
                if offset != aligned {
                    tracing::debug!(
                        target: "patent_client::fetch",
                        provider = self.provider.name(),
                        aligned,
                        offset,
                        "resuming after a short page"
                    );
                }
                PageToken::Offset {
                    offset,
                    limit: page_size,
                }
            }
            Pagination::Cursor { page_size } => PageToken::Cursor {
                cursor: cache.cursor().map(str::to_string),
                position: cache.frontier(),
                limit: page_size.max(1),
            },
            Pagination::Unpaged => PageToken::Whole,
        };
        let request = self.provider.request(&self.spec, &token)?;
        Ok(FetchPlan {
            token,
            request,
            target: position,
        })
    }

    /// Perform a plan on a blocking transport and map the page
    pub fn fetch_blocking<M: Model>(
        &self,
        transport: &dyn Transport,
        plan: &FetchPlan,
    ) -> Result<Page<Mapped<M>>> {
        self.log_request(plan);
        let response = transport
            .get(&plan.request)
            .map_err(|e| self.fault(plan, e))?;
        self.complete(plan, response)
    }

    /// Perform a plan on an async transport and map the page
    ///
    /// Nothing is written anywhere until the response has arrived, so
    /// dropping this future is harmless.
    pub async fn fetch_async<M: Model>(
        &self,
        transport: &dyn AsyncTransport,
        plan: &FetchPlan,
    ) -> Result<Page<Mapped<M>>> {
        self.log_request(plan);
        let response = transport
            .get(&plan.request)
            .await
            .map_err(|e| self.fault(plan, e))?;
        self.complete(plan, response)
    }

    /// Screen, parse and map a response; the first bad item fails the page
    pub fn complete<M: Model>(&self, plan: &FetchPlan, response: Response) -> Result<Page<Mapped<M>>> {
        let body = match self
            .provider
            .accept(response)
            .map_err(|e| self.fault(plan, e))?
        {
            Some(response) => self
                .provider
                .parse(&self.spec, &response)
                .map_err(|e| self.fault(plan, e))?,
            None => PageBody::default(),
        };
        let table = M::alias_table();
        Page::from_body(plan.token.start(), body).try_map(|raw| {
            let record = map(&raw, table)?;
            let model = M::from_record(&record)?;
            Ok::<_, Error>(Mapped { record, model })
        })
    }

    /// Store a completed page, fixing the total when the page proves where
    /// the result set ends
    pub fn absorb<M>(&self, cache: &mut ResultCache<M>, plan: &FetchPlan, page: Page<Mapped<M>>) {
        let exhausted_at = self.exhaustion(plan, &page);
        cache.absorb(page, exhausted_at);
    }

    fn exhaustion<M>(&self, plan: &FetchPlan, page: &Page<Mapped<M>>) -> Option<usize> {
        let end = page.end();
        if page.is_empty() {
            return Some(page.start);
        }
        match &plan.token {
            PageToken::Whole => Some(end),
            PageToken::Cursor { .. } => {
                if page.total.is_none() && !page.has_more {
                    Some(end)
                } else if page.cursor.is_none() && page.total.map_or(true, |t| t > end) {
                    tracing::warn!(
                        target: "patent_client::fetch",
                        provider = self.provider.name(),
                        position = end,
                        "cursor page without continuation token; treating as end of results"
                    );
                    Some(end)
                } else {
                    None
                }
            }
            // A short page with a larger total or `has_more` is not an end;
            // the next plan resumes from the first missing position.
            PageToken::Offset { .. } => {
                if page.total.is_none() && !page.has_more {
                    Some(end)
                } else {
                    None
                }
            }
        }
    }

    fn log_request(&self, plan: &FetchPlan) {
        tracing::debug!(
            target: "patent_client::fetch",
            provider = self.provider.name(),
            start = plan.token.start(),
            page_size = ?plan.token.limit(),
            target = plan.target,
            "fetching page"
        );
    }

    /// Attach diagnostic context to a transport failure
    pub fn fault(&self, plan: &FetchPlan, source: TransportError) -> Error {
        Error::Transport {
            provider: self.provider.name(),
            spec: self.spec.to_string(),
            position: plan.token.start(),
            source,
        }
    }
}
