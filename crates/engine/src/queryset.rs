//! QuerySet: a lazily evaluated, chainable view over one provider query
//!
//! Chaining (`filter`, `sort`, `offset`, `limit`, `slice`) never performs
//! I/O. Materializing operations resolve view positions through the
//! QuerySet's Result Cache and fetch only the pages they need.
//!
//! Every I/O-performing operation exists twice: a blocking form
//! (`count`, `at`, `first`, `only`, `iter`, `to_vec`, `exists`) and a
//! suspend-on-I/O form (`count_async`, `at_async`, `first_async`,
//! `only_async`, `to_vec_async`, `exists_async`, `stream`). Both drive the
//! same [`PageFetcher`] steps; they differ only in which transport of the
//! [`Session`] performs the request.
//!
//! # Example
//!
//! ```ignore
//! use patent_client_engine::testing::{corpus, Item, ScriptedProvider};
//! use patent_client_engine::{QuerySet, Session};
//! use std::sync::Arc;
//!
//! let provider = ScriptedProvider::offset(corpus(57), 20);
//! let transport = provider.transport();
//! let items: QuerySet<Item> = QuerySet::new(Arc::new(provider), Session::new(transport.clone()));
//!
//! assert_eq!(items.at(55).unwrap().id, "item-55");
//! assert_eq!(transport.request_count(), 1);
//! assert_eq!(items.count().unwrap(), 57);
//! assert_eq!(transport.request_count(), 1);
//! ```

use crate::cache::{Mapped, ResultCache};
use crate::fetcher::{PageFetcher, Step};
use crate::provider::Provider;
use crate::transport::Session;
use crate::values::{Values, ValuesList};
use futures::stream::{self, Stream};
use parking_lot::Mutex;
use patent_client_core::{Criterion, Error, FilterValue, Model, QuerySpec, Result, SortKey};
use std::fmt;
use std::ops::Range;
use std::sync::Arc;

/// Result of resolving one view position
pub(crate) enum Slot<T> {
    Item(T),
    End(usize),
}

/// Lazily evaluated collection of `M` records
pub struct QuerySet<M: Model> {
    fetcher: PageFetcher,
    session: Session,
    cache: Arc<Mutex<ResultCache<M>>>,
}

impl<M: Model> QuerySet<M> {
    /// Unfiltered QuerySet over `provider`
    pub fn new(provider: Arc<dyn Provider>, session: Session) -> Self {
        Self::with_spec(provider, session, QuerySpec::new(M::NAME))
    }

    /// QuerySet for an explicit specification
    pub fn with_spec(provider: Arc<dyn Provider>, session: Session, spec: QuerySpec) -> Self {
        QuerySet {
            fetcher: PageFetcher::new(provider, spec),
            session,
            cache: Arc::new(Mutex::new(ResultCache::new())),
        }
    }

    /// The query specification
    pub fn spec(&self) -> &QuerySpec {
        self.fetcher.spec()
    }

    /// Name of the provider this QuerySet fetches from
    pub fn provider_name(&self) -> &'static str {
        self.fetcher.provider().name()
    }

    /// Number of pages fetched into this QuerySet's cache
    pub fn pages_fetched(&self) -> usize {
        self.cache.lock().pages_absorbed()
    }

    /// Number of records held in this QuerySet's cache
    pub fn cached_len(&self) -> usize {
        self.cache.lock().len()
    }

    // ------------------------------------------------------------------------
    // Chaining (no I/O)
    // ------------------------------------------------------------------------

    /// New QuerySet over a different result set; starts with an empty cache
    fn derive(&self, spec: QuerySpec) -> Self {
        Self::with_spec(self.fetcher.provider().clone(), self.session.clone(), spec)
    }

    /// New QuerySet over the same provider result set; shares the cache
    fn window(&self, spec: QuerySpec) -> Self {
        QuerySet {
            fetcher: PageFetcher::new(self.fetcher.provider().clone(), spec),
            session: self.session.clone(),
            cache: self.cache.clone(),
        }
    }

    /// Add a filter; a field already filtered has its values replaced
    pub fn filter(&self, field: impl Into<String>, criterion: impl Into<Criterion>) -> Self {
        self.derive(self.spec().filter(field, criterion))
    }

    /// Filter a field to any of `values`
    pub fn filter_any<I, V>(&self, field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<FilterValue>,
    {
        self.derive(self.spec().filter(field, Criterion::any(values)))
    }

    /// Add several filters at once
    pub fn filter_many<I, K, C>(&self, criteria: I) -> Self
    where
        I: IntoIterator<Item = (K, C)>,
        K: Into<String>,
        C: Into<Criterion>,
    {
        self.derive(self.spec().filter_many(criteria))
    }

    /// Replace the sort keys (`-field` sorts descending)
    pub fn sort<I, K>(&self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<SortKey>,
    {
        self.derive(self.spec().sort(keys))
    }

    /// Skip `n` further records
    pub fn offset(&self, n: usize) -> Self {
        self.window(self.spec().offset(n))
    }

    /// Keep at most `n` records
    pub fn limit(&self, n: usize) -> Self {
        self.window(self.spec().limit(n))
    }

    /// Records `range.start .. range.end` of this view
    pub fn slice(&self, range: Range<usize>) -> Self {
        let len = range.end.saturating_sub(range.start);
        self.window(self.spec().offset(range.start).limit(len))
    }

    // ------------------------------------------------------------------------
    // Projection
    // ------------------------------------------------------------------------

    fn declared<S: AsRef<str>>(fields: &[S]) -> Result<Vec<&'static str>> {
        let table = M::alias_table();
        fields
            .iter()
            .map(|name| {
                let name = name.as_ref();
                table.field(name).map(|f| f.name).ok_or_else(|| {
                    Error::invalid_query(format!("{} has no field `{}`", M::NAME, name))
                })
            })
            .collect()
    }

    /// Record the fields later projections select, sharing this view's cache
    ///
    /// # Errors
    ///
    /// [`Error::InvalidQuery`] if a name is not declared by `M`'s alias
    /// table. No I/O is performed.
    pub fn project(&self, fields: &[&str]) -> Result<Self> {
        let names = Self::declared(fields)?;
        Ok(self.window(self.spec().project(names)))
    }

    /// Per-record rows of the named fields, in record order
    ///
    /// An empty `fields` selects the projection recorded in the `QuerySpec`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidQuery`] if a name is not declared by `M`'s alias
    /// table, or if neither `fields` nor a projection names a field. No
    /// I/O is performed.
    pub fn values_list(&self, fields: &[&str]) -> Result<ValuesList<'_, M>> {
        let names = if fields.is_empty() {
            Self::declared(self.spec().projection())?
        } else {
            Self::declared(fields)?
        };
        if names.is_empty() {
            return Err(Error::invalid_query(format!(
                "{} projection names no fields",
                M::NAME
            )));
        }
        Ok(ValuesList::new(self, names))
    }

    /// Flat sequence of one field's values
    pub fn values(&self, field: &str) -> Result<Values<'_, M>> {
        Ok(Values::new(self.values_list(&[field])?))
    }

    // ------------------------------------------------------------------------
    // Shared resolution
    // ------------------------------------------------------------------------

    pub(crate) fn slot<T>(&self, index: usize, project: impl Fn(&Mapped<M>) -> T) -> Result<Slot<T>> {
        loop {
            let step = {
                let cache = self.cache.lock();
                self.fetcher.resolve(&*cache, index, &project)?
            };
            match step {
                Step::Ready(item) => return Ok(Slot::Item(item)),
                Step::OutOfRange { total } => return Ok(Slot::End(total)),
                Step::Fetch(plan) => {
                    let page = self
                        .fetcher
                        .fetch_blocking::<M>(self.session.blocking(), &plan)?;
                    self.fetcher.absorb(&mut *self.cache.lock(), &plan, page);
                }
            }
        }
    }

    pub(crate) async fn slot_async<T>(
        &self,
        index: usize,
        project: impl Fn(&Mapped<M>) -> T,
    ) -> Result<Slot<T>> {
        loop {
            let step = {
                let cache = self.cache.lock();
                self.fetcher.resolve(&*cache, index, &project)?
            };
            match step {
                Step::Ready(item) => return Ok(Slot::Item(item)),
                Step::OutOfRange { total } => return Ok(Slot::End(total)),
                Step::Fetch(plan) => {
                    let page = self
                        .fetcher
                        .fetch_async::<M>(self.session.nonblocking(), &plan)
                        .await?;
                    self.fetcher.absorb(&mut *self.cache.lock(), &plan, page);
                }
            }
        }
    }

    fn out_of_range(index: usize, slot: Slot<M>) -> Result<M> {
        match slot {
            Slot::Item(item) => Ok(item),
            Slot::End(total) => Err(Error::OutOfRange {
                position: index,
                total,
            }),
        }
    }

    fn not_found(&self) -> Error {
        Error::NotFound {
            model: M::NAME,
            spec: self.spec().to_string(),
        }
    }

    fn multiple_found(&self) -> Error {
        Error::MultipleFound {
            model: M::NAME,
            spec: self.spec().to_string(),
        }
    }

    // ------------------------------------------------------------------------
    // Blocking forms
    // ------------------------------------------------------------------------

    /// Number of records in the view
    ///
    /// Reuses a known total; otherwise fetches the first uncached page,
    /// which settles the count for providers that report their total.
    pub fn count(&self) -> Result<usize> {
        loop {
            let step = {
                let cache = self.cache.lock();
                self.fetcher.count_step(&*cache)?
            };
            match step {
                Step::Ready(n) | Step::OutOfRange { total: n } => return Ok(n),
                Step::Fetch(plan) => {
                    let page = self
                        .fetcher
                        .fetch_blocking::<M>(self.session.blocking(), &plan)?;
                    self.fetcher.absorb(&mut *self.cache.lock(), &plan, page);
                }
            }
        }
    }

    /// Record at view position `index`
    ///
    /// # Errors
    ///
    /// [`Error::OutOfRange`] past the end of the view.
    pub fn at(&self, index: usize) -> Result<M> {
        Self::out_of_range(index, self.slot(index, |m| m.model.clone())?)
    }

    /// First record, `None` for an empty view
    pub fn first(&self) -> Result<Option<M>> {
        match self.slot(0, |m| m.model.clone())? {
            Slot::Item(item) => Ok(Some(item)),
            Slot::End(_) => Ok(None),
        }
    }

    /// The single record of the view
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] for an empty view, [`Error::MultipleFound`] if a
    /// second record exists.
    pub fn only(&self) -> Result<M> {
        let first = match self.slot(0, |m| m.model.clone())? {
            Slot::Item(item) => item,
            Slot::End(_) => return Err(self.not_found()),
        };
        match self.slot(1, |_| ())? {
            Slot::Item(()) => Err(self.multiple_found()),
            Slot::End(_) => Ok(first),
        }
    }

    /// True if the view holds at least one record
    pub fn exists(&self) -> Result<bool> {
        Ok(matches!(self.slot(0, |_| ())?, Slot::Item(())))
    }

    /// Iterate the view from position 0
    ///
    /// Each call starts a fresh pass; pages fetched by earlier passes are
    /// reused. Iteration ends at the end of the view or after the first
    /// error.
    pub fn iter(&self) -> impl Iterator<Item = Result<M>> + '_ {
        Walk::new(self, |m: &Mapped<M>| m.model.clone())
    }

    /// Materialize the whole view
    pub fn to_vec(&self) -> Result<Vec<M>> {
        self.iter().collect()
    }

    // ------------------------------------------------------------------------
    // Suspend-on-I/O forms
    // ------------------------------------------------------------------------

    /// Async form of [`count`](Self::count)
    pub async fn count_async(&self) -> Result<usize> {
        loop {
            let step = {
                let cache = self.cache.lock();
                self.fetcher.count_step(&*cache)?
            };
            match step {
                Step::Ready(n) | Step::OutOfRange { total: n } => return Ok(n),
                Step::Fetch(plan) => {
                    let page = self
                        .fetcher
                        .fetch_async::<M>(self.session.nonblocking(), &plan)
                        .await?;
                    self.fetcher.absorb(&mut *self.cache.lock(), &plan, page);
                }
            }
        }
    }

    /// Async form of [`at`](Self::at)
    pub async fn at_async(&self, index: usize) -> Result<M> {
        Self::out_of_range(index, self.slot_async(index, |m| m.model.clone()).await?)
    }

    /// Async form of [`first`](Self::first)
    pub async fn first_async(&self) -> Result<Option<M>> {
        match self.slot_async(0, |m| m.model.clone()).await? {
            Slot::Item(item) => Ok(Some(item)),
            Slot::End(_) => Ok(None),
        }
    }

    /// Async form of [`only`](Self::only)
    pub async fn only_async(&self) -> Result<M> {
        let first = match self.slot_async(0, |m| m.model.clone()).await? {
            Slot::Item(item) => item,
            Slot::End(_) => return Err(self.not_found()),
        };
        match self.slot_async(1, |_| ()).await? {
            Slot::Item(()) => Err(self.multiple_found()),
            Slot::End(_) => Ok(first),
        }
    }

    /// Async form of [`exists`](Self::exists)
    pub async fn exists_async(&self) -> Result<bool> {
        Ok(matches!(self.slot_async(0, |_| ()).await?, Slot::Item(())))
    }

    /// Async form of [`iter`](Self::iter)
    pub fn stream(&self) -> impl Stream<Item = Result<M>> + '_ {
        self.stream_with(|m: &Mapped<M>| m.model.clone())
    }

    /// Async form of [`to_vec`](Self::to_vec)
    pub async fn to_vec_async(&self) -> Result<Vec<M>> {
        let mut out = Vec::new();
        let mut index = 0;
        loop {
            match self.slot_async(index, |m| m.model.clone()).await? {
                Slot::Item(item) => out.push(item),
                Slot::End(_) => return Ok(out),
            }
            index += 1;
        }
    }

    pub(crate) fn stream_with<T, F>(&self, project: F) -> impl Stream<Item = Result<T>> + '_
    where
        T: 'static,
        F: Fn(&Mapped<M>) -> T + Clone + 'static,
    {
        stream::unfold(Some(0usize), move |state| {
            let project = project.clone();
            async move {
                let index = match state {
                    Some(index) => index,
                    None => return None,
                };
                match self.slot_async(index, project).await {
                    Ok(Slot::Item(item)) => Some((Ok(item), Some(index + 1))),
                    Ok(Slot::End(_)) => None,
                    Err(e) => Some((Err(e), None)),
                }
            }
        })
    }
}

/// Blocking walk over view positions
pub(crate) struct Walk<'a, M: Model, F> {
    queryset: &'a QuerySet<M>,
    next: usize,
    done: bool,
    project: F,
}

impl<'a, M: Model, F> Walk<'a, M, F> {
    pub(crate) fn new(queryset: &'a QuerySet<M>, project: F) -> Self {
        Walk {
            queryset,
            next: 0,
            done: false,
            project,
        }
    }
}

impl<'a, M, T, F> Iterator for Walk<'a, M, F>
where
    M: Model,
    F: Fn(&Mapped<M>) -> T,
{
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.queryset.slot(self.next, &self.project) {
            Ok(Slot::Item(item)) => {
                self.next += 1;
                Some(Ok(item))
            }
            Ok(Slot::End(_)) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Fresh QuerySet for the same specification, with its own empty cache
impl<M: Model> Clone for QuerySet<M> {
    fn clone(&self) -> Self {
        self.derive(self.spec().clone())
    }
}

/// QuerySets are equal iff their specifications are; cached pages are not
/// compared
impl<M: Model> PartialEq for QuerySet<M> {
    fn eq(&self, other: &Self) -> bool {
        self.spec() == other.spec()
    }
}

impl<M: Model> fmt::Debug for QuerySet<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuerySet")
            .field("provider", &self.provider_name())
            .field("spec", &self.spec().to_string())
            .finish()
    }
}
