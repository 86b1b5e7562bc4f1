//! Manager: the entry point binding a record type to one provider

use crate::provider::Provider;
use crate::queryset::QuerySet;
use crate::transport::Session;
use patent_client_core::{Criterion, FilterValue, Model, Result};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// Entry point for queries over `M` records from one provider
///
/// `all`, `filter` and friends return QuerySets without performing I/O;
/// `get` is `filter(..).only()`.
pub struct Manager<M: Model> {
    provider: Arc<dyn Provider>,
    session: Session,
    _model: PhantomData<fn() -> M>,
}

impl<M: Model> Manager<M> {
    /// Bind `M` to `provider`, fetching through `session`
    pub fn new(provider: Arc<dyn Provider>, session: Session) -> Self {
        Manager {
            provider,
            session,
            _model: PhantomData,
        }
    }

    /// Provider name
    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Every record the provider will return for an unfiltered query
    pub fn all(&self) -> QuerySet<M> {
        QuerySet::new(self.provider.clone(), self.session.clone())
    }

    /// Records matching one criterion
    pub fn filter(&self, field: impl Into<String>, criterion: impl Into<Criterion>) -> QuerySet<M> {
        self.all().filter(field, criterion)
    }

    /// Records whose `field` matches any of `values`
    pub fn filter_any<I, V>(&self, field: impl Into<String>, values: I) -> QuerySet<M>
    where
        I: IntoIterator<Item = V>,
        V: Into<FilterValue>,
    {
        self.all().filter_any(field, values)
    }

    /// Records matching every criterion
    pub fn filter_many<I, K, C>(&self, criteria: I) -> QuerySet<M>
    where
        I: IntoIterator<Item = (K, C)>,
        K: Into<String>,
        C: Into<Criterion>,
    {
        self.all().filter_many(criteria)
    }

    /// The single record matching one criterion
    ///
    /// # Errors
    ///
    /// [`patent_client_core::Error::NotFound`] or
    /// [`patent_client_core::Error::MultipleFound`].
    pub fn get(&self, field: impl Into<String>, criterion: impl Into<Criterion>) -> Result<M> {
        self.filter(field, criterion).only()
    }

    /// The single record matching every criterion
    pub fn get_many<I, K, C>(&self, criteria: I) -> Result<M>
    where
        I: IntoIterator<Item = (K, C)>,
        K: Into<String>,
        C: Into<Criterion>,
    {
        self.filter_many(criteria).only()
    }

    /// Async form of [`get`](Self::get)
    pub async fn get_async(
        &self,
        field: impl Into<String>,
        criterion: impl Into<Criterion>,
    ) -> Result<M> {
        self.filter(field, criterion).only_async().await
    }

    /// Async form of [`get_many`](Self::get_many)
    pub async fn get_many_async<I, K, C>(&self, criteria: I) -> Result<M>
    where
        I: IntoIterator<Item = (K, C)>,
        K: Into<String>,
        C: Into<Criterion>,
    {
        self.filter_many(criteria).only_async().await
    }
}

impl<M: Model> Clone for Manager<M> {
    fn clone(&self) -> Self {
        Manager::new(self.provider.clone(), self.session.clone())
    }
}

impl<M: Model> fmt::Debug for Manager<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Manager")
            .field("model", &M::NAME)
            .field("provider", &self.provider.name())
            .finish()
    }
}
