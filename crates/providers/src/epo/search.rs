//! OPS published-data search: `Inpadoc` result records

use super::{accept_ops, ops_request, to_cql};
use crate::common::{count_at, items_at, key_path, no_sort};
use once_cell::sync::Lazy;
use patent_client_core::{
    AliasTable, Error, FieldKind, FieldPath, Model, PageBody, QuerySpec, Request, Response,
    Result, TransportError,
};
use patent_client_engine::config::{EpoConfig, EPO_MAX_PAGE_SIZE};
use patent_client_engine::{PageToken, Pagination, Provider};
use serde::Deserialize;
use serde_json::Value;

/// One publication matching a search
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Inpadoc {
    /// INPADOC family identifier
    pub family_id: Option<String>,
    /// Number format, normally `docdb`
    pub id_type: Option<String>,
    /// Two-letter office code
    pub country: Option<String>,
    /// Number without country or kind
    pub doc_number: Option<String>,
    /// Kind code
    pub kind: Option<String>,
}

impl Inpadoc {
    /// Country, number and kind, e.g. `EP3082535A1`
    pub fn docdb_number(&self) -> String {
        format!(
            "{}{}{}",
            self.country.as_deref().unwrap_or_default(),
            self.doc_number.as_deref().unwrap_or_default(),
            self.kind.as_deref().unwrap_or_default()
        )
    }
}

static INPADOC: Lazy<AliasTable> = Lazy::new(|| {
    AliasTable::builder("Inpadoc")
        .field("family_id", "@family-id", FieldKind::Str)
        .field("id_type", "document-id.@document-id-type", FieldKind::Str)
        .field("country", "document-id.country.$", FieldKind::Str)
        .field("doc_number", "document-id.doc-number.$", FieldKind::Str)
        .field("kind", "document-id.kind.$", FieldKind::Str)
        .build()
});

impl Model for Inpadoc {
    const NAME: &'static str = "Inpadoc";

    fn alias_table() -> &'static AliasTable {
        &INPADOC
    }
}

static RESULTS: Lazy<FieldPath> = Lazy::new(|| {
    key_path(&[
        "ops:world-patent-data",
        "ops:biblio-search",
        "ops:search-result",
        "ops:publication-reference",
    ])
});

static TOTAL: Lazy<FieldPath> = Lazy::new(|| {
    key_path(&[
        "ops:world-patent-data",
        "ops:biblio-search",
        "@total-result-count",
    ])
});

/// Provider for `published-data/search`
///
/// Pages are requested with a 1-based inclusive `Range` header.
#[derive(Debug, Clone)]
pub struct SearchProvider {
    base_url: String,
    page_size: usize,
    access_token: Option<String>,
}

impl SearchProvider {
    /// Provider for the configured OPS endpoint
    pub fn new(config: &EpoConfig) -> Self {
        SearchProvider {
            base_url: config.base_url.clone(),
            page_size: config.page_size.clamp(1, EPO_MAX_PAGE_SIZE),
            access_token: config.access_token.clone(),
        }
    }
}

impl Provider for SearchProvider {
    fn name(&self) -> &'static str {
        "epo-search"
    }

    fn pagination(&self) -> Pagination {
        Pagination::Offset {
            page_size: self.page_size,
        }
    }

    fn request(&self, spec: &QuerySpec, token: &PageToken) -> Result<Request> {
        no_sort(spec, self.name())?;
        let query = to_cql(spec)?;
        let PageToken::Offset { offset, limit } = token else {
            return Err(Error::invalid_query(format!(
                "{} pages by offset, not {:?}",
                self.name(),
                token
            )));
        };
        let limit = (*limit).clamp(1, EPO_MAX_PAGE_SIZE);
        Ok(ops_request(
            &self.base_url,
            "published-data/search",
            self.access_token.as_deref(),
        )
        .param("q", query)
        .header("Range", format!("{}-{}", offset + 1, offset + limit)))
    }

    fn accept(&self, response: Response) -> std::result::Result<Option<Response>, TransportError> {
        accept_ops(self.name(), response)
    }

    fn parse(
        &self,
        _spec: &QuerySpec,
        response: &Response,
    ) -> std::result::Result<PageBody, TransportError> {
        let body: Value = response.json()?;
        let page = PageBody::new(items_at(&body, &RESULTS));
        Ok(match count_at(&body, &TOTAL)? {
            Some(total) => page.with_total(total),
            None => page,
        })
    }
}
