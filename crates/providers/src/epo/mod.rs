//! European Patent Office Open Patent Services (OPS)
//!
//! OPS answers in JSON when asked with `Accept: application/json`; the
//! JSON is a mechanical rendering of the XML documents, so attributes
//! appear as `@name` keys, text as `$`, and one-element lists as bare
//! objects. The alias tables below spell out those paths.
//!
//! Access tokens are read from configuration; acquiring them is out of
//! scope for this crate.

mod biblio;
mod cql;
mod family;
mod search;

pub use biblio::{BiblioProvider, Citation, Classification, InpadocBiblio, Party, Title};
pub use cql::to_cql;
pub use family::{FamilyMember, FamilyProvider, PriorityClaim};
pub use search::{Inpadoc, SearchProvider};

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use patent_client_core::{AliasTable, FieldKind, Request, Response, TransportError};
use serde::Deserialize;

fn ops_request(base_url: &str, path: &str, access_token: Option<&str>) -> Request {
    let request = Request::get(format!("{}/{}", base_url.trim_end_matches('/'), path))
        .header("Accept", "application/json");
    match access_token {
        Some(token) => request.header("Authorization", format!("Bearer {}", token)),
        None => request,
    }
}

/// OPS reports an empty result set as 404
fn accept_ops(provider: &str, response: Response) -> Result<Option<Response>, TransportError> {
    if response.status == 404 {
        tracing::debug!(target: "patent_client::fetch", provider, "no results (404)");
        return Ok(None);
    }
    response.error_for_status().map(Some)
}

/// An OPS `document-id`: one spelling of a publication or application number
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DocumentId {
    /// `docdb`, `epodoc` or `original`
    pub id_type: Option<String>,
    /// Two-letter office code
    pub country: Option<String>,
    /// Number without country or kind
    pub number: Option<String>,
    /// Kind code
    pub kind: Option<String>,
    /// Publication or filing date
    pub date: Option<NaiveDate>,
}

impl DocumentId {
    /// Country, number and kind concatenated, if all are present
    pub fn docdb(&self) -> Option<String> {
        match (&self.country, &self.number, &self.kind) {
            (Some(country), Some(number), Some(kind)) => {
                Some(format!("{}{}{}", country, number, kind))
            }
            _ => None,
        }
    }
}

static DOCUMENT_ID: Lazy<AliasTable> = Lazy::new(|| {
    AliasTable::builder("DocumentId")
        .field("id_type", "@document-id-type", FieldKind::Str)
        .field("country", "country.$", FieldKind::Str)
        .field("number", "doc-number.$", FieldKind::Str)
        .field("kind", "kind.$", FieldKind::Str)
        .field("date", "date.$", FieldKind::Date)
        .build()
});

fn document_id() -> &'static AliasTable {
    &DOCUMENT_ID
}

/// The docdb spelling among several document ids
fn docdb_of(ids: &[DocumentId]) -> Option<String> {
    ids.iter()
        .filter(|id| id.id_type.as_deref() == Some("docdb"))
        .find_map(DocumentId::docdb)
}
