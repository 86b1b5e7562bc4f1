//! OPS INPADOC family retrieval: `FamilyMember` records

use super::{accept_ops, docdb_of, document_id, ops_request, DocumentId};
use crate::common::{check_filters, items_at, key_path, no_sort, path_segment, single_value};
use once_cell::sync::Lazy;
use patent_client_core::{
    AliasTable, FieldKind, FieldPath, Model, PageBody, QuerySpec, Request, Response, Result,
    TransportError,
};
use patent_client_engine::config::EpoConfig;
use patent_client_engine::{PageToken, Pagination, Provider};
use serde::Deserialize;
use serde_json::Value;

/// A priority claimed by a family member
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PriorityClaim {
    /// Position in the claim list
    pub sequence: Option<i64>,
    /// `national` or `regional`
    pub kind: Option<String>,
    /// Whether the priority is active
    pub active: Option<bool>,
    /// Number of the priority application
    pub application_reference: Vec<DocumentId>,
}

impl PriorityClaim {
    /// Priority application in docdb form
    pub fn application_number(&self) -> Option<String> {
        docdb_of(&self.application_reference)
    }
}

/// One publication in an INPADOC family
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FamilyMember {
    /// INPADOC family identifier
    pub family_id: Option<String>,
    /// Publication number spellings
    pub publication_reference: Vec<DocumentId>,
    /// Application number spellings
    pub application_reference: Vec<DocumentId>,
    /// Priorities claimed
    pub priority_claims: Vec<PriorityClaim>,
}

impl FamilyMember {
    /// Publication number in docdb form
    pub fn publication_number(&self) -> Option<String> {
        docdb_of(&self.publication_reference)
    }

    /// Application number in docdb form
    pub fn application_number(&self) -> Option<String> {
        docdb_of(&self.application_reference)
    }

    /// Same as [`publication_number`](Self::publication_number)
    pub fn docdb_number(&self) -> Option<String> {
        self.publication_number()
    }
}

static PRIORITY_CLAIM: Lazy<AliasTable> = Lazy::new(|| {
    AliasTable::builder("PriorityClaim")
        .field("sequence", "@sequence", FieldKind::Int)
        .field("kind", "@kind", FieldKind::Str)
        .field("active", "priority-active-indicator.$", FieldKind::Flag("YES"))
        .field(
            "application_reference",
            "document-id",
            FieldKind::records(document_id),
        )
        .build()
});

pub(super) fn priority_claim() -> &'static AliasTable {
    &PRIORITY_CLAIM
}

static FAMILY_MEMBER: Lazy<AliasTable> = Lazy::new(|| {
    AliasTable::builder("FamilyMember")
        .field("family_id", "@family-id", FieldKind::Str)
        .field(
            "publication_reference",
            "publication-reference.document-id",
            FieldKind::records(document_id),
        )
        .field(
            "application_reference",
            "application-reference.document-id",
            FieldKind::records(document_id),
        )
        .field(
            "priority_claims",
            "priority-claim",
            FieldKind::records(priority_claim),
        )
        .build()
});

impl Model for FamilyMember {
    const NAME: &'static str = "FamilyMember";

    fn alias_table() -> &'static AliasTable {
        &FAMILY_MEMBER
    }
}

static MEMBERS: Lazy<FieldPath> = Lazy::new(|| {
    key_path(&[
        "ops:world-patent-data",
        "ops:patent-family",
        "ops:family-member",
    ])
});

/// Provider for `family/publication/docdb/{number}`
///
/// Takes exactly one `number` filter; the whole family arrives at once.
#[derive(Debug, Clone)]
pub struct FamilyProvider {
    base_url: String,
    access_token: Option<String>,
}

impl FamilyProvider {
    /// Provider for the configured OPS endpoint
    pub fn new(config: &EpoConfig) -> Self {
        FamilyProvider {
            base_url: config.base_url.clone(),
            access_token: config.access_token.clone(),
        }
    }
}

impl Provider for FamilyProvider {
    fn name(&self) -> &'static str {
        "epo-family"
    }

    fn pagination(&self) -> Pagination {
        Pagination::Unpaged
    }

    fn request(&self, spec: &QuerySpec, _token: &PageToken) -> Result<Request> {
        check_filters(spec, self.name(), &["number"])?;
        no_sort(spec, self.name())?;
        let number = single_value(spec, self.name(), "number")?;
        Ok(ops_request(
            &self.base_url,
            &format!(
                "family/publication/docdb/{}",
                path_segment(&number.to_string())
            ),
            self.access_token.as_deref(),
        ))
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
        Ok(PageBody::new(items_at(&body, &MEMBERS)))
    }
}
