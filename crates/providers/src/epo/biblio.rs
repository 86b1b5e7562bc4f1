//! OPS bibliographic data: `InpadocBiblio` records

use super::family::{priority_claim, PriorityClaim};
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

/// Text tagged with its language: a title or an abstract
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Title {
    /// Two-letter language code
    pub lang: Option<String>,
    /// The text itself
    pub text: Option<String>,
}

/// An IPC or CPC classification
///
/// IPCR entries carry one preformatted `text`; patent classifications
/// carry the symbol in pieces.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Classification {
    /// Scheme, e.g. `CPCI`; absent for IPCR entries
    pub scheme: Option<String>,
    /// Preformatted IPCR text
    pub text: Option<String>,
    /// Section letter
    pub section: Option<String>,
    /// Two-digit class
    pub class: Option<String>,
    /// Subclass letter
    pub subclass: Option<String>,
    /// Main group
    pub main_group: Option<String>,
    /// Subgroup
    pub subgroup: Option<String>,
}

impl Classification {
    /// Symbol such as `A47K 5/12` (IPCR) or `A47K5/1217` (pieces)
    pub fn symbol(&self) -> Option<String> {
        if let Some(text) = &self.text {
            let symbol = text.split_whitespace().take(2).collect::<Vec<_>>().join(" ");
            return (!symbol.is_empty()).then_some(symbol);
        }
        match (
            &self.section,
            &self.class,
            &self.subclass,
            &self.main_group,
            &self.subgroup,
        ) {
            (Some(section), Some(class), Some(subclass), Some(main), Some(sub)) => Some(format!(
                "{}{}{}{}/{}",
                section, class, subclass, main, sub
            )),
            _ => None,
        }
    }
}

/// An applicant or inventor in one of the OPS name formats
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Party {
    /// Position in the party list
    pub sequence: Option<i64>,
    /// `epodoc` or `original`
    pub data_format: Option<String>,
    /// Name as given in that format
    pub name: Option<String>,
}

/// A patent cited against the publication
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Citation {
    /// Procedure phase, e.g. `search` or `examination`
    pub cited_phase: Option<String>,
    /// Who cited it, e.g. `examiner` or `applicant`
    pub cited_by: Option<String>,
    /// Number spellings of the cited document; empty for non-patent
    /// literature
    pub document_ids: Vec<DocumentId>,
}

impl Citation {
    fn id(&self, id_type: &str) -> Option<&DocumentId> {
        self.document_ids
            .iter()
            .find(|id| id.id_type.as_deref() == Some(id_type))
    }

    /// The `docdb` spelling
    pub fn docdb(&self) -> Option<&DocumentId> {
        self.id("docdb")
    }

    /// The `epodoc` spelling
    pub fn epodoc(&self) -> Option<&DocumentId> {
        self.id("epodoc")
    }

    /// The number as printed on the citing document
    pub fn original(&self) -> Option<&DocumentId> {
        self.id("original")
    }

    /// Cited number as `{country}{number}.{kind}`, or without the kind
    /// when it is unknown
    pub fn docdb_number(&self) -> Option<String> {
        let id = self.docdb()?;
        let country = id.country.as_deref().unwrap_or_default();
        let number = id.number.as_deref()?;
        Some(match &id.kind {
            Some(kind) => format!("{}{}.{}", country, number, kind),
            None => format!("{}{}", country, number),
        })
    }
}

/// Bibliographic data of one publication
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InpadocBiblio {
    /// Two-letter office code
    pub country: Option<String>,
    /// Number without country or kind
    pub doc_number: Option<String>,
    /// Kind code
    pub kind: Option<String>,
    /// INPADOC family identifier
    pub family_id: Option<String>,
    /// Publication number spellings
    pub publication_reference: Vec<DocumentId>,
    /// Application number spellings
    pub application_reference: Vec<DocumentId>,
    /// IPCR classifications
    pub intl_classifications: Vec<Classification>,
    /// Patent classifications, CPC among them
    pub patent_classifications: Vec<Classification>,
    /// Priorities claimed
    pub priority_claims: Vec<PriorityClaim>,
    /// Titles in every language supplied
    pub titles: Vec<Title>,
    /// Abstracts in every language supplied
    pub abstracts: Vec<Title>,
    /// Patent citations
    pub citations: Vec<Citation>,
    /// Applicants in every name format
    pub applicants: Vec<Party>,
    /// Inventors in every name format
    pub inventors: Vec<Party>,
}

fn english(texts: &[Title]) -> Option<&str> {
    texts
        .iter()
        .find(|t| t.lang.as_deref() == Some("en"))
        .and_then(|t| t.text.as_deref())
}

fn names(parties: &[Party], format: &str) -> Vec<String> {
    parties
        .iter()
        .filter(|p| p.data_format.as_deref() == Some(format))
        .filter_map(|p| p.name.clone())
        .collect()
}

impl InpadocBiblio {
    /// Country, number and kind, e.g. `EP3082535A1`
    pub fn docdb_number(&self) -> String {
        format!(
            "{}{}{}",
            self.country.as_deref().unwrap_or_default(),
            self.doc_number.as_deref().unwrap_or_default(),
            self.kind.as_deref().unwrap_or_default()
        )
    }

    /// Publication number in docdb form
    pub fn publication_number(&self) -> Option<String> {
        docdb_of(&self.publication_reference)
    }

    /// Application number in docdb form
    pub fn application_number(&self) -> Option<String> {
        docdb_of(&self.application_reference)
    }

    /// English title; `None` when the office supplied none
    pub fn title(&self) -> Option<&str> {
        english(&self.titles)
    }

    /// English abstract
    pub fn abstract_text(&self) -> Option<&str> {
        english(&self.abstracts)
    }

    /// IPC symbols
    pub fn intl_class(&self) -> Vec<String> {
        self.intl_classifications
            .iter()
            .filter_map(Classification::symbol)
            .collect()
    }

    /// CPC symbols
    pub fn cpc_class(&self) -> Vec<String> {
        self.patent_classifications
            .iter()
            .filter(|c| matches!(&c.scheme, Some(s) if s.starts_with("CPC")))
            .filter_map(Classification::symbol)
            .collect()
    }

    /// Applicant names in `epodoc` format
    pub fn applicants_epodoc(&self) -> Vec<String> {
        names(&self.applicants, "epodoc")
    }

    /// Applicant names as filed
    pub fn applicants_original(&self) -> Vec<String> {
        names(&self.applicants, "original")
    }

    /// Inventor names in `epodoc` format
    pub fn inventors_epodoc(&self) -> Vec<String> {
        names(&self.inventors, "epodoc")
    }

    /// Inventor names as filed
    pub fn inventors_original(&self) -> Vec<String> {
        names(&self.inventors, "original")
    }
}

static TITLE: Lazy<AliasTable> = Lazy::new(|| {
    AliasTable::builder("Title")
        .field("lang", "@lang", FieldKind::Str)
        .field("text", "$", FieldKind::Str)
        .build()
});

fn title() -> &'static AliasTable {
    &TITLE
}

// Multi-paragraph abstracts are not joined; only a single `p` is read.
static ABSTRACT: Lazy<AliasTable> = Lazy::new(|| {
    AliasTable::builder("Title")
        .field("lang", "@lang", FieldKind::Str)
        .field("text", "p.$", FieldKind::Str)
        .build()
});

fn abstract_text() -> &'static AliasTable {
    &ABSTRACT
}

static IPCR: Lazy<AliasTable> = Lazy::new(|| {
    AliasTable::builder("Classification")
        .field("text", "text.$", FieldKind::Str)
        .build()
});

fn ipcr() -> &'static AliasTable {
    &IPCR
}

static PATENT_CLASSIFICATION: Lazy<AliasTable> = Lazy::new(|| {
    AliasTable::builder("Classification")
        .field("scheme", "classification-scheme.@scheme", FieldKind::Str)
        .field("section", "section.$", FieldKind::Str)
        .field("class", "class.$", FieldKind::Str)
        .field("subclass", "subclass.$", FieldKind::Str)
        .field("main_group", "main-group.$", FieldKind::Str)
        .field("subgroup", "subgroup.$", FieldKind::Str)
        .build()
});

fn patent_classification() -> &'static AliasTable {
    &PATENT_CLASSIFICATION
}

static APPLICANT: Lazy<AliasTable> = Lazy::new(|| {
    AliasTable::builder("Party")
        .field("sequence", "@sequence", FieldKind::Int)
        .field("data_format", "@data-format", FieldKind::Str)
        .field("name", "applicant-name.name.$", FieldKind::Str)
        .build()
});

fn applicant() -> &'static AliasTable {
    &APPLICANT
}

static INVENTOR: Lazy<AliasTable> = Lazy::new(|| {
    AliasTable::builder("Party")
        .field("sequence", "@sequence", FieldKind::Int)
        .field("data_format", "@data-format", FieldKind::Str)
        .field("name", "inventor-name.name.$", FieldKind::Str)
        .build()
});

fn inventor() -> &'static AliasTable {
    &INVENTOR
}

static CITATION: Lazy<AliasTable> = Lazy::new(|| {
    AliasTable::builder("Citation")
        .field("cited_phase", "@cited-phase", FieldKind::Str)
        .field("cited_by", "@cited-by", FieldKind::Str)
        .field(
            "document_ids",
            "patcit.document-id",
            FieldKind::records(document_id),
        )
        .build()
});

fn citation() -> &'static AliasTable {
    &CITATION
}

static INPADOC_BIBLIO: Lazy<AliasTable> = Lazy::new(|| {
    AliasTable::builder("InpadocBiblio")
        .field("country", "@country", FieldKind::Str)
        .field("doc_number", "@doc-number", FieldKind::Str)
        .field("kind", "@kind", FieldKind::Str)
        .field("family_id", "@family-id", FieldKind::Str)
        .field(
            "publication_reference",
            "bibliographic-data.publication-reference.document-id",
            FieldKind::records(document_id),
        )
        .field(
            "application_reference",
            "bibliographic-data.application-reference.document-id",
            FieldKind::records(document_id),
        )
        .field(
            "intl_classifications",
            "bibliographic-data.classifications-ipcr.classification-ipcr",
            FieldKind::records(ipcr),
        )
        .field(
            "patent_classifications",
            "bibliographic-data.patent-classifications.patent-classification",
            FieldKind::records(patent_classification),
        )
        .field(
            "priority_claims",
            "bibliographic-data.priority-claims.priority-claim",
            FieldKind::records(priority_claim),
        )
        .field(
            "titles",
            "bibliographic-data.invention-title",
            FieldKind::records(title),
        )
        .field("abstracts", "abstract", FieldKind::records(abstract_text))
        .field(
            "citations",
            "bibliographic-data.references-cited.citation",
            FieldKind::records(citation),
        )
        .field(
            "applicants",
            "bibliographic-data.parties.applicants.applicant",
            FieldKind::records(applicant),
        )
        .field(
            "inventors",
            "bibliographic-data.parties.inventors.inventor",
            FieldKind::records(inventor),
        )
        .build()
});

impl Model for InpadocBiblio {
    const NAME: &'static str = "InpadocBiblio";

    fn alias_table() -> &'static AliasTable {
        &INPADOC_BIBLIO
    }
}

static DOCUMENTS: Lazy<FieldPath> = Lazy::new(|| {
    key_path(&[
        "ops:world-patent-data",
        "exchange-documents",
        "exchange-document",
    ])
});

/// Provider for `published-data/publication/docdb/{number}/biblio`
///
/// Takes exactly one `number` filter. A number can match several
/// exchange documents (one per kind), all delivered in one response.
#[derive(Debug, Clone)]
pub struct BiblioProvider {
    base_url: String,
    access_token: Option<String>,
}

impl BiblioProvider {
    /// Provider for the configured OPS endpoint
    pub fn new(config: &EpoConfig) -> Self {
        BiblioProvider {
            base_url: config.base_url.clone(),
            access_token: config.access_token.clone(),
        }
    }
}

impl Provider for BiblioProvider {
    fn name(&self) -> &'static str {
        "epo-biblio"
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
                "published-data/publication/docdb/{}/biblio",
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
        Ok(PageBody::new(items_at(&body, &DOCUMENTS)))
    }
}
