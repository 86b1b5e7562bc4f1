//! USPTO patent assignment recordation search
//!
//! The service is a Solr front end answering in XML. Each `<doc>` holds
//! typed children (`<str>`, `<date>`, `<int>`, `<arr>`) distinguished by
//! their `name` attribute; [`flatten_doc`] turns that into a plain object
//! keyed by name before the Field Mapper sees it.

use crate::common::{count_at, items_at, key_path};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use patent_client_core::{
    AliasTable, Direction, Error, FieldKind, FieldPath, Model, PageBody, QuerySpec, Request,
    Response, Result, TransportError,
};
use patent_client_engine::config::AssignmentConfig;
use patent_client_engine::{PageToken, Pagination, Provider};
use serde::Deserialize;
use serde_json::{Map, Value};

/// Filter name → Solr search filter
const FILTERS: &[(&str, &str)] = &[
    ("pct_number", "PCTNumber"),
    ("owner_name", "OwnerName"),
    ("correspondent_name", "CorrespondentName"),
    ("prior_owner_name", "PriorOwnerName"),
    ("application_number", "ApplicationNumber"),
    ("patent_number", "PatentNumber"),
    ("publication_number", "PublicationNumber"),
    ("intl_registration_number", "IntlRegistrationNumber"),
    ("reel_frame", "ReelFrame"),
];

const DEFAULT_SORT: &str = "ExecutionDate+desc";

const DOWNLOAD_URL: &str = "https://assignment-api.uspto.gov/patent/download";

/// One recorded assignment
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Assignment {
    /// Reel/frame identifier, e.g. `47512-1`
    pub id: String,
    /// Reel number
    pub reel_no: Option<String>,
    /// Frame number
    pub frame_no: Option<String>,
    /// Conveyance text
    pub conveyance_text: Option<String>,
    /// Recorded date
    pub recorded_date: Option<NaiveDate>,
    /// Last update date
    pub last_update_date: Option<NaiveDate>,
    /// Page count
    pub page_count: Option<i64>,
    /// Assignor names
    pub assignors: Vec<String>,
    /// Execution dates, parallel to `assignors`
    pub assignor_execution_dates: Vec<NaiveDate>,
    /// Assignee names
    pub assignees: Vec<String>,
    /// Assignee cities
    pub assignee_cities: Vec<String>,
    /// Assignee countries
    pub assignee_countries: Vec<String>,
    /// Application numbers of the conveyed properties
    pub application_numbers: Vec<String>,
    /// Patent numbers
    pub patent_numbers: Vec<String>,
    /// Publication numbers
    pub publication_numbers: Vec<String>,
    /// Invention titles
    pub invention_titles: Vec<String>,
    /// Correspondent name
    pub correspondent_name: Option<String>,
}

impl Assignment {
    /// Location of the recorded cover sheet and documents
    pub fn pdf_url(&self) -> Option<String> {
        match (&self.reel_no, &self.frame_no) {
            (Some(reel), Some(frame)) => Some(format!("{}/{}/{}", DOWNLOAD_URL, reel, frame)),
            _ => None,
        }
    }
}

static ASSIGNMENT: Lazy<AliasTable> = Lazy::new(|| {
    let strings = || FieldKind::repeated(FieldKind::Str);
    AliasTable::builder("Assignment")
        .required("id", "id", FieldKind::Str)
        .field("reel_no", "reelNo", FieldKind::Str)
        .field("frame_no", "frameNo", FieldKind::Str)
        .field("conveyance_text", "conveyanceText", FieldKind::Str)
        .field("recorded_date", "recordedDate", FieldKind::Date)
        .field("last_update_date", "lastUpdateDate", FieldKind::Date)
        .field("page_count", "pageCount", FieldKind::Int)
        .field("assignors", "patAssignorName", strings())
        .field(
            "assignor_execution_dates",
            "patAssignorExDate",
            FieldKind::repeated(FieldKind::Date),
        )
        .field("assignees", "patAssigneeName", strings())
        .field("assignee_cities", "patAssigneeCity", strings())
        .field("assignee_countries", "patAssigneeCountryName", strings())
        .field("application_numbers", "applNum", strings())
        .field("patent_numbers", "patNum", strings())
        .field("publication_numbers", "publNum", strings())
        .field("invention_titles", "inventionTitle", strings())
        .field("correspondent_name", "corrName", FieldKind::Str)
        .build()
});

impl Model for Assignment {
    const NAME: &'static str = "Assignment";

    fn alias_table() -> &'static AliasTable {
        &ASSIGNMENT
    }
}

/// Text of a converted element: a bare string or the `$` of an object
fn text_of(node: &Value) -> Value {
    match node {
        Value::Object(fields) => fields.get("$").cloned().unwrap_or(Value::Null),
        other => other.clone(),
    }
}

fn as_nodes(value: &Value) -> Vec<&Value> {
    match value {
        Value::Array(items) => items.iter().collect(),
        other => vec![other],
    }
}

/// Flatten one converted Solr `<doc>` into `{name: value}`
///
/// `<arr>` children become arrays of their element texts; every other
/// typed child becomes its text. Children without a `name` are dropped.
pub fn flatten_doc(doc: &Value) -> Value {
    let mut out = Map::new();
    let Some(children) = doc.as_object() else {
        return Value::Object(out);
    };
    for (tag, nodes) in children {
        for node in as_nodes(nodes) {
            let Some(name) = node.get("@name").and_then(Value::as_str) else {
                continue;
            };
            let value = if tag == "arr" {
                let values = node
                    .as_object()
                    .into_iter()
                    .flatten()
                    .filter(|(key, _)| !key.starts_with('@'))
                    .flat_map(|(_, items)| as_nodes(items).into_iter().map(text_of))
                    .collect();
                Value::Array(values)
            } else {
                text_of(node)
            };
            out.insert(name.to_string(), value);
        }
    }
    Value::Object(out)
}

static DOCS: Lazy<FieldPath> = Lazy::new(|| key_path(&["response", "result", "doc"]));
static NUM_FOUND: Lazy<FieldPath> = Lazy::new(|| key_path(&["response", "result", "@numFound"]));

/// Provider for the assignment `lookup` endpoint
///
/// Accepts exactly one filter carrying one value, and at most one sort key
/// on `execution_date`.
#[derive(Debug, Clone)]
pub struct AssignmentProvider {
    base_url: String,
    page_size: usize,
}

impl AssignmentProvider {
    /// Provider for the configured endpoint
    pub fn new(config: &AssignmentConfig) -> Self {
        AssignmentProvider {
            base_url: config.base_url.clone(),
            page_size: config.page_size.max(1),
        }
    }

    fn search_filter(&self, spec: &QuerySpec) -> Result<(&'static str, String)> {
        let mut filters = spec.filters().iter();
        let (Some((name, values)), None) = (filters.next(), filters.next()) else {
            return Err(Error::invalid_query(format!(
                "{} takes exactly one filter, got {}",
                self.name(),
                spec.filters().len()
            )));
        };
        let Some((_, solr)) = FILTERS.iter().find(|(n, _)| *n == name.as_str()) else {
            let accepted: Vec<&str> = FILTERS.iter().map(|(n, _)| *n).collect();
            return Err(Error::invalid_query(format!(
                "{} cannot filter by `{}` (accepted: {})",
                self.name(),
                name,
                accepted.join(", ")
            )));
        };
        match values.as_slice() {
            [value] => Ok((*solr, value.to_string())),
            _ => Err(Error::invalid_query(format!(
                "{} takes one value for `{}`, got {}",
                self.name(),
                name,
                values.len()
            ))),
        }
    }

    fn sort(&self, spec: &QuerySpec) -> Result<&'static str> {
        match spec.sort_keys() {
            [] => Ok(DEFAULT_SORT),
            [key] if key.field == "execution_date" => Ok(match key.direction {
                Direction::Ascending => "ExecutionDate+asc",
                Direction::Descending => "ExecutionDate+desc",
            }),
            _ => Err(Error::invalid_query(format!(
                "{} sorts by `execution_date` only",
                self.name()
            ))),
        }
    }
}

impl Provider for AssignmentProvider {
    fn name(&self) -> &'static str {
        "uspto-assignment"
    }

    fn pagination(&self) -> Pagination {
        Pagination::Offset {
            page_size: self.page_size,
        }
    }

    fn request(&self, spec: &QuerySpec, token: &PageToken) -> Result<Request> {
        let (filter, query) = self.search_filter(spec)?;
        let sort = self.sort(spec)?;
        let PageToken::Offset { offset, limit } = token else {
            return Err(Error::invalid_query(format!(
                "{} pages by offset, not {:?}",
                self.name(),
                token
            )));
        };
        Ok(Request::get(self.base_url.as_str())
            .header("Accept", "application/xml")
            .param("filter", filter)
            .param("query", query)
            .param("rows", limit)
            .param("start", offset)
            .param("sort", sort)
            .param("facet", "false"))
    }

    fn parse(
        &self,
        _spec: &QuerySpec,
        response: &Response,
    ) -> std::result::Result<PageBody, TransportError> {
        let body = response.xml_as_json()?;
        let items = items_at(&body, &DOCS).iter().map(flatten_doc).collect();
        let page = PageBody::new(items);
        Ok(match count_at(&body, &NUM_FOUND)? {
            Some(total) => page.with_total(total),
            None => page,
        })
    }
}
