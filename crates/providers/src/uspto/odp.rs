//! USPTO Open Data Portal: application search and file wrapper documents

use crate::common::{
    check_filters, count_at, items_at, key_path, no_sort, path_segment, quote_term, single_value,
};
use patent_client_core::{
    Direction, Error, FilterValue, PageBody, QuerySpec, Request, Response, Result, TransportError,
};
use patent_client_engine::config::OdpConfig;
use patent_client_engine::{PageToken, Pagination, Provider};
use serde_json::Value;

/// Filter and sort name → searchable wire field
const SEARCH_FIELDS: &[(&str, &str)] = &[
    ("appl_id", "applicationNumberText"),
    ("invention_title", "applicationMetaData.inventionTitle"),
    ("app_filing_date", "applicationMetaData.filingDate"),
    ("effective_filing_date", "applicationMetaData.effectiveFilingDate"),
    ("app_type_code", "applicationMetaData.applicationTypeCode"),
    ("app_status", "applicationMetaData.applicationStatusDescriptionText"),
    ("app_status_code", "applicationMetaData.applicationStatusCode"),
    ("customer_number", "applicationMetaData.customerNumber"),
    ("group_art_unit", "applicationMetaData.groupArtUnitNumber"),
    ("examiner_name", "applicationMetaData.examinerNameText"),
    ("atty_docket_num", "applicationMetaData.docketNumber"),
    ("first_inventor_name", "applicationMetaData.firstInventorName"),
    ("first_applicant_name", "applicationMetaData.firstApplicantName"),
    ("cpc_classifications", "applicationMetaData.cpcClassificationBag"),
    ("app_early_pub_number", "applicationMetaData.earliestPublicationNumber"),
    ("patent_number", "applicationMetaData.patentNumber"),
    ("patent_issue_date", "applicationMetaData.grantDate"),
];

/// Filter passed through as a raw query string
const RAW: &str = "q";

fn wire_field(provider: &str, name: &str) -> Result<&'static str> {
    SEARCH_FIELDS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, wire)| *wire)
        .ok_or_else(|| Error::invalid_query(format!("{} has no field `{}`", provider, name)))
}

fn lucene_term(value: &FilterValue) -> String {
    match value {
        FilterValue::Date(d) => d.format("%Y-%m-%d").to_string(),
        other => quote_term(&other.to_string()),
    }
}

/// Lucene-style query: `field:value`, `field:(a OR b)`, AND across fields
fn lucene_query(provider: &str, spec: &QuerySpec) -> Result<Option<String>> {
    let mut clauses = Vec::with_capacity(spec.filters().len());
    for (name, values) in spec.filters() {
        if name == RAW {
            clauses.extend(values.iter().map(|v| v.to_string()));
            continue;
        }
        let field = wire_field(provider, name)?;
        let terms: Vec<String> = values.iter().map(lucene_term).collect();
        match terms.as_slice() {
            [single] => clauses.push(format!("{}:{}", field, single)),
            _ => clauses.push(format!("{}:({})", field, terms.join(" OR "))),
        }
    }
    Ok(if clauses.is_empty() {
        None
    } else {
        Some(clauses.join(" AND "))
    })
}

fn odp_request(url: String, api_key: Option<&str>) -> Request {
    let request = Request::get(url).header("Accept", "application/json");
    match api_key {
        Some(key) => request.header("X-API-KEY", key),
        None => request,
    }
}

/// ODP reports "no matching records" as 404
fn accept_odp(provider: &str, response: Response) -> std::result::Result<Option<Response>, TransportError> {
    if response.status == 404 {
        tracing::debug!(target: "patent_client::fetch", provider, "no results (404)");
        return Ok(None);
    }
    response.error_for_status().map(Some)
}

/// Provider for `patent/applications/search`
#[derive(Debug, Clone)]
pub struct ApplicationProvider {
    base_url: String,
    page_size: usize,
    api_key: Option<String>,
}

impl ApplicationProvider {
    /// Provider for the configured ODP endpoint
    pub fn new(config: &OdpConfig) -> Self {
        ApplicationProvider {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            page_size: config.page_size.max(1),
            api_key: config.api_key.clone(),
        }
    }
}

impl Provider for ApplicationProvider {
    fn name(&self) -> &'static str {
        "odp-applications"
    }

    fn pagination(&self) -> Pagination {
        Pagination::Offset {
            page_size: self.page_size,
        }
    }

    fn request(&self, spec: &QuerySpec, token: &PageToken) -> Result<Request> {
        let mut request = odp_request(
            format!("{}/patent/applications/search", self.base_url),
            self.api_key.as_deref(),
        );
        if let Some(q) = lucene_query(self.name(), spec)? {
            request = request.param("q", q);
        }
        if !spec.sort_keys().is_empty() {
            let mut keys = Vec::with_capacity(spec.sort_keys().len());
            for key in spec.sort_keys() {
                let order = match key.direction {
                    Direction::Ascending => "asc",
                    Direction::Descending => "desc",
                };
                keys.push(format!("{} {}", wire_field(self.name(), &key.field)?, order));
            }
            request = request.param("sort", keys.join(","));
        }
        match token {
            PageToken::Offset { offset, limit } => {
                Ok(request.param("offset", offset).param("limit", limit))
            }
            other => Err(Error::invalid_query(format!(
                "{} pages by offset, not {:?}",
                self.name(),
                other
            ))),
        }
    }

    fn accept(&self, response: Response) -> std::result::Result<Option<Response>, TransportError> {
        accept_odp(self.name(), response)
    }

    fn parse(
        &self,
        _spec: &QuerySpec,
        response: &Response,
    ) -> std::result::Result<PageBody, TransportError> {
        let body: Value = response.json()?;
        let page = PageBody::new(items_at(&body, &key_path(&["patentFileWrapperDataBag"])));
        Ok(match count_at(&body, &key_path(&["count"]))? {
            Some(total) => page.with_total(total),
            None => page,
        })
    }
}

/// Provider for `patent/applications/{appl_id}/documents`
///
/// Takes exactly one `appl_id` filter; the document list is not paged.
#[derive(Debug, Clone)]
pub struct DocumentProvider {
    base_url: String,
    api_key: Option<String>,
}

impl DocumentProvider {
    /// Provider for the configured ODP endpoint
    pub fn new(config: &OdpConfig) -> Self {
        DocumentProvider {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }
}

impl Provider for DocumentProvider {
    fn name(&self) -> &'static str {
        "odp-documents"
    }

    fn pagination(&self) -> Pagination {
        Pagination::Unpaged
    }

    fn request(&self, spec: &QuerySpec, _token: &PageToken) -> Result<Request> {
        check_filters(spec, self.name(), &["appl_id"])?;
        no_sort(spec, self.name())?;
        let appl_id = single_value(spec, self.name(), "appl_id")?;
        Ok(odp_request(
            format!(
                "{}/patent/applications/{}/documents",
                self.base_url,
                path_segment(&appl_id.to_string())
            ),
            self.api_key.as_deref(),
        ))
    }

    fn accept(&self, response: Response) -> std::result::Result<Option<Response>, TransportError> {
        accept_odp(self.name(), response)
    }

    fn parse(
        &self,
        _spec: &QuerySpec,
        response: &Response,
    ) -> std::result::Result<PageBody, TransportError> {
        let body: Value = response.json()?;
        Ok(PageBody::new(items_at(&body, &key_path(&["documentBag"]))))
    }
}
