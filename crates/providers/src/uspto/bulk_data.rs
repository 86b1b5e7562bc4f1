//! USPTO bulk data product catalog
//!
//! The catalog is addressed by selector rather than searched:
//!
//! | filter | endpoint |
//! |---|---|
//! | `latest` | `all/latest` |
//! | `popular` | `popular` |
//! | `name` | `byname/{name}`, with `from_date`, `to_date`, `max_files` |
//! | `short_name` | `{short_name}`, with `from_date`, `to_date` |
//!
//! Every selector returns its whole answer at once.

use crate::common::{check_filters, no_sort, path_segment, single_value};
use chrono::{DateTime, Datelike, FixedOffset, NaiveDate};
use once_cell::sync::Lazy;
use patent_client_core::mapper::parse_date;
use patent_client_core::{
    AliasTable, Error, FieldKind, FilterValue, Model, PageBody, QuerySpec, Request, Response,
    Result, TransportError,
};
use patent_client_engine::config::BulkDataConfig;
use patent_client_engine::{PageToken, Pagination, Provider};
use serde::Deserialize;
use serde_json::Value;

const SELECTORS: &[&str] = &["latest", "popular", "name", "short_name"];
const OPTIONS: &[&str] = &["from_date", "to_date", "max_files"];

const DEFAULT_MAX_FILES: i64 = 20;

/// One downloadable file of a product
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProductFile {
    /// File name
    pub name: Option<String>,
    /// Size in bytes
    pub size: Option<i64>,
    /// Download url
    pub download_url: Option<String>,
    /// Start of the period the file covers
    pub from_time: Option<DateTime<FixedOffset>>,
    /// End of the period the file covers
    pub to_time: Option<DateTime<FixedOffset>>,
    /// Release date
    pub release_date: Option<DateTime<FixedOffset>>,
    /// `data`, `documentation` and so on
    pub file_type: Option<String>,
}

static PRODUCT_FILE: Lazy<AliasTable> = Lazy::new(|| {
    AliasTable::builder("ProductFile")
        .field("name", "fileName", FieldKind::Str)
        .field("size", "fileSize", FieldKind::Int)
        .field("download_url", "fileDownloadUrl", FieldKind::Str)
        .field("from_time", "fileFromTime", FieldKind::DateTime)
        .field("to_time", "fileToTime", FieldKind::DateTime)
        .field("release_date", "fileReleaseDate", FieldKind::DateTime)
        .field("file_type", "fileType", FieldKind::Str)
        .build()
});

fn product_file() -> &'static AliasTable {
    &PRODUCT_FILE
}

/// A bulk data product and its files
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Product {
    /// Numeric product identifier
    pub id: Option<i64>,
    /// Short code, e.g. `PTGRXML`
    pub short_name: Option<String>,
    /// Title
    pub title: Option<String>,
    /// Description
    pub description: Option<String>,
    /// Release cadence, e.g. `WEEKLY`
    pub frequency: Option<String>,
    /// Level
    pub level: Option<String>,
    /// First date covered
    pub from_date: Option<NaiveDate>,
    /// Last date covered
    pub to_date: Option<NaiveDate>,
    /// Files within the requested date window
    pub files: Vec<ProductFile>,
}

static PRODUCT: Lazy<AliasTable> = Lazy::new(|| {
    AliasTable::builder("Product")
        .field("id", "productId", FieldKind::Int)
        .field("short_name", "productIdentifier", FieldKind::Str)
        .field("title", "productTitle", FieldKind::Str)
        .field("description", "productDesc", FieldKind::Str)
        .field("frequency", "productFrequency", FieldKind::Str)
        .field("level", "productLevel", FieldKind::Str)
        .field("from_date", "productFromDate", FieldKind::Date)
        .field("to_date", "productToDate", FieldKind::Date)
        .field("files", "productFiles", FieldKind::records(product_file))
        .build()
});

impl Model for Product {
    const NAME: &'static str = "Product";

    fn alias_table() -> &'static AliasTable {
        &PRODUCT
    }
}

fn date_option(spec: &QuerySpec, provider: &str, field: &str) -> Result<Option<NaiveDate>> {
    if spec.filter_values(field).is_none() {
        return Ok(None);
    }
    match single_value(spec, provider, field)? {
        FilterValue::Date(d) => Ok(Some(*d)),
        FilterValue::Str(s) => parse_date(s).map(Some).ok_or_else(|| {
            Error::invalid_query(format!("{}: `{}` is not a date: {}", provider, field, s))
        }),
        other => Err(Error::invalid_query(format!(
            "{}: `{}` is not a date: {}",
            provider, field, other
        ))),
    }
}

fn with_date_range(mut request: Request, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Request {
    if let Some(d) = from {
        request = request
            .param("fromYear", d.year())
            .param("fromMonth", d.month())
            .param("fromDay", d.day());
    }
    if let Some(d) = to {
        request = request
            .param("toYear", d.year())
            .param("toMonth", d.month())
            .param("toDay", d.day());
    }
    request
}

/// Provider for the bulk data catalog
#[derive(Debug, Clone)]
pub struct ProductProvider {
    base_url: String,
}

impl ProductProvider {
    /// Provider for the configured catalog root
    pub fn new(config: &BulkDataConfig) -> Self {
        ProductProvider {
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    fn selector<'a>(&self, spec: &'a QuerySpec) -> Result<&'a str> {
        let chosen: Vec<&str> = spec
            .filters()
            .keys()
            .map(String::as_str)
            .filter(|name| SELECTORS.contains(name))
            .collect();
        match chosen.as_slice() {
            [one] => Ok(*one),
            _ => Err(Error::invalid_query(format!(
                "{} needs exactly one of {}",
                self.name(),
                SELECTORS.join(", ")
            ))),
        }
    }
}

impl Provider for ProductProvider {
    fn name(&self) -> &'static str {
        "uspto-bulk-data"
    }

    fn pagination(&self) -> Pagination {
        Pagination::Unpaged
    }

    fn request(&self, spec: &QuerySpec, _token: &PageToken) -> Result<Request> {
        let accepted: Vec<&str> = SELECTORS.iter().chain(OPTIONS).copied().collect();
        check_filters(spec, self.name(), &accepted)?;
        no_sort(spec, self.name())?;

        let selector = self.selector(spec)?;
        let has_options = OPTIONS.iter().any(|o| spec.filter_values(o).is_some());
        let from = date_option(spec, self.name(), "from_date")?;
        let to = date_option(spec, self.name(), "to_date")?;
        match selector {
            "latest" | "popular" if has_options => Err(Error::invalid_query(format!(
                "{}: `{}` takes no further filters",
                self.name(),
                selector
            ))),
            "latest" => Ok(Request::get(format!("{}/all/latest", self.base_url))),
            "popular" => Ok(Request::get(format!("{}/popular", self.base_url))),
            "name" => {
                let name = single_value(spec, self.name(), "name")?;
                let max_files = match spec.filter_values("max_files") {
                    None => DEFAULT_MAX_FILES,
                    Some(_) => match single_value(spec, self.name(), "max_files")? {
                        FilterValue::Int(n) if *n > 0 => *n,
                        other => {
                            return Err(Error::invalid_query(format!(
                                "{}: `max_files` must be a positive integer, got {}",
                                self.name(),
                                other
                            )))
                        }
                    },
                };
                let url = format!(
                    "{}/byname/{}",
                    self.base_url,
                    path_segment(&name.to_string())
                );
                let request = Request::get(url).param("hierarchy", false);
                Ok(with_date_range(request, from, to).param("maxFiles", max_files))
            }
            _ => {
                if spec.filter_values("max_files").is_some() {
                    return Err(Error::invalid_query(format!(
                        "{}: `max_files` applies to `name` only",
                        self.name()
                    )));
                }
                let short_name = single_value(spec, self.name(), "short_name")?;
                let request = Request::get(format!(
                    "{}/{}",
                    self.base_url,
                    path_segment(&short_name.to_string())
                ));
                Ok(with_date_range(request, from, to))
            }
        }
    }

    fn parse(
        &self,
        _spec: &QuerySpec,
        response: &Response,
    ) -> std::result::Result<PageBody, TransportError> {
        // `short_name` answers with one product object, the others with a list
        let items = match response.json::<Value>()? {
            Value::Array(items) => items,
            Value::Null => Vec::new(),
            Value::Object(product) => vec![Value::Object(product)],
            other => {
                return Err(TransportError::Malformed(format!(
                    "expected product list, got {}",
                    other
                )))
            }
        };
        Ok(PageBody::new(items))
    }
}
