//! CQL rendering of filter criteria for OPS published-data search

use crate::common::quote_term;
use patent_client_core::{Error, FilterValue, QuerySpec, Result};

/// Filter name → CQL index
const INDEXES: &[(&str, &str)] = &[
    ("applicant", "pa"),
    ("inventor", "in"),
    ("title", "ti"),
    ("abstract", "ab"),
    ("publication_number", "pn"),
    ("application_number", "ap"),
    ("priority_number", "pr"),
    ("publication_date", "pd"),
    ("cpc", "cpc"),
    ("ipc", "ic"),
];

/// Filter passed through as raw CQL
const RAW: &str = "cql";

fn term(value: &FilterValue) -> String {
    match value {
        FilterValue::Date(d) => d.format("%Y%m%d").to_string(),
        other => quote_term(&other.to_string()),
    }
}

/// Render the filters of `spec` as one CQL query
///
/// Values of one field are OR-ed inside parentheses; fields are AND-ed.
///
/// # Errors
///
/// [`Error::InvalidQuery`] when there are no filters or a filter has no
/// CQL index.
///
/// # Example
///
/// ```
/// use patent_client_core::QuerySpec;
/// use patent_client_providers::epo::to_cql;
///
/// let spec = QuerySpec::new("Inpadoc")
///     .filter("applicant", ["Tesla", "SpaceX"])
///     .filter("title", "battery pack");
/// assert_eq!(
///     to_cql(&spec).unwrap(),
///     "(pa=Tesla or pa=SpaceX) and ti=\"battery pack\""
/// );
/// ```
pub fn to_cql(spec: &QuerySpec) -> Result<String> {
    if spec.filters().is_empty() {
        return Err(Error::invalid_query(
            "EPO search needs at least one filter",
        ));
    }
    let mut clauses = Vec::with_capacity(spec.filters().len());
    for (field, values) in spec.filters() {
        if field == RAW {
            clauses.extend(values.iter().map(|v| v.to_string()));
            continue;
        }
        let Some((_, index)) = INDEXES.iter().find(|(name, _)| *name == field.as_str()) else {
            return Err(Error::invalid_query(format!(
                "EPO search cannot filter by `{}`",
                field
            )));
        };
        let terms: Vec<String> = values
            .iter()
            .map(|v| format!("{}={}", index, term(v)))
            .collect();
        match terms.as_slice() {
            [single] => clauses.push(single.clone()),
            _ => clauses.push(format!("({})", terms.join(" or "))),
        }
    }
    Ok(clauses.join(" and "))
}
