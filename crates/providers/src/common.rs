//! Helpers shared by the provider adapters

use patent_client_core::{
    get_at_path, Error, FieldPath, FilterValue, QuerySpec, Result, TransportError,
};
use serde_json::Value;

/// Build a key-only path without going through the string parser
pub(crate) fn key_path(keys: &[&str]) -> FieldPath {
    keys.iter()
        .fold(FieldPath::root(), |path, key| path.key(*key))
}

/// The raw items at `path`
///
/// XML-derived payloads render a one-element list as a bare object, so a
/// single value is wrapped. A missing or null node yields no items.
pub(crate) fn items_at(body: &Value, path: &FieldPath) -> Vec<Value> {
    match get_at_path(body, path) {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.clone(),
        Some(single) => vec![single.clone()],
    }
}

/// A count reported as a number or a numeric string
///
/// A missing or null node means the provider did not report a count; any
/// other non-count value is a malformed response.
pub(crate) fn count_at(
    body: &Value,
    path: &FieldPath,
) -> std::result::Result<Option<usize>, TransportError> {
    let Some(found) = get_at_path(body, path).filter(|v| !v.is_null()) else {
        return Ok(None);
    };
    let count = match found {
        Value::Number(n) => n.as_u64().and_then(|n| usize::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    count.map(Some).ok_or_else(|| {
        TransportError::Malformed(format!(
            "count at `{}` is not a non-negative integer: {}",
            path, found
        ))
    })
}

/// Reject any filter outside `allowed`
pub(crate) fn check_filters(spec: &QuerySpec, provider: &str, allowed: &[&str]) -> Result<()> {
    for field in spec.filters().keys() {
        if !allowed.contains(&field.as_str()) {
            return Err(Error::invalid_query(format!(
                "{} cannot filter by `{}` (accepted: {})",
                provider,
                field,
                allowed.join(", ")
            )));
        }
    }
    Ok(())
}

/// Reject any sort key
pub(crate) fn no_sort(spec: &QuerySpec, provider: &str) -> Result<()> {
    match spec.sort_keys().first() {
        Some(key) => Err(Error::invalid_query(format!(
            "{} does not support sorting (got `{}`)",
            provider, key
        ))),
        None => Ok(()),
    }
}

/// The one value given for `field`
pub(crate) fn single_value<'a>(
    spec: &'a QuerySpec,
    provider: &str,
    field: &str,
) -> Result<&'a FilterValue> {
    match spec.filter_values(field) {
        Some([value]) => Ok(value),
        Some(values) => Err(Error::invalid_query(format!(
            "{} takes exactly one `{}`, got {}",
            provider,
            field,
            values.len()
        ))),
        None => Err(Error::invalid_query(format!(
            "{} requires a `{}` filter",
            provider, field
        ))),
    }
}

/// Quote a search term if it contains whitespace
pub(crate) fn quote_term(term: &str) -> String {
    if term.chars().any(char::is_whitespace) {
        format!("\"{}\"", term.replace('"', "\\\""))
    } else {
        term.to_string()
    }
}

/// Percent-encode a value used as one URL path segment
pub(crate) fn path_segment(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(char::from(byte))
            }
            other => out.push_str(&format!("%{:02X}", other)),
        }
    }
    out
}
