//! The Field Mapper
//!
//! [`map`] walks an alias table over a raw payload and produces a
//! [`Record`]. Path resolution is a pure function over nested
//! objects/arrays: a missing level yields absence (or the declared
//! default), never an error. Coercions are total over their accepted raw
//! domain and fault on anything outside it.
//!
//! [`unmap`] is the inverse used for round-trip checks: it writes every
//! present field back to its source path.

use crate::alias::{AliasTable, FieldKind, FieldSpec};
use crate::error::DecodeError;
use crate::path::{get_at_path, set_at_path, value_type_name, PathError};
use crate::record::Record;
use crate::value::FieldValue;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use serde_json::{Map, Value};

/// Map a raw payload onto a flat record using `table`
pub fn map(raw: &Value, table: &AliasTable) -> Result<Record, DecodeError> {
    let mut record = Record::with_capacity(table.fields().len());
    for field in table.fields() {
        let source = get_at_path(raw, &field.path).filter(|v| !v.is_null());
        let value = match source {
            Some(v) => coerce(field, &field.kind, v)?,
            None => missing(field),
        };
        let value = match value {
            FieldValue::Absent => match (&field.default, field.required) {
                (Some(default), _) => default.clone(),
                (None, true) => {
                    return Err(DecodeError {
                        field: field.name.to_string(),
                        path: field.path.to_path_string(),
                        expected: "a value (field is required)",
                        found: "missing".to_string(),
                    })
                }
                (None, false) => FieldValue::Absent,
            },
            other => other,
        };
        record.push(field.name, value);
    }
    Ok(record)
}

/// Write every present field of `record` back to its source path
///
/// Absent fields are skipped. Fields with lossy coercions (flags, dates
/// in non-ISO shapes, numeric strings) are written in normalized form.
///
/// # Errors
///
/// [`PathError`] when two fields of the table overlap with incompatible
/// shapes, e.g. one writes a string where another needs an object.
pub fn unmap(record: &Record, table: &AliasTable) -> Result<Value, PathError> {
    let mut out = Value::Object(Map::new());
    for field in table.fields() {
        let Some(value) = record.get(field.name) else {
            continue;
        };
        if value.is_absent() {
            continue;
        }
        let raw = unmap_value(value, &field.kind)?;
        set_at_path(&mut out, &field.path, raw)?;
    }
    Ok(out)
}

fn unmap_value(value: &FieldValue, kind: &FieldKind) -> Result<Value, PathError> {
    match (value, kind) {
        (FieldValue::Record(r), FieldKind::Nested(table)) => unmap(r, table()),
        (FieldValue::List(items), FieldKind::Repeated(inner)) => items
            .iter()
            .map(|i| unmap_value(i, inner))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        (other, _) => Ok(other.to_json()),
    }
}

/// Whole-number float as an `i64`, if it fits
fn exact_i64(f: f64) -> Option<i64> {
    // i64::MAX as f64 rounds up to 2^63, which is already out of range
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

fn missing(field: &FieldSpec) -> FieldValue {
    match field.kind {
        FieldKind::Repeated(_) => FieldValue::List(Vec::new()),
        _ => FieldValue::Absent,
    }
}

fn fault(field: &FieldSpec, expected: &'static str, found: &Value) -> DecodeError {
    let rendered = found.to_string();
    let found = if rendered.chars().count() > 60 {
        let short: String = rendered.chars().take(60).collect();
        format!("{} {}...", value_type_name(found), short)
    } else {
        format!("{} {}", value_type_name(found), rendered)
    };
    DecodeError {
        field: field.name.to_string(),
        path: field.path.to_path_string(),
        expected,
        found,
    }
}

fn coerce(field: &FieldSpec, kind: &FieldKind, raw: &Value) -> Result<FieldValue, DecodeError> {
    match kind {
        FieldKind::Str => match raw {
            Value::String(s) => Ok(FieldValue::Str(s.clone())),
            Value::Number(n) => Ok(FieldValue::Str(n.to_string())),
            other => Err(fault(field, "string", other)),
        },
        FieldKind::Int => match raw {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().and_then(exact_i64))
                .map(FieldValue::Int)
                .ok_or_else(|| fault(field, "integer", raw)),
            Value::String(s) => s
                .trim()
                .parse::<i64>()
                .map(FieldValue::Int)
                .map_err(|_| fault(field, "integer", raw)),
            other => Err(fault(field, "integer", other)),
        },
        FieldKind::Float => match raw {
            Value::Number(n) => n
                .as_f64()
                .map(FieldValue::Float)
                .ok_or_else(|| fault(field, "number", raw)),
            Value::String(s) => s
                .trim()
                .parse::<f64>()
                .map(FieldValue::Float)
                .map_err(|_| fault(field, "number", raw)),
            other => Err(fault(field, "number", other)),
        },
        FieldKind::Bool => match raw {
            Value::Bool(b) => Ok(FieldValue::Bool(*b)),
            Value::String(s) if s == "true" => Ok(FieldValue::Bool(true)),
            Value::String(s) if s == "false" => Ok(FieldValue::Bool(false)),
            other => Err(fault(field, "boolean", other)),
        },
        FieldKind::Flag(token) => match raw {
            Value::String(s) => Ok(FieldValue::Bool(s == token)),
            Value::Bool(b) => Ok(FieldValue::Bool(*b)),
            other => Err(fault(field, "flag string", other)),
        },
        FieldKind::Date => match raw {
            Value::String(s) => parse_date(s)
                .map(FieldValue::Date)
                .ok_or_else(|| fault(field, "date", raw)),
            other => Err(fault(field, "date", other)),
        },
        FieldKind::DateTime => match raw {
            Value::String(s) => parse_datetime(s)
                .map(FieldValue::DateTime)
                .ok_or_else(|| fault(field, "timestamp", raw)),
            other => Err(fault(field, "timestamp", other)),
        },
        FieldKind::Json => Ok(FieldValue::Json(raw.clone())),
        FieldKind::Nested(table) => match raw {
            Value::Object(obj) if obj.is_empty() => Ok(FieldValue::Absent),
            Value::Object(_) => map(raw, table())
                .map(FieldValue::Record)
                .map_err(|e| e.within(field.name)),
            other => Err(fault(field, "object", other)),
        },
        FieldKind::Repeated(inner) => {
            let items: Vec<&Value> = match raw {
                Value::Array(arr) => arr.iter().collect(),
                single => vec![single],
            };
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                // Each element becomes one child record, even an empty one.
                let value = match (inner.as_ref(), item) {
                    (_, Value::Null) => FieldValue::Absent,
                    (FieldKind::Nested(table), Value::Object(_)) => map(item, table())
                        .map(FieldValue::Record)
                        .map_err(|e| e.within(field.name))?,
                    _ => coerce(field, inner, item)?,
                };
                out.push(value);
            }
            Ok(FieldValue::List(out))
        }
    }
}

/// Parse the date shapes providers emit
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    if s.len() == 8 && s.chars().all(|c| c.is_ascii_digit()) {
        if let Ok(d) = NaiveDate::parse_from_str(s, "%Y%m%d") {
            return Some(d);
        }
    }
    parse_datetime(s).map(|dt| dt.date_naive())
}

/// Parse the timestamp shapes providers emit
pub fn parse_datetime(s: &str) -> Option<DateTime<FixedOffset>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt);
    }
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(dt);
    }
    for fmt in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc().fixed_offset());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc).fixed_offset())
}
