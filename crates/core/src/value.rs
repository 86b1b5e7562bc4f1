//! Normalized field values
//!
//! [`FieldValue`] is what the Field Mapper produces for one declared field.
//! Optional fields that are missing in the source decode to
//! [`FieldValue::Absent`] rather than being left out, so every record of a
//! given type carries the same set of field names.

use crate::record::Record;
use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::ser::{Serialize, SerializeSeq, Serializer};
use serde_json::Value;

/// A single normalized value inside a [`Record`]
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Source path missing (at any level) and no default declared
    Absent,
    /// Text
    Str(String),
    /// Integer
    Int(i64),
    /// Floating point number
    Float(f64),
    /// Boolean (including single-letter flags)
    Bool(bool),
    /// Calendar date
    Date(NaiveDate),
    /// Timestamp with its original offset
    DateTime(DateTime<FixedOffset>),
    /// Raw payload passed through unchanged
    Json(Value),
    /// Nested mapped record
    Record(Record),
    /// Repeated field, provider order, duplicates retained
    List(Vec<FieldValue>),
}

impl FieldValue {
    /// True for [`FieldValue::Absent`]
    pub fn is_absent(&self) -> bool {
        matches!(self, FieldValue::Absent)
    }

    /// Borrow the text if this is a string value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Integer value, if any
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Boolean value, if any
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Date value, if any
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            FieldValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Nested record, if any
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            FieldValue::Record(r) => Some(r),
            _ => None,
        }
    }

    /// Elements of a repeated field, if any
    pub fn as_list(&self) -> Option<&[FieldValue]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Render back into the wire shape used by [`crate::mapper::unmap`]
    ///
    /// Dates are written as `YYYY-MM-DD` and timestamps as RFC 3339, so
    /// only fields whose source used those shapes round-trip exactly.
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Absent => Value::Null,
            FieldValue::Str(s) => Value::String(s.clone()),
            FieldValue::Int(n) => Value::from(*n),
            FieldValue::Float(f) => Value::from(*f),
            FieldValue::Bool(b) => Value::Bool(*b),
            FieldValue::Date(d) => Value::String(d.format("%Y-%m-%d").to_string()),
            FieldValue::DateTime(dt) => Value::String(dt.to_rfc3339()),
            FieldValue::Json(v) => v.clone(),
            FieldValue::Record(r) => r.to_json(),
            FieldValue::List(items) => Value::Array(items.iter().map(FieldValue::to_json).collect()),
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Absent => serializer.serialize_none(),
            FieldValue::Str(s) => serializer.serialize_str(s),
            FieldValue::Int(n) => serializer.serialize_i64(*n),
            FieldValue::Float(f) => serializer.serialize_f64(*f),
            FieldValue::Bool(b) => serializer.serialize_bool(*b),
            FieldValue::Date(d) => d.serialize(serializer),
            FieldValue::DateTime(dt) => dt.serialize(serializer),
            FieldValue::Json(v) => v.serialize(serializer),
            FieldValue::Record(r) => r.serialize(serializer),
            FieldValue::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Str(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Str(s)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Int(n)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(d: NaiveDate) -> Self {
        FieldValue::Date(d)
    }
}
