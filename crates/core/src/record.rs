//! Mapped records and the typed model trait

use crate::alias::AliasTable;
use crate::error::DecodeError;
use crate::value::FieldValue;
use serde::de::DeserializeOwned;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;
use std::fmt::Debug;

/// Flat, normalized output of the Field Mapper for one payload
///
/// Holds exactly the fields declared by the alias table it was mapped
/// with, in declaration order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    fields: Vec<(&'static str, FieldValue)>,
}

impl Record {
    pub(crate) fn with_capacity(n: usize) -> Self {
        Record {
            fields: Vec::with_capacity(n),
        }
    }

    pub(crate) fn push(&mut self, name: &'static str, value: FieldValue) {
        self.fields.push((name, value));
    }

    /// Value of a declared field
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v)
    }

    /// Iterate `(name, value)` pairs in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &FieldValue)> {
        self.fields.iter().map(|(n, v)| (*n, v))
    }

    /// Number of declared fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True if the record declares no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Normalized JSON object (snake_case keys, `null` for absent)
    pub fn to_json(&self) -> Value {
        let map = self
            .fields
            .iter()
            .map(|(n, v)| (n.to_string(), v.to_json()))
            .collect();
        Value::Object(map)
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// A typed record produced from a mapped [`Record`]
///
/// Implementors declare their alias table and derive `Deserialize` with
/// field names equal to the table's normalized names; the default
/// [`Model::from_record`] goes through the record's serde form.
pub trait Model: DeserializeOwned + Clone + Debug + Send + Sync + 'static {
    /// Record type name used in error messages and query specifications
    const NAME: &'static str;

    /// The declared alias table for this record type
    fn alias_table() -> &'static AliasTable;

    /// Build the typed value from a mapped record
    fn from_record(record: &Record) -> Result<Self, DecodeError> {
        let value = serde_json::to_value(record).map_err(|e| DecodeError {
            field: Self::NAME.to_string(),
            path: String::new(),
            expected: "serializable record",
            found: e.to_string(),
        })?;
        serde_json::from_value(value).map_err(|e| DecodeError {
            field: Self::NAME.to_string(),
            path: String::new(),
            expected: "record matching the model",
            found: e.to_string(),
        })
    }
}
