//! Declarative alias tables
//!
//! An [`AliasTable`] declares, per normalized output field, the exact
//! source path, the coercion applied to the raw value and an optional
//! default. Tables are static values owned by model definitions; the
//! mapping from wire casing to normalized names is spelled out field by
//! field rather than inferred, because acronym-heavy wire names such as
//! `ipOfficeDayDelayQuantity` do not convert unambiguously.
//!
//! # Example
//!
//! ```
//! use once_cell::sync::Lazy;
//! use patent_client_core::{AliasTable, FieldKind};
//!
//! static ADDRESS: Lazy<AliasTable> = Lazy::new(|| {
//!     AliasTable::builder("Address")
//!         .field("city_name", "cityName", FieldKind::Str)
//!         .field("postal_code", "postalCode", FieldKind::Str)
//!         .build()
//! });
//!
//! assert_eq!(ADDRESS.fields().len(), 2);
//! ```

use crate::path::FieldPath;
use crate::value::FieldValue;
use std::fmt;

/// Coercion applied to the raw value found at a field's source path
#[derive(Clone)]
pub enum FieldKind {
    /// String; numbers are rendered as text
    Str,
    /// Integer or numeric string
    Int,
    /// Number or numeric string
    Float,
    /// Boolean or `"true"`/`"false"`
    Bool,
    /// String flag: equal to the token is true, any other string is false
    Flag(&'static str),
    /// `YYYY-MM-DD`, `YYYYMMDD` or the date part of an RFC 3339 timestamp
    Date,
    /// RFC 3339 or ISO timestamp; naive timestamps are taken as UTC
    DateTime,
    /// Raw value passed through unchanged
    Json,
    /// Nested object mapped through another table
    Nested(fn() -> &'static AliasTable),
    /// Sequence whose elements are each coerced with the inner kind
    Repeated(Box<FieldKind>),
}

impl FieldKind {
    /// Shorthand for `Repeated(Box::new(kind))`
    pub fn repeated(kind: FieldKind) -> Self {
        FieldKind::Repeated(Box::new(kind))
    }

    /// Shorthand for a repeated nested record
    pub fn records(table: fn() -> &'static AliasTable) -> Self {
        FieldKind::Repeated(Box::new(FieldKind::Nested(table)))
    }

    /// The Y/N single-letter encoding
    pub fn yes_no() -> Self {
        FieldKind::Flag("Y")
    }

    /// Whether a decoded value can be written back to its exact source shape
    pub fn is_lossless(&self) -> bool {
        match self {
            FieldKind::Str | FieldKind::Int | FieldKind::Bool | FieldKind::Json => true,
            FieldKind::Nested(table) => table().fields().iter().all(|f| f.kind.is_lossless()),
            FieldKind::Repeated(inner) => inner.is_lossless(),
            FieldKind::Float | FieldKind::Flag(_) | FieldKind::Date | FieldKind::DateTime => false,
        }
    }
}

impl fmt::Debug for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Str => write!(f, "Str"),
            FieldKind::Int => write!(f, "Int"),
            FieldKind::Float => write!(f, "Float"),
            FieldKind::Bool => write!(f, "Bool"),
            FieldKind::Flag(token) => write!(f, "Flag({:?})", token),
            FieldKind::Date => write!(f, "Date"),
            FieldKind::DateTime => write!(f, "DateTime"),
            FieldKind::Json => write!(f, "Json"),
            FieldKind::Nested(table) => write!(f, "Nested({})", table().name()),
            FieldKind::Repeated(inner) => write!(f, "Repeated({:?})", inner),
        }
    }
}

/// Declaration of one output field
#[derive(Debug, Clone)]
pub struct FieldSpec {
    /// Normalized (snake_case) output name
    pub name: &'static str,
    /// Exact source path
    pub path: FieldPath,
    /// Coercion applied to the raw value
    pub kind: FieldKind,
    /// Value used when the source path is missing
    pub default: Option<FieldValue>,
    /// Missing source without a default is a decoding fault
    pub required: bool,
}

/// Declared mapping from normalized field names to source paths
#[derive(Debug, Clone)]
pub struct AliasTable {
    name: &'static str,
    fields: Vec<FieldSpec>,
}

impl AliasTable {
    /// Start declaring a table for the named record type
    pub fn builder(name: &'static str) -> AliasTableBuilder {
        AliasTableBuilder {
            name,
            fields: Vec::new(),
        }
    }

    /// Record type name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Declared fields, in declaration order
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Look up a declared field by normalized name
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// True if `name` is a declared output field
    pub fn contains(&self, name: &str) -> bool {
        self.field(name).is_some()
    }
}

/// Builder for [`AliasTable`]
#[derive(Debug)]
pub struct AliasTableBuilder {
    name: &'static str,
    fields: Vec<FieldSpec>,
}

impl AliasTableBuilder {
    /// Declare an optional field
    ///
    /// `path` uses the syntax of [`FieldPath`]'s `FromStr`.
    ///
    /// # Panics
    ///
    /// Panics if `path` does not parse; paths are literals in model
    /// definitions.
    pub fn field(mut self, name: &'static str, path: &str, kind: FieldKind) -> Self {
        let parsed = match path.parse::<FieldPath>() {
            Ok(parsed) => parsed,
            Err(e) => panic!(
                "alias table `{}`: invalid path `{}` for `{}`: {}",
                self.name, path, name, e
            ),
        };
        self.fields.push(FieldSpec {
            name,
            path: parsed,
            kind,
            default: None,
            required: false,
        });
        self
    }

    /// Declare a field that must be present in every payload
    pub fn required(self, name: &'static str, path: &str, kind: FieldKind) -> Self {
        let mut builder = self.field(name, path, kind);
        if let Some(last) = builder.fields.last_mut() {
            last.required = true;
        }
        builder
    }

    /// Declare an optional field with a default for missing sources
    pub fn with_default(
        self,
        name: &'static str,
        path: &str,
        kind: FieldKind,
        default: FieldValue,
    ) -> Self {
        let mut builder = self.field(name, path, kind);
        if let Some(last) = builder.fields.last_mut() {
            last.default = Some(default);
        }
        builder
    }

    /// Finish the table
    ///
    /// # Panics
    ///
    /// Panics if an output name is declared twice or is not snake_case.
    /// Ambiguity in an alias table is a defect in the model definition and
    /// is reported when the table is first initialized.
    pub fn build(self) -> AliasTable {
        for (i, field) in self.fields.iter().enumerate() {
            if !is_snake_case(field.name) {
                panic!(
                    "alias table `{}`: field name `{}` is not snake_case",
                    self.name, field.name
                );
            }
            if self.fields[..i].iter().any(|f| f.name == field.name) {
                panic!(
                    "alias table `{}`: field `{}` declared twice",
                    self.name, field.name
                );
            }
        }
        AliasTable {
            name: self.name,
            fields: self.fields,
        }
    }
}

fn is_snake_case(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .next()
            .map(|c| c.is_ascii_lowercase())
            .unwrap_or(false)
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}
