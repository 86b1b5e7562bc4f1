//! Core types for patent-client
//!
//! This crate defines the provider-independent building blocks the query
//! engine is assembled from:
//! - FieldPath: exact key/index path into a nested payload
//! - AliasTable: declared mapping from normalized field names to source paths
//! - map/unmap: the Field Mapper turning raw payloads into Records
//! - Record / FieldValue / Model: normalized and typed mapped records
//! - QuerySpec: immutable filter/sort/limit/offset specification
//! - Page / PageBody: fetched spans of raw results
//! - Request / Response / TransportError: transport boundary value types
//! - Error: the fault taxonomy surfaced to callers

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod alias;
pub mod error;
pub mod mapper;
pub mod page;
pub mod path;
pub mod record;
pub mod spec;
pub mod transport;
pub mod value;
pub mod xml;

pub use alias::{AliasTable, AliasTableBuilder, FieldKind, FieldSpec};
pub use error::{DecodeError, Error, Result, TransportError};
pub use mapper::{map, unmap};
pub use page::{Page, PageBody};
pub use path::{get_at_path, set_at_path, FieldPath, PathError, PathParseError, PathSegment};
pub use record::{Model, Record};
pub use spec::{Criterion, Direction, FilterValue, QuerySpec, SortKey};
pub use transport::{Request, Response};
pub use value::FieldValue;
