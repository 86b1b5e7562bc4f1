//! Provider adapters and record models for patent-client
//!
//! Each provider implements [`patent_client_engine::Provider`] for one
//! remote service; each record type implements
//! [`patent_client_core::Model`] with a declared alias table.
//!
//! | Record | Provider | Paging |
//! |---|---|---|
//! | [`Inpadoc`] | EPO OPS published-data search | `Range` header |
//! | [`FamilyMember`] | EPO OPS INPADOC family | unpaged |
//! | [`InpadocBiblio`] | EPO OPS bibliographic data | unpaged |
//! | [`UsApplication`] | USPTO ODP application search | offset/limit |
//! | [`Document`] | USPTO ODP application documents | unpaged |
//! | [`Assignment`] | USPTO assignment search | start/rows |
//! | [`Product`] | USPTO bulk data catalog | unpaged |
//!
//! [`Client`] bundles one [`patent_client_engine::Manager`] per record type.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod client;
mod common;
pub mod epo;
pub mod uspto;

pub use client::Client;
pub use epo::{DocumentId, FamilyMember, Inpadoc, InpadocBiblio, PriorityClaim};
pub use uspto::{Assignment, Document, Product, ProductFile, UsApplication};
