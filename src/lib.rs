//! patent-client - Lazy, typed query sets over patent data providers
//!
//! Records from EPO OPS and the USPTO services are reached through a
//! [`Manager`] per record type. Managers hand out [`QuerySet`]s that do no
//! I/O until materialized, fetch only the pages a request needs, and cache
//! what they fetch. Every materializing operation has a blocking and an
//! async form over the same fetch logic.
//!
//! # Quick Start
//!
//! ```ignore
//! use patent_client::{Client, ClientConfig};
//!
//! let client = Client::connect(ClientConfig::default())?;
//!
//! let apps = client
//!     .applications()
//!     .filter("first_applicant_name", "Tesla Motors")
//!     .sort(["-app_filing_date"]);
//! println!("{} applications", apps.count()?);
//! for app in apps.limit(5).iter() {
//!     println!("{}", app?.appl_id);
//! }
//! ```
//!
//! # Architecture
//!
//! - [`core`]: query specifications, alias tables, the Field Mapper
//! - [`engine`]: Page Fetcher, Result Cache, QuerySet, Manager, transports
//! - [`providers`]: provider adapters and record models

pub use patent_client_core as core;
pub use patent_client_engine as engine;
pub use patent_client_providers as providers;

pub use patent_client_core::{
    Criterion, DecodeError, Direction, Error, FieldValue, FilterValue, Model, QuerySpec, Record,
    Result, SortKey, TransportError,
};
pub use patent_client_engine::{ClientConfig, Manager, QuerySet, Session};
pub use patent_client_providers::Client;
