//! Query engine for patent-client
//!
//! This crate assembles the provider-independent core types into the
//! lazily evaluated query layer:
//! - Provider: per-service request building and response parsing
//! - Transport / AsyncTransport / Session: the I/O boundary, both forms
//! - ResultCache: per-QuerySet mapped items keyed by provider position
//! - PageFetcher: the single fetch/cache algorithm both forms drive
//! - QuerySet / ValuesList / Values: chainable views and projections
//! - Manager: entry point binding a record type to one provider
//! - ClientConfig: `patent_client.toml`
//!
//! The engine never spawns tasks or threads. Forward iteration fetches
//! pages in non-decreasing position order; random access fetches in the
//! order positions are requested.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cache;
pub mod config;
pub mod fetcher;
#[cfg(feature = "http")]
pub mod http;
pub mod manager;
pub mod provider;
pub mod queryset;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod transport;
pub mod values;

pub use cache::{Mapped, ResultCache};
pub use config::{
    AssignmentConfig, BulkDataConfig, ClientConfig, ConfigError, EpoConfig, HttpConfig,
    OdpConfig, CONFIG_FILE_NAME,
};
pub use fetcher::{FetchPlan, PageFetcher, Step};
#[cfg(feature = "http")]
pub use http::HttpTransport;
pub use manager::Manager;
pub use provider::{PageToken, Pagination, Provider};
pub use queryset::QuerySet;
pub use transport::{AsyncTransport, Session, Transport};
pub use values::{Values, ValuesList};
