//! United States Patent and Trademark Office services
//!
//! - [`odp`]: Open Data Portal application search and per-application
//!   documents
//! - [`assignment`]: assignment recordation search (Solr, XML)
//! - [`bulk_data`]: bulk data product catalog

pub mod assignment;
pub mod bulk_data;
pub mod odp;
mod odp_model;

pub use assignment::{Assignment, AssignmentProvider};
pub use bulk_data::{Product, ProductFile, ProductProvider};
pub use odp::{ApplicationProvider, DocumentProvider};
pub use odp_model::{
    Address, Applicant, ApplicationAssignment, Assignee, AssigneeAddress, Assignor, Attorney,
    CustomerNumber, Document, DownloadOption, ForeignPriority, Inventor, Relationship,
    TelecommunicationAddress, TermAdjustment, TermAdjustmentHistory, Transaction, UsApplication,
};
